//! Typed view of one `scaleCitations` entry.
//!
//! Known fields are lifted into struct fields; everything else (including a
//! known key whose value has an unexpected type) is kept in `extra` and
//! re-emitted after the known fields.

use std::fmt;

use crate::literal::{JsValue, Members};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationStatus {
    Verified,
    NeedsReview,
    LimitedDocumentation,
    ManuallyVerified,
    Other(String),
}

impl ValidationStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "verified" => Self::Verified,
            "needs-review" => Self::NeedsReview,
            "limited-documentation" => Self::LimitedDocumentation,
            "manually-verified" => Self::ManuallyVerified,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Verified => "verified",
            Self::NeedsReview => "needs-review",
            Self::LimitedDocumentation => "limited-documentation",
            Self::ManuallyVerified => "manually-verified",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Verified,
    Unverified,
    Other(String),
}

impl Category {
    /// `verified` at or above `threshold`, `unverified` below.
    pub fn for_quality(quality: f64, threshold: f64) -> Self {
        if quality >= threshold {
            Self::Verified
        } else {
            Self::Unverified
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "verified" => Self::Verified,
            "unverified" => Self::Unverified,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Verified => "verified",
            Self::Unverified => "unverified",
            Self::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reference {
    pub ref_type: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub category: Option<Category>,
    pub verification_status: Option<String>,
    pub verification_date: Option<String>,
    pub content_score: Option<f64>,
    pub extra: Members,
}

impl Reference {
    pub fn from_value(value: &JsValue) -> Option<Self> {
        let members = value.as_object()?;
        let mut reference = Self::default();
        for (key, value) in members {
            let text = value.as_str().map(str::to_string);
            match (key.as_str(), text) {
                ("type", Some(s)) => reference.ref_type = Some(s),
                ("title", Some(s)) => reference.title = Some(s),
                ("url", Some(s)) => reference.url = Some(s),
                ("description", Some(s)) => reference.description = Some(s),
                ("source", Some(s)) => reference.source = Some(s),
                ("category", Some(s)) => reference.category = Some(Category::parse(&s)),
                ("verificationStatus", Some(s)) => reference.verification_status = Some(s),
                ("verificationDate", Some(s)) => reference.verification_date = Some(s),
                ("contentScore", _) if value.as_f64().is_some() => {
                    reference.content_score = value.as_f64()
                }
                _ => reference.extra.push((key.clone(), value.clone())),
            }
        }
        Some(reference)
    }

    pub fn to_value(&self) -> JsValue {
        let mut members = Members::new();
        push_str(&mut members, "type", &self.ref_type);
        push_str(&mut members, "title", &self.title);
        push_str(&mut members, "url", &self.url);
        push_str(&mut members, "description", &self.description);
        push_str(&mut members, "source", &self.source);
        if let Some(category) = &self.category {
            members.push(("category".to_string(), JsValue::string(category.as_str())));
        }
        push_str(&mut members, "verificationStatus", &self.verification_status);
        push_str(&mut members, "verificationDate", &self.verification_date);
        if let Some(score) = self.content_score {
            members.push(("contentScore".to_string(), JsValue::number(score)));
        }
        members.extend(self.extra.iter().cloned());
        JsValue::Object(members)
    }

    pub fn score(&self) -> f64 {
        self.content_score.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CulturalContext {
    pub region: Option<String>,
    pub cultural_group: Option<String>,
    pub historical_period: Option<String>,
    pub musical_function: Option<String>,
    pub extra: Members,
}

impl CulturalContext {
    fn from_members(members: &Members) -> Self {
        let mut ctx = Self::default();
        for (key, value) in members {
            let text = value.as_str().map(str::to_string);
            match (key.as_str(), text) {
                ("region", Some(s)) => ctx.region = Some(s),
                ("culturalGroup", Some(s)) => ctx.cultural_group = Some(s),
                ("historicalPeriod", Some(s)) => ctx.historical_period = Some(s),
                ("musicalFunction", Some(s)) => ctx.musical_function = Some(s),
                _ => ctx.extra.push((key.clone(), value.clone())),
            }
        }
        ctx
    }

    fn to_value(&self) -> JsValue {
        let mut members = Members::new();
        push_str(&mut members, "region", &self.region);
        push_str(&mut members, "culturalGroup", &self.cultural_group);
        push_str(&mut members, "historicalPeriod", &self.historical_period);
        push_str(&mut members, "musicalFunction", &self.musical_function);
        members.extend(self.extra.iter().cloned());
        JsValue::Object(members)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationEntry {
    pub description: Option<String>,
    pub cultural_context: Option<CulturalContext>,
    pub references: Option<Vec<Reference>>,
    /// Non-object items of `references`, written after the typed ones.
    pub loose_references: Vec<JsValue>,
    pub validation_status: Option<ValidationStatus>,
    pub validation_date: Option<String>,
    pub extra: Members,
}

impl CitationEntry {
    /// Empty entry with only a description, for scales that have no block yet.
    pub fn placeholder(description: &str) -> Self {
        Self { description: Some(description.to_string()), ..Self::default() }
    }

    pub fn from_members(members: &Members) -> Self {
        let mut entry = Self::default();
        for (key, value) in members {
            match (key.as_str(), value) {
                ("description", JsValue::String(s)) => entry.description = Some(s.clone()),
                ("culturalContext", JsValue::Object(ctx)) => {
                    entry.cultural_context = Some(CulturalContext::from_members(ctx))
                }
                ("references", JsValue::Array(items)) => {
                    let (objects, loose): (Vec<&JsValue>, Vec<&JsValue>) =
                        items.iter().partition(|item| item.as_object().is_some());
                    entry.references = Some(objects.into_iter().filter_map(Reference::from_value).collect());
                    entry.loose_references = loose.into_iter().cloned().collect();
                }
                ("validationStatus", JsValue::String(s)) => {
                    entry.validation_status = Some(ValidationStatus::parse(s))
                }
                ("validationDate", JsValue::String(s)) => entry.validation_date = Some(s.clone()),
                _ => entry.extra.push((key.clone(), value.clone())),
            }
        }
        entry
    }

    pub fn to_members(&self) -> Members {
        let mut members = Members::new();
        push_str(&mut members, "description", &self.description);
        if let Some(ctx) = &self.cultural_context {
            members.push(("culturalContext".to_string(), ctx.to_value()));
        }
        if self.references.is_some() || !self.loose_references.is_empty() {
            let mut items: Vec<JsValue> = self.references.iter().flatten().map(Reference::to_value).collect();
            items.extend(self.loose_references.iter().cloned());
            members.push(("references".to_string(), JsValue::Array(items)));
        }
        if let Some(status) = &self.validation_status {
            members.push(("validationStatus".to_string(), JsValue::string(status.as_str())));
        }
        push_str(&mut members, "validationDate", &self.validation_date);
        // A typed field set after parsing shadows the raw value kept in `extra`.
        let typed: Vec<String> = members.iter().map(|(key, _)| key.clone()).collect();
        members.extend(self.extra.iter().filter(|(key, _)| !typed.contains(key)).cloned());
        members
    }

    /// Stable sort of references by `contentScore`, highest first.
    pub fn sort_references(&mut self) {
        if let Some(references) = &mut self.references {
            references.sort_by(|a, b| b.score().total_cmp(&a.score()));
        }
    }
}

fn push_str(members: &mut Members, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        members.push((key.to_string(), JsValue::string(value.as_str())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::parse_object;

    const ENTRY: &str = r#"{
        description: 'Second mode of the major scale',
        culturalContext: { region: 'Western', culturalGroup: 'European', era: 'medieval' },
        references: [
            { type: 'book', title: 'Harmony', contentScore: 0.8, isbn: '123' }
        ],
        validationStatus: 'legacy-status',
        sortKey: 4
    }"#;

    #[test]
    fn known_and_unknown_fields_survive() {
        let members = parse_object(ENTRY, 0, "entry").expect("parse");
        let entry = CitationEntry::from_members(&members);
        assert_eq!(entry.description.as_deref(), Some("Second mode of the major scale"));
        let ctx = entry.cultural_context.as_ref().expect("ctx");
        assert_eq!(ctx.region.as_deref(), Some("Western"));
        assert_eq!(ctx.extra[0].0, "era");
        let refs = entry.references.as_ref().expect("refs");
        assert_eq!(refs[0].content_score, Some(0.8));
        assert_eq!(refs[0].extra[0].0, "isbn");
        assert_eq!(entry.validation_status, Some(ValidationStatus::Other("legacy-status".into())));
        assert_eq!(entry.extra[0].0, "sortKey");

        let keys: Vec<String> = entry.to_members().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["description", "culturalContext", "references", "validationStatus", "sortKey"]
        );
    }

    #[test]
    fn mixed_references_keep_one_key() {
        let members = parse_object(
            "{ references: ['legacy note', { title: 'Old', contentScore: 0.7 }] }",
            0,
            "entry",
        )
        .expect("parse");
        let entry = CitationEntry::from_members(&members);
        assert_eq!(entry.references.as_ref().map(Vec::len), Some(1));
        assert_eq!(entry.loose_references, vec![JsValue::string("legacy note")]);
        assert!(entry.extra.is_empty());

        let out = entry.to_members();
        assert_eq!(out.len(), 1);
        let items = out[0].1.as_array().expect("array");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], JsValue::string("legacy note"));
    }

    #[test]
    fn typed_field_shadows_malformed_raw_value() {
        let members = parse_object("{ validationStatus: 3, note: 'x' }", 0, "entry").expect("parse");
        let mut entry = CitationEntry::from_members(&members);
        entry.validation_status = Some(ValidationStatus::LimitedDocumentation);
        let keys: Vec<String> = entry.to_members().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["validationStatus", "note"]);
    }

    #[test]
    fn category_threshold_is_inclusive() {
        assert_eq!(Category::for_quality(0.7, 0.7), Category::Verified);
        assert_eq!(Category::for_quality(0.69, 0.7), Category::Unverified);
    }

    #[test]
    fn references_sort_stably_by_score() {
        let reference = |title: &str, score| Reference {
            title: Some(title.to_string()),
            content_score: Some(score),
            ..Reference::default()
        };
        let mut entry = CitationEntry {
            references: Some(vec![reference("a", 0.5), reference("b", 0.9), reference("c", 0.5)]),
            ..CitationEntry::default()
        };
        entry.sort_references();
        let titles: Vec<_> = entry
            .references
            .unwrap()
            .into_iter()
            .map(|r| r.title.unwrap_or_default())
            .collect();
        assert_eq!(titles, vec!["b", "a", "c"]);
    }
}
