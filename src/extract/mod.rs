//! Scale extraction from the engine source
//!
//! Reads the `scales` assignment as an object literal and keeps every member
//! whose value is an array of non-negative integers. Comments inside the
//! object are skipped by the reader, so commented-out entries never surface.

use crate::error::{CurateError, Result};
use crate::literal::{find_assignment, parse_object, JsValue};
use crate::utils::display_name;

pub const SCALES_ASSIGNMENT: &str = "scales";

/// One scale definition as written in the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleDefinition {
    pub name: String,
    pub display_name: String,
    pub intervals: Vec<u32>,
}

/// Extract scale definitions in source order.
///
/// Fails when the `scales` assignment cannot be located or read. An `Ok` with
/// an empty list means the assignment exists but holds no interval arrays;
/// callers must abort rather than treat that as an empty database. A repeated
/// key keeps its first position and its last value.
pub fn extract_scales(source: &str) -> Result<Vec<ScaleDefinition>> {
    let assignment =
        find_assignment(source, SCALES_ASSIGNMENT).ok_or_else(|| CurateError::assignment(SCALES_ASSIGNMENT))?;
    let members = parse_object(assignment.literal(source), assignment.open, SCALES_ASSIGNMENT)?;

    let mut scales: Vec<ScaleDefinition> = Vec::with_capacity(members.len());
    for (name, value) in &members {
        let Some(intervals) = integer_array(value) else {
            tracing::warn!("Skipping `{}`: not an array of non-negative integers", name);
            continue;
        };
        match scales.iter_mut().find(|s| &s.name == name) {
            Some(existing) => {
                tracing::warn!("Duplicate scale `{}`; the later definition wins", name);
                existing.intervals = intervals;
            }
            None => scales.push(ScaleDefinition { display_name: display_name(name), name: name.clone(), intervals }),
        }
    }

    if scales.is_empty() {
        tracing::warn!("`{}` assignment found but no scale entries matched", SCALES_ASSIGNMENT);
    } else {
        tracing::debug!("Extracted {} scales", scales.len());
    }
    Ok(scales)
}

fn integer_array(value: &JsValue) -> Option<Vec<u32>> {
    value
        .as_array()?
        .iter()
        .map(|item| match item {
            JsValue::Number(_) => item
                .as_f64()
                .filter(|n| n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(n))
                .map(|n| n as u32),
            _ => None,
        })
        .collect()
}
