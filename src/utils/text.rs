//! Small text helpers

/// Human label for a scale key: `locrian_nat2` -> `Locrian Nat2`.
///
/// A letter is upper-cased when it follows a non-letter and lower-cased
/// otherwise, so `b7_chord` becomes `B7 Chord`.
pub fn display_name(scale_name: &str) -> String {
    let mut out = String::with_capacity(scale_name.len());
    let mut prev_is_letter = false;
    for ch in scale_name.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
