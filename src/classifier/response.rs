//! Parsing of raw model output.
//!
//! This is the only place where free-form model text is interpreted.

use super::error::ClassifierError;
use crate::models::Classification;
use std::collections::HashMap;

/// Remove markdown code-fence markers around a JSON payload.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}

/// Parse a model response into title classifications.
///
/// The response must be a JSON object whose values are all strings; any
/// other shape fails as a whole. Labels are interpreted with
/// [`Classification::from_label`].
pub fn parse_classifications(
    raw: &str,
) -> Result<HashMap<String, Classification>, ClassifierError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(ClassifierError::EmptyResponse);
    }

    let labels: HashMap<String, String> = serde_json::from_str(cleaned)?;

    Ok(labels
        .into_iter()
        .map(|(title, label)| {
            let classification = Classification::from_label(&label);
            (title, classification)
        })
        .collect())
}
