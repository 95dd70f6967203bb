//! Pull a JSON object out of free-form model output.
//!
//! The model is asked for strict JSON but often wraps it in prose or code
//! fences. This takes everything from the first `{` to the last `}` and
//! parses it as a whole; there is no field-level repair.

use serde_json::Value;
use thiserror::Error;

/// Errors from locating or parsing the embedded JSON object.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("response contains no JSON object")]
    NoObject,

    #[error("response JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Extract and parse the span between the first `{` and the last `}`.
pub fn extract_json_object(text: &str) -> Result<Value, ExtractError> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(ExtractError::NoObject);
    };
    if end < start {
        return Err(ExtractError::NoObject);
    }
    Ok(serde_json::from_str(&text[start..=end])?)
}
