//! Helpers for deserializing staff-submitted form values.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a form field as a string, number, bool or null and keep its text.
pub(crate) fn form_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Field {
        #[serde(deserialize_with = "form_text")]
        value: String,
    }

    fn parse(json: &str) -> String {
        serde_json::from_str::<Field>(json).unwrap().value
    }

    #[test]
    fn test_form_text_accepts_any_scalar() {
        assert_eq!(parse(r#"{"value":"12.5"}"#), "12.5");
        assert_eq!(parse(r#"{"value":12.5}"#), "12.5");
        assert_eq!(parse(r#"{"value":null}"#), "");
        assert_eq!(parse(r#"{"value":true}"#), "true");
    }
}
