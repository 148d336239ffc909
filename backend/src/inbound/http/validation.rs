//! Shared validation helpers for inbound HTTP request bodies.

use serde_json::json;

use crate::domain::Error;

/// Newtype wrapper for HTTP field names to keep call sites typo-resistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// Require a non-empty (post-trim) string value.
pub(crate) fn require_text(value: &str, field: FieldName) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(missing_field_error(field));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn require_text_trims_and_accepts() {
        let value = require_text("  hello  ", FieldName::new("title")).expect("accepted");
        assert_eq!(value, "hello");
    }

    #[test]
    fn require_text_rejects_whitespace() {
        let err = require_text("   ", FieldName::new("title")).expect_err("rejected");
        let details = err.details.expect("details");
        assert_eq!(details.get("field").and_then(Value::as_str), Some("title"));
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("missing_field")
        );
    }
}
