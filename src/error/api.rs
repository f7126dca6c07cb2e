use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field-level complaint returned by the API for an invalid request
///
/// `field` names the request input the complaint is attributed to. A missing
/// or empty field means the reason applies to the request as a whole.
///
/// # Examples
///
/// ```
/// use restfault::ApiErrorReason;
///
/// let reason = ApiErrorReason::new("must not be blank").with_field("label");
/// assert_eq!(reason.to_string(), "[label] must not be blank");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorReason {
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiErrorReason {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Returns the attributed field, treating an empty string as absent
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref().filter(|f| !f.is_empty())
    }
}

impl fmt::Display for ApiErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field() {
            Some(field) => write!(f, "[{field}] {}", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

/// The structured error body the API returns for a rejected request
///
/// Wire shape: `{"errors": [{"reason": "...", "field": "..."}]}`. Reason
/// order is the server's order and is preserved when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorSet {
    pub errors: Vec<ApiErrorReason>,
}

impl ApiErrorSet {
    pub fn new(errors: Vec<ApiErrorReason>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for ApiErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_display_with_field() {
        let reason = ApiErrorReason::new("must not be blank").with_field("label");
        assert_eq!(reason.to_string(), "[label] must not be blank");
    }

    #[test]
    fn test_reason_display_without_field() {
        let reason = ApiErrorReason::new("must not be blank");
        assert_eq!(reason.to_string(), "must not be blank");

        // An empty field is the same as no field
        let reason = ApiErrorReason::new("must not be blank").with_field("");
        assert_eq!(reason.to_string(), "must not be blank");
    }

    #[test]
    fn test_set_display_preserves_order() {
        let set = ApiErrorSet::new(vec![
            ApiErrorReason::new("a").with_field("f"),
            ApiErrorReason::new("b"),
        ]);
        assert_eq!(set.to_string(), "[f] a; b");
    }

    #[test]
    fn test_empty_set_renders_empty() {
        let set = ApiErrorSet::default();
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "");
    }

    #[test]
    fn test_set_deserializes_wire_shape() {
        let body = r#"{"errors":[{"reason":"Invalid label","field":"label"},{"reason":"Not found"}]}"#;
        let set: ApiErrorSet = serde_json::from_str(body).expect("Test: Valid error body");
        assert_eq!(set.len(), 2);
        assert_eq!(set.errors[0].field(), Some("label"));
        assert_eq!(set.errors[1].field(), None);
        assert_eq!(set.to_string(), "[label] Invalid label; Not found");
    }

    #[test]
    fn test_set_rejects_missing_reason() {
        let body = r#"{"errors":[{"field":"label"}]}"#;
        assert!(serde_json::from_str::<ApiErrorSet>(body).is_err());
    }
}
