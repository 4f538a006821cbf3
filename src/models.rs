use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const MAX_TEXT_CHARS: usize = 5000;

// field name -> messages, rendered as the "errors" object of a 400
pub type FieldErrors = BTreeMap<String, Vec<String>>;

// Validated summarize payload
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizeRequest {
    pub text: String,
}

impl SummarizeRequest {
    /// Validates a decoded JSON body. `text` is trimmed before the blank and
    /// length checks, and the trimmed value is what gets summarized.
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let Some(fields) = body.as_object() else {
            return Err(field_error("non_field_errors", "Expected a JSON object."));
        };

        let text = match fields.get("text") {
            None | Some(Value::Null) => return Err(field_error("text", "This field is required.")),
            Some(Value::String(s)) => s.trim().to_string(),
            // numbers are coerced to their text form
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => return Err(field_error("text", "Not a valid string.")),
        };

        if text.is_empty() {
            return Err(field_error("text", "Text cannot be empty."));
        }
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(field_error(
                "text",
                &format!("Ensure this field has no more than {MAX_TEXT_CHARS} characters."),
            ));
        }

        Ok(Self { text })
    }
}

pub fn field_error(field: &str, message: &str) -> FieldErrors {
    FieldErrors::from([(field.to_string(), vec![message.to_string()])])
}

// 200 envelope
#[derive(Serialize, Debug)]
pub struct SummaryResponse {
    pub status: &'static str,
    pub summary: String,
}

impl SummaryResponse {
    pub fn new(summary: String) -> Self {
        Self {
            status: "success",
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn errors_for(body: Value) -> FieldErrors {
        SummarizeRequest::from_json(&body).unwrap_err()
    }

    #[test]
    fn accepts_and_trims_text() {
        let req = SummarizeRequest::from_json(&json!({"text": "  some article  "})).unwrap();
        assert_eq!(req.text, "some article");
    }

    #[test]
    fn missing_or_null_text_is_required() {
        assert_eq!(errors_for(json!({}))["text"], vec!["This field is required."]);
        assert_eq!(errors_for(json!({"text": null}))["text"], vec!["This field is required."]);
    }

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(errors_for(json!({"text": " \n\t "}))["text"], vec!["Text cannot be empty."]);
    }

    #[test]
    fn numeric_text_is_coerced() {
        let req = SummarizeRequest::from_json(&json!({"text": 42})).unwrap();
        assert_eq!(req.text, "42");
        let req = SummarizeRequest::from_json(&json!({"text": 1.5})).unwrap();
        assert_eq!(req.text, "1.5");
    }

    #[test]
    fn non_scalar_text_is_rejected() {
        for bad in [json!(true), json!(["a"]), json!({"a": 1})] {
            assert_eq!(errors_for(json!({"text": bad}))["text"], vec!["Not a valid string."]);
        }
    }

    #[test]
    fn length_is_counted_in_chars_after_trim() {
        let at_limit = "é".repeat(MAX_TEXT_CHARS);
        assert!(SummarizeRequest::from_json(&json!({"text": format!("  {at_limit}  ")})).is_ok());

        let over = "a".repeat(MAX_TEXT_CHARS + 1);
        let errors = errors_for(json!({"text": over}));
        assert!(errors["text"][0].contains("no more than 5000 characters"));
    }

    #[test]
    fn non_object_body_is_a_non_field_error() {
        let errors = errors_for(json!(["text"]));
        assert!(errors.contains_key("non_field_errors"));
    }
}
