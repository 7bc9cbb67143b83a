// Helper functions for safe logging

use serde_json::Value;

/// Fields whose values never reach the logs
const REDACTED_FIELDS: &[&str] = &["password", "password_hash", "token", "secret"];

/// Fields that may carry large base64 payloads
const TRUNCATED_FIELDS: &[&str] = &["image", "image_base64"];

const TRUNCATE_AT: usize = 32;

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***@***.***".to_string(),
    }
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 8 && token.is_ascii() {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Redacts credentials and shortens base64 blobs inside a JSON body, in place.
pub fn redact_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                let key = key.to_ascii_lowercase();
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *field = Value::String("[REDACTED]".to_string());
                } else if TRUNCATED_FIELDS.contains(&key.as_str()) {
                    if let Value::String(s) = field {
                        if s.len() > TRUNCATE_AT {
                            *field = Value::String(format!("[{} bytes]", s.len()));
                        }
                    }
                } else {
                    redact_json(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_email_log() {
        assert_eq!(safe_email_log("ana@x.com"), "a***@x.com");
        assert_eq!(safe_email_log("not-an-email"), "***@***.***");
        assert_eq!(safe_email_log("@x.com"), "***@***.***");
    }

    #[test]
    fn test_safe_token_log() {
        assert_eq!(safe_token_log("eyJhbGciOiJIUzI1NiJ9"), "eyJh...NiJ9");
        assert_eq!(safe_token_log("short"), "***");
    }

    #[test]
    fn test_redact_json_masks_nested_secrets() {
        let mut body = json!({
            "email": "ana@x.com",
            "password": "secret",
            "nested": [{ "token": "abc" }],
            "image": "a".repeat(100),
            "title": "Injera"
        });

        redact_json(&mut body);

        assert_eq!(body["password"], "[REDACTED]");
        assert_eq!(body["nested"][0]["token"], "[REDACTED]");
        assert_eq!(body["image"], "[100 bytes]");
        assert_eq!(body["title"], "Injera");
        assert_eq!(body["email"], "ana@x.com");
    }
}
