use serde_json::Value;

use super::ExtraField;

pub const MAX_PHOTO_URLS: usize = 5;

/// Raw contact-form fields pulled out of a parsed body. A field that is
/// missing, null or blank is `None`.
#[derive(Debug, Clone, Default)]
pub struct ContactFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
    pub user_agent: Option<String>,
    pub extras: Vec<(ExtraField, String)>,
    pub photo_urls: Vec<String>,
}

impl ContactFields {
    /// Non-object bodies yield an empty field set, which then fails validation.
    pub fn from_value(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self::default();
        };

        let text = |key: &str| obj.get(key).and_then(as_text);

        let extras = ExtraField::ALL
            .iter()
            .filter_map(|f| text(f.key()).map(|v| (*f, v)))
            .collect();

        let photo_urls = match obj.get("photoUrls") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .take(MAX_PHOTO_URLS)
                .map(|s| s.to_string())
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
            _ => Vec::new(),
        };

        Self {
            name: text("name"),
            email: text("email"),
            phone: text("phone"),
            // The main site form posts `service`; partner forms post `subject`.
            subject: text("subject").or_else(|| text("service")),
            message: text("message"),
            source: text("source"),
            user_agent: text("userAgent"),
            extras,
            photo_urls,
        }
    }
}

fn as_text(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.trim().is_empty()).then_some(s)
}
