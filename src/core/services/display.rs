use chrono::DateTime;
use serde_json::Value;

/// Human label for a camelCase or snake_case field path.
///
/// `pluginVersionSid` becomes `Plugin Version SID`.
pub fn header_label(path: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in path.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| match w.to_lowercase().as_str() {
            "sid" => "SID".to_string(),
            "url" => "URL".to_string(),
            _ => {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display form of a field value. Strings are unquoted and date fields
/// are reformatted for reading.
pub fn display_value(path: &str, value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) if is_date_field(path) => DateTime::parse_from_rfc3339(s)
            .map(|d| d.format("%b %-d, %Y %H:%M:%S").to_string())
            .unwrap_or_else(|_| s.clone()),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn is_date_field(path: &str) -> bool {
    path.starts_with("date") || path.starts_with("Date")
}

/// JavaScript truthiness of an optional JSON value.
///
/// Absent, `null`, `false`, `0`, NaN and `""` are falsy; everything else,
/// including empty arrays and objects, is truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
