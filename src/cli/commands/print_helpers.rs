use serde::Serialize;
use serde_json::Value;

use crate::core::services::display::{display_value, header_label};
use crate::core::traits::logger::Logger;

/// Print a bold `Header:` line, optionally followed by a value.
pub fn print_header(logger: &dyn Logger, header: &str, value: Option<&str>) {
    match value {
        Some(value) => logger.info(&format!("**{header}:** {value}")),
        None => logger.info(&format!("**{header}:**")),
    }
}

/// Print a bold `@version` line with an optional note such as `(Active)`.
pub fn print_version(logger: &dyn Logger, version: &str, note: &str) {
    if note.is_empty() {
        logger.info(&format!("**@{version}**"));
    } else {
        logger.info(&format!("**@{version}** {note}"));
    }
}

/// Print a bold title line for a named resource.
pub fn print_title(logger: &dyn Logger, title: &str) {
    logger.info(&format!("**{title}**"));
}

/// Print every serialized field of `item` except those in `skip`, one per line.
pub fn print_pretty<T: Serialize>(logger: &dyn Logger, item: &T, skip: &[&str]) {
    let Ok(Value::Object(fields)) = serde_json::to_value(item) else {
        return;
    };
    for (key, value) in fields.iter().filter(|(k, _)| !skip.contains(&k.as_str())) {
        logger.info(&format!(
            "  {}: {}",
            header_label(key),
            display_value(key, Some(value))
        ));
    }
}

/// Stable sort putting active items first.
pub fn sort_by_active<T, F>(items: &mut [T], is_active: F)
where
    F: Fn(&T) -> bool,
{
    items.sort_by_key(|item| !is_active(item));
}

/// Serialize `value` as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> crate::core::errors::Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        crate::core::errors::FlexPluginsError::InvalidArgument {
            detail: format!("Failed to serialize output: {e}"),
        }
    })
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> crate::core::errors::Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingLogger;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Item {
        plugin_sid: String,
        is_active: bool,
        version: String,
    }

    #[test]
    fn pretty_prints_fields_except_skipped() {
        let logger = RecordingLogger::default();
        let item = Item {
            plugin_sid: "FP1".into(),
            is_active: true,
            version: "1.0.0".into(),
        };
        print_pretty(&logger, &item, &["isActive", "version"]);
        assert_eq!(logger.lines(), vec!["  Plugin SID: FP1"]);
    }

    #[test]
    fn headers_and_versions() {
        let logger = RecordingLogger::default();
        print_header(&logger, "Plugin Name", Some("plugin-one"));
        print_header(&logger, "Versions", None);
        print_version(&logger, "1.0.0", "(Active)");
        print_version(&logger, "0.9.0", "");
        assert_eq!(
            logger.lines(),
            vec![
                "**Plugin Name:** plugin-one",
                "**Versions:**",
                "**@1.0.0** (Active)",
                "**@0.9.0**",
            ]
        );
    }

    #[test]
    fn json_keeps_camel_case_field_names() {
        let item = Item {
            plugin_sid: "FP1".into(),
            is_active: false,
            version: "1.0.0".into(),
        };
        let json = to_json(&item).unwrap();
        assert!(json.contains("\"pluginSid\": \"FP1\""));
        assert!(json.contains("\"isActive\": false"));
    }

    #[test]
    fn active_items_sort_first_and_keep_order() {
        let mut items = vec![("a", false), ("b", true), ("c", false), ("d", true)];
        sort_by_active(&mut items, |i| i.1);
        assert_eq!(items, vec![("b", true), ("d", true), ("a", false), ("c", false)]);
    }
}
