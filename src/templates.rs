use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tera::Tera;

use crate::config::UiConfig;
use crate::error::AppError;

/// Format used by the `datetime` filter when no `format` argument is given
pub const DEFAULT_DATETIME_FORMAT: &str = "%B %-d, %Y %H:%M UTC";

/// Initialize the Tera template engine from the configured templates directory
pub fn init_templates(ui: &UiConfig) -> Result<Tera, AppError> {
    let mut tera = Tera::new(&ui.template_glob())?;
    tera.register_filter("datetime", datetime_filter);
    Ok(tera)
}

/// Render an RFC 3339 timestamp in a human-readable form.
///
/// Accepts an optional `format` argument (strftime syntax). Unparseable input
/// is passed through unchanged.
fn datetime_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let date_str = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("datetime filter expects a string"))?;

    let format = args
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_DATETIME_FORMAT);

    match DateTime::parse_from_rfc3339(date_str) {
        Ok(date) => Ok(tera::Value::String(
            date.with_timezone(&Utc).format(format).to_string(),
        )),
        Err(_) => Ok(tera::Value::String(date_str.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(value: &str, args: &[(&str, &str)]) -> String {
        let args: HashMap<String, tera::Value> = args
            .iter()
            .map(|(k, v)| (k.to_string(), tera::Value::String(v.to_string())))
            .collect();
        datetime_filter(&tera::Value::String(value.to_string()), &args)
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_datetime_default_format() {
        assert_eq!(
            apply("2024-03-09T14:05:07.000Z", &[]),
            "March 9, 2024 14:05 UTC"
        );
    }

    #[test]
    fn test_datetime_converts_offset_to_utc() {
        assert_eq!(
            apply("2024-03-09T16:05:07+02:00", &[("format", "%Y-%m-%d %H:%M")]),
            "2024-03-09 14:05"
        );
    }

    #[test]
    fn test_datetime_passes_through_garbage() {
        assert_eq!(apply("yesterday", &[]), "yesterday");
    }

    #[test]
    fn test_datetime_rejects_non_string() {
        let result = datetime_filter(&tera::Value::Bool(true), &HashMap::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_init_templates_from_repo() {
        let ui = UiConfig {
            templates_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/templates").to_string(),
            ..UiConfig::default()
        };
        let tera = init_templates(&ui).unwrap();
        assert!(tera.get_template_names().any(|name| name == "index.html"));
    }
}
