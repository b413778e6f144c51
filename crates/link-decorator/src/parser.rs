//! Settings document parser.

use crate::error::Result;
use crate::settings::DecoratorSettings;

/// Supported settings formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Yaml,
    Json,
}

impl SettingsFormat {
    /// Detects format from content.
    pub fn detect(content: &str) -> Self {
        let trimmed = content.trim();
        if trimmed.starts_with('{') {
            SettingsFormat::Json
        } else {
            SettingsFormat::Yaml
        }
    }
}

/// Parses settings from a string, auto-detecting format.
///
/// Blank input yields empty settings, as for a fresh install.
pub fn parse_settings(content: &str) -> Result<DecoratorSettings> {
    if content.trim().is_empty() {
        return Ok(DecoratorSettings::default());
    }

    let format = SettingsFormat::detect(content);
    parse_settings_with_format(content, format)
}

/// Parses settings from a string with specified format.
pub fn parse_settings_with_format(
    content: &str,
    format: SettingsFormat,
) -> Result<DecoratorSettings> {
    match format {
        SettingsFormat::Yaml => DecoratorSettings::from_yaml(content),
        SettingsFormat::Json => DecoratorSettings::from_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecoratorError;
    use crate::types::Target;

    #[test]
    fn test_format_detection() {
        assert_eq!(SettingsFormat::detect(r#"{"rules": []}"#), SettingsFormat::Json);
        assert_eq!(SettingsFormat::detect("rules: []"), SettingsFormat::Yaml);
        assert_eq!(SettingsFormat::detect("  \n{}"), SettingsFormat::Json);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
rules:
  - id: "1700000000000"
    target: metadata
    value: "(meta) => {'classname': 'x'}"
"#;
        let settings = parse_settings(yaml).unwrap();
        assert_eq!(settings.rules[0].target, Target::Metadata);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"rules": [{"id": "1", "key": "todo", "icon": "check"}]}"#;
        let settings = parse_settings(json).unwrap();
        assert_eq!(settings.rules[0].key, "todo");
        assert_eq!(settings.rules[0].target, Target::Tag);
    }

    #[test]
    fn test_parse_blank() {
        assert!(parse_settings("  \n").unwrap().rules.is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_settings("{"), Err(DecoratorError::SerializationError(_))));
        assert!(matches!(
            parse_settings("rules: [unclosed"),
            Err(DecoratorError::ParseError(_))
        ));
        assert!(matches!(
            parse_settings(r#"{"rules": [{"target": "bogus"}]}"#),
            Err(DecoratorError::SerializationError(_))
        ));
    }
}
