//! Configuration validation.
//!
//! Validates the service, AI and sheet sections before any import runs.

use crate::domain::error::StockgridError;
use crate::ports::config_port::ConfigPort;

pub fn validate_service_config(config: &dyn ConfigPort) -> Result<(), StockgridError> {
    validate_base_url(config, "service")?;
    validate_timeout(config, "service")?;
    validate_ai(config)?;
    validate_sheet_dimensions(config)?;
    Ok(())
}

fn validate_base_url(config: &dyn ConfigPort, section: &str) -> Result<(), StockgridError> {
    let value = match config.get_string(section, "base_url") {
        Some(s) if !s.trim().is_empty() => s,
        _ => {
            return Err(StockgridError::ConfigMissing {
                section: section.to_string(),
                key: "base_url".to_string(),
            })
        }
    };
    let parsed = url::Url::parse(value.trim()).map_err(|e| StockgridError::ConfigInvalid {
        section: section.to_string(),
        key: "base_url".to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(StockgridError::ConfigInvalid {
            section: section.to_string(),
            key: "base_url".to_string(),
            reason: "base_url must use http or https".to_string(),
        });
    }
    Ok(())
}

fn validate_timeout(config: &dyn ConfigPort, section: &str) -> Result<(), StockgridError> {
    let value = config.get_int(section, "timeout_secs", 30);
    if value < 1 {
        return Err(StockgridError::ConfigInvalid {
            section: section.to_string(),
            key: "timeout_secs".to_string(),
            reason: "timeout_secs must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_ai(config: &dyn ConfigPort) -> Result<(), StockgridError> {
    if !config.get_bool("ai", "enabled", false) {
        return Ok(());
    }
    validate_base_url(config, "ai")?;
    validate_timeout(config, "ai")?;
    let key_from_env = std::env::var("STOCKGRID_AI_KEY").is_ok_and(|v| !v.trim().is_empty());
    let required: &[&str] = if key_from_env { &["model"] } else { &["model", "api_key"] };
    for &key in required {
        match config.get_string("ai", key) {
            Some(s) if !s.trim().is_empty() => {}
            _ => {
                return Err(StockgridError::ConfigMissing {
                    section: "ai".to_string(),
                    key: key.to_string(),
                })
            }
        }
    }
    Ok(())
}

fn validate_sheet_dimensions(config: &dyn ConfigPort) -> Result<(), StockgridError> {
    for key in ["max_rows", "max_columns"] {
        if config.get_int("sheet", key, 1) < 1 {
            return Err(StockgridError::ConfigInvalid {
                section: "sheet".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be at least 1"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn assert_missing(result: Result<(), StockgridError>, section: &str, key: &str) {
        match result {
            Err(StockgridError::ConfigMissing { section: s, key: k }) => {
                assert_eq!(s, section);
                assert_eq!(k, key);
            }
            other => panic!("expected ConfigMissing [{section}] {key}, got {other:?}"),
        }
    }

    fn assert_invalid(result: Result<(), StockgridError>, section: &str, key: &str) {
        match result {
            Err(StockgridError::ConfigInvalid {
                section: s, key: k, ..
            }) => {
                assert_eq!(s, section);
                assert_eq!(k, key);
            }
            other => panic!("expected ConfigInvalid [{section}] {key}, got {other:?}"),
        }
    }

    #[test]
    fn minimal_service_config_passes() {
        let config = make_config("[service]\nbase_url = https://data.example.com/api\n");
        assert!(validate_service_config(&config).is_ok());
    }

    #[test]
    fn full_config_passes() {
        let config = make_config(
            r#"
[service]
base_url = http://localhost:8080
timeout_secs = 10

[ai]
enabled = true
base_url = https://ai.example.com/v1beta
model = gemini-1.5-flash
api_key = secret

[sheet]
max_rows = 1000
max_columns = 26
"#,
        );
        assert!(validate_service_config(&config).is_ok());
    }

    #[test]
    fn missing_base_url_fails() {
        let config = make_config("[service]\ntimeout_secs = 5\n");
        assert_missing(validate_service_config(&config), "service", "base_url");
    }

    #[test]
    fn non_http_base_url_fails() {
        let config = make_config("[service]\nbase_url = ftp://data.example.com\n");
        assert_invalid(validate_service_config(&config), "service", "base_url");

        let config = make_config("[service]\nbase_url = not a url\n");
        assert_invalid(validate_service_config(&config), "service", "base_url");
    }

    #[test]
    fn zero_timeout_fails() {
        let config = make_config("[service]\nbase_url = http://x.example\ntimeout_secs = 0\n");
        assert_invalid(validate_service_config(&config), "service", "timeout_secs");
    }

    #[test]
    fn enabled_ai_requires_model_and_key() {
        let config = make_config(
            "[service]\nbase_url = http://x.example\n[ai]\nenabled = yes\nbase_url = http://ai.example\nmodel = m\n",
        );
        assert_missing(validate_service_config(&config), "ai", "api_key");
    }

    #[test]
    fn disabled_ai_section_is_not_checked() {
        let config = make_config("[service]\nbase_url = http://x.example\n[ai]\nenabled = false\n");
        assert!(validate_service_config(&config).is_ok());
    }

    #[test]
    fn non_positive_sheet_dimensions_fail() {
        let config = make_config("[service]\nbase_url = http://x.example\n[sheet]\nmax_columns = 0\n");
        assert_invalid(validate_service_config(&config), "sheet", "max_columns");
    }
}
