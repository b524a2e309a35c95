// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PertrackError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PertrackError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.activity_type))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_global_config(cfg)?;
    validate_activity_types(cfg)?;
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    let hours = cfg.config.default_duration_hours;
    if !hours.is_finite() || hours <= 0.0 {
        return Err(PertrackError::ConfigError(format!(
            "[config].default_duration_hours must be > 0 (got {hours})"
        )));
    }
    Ok(())
}

fn validate_activity_types(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for ty in cfg.activity_type.iter() {
        if ty.name.trim().is_empty() {
            return Err(PertrackError::ConfigError(format!(
                "activity type {} has an empty name",
                ty.id
            )));
        }
        if !seen.insert(ty.id) {
            return Err(PertrackError::ConfigError(format!(
                "activity type id {} is defined more than once",
                ty.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::HeadlineDate;

    fn parse(toml_src: &str) -> Result<ConfigFile> {
        let raw: RawConfigFile = toml::from_str(toml_src)?;
        ConfigFile::try_from(raw)
    }

    #[test]
    fn empty_file_gets_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.config.default_duration_hours, 8.0);
        assert_eq!(cfg.config.headline_date, HeadlineDate::Estimated);
        assert_eq!(cfg.activity_type.len(), 3);
        assert_eq!(cfg.activity_type(2).map(|t| t.name.as_str()), Some("Execution"));
    }

    #[test]
    fn explicit_types_replace_defaults() {
        let cfg = parse(
            r#"
[config]
headline_date = "planned"

[[activity_type]]
id = 10
name = "Inspection"
"#,
        )
        .unwrap();
        assert_eq!(cfg.config.headline_date, HeadlineDate::Planned);
        assert_eq!(cfg.activity_type.len(), 1);
        assert!(cfg.activity_type(1).is_none());
    }

    #[test]
    fn non_positive_default_duration_is_rejected() {
        let err = parse("[config]\ndefault_duration_hours = 0\n").unwrap_err();
        assert!(matches!(err, PertrackError::ConfigError(msg) if msg.contains("default_duration_hours")));
    }

    #[test]
    fn duplicate_type_ids_are_rejected() {
        let err = parse(
            r#"
[[activity_type]]
id = 1
name = "A"

[[activity_type]]
id = 1
name = "B"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, PertrackError::ConfigError(_)));
    }

    #[test]
    fn unknown_headline_date_fails_to_parse() {
        let err = parse("[config]\nheadline_date = \"someday\"\n").unwrap_err();
        assert!(matches!(err, PertrackError::TomlError(_)));
    }
}
