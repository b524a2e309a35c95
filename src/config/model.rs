// src/config/model.rs

use serde::Deserialize;

use crate::dag::DateMode;

/// Top-level configuration as read from `Pertrack.toml`.
///
/// ```toml
/// [config]
/// default_duration_hours = 8
/// headline_date = "estimated"
///
/// [[activity_type]]
/// id = 1
/// name = "Planning"
/// color = "#3b82f6"
/// icon = "rule"
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default = "default_activity_types")]
    pub activity_type: Vec<ActivityTypeConfig>,
}

/// Validated configuration. Build it through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub activity_type: Vec<ActivityTypeConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        activity_type: Vec<ActivityTypeConfig>,
    ) -> Self {
        Self {
            config,
            activity_type,
        }
    }

    pub fn activity_type(&self, id: u32) -> Option<&ActivityTypeConfig> {
        self.activity_type.iter().find(|t| t.id == id)
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(ConfigSection::default(), default_activity_types())
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Duration given to activities created without one.
    #[serde(default = "default_duration_hours")]
    pub default_duration_hours: f64,

    /// Which completion date the CLI shows first.
    #[serde(default)]
    pub headline_date: HeadlineDate,
}

fn default_duration_hours() -> f64 {
    8.0
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            default_duration_hours: default_duration_hours(),
            headline_date: HeadlineDate::default(),
        }
    }
}

/// `"estimated"` blends recorded progress into the forecast, `"planned"` is
/// the untouched baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadlineDate {
    Estimated,
    Planned,
}

impl Default for HeadlineDate {
    fn default() -> Self {
        HeadlineDate::Estimated
    }
}

impl From<HeadlineDate> for DateMode {
    fn from(h: HeadlineDate) -> Self {
        match h {
            HeadlineDate::Estimated => DateMode::Estimated,
            HeadlineDate::Planned => DateMode::Planned,
        }
    }
}

/// `[[activity_type]]` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivityTypeConfig {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

fn default_activity_types() -> Vec<ActivityTypeConfig> {
    [
        (1, "Planning", "#3b82f6", "rule"),
        (2, "Execution", "#f97316", "construction"),
        (3, "Validation", "#16a34a", "check_circle"),
    ]
    .into_iter()
    .map(|(id, name, color, icon)| ActivityTypeConfig {
        id,
        name: name.to_string(),
        color: Some(color.to_string()),
        icon: Some(icon.to_string()),
    })
    .collect()
}
