// src/project/model.rs

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{ActivityId, ActivityStatus};

/// Naive layouts accepted in addition to RFC 3339. Interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A timestamp exactly as it was exchanged.
///
/// Parsing is deferred so that a malformed value in one field degrades the
/// derived dates instead of rejecting the whole project on load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into UTC, or `None` if the value is not a recognised timestamp.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Person accountable for the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Responsible {
    #[serde(default)]
    pub id: i64,
    #[serde(default, alias = "nome")]
    pub name: String,
    #[serde(default, alias = "telefone")]
    pub phone: String,
}

/// File attached to an activity, carried inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default, alias = "tipo")]
    pub mime_type: String,
    /// Data URL or other opaque payload.
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub author: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

/// One node of the activity network.
///
/// The engines only ever read the graph fields and write `status` and
/// `finish_actual`; everything else passes through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "tempo_execucao_horas")]
    pub duration_hours: f64,

    #[serde(default)]
    pub status: ActivityStatus,

    /// Reference into the configured activity-type catalog.
    #[serde(default = "default_activity_type", alias = "tipo_id")]
    pub activity_type: u32,

    /// Normal-flow predecessors.
    #[serde(default, alias = "dependencia")]
    pub dependencies: Vec<ActivityId>,

    /// Contingency successors, taken when this activity ends in
    /// `CompletedWithErrors`.
    #[serde(default, alias = "onErrorGoTo")]
    pub error_go_to: Vec<ActivityId>,

    /// Present iff `status` is finished.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "data_hora_fim_real"
    )]
    pub finish_actual: Option<Timestamp>,

    #[serde(default, alias = "descricao")]
    pub description: String,

    #[serde(default, alias = "anexos")]
    pub attachments: Vec<Attachment>,

    #[serde(default)]
    pub comments: Vec<Comment>,

    /// Unknown fields, preserved on save.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_activity_type() -> u32 {
    1
}

impl Activity {
    pub fn new(id: ActivityId, name: impl Into<String>, duration_hours: f64) -> Self {
        Self {
            id,
            name: name.into(),
            duration_hours,
            status: ActivityStatus::Pending,
            activity_type: default_activity_type(),
            dependencies: Vec::new(),
            error_go_to: Vec::new(),
            finish_actual: None,
            description: String::new(),
            attachments: Vec::new(),
            comments: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn depends_on(&self, other: ActivityId) -> bool {
        self.dependencies.contains(&other)
    }
}

/// A project snapshot.
///
/// Snapshots are treated as values: every mutation path in this crate takes
/// `&Project` and hands back a fresh `Project`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(alias = "nome_projeto")]
    pub name: String,

    #[serde(default, alias = "os")]
    pub work_order: String,

    #[serde(default, alias = "resumo")]
    pub summary: String,

    /// Set at creation, never changed afterwards.
    #[serde(alias = "data_hora_inicio")]
    pub start_planned: Timestamp,

    /// Stamped once, when the first activity is started.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "data_hora_inicio_real"
    )]
    pub start_actual: Option<Timestamp>,

    #[serde(default, alias = "responsaveis")]
    pub responsible: Vec<Responsible>,

    #[serde(default = "default_editable", alias = "editavel")]
    pub editable: bool,

    /// Creation order.
    #[serde(default, alias = "atividades")]
    pub activities: Vec<Activity>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_editable() -> bool {
    true
}

impl Project {
    pub fn new(name: impl Into<String>, start_planned: impl Into<Timestamp>) -> Self {
        Self {
            name: name.into(),
            work_order: String::new(),
            summary: String::new(),
            start_planned: start_planned.into(),
            start_actual: None,
            responsible: Vec::new(),
            editable: true,
            activities: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// Display name of an activity, falling back to its id.
    pub fn activity_name(&self, id: ActivityId) -> String {
        self.activity(id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| format!("#{id}"))
    }

    /// Activity with the lowest id, if any.
    pub fn lowest_id_activity(&self) -> Option<&Activity> {
        self.activities.iter().min_by_key(|a| a.id)
    }

    /// Activity with the highest id, if any.
    pub fn highest_id_activity(&self) -> Option<&Activity> {
        self.activities.iter().max_by_key(|a| a.id)
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Timestamp::new(raw)
    }
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        Timestamp(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_and_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 4, 0, 0).unwrap();
        for raw in [
            "2024-01-01T04:00:00Z",
            "2024-01-01T04:00:00.000Z",
            "2024-01-01T06:00:00+02:00",
            "2024-01-01T04:00",
            "2024-01-01T04:00:00",
            "2024-01-01 04:00",
        ] {
            assert_eq!(Timestamp::new(raw).parse(), Some(expected), "{raw}");
        }
    }

    #[test]
    fn garbage_timestamp_does_not_parse() {
        assert_eq!(Timestamp::new("not a date").parse(), None);
        assert_eq!(Timestamp::new("").parse(), None);
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let json = r#"{
            "name": "Plant shutdown",
            "start_planned": "2024-01-01T00:00",
            "legacy_flag": 7,
            "activities": [
                { "id": 1, "name": "Isolate", "duration_hours": 4, "color_hint": "red" }
            ]
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.editable);
        assert_eq!(project.extra.get("legacy_flag"), Some(&Value::from(7)));
        assert_eq!(
            project.activities[0].extra.get("color_hint"),
            Some(&Value::from("red"))
        );

        let back = serde_json::to_value(&project).unwrap();
        assert_eq!(back["legacy_flag"], Value::from(7));
        assert_eq!(back["activities"][0]["color_hint"], Value::from("red"));
    }
}
