use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One staff member's day as the schedule service returns it.
///
/// Field names follow the service's snake_case JSON; camelCase aliases are
/// accepted because older exports used them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(alias = "staffId")]
    pub staff_id: String,
    pub date: NaiveDate,
    /// Absent or null means no shift is configured for the day.
    #[serde(default)]
    pub shift: Option<RawShift>,
    #[serde(default)]
    pub appointments: Vec<RawAppointment>,
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
}

impl DayRecord {
    pub fn empty(staff_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            staff_id: staff_id.into(),
            date,
            shift: None,
            appointments: Vec::new(),
            blocks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawShift {
    #[serde(default = "default_true", alias = "isWorking")]
    pub is_working: bool,
    #[serde(default, alias = "startTime")]
    pub start_time: String,
    #[serde(default, alias = "endTime")]
    pub end_time: String,
    #[serde(default, alias = "breakStart", skip_serializing_if = "Option::is_none")]
    pub break_start: Option<String>,
    #[serde(default, alias = "breakEnd", skip_serializing_if = "Option::is_none")]
    pub break_end: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAppointment {
    pub id: String,
    #[serde(alias = "startTime")]
    pub start_time: String,
    /// Minutes.
    #[serde(alias = "duration_minutes", alias = "durationMinutes")]
    pub duration: i32,
    #[serde(default, alias = "clientName", skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, alias = "serviceName", skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    pub id: String,
    #[serde(alias = "startTime")]
    pub start_time: String,
    #[serde(alias = "endTime")]
    pub end_time: String,
    #[serde(default)]
    pub reason: String,
}
