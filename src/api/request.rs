//! Request types for the scheduling API.
//!
//! Dates and times arrive as strings (`YYYY-MM-DD`, `HH:MM`) and are
//! parsed at this boundary so malformed values surface as validation
//! errors rather than opaque deserialization failures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{AgentId, TenantId};
use crate::report::ReportRange;
use crate::scheduling::{GenerationPlan, parse_date, parse_hhmm};
use crate::store::{NewShift, ShiftEdit, ShiftQuery};

/// Request body for `POST /schedules/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleRequest {
    /// The day every generated shift starts on (`YYYY-MM-DD`).
    pub start_date: String,
    /// Start times to expand (`HH:MM`).
    #[serde(default = "default_start_times")]
    pub start_times: Vec<String>,
    /// Shift lengths in hours, paired with `start_times` by index.
    #[serde(default = "default_shift_lengths")]
    pub shift_lengths: Vec<Decimal>,
    /// Agents to schedule. Empty means every available agent in scope.
    #[serde(default)]
    pub selected_agent_ids: Vec<AgentId>,
    /// Notes copied onto every generated shift.
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_start_times() -> Vec<String> {
    vec!["08:00".to_string()]
}

fn default_shift_lengths() -> Vec<Decimal> {
    vec![Decimal::from(8)]
}

impl GenerateScheduleRequest {
    /// Parses the request into a generation plan.
    pub fn plan(&self) -> EngineResult<GenerationPlan> {
        Ok(GenerationPlan {
            start_date: parse_date(&self.start_date)?,
            start_times: self
                .start_times
                .iter()
                .map(|s| parse_hhmm(s))
                .collect::<EngineResult<_>>()?,
            shift_lengths: self.shift_lengths.clone(),
            notes: self.notes.clone(),
        })
    }
}

/// Request body for `POST /shifts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    /// The agent to schedule.
    pub agent_id: AgentId,
    /// Start day (`YYYY-MM-DD`).
    pub date: String,
    /// Start time (`HH:MM`).
    pub start: String,
    /// End time (`HH:MM`).
    pub end: String,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateShiftRequest {
    /// Parses the request into store input, writing under `tenant_id`.
    pub fn new_shift(&self, tenant_id: TenantId) -> EngineResult<NewShift> {
        Ok(NewShift {
            agent_ref: self.agent_id.to_string(),
            tenant_id,
            date: parse_date(&self.date)?,
            start: parse_hhmm(&self.start)?,
            end: parse_hhmm(&self.end)?,
            notes: self.notes.clone(),
        })
    }
}

/// Request body for `PUT /shifts/{id}`. Absent fields keep their current
/// values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateShiftRequest {
    /// New start time (`HH:MM`).
    #[serde(default)]
    pub start: Option<String>,
    /// New end time (`HH:MM`).
    #[serde(default)]
    pub end: Option<String>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateShiftRequest {
    /// Parses the request into a store edit.
    pub fn edit(&self) -> EngineResult<ShiftEdit> {
        Ok(ShiftEdit {
            start: self.start.as_deref().map(parse_hhmm).transpose()?,
            end: self.end.as_deref().map(parse_hhmm).transpose()?,
            notes: self.notes.clone(),
        })
    }
}

/// Query parameters for `GET /shifts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftListParams {
    /// Inclusive lower bound on the start day.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Inclusive upper bound on the start day.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Agent reference in any known encoding.
    #[serde(default)]
    pub agent_id: Option<String>,
}

impl ShiftListParams {
    /// Parses the parameters into a store query.
    pub fn query(&self) -> EngineResult<ShiftQuery> {
        Ok(ShiftQuery {
            start_date: self.start_date.as_deref().map(parse_date).transpose()?,
            end_date: self.end_date.as_deref().map(parse_date).transpose()?,
            agent: self.agent_id.clone(),
        })
    }
}

/// Query parameters for `GET /reports`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParams {
    /// Inclusive lower bound on the shift start day.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Inclusive upper bound on the shift start day.
    #[serde(default)]
    pub end_date: Option<String>,
}

impl ReportParams {
    /// Parses the parameters into a report range.
    pub fn range(&self) -> EngineResult<ReportRange> {
        Ok(ReportRange {
            start_date: self.start_date.as_deref().map(parse_date).transpose()?,
            end_date: self.end_date.as_deref().map(parse_date).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_generation_request_defaults() {
        let json = r#"{"startDate": "2026-03-02"}"#;
        let request: GenerateScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.start_times, vec!["08:00"]);
        assert_eq!(request.shift_lengths, vec![Decimal::from(8)]);
        assert!(request.selected_agent_ids.is_empty());

        let plan = request.plan().unwrap();
        assert_eq!(plan.start_times.len(), 1);
    }

    #[test]
    fn test_generation_request_accepts_numeric_lengths() {
        let json = r#"{
            "startDate": "2026-03-02",
            "startTimes": ["06:00", "18:00"],
            "shiftLengths": [12, 12],
            "notes": "carnival weekend"
        }"#;
        let request: GenerateScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.shift_lengths, vec![Decimal::from(12); 2]);
        assert!(request.plan().is_ok());
    }

    #[test]
    fn test_malformed_start_time_is_a_validation_error() {
        let request = GenerateScheduleRequest {
            start_date: "2026-03-02".to_string(),
            start_times: vec!["8 o'clock".to_string()],
            shift_lengths: default_shift_lengths(),
            selected_agent_ids: vec![],
            notes: None,
        };
        assert!(matches!(
            request.plan(),
            Err(EngineError::InvalidTime { .. })
        ));
    }

    #[test]
    fn test_malformed_start_date_is_a_validation_error() {
        let request = GenerateScheduleRequest {
            start_date: "03/02/2026".to_string(),
            start_times: default_start_times(),
            shift_lengths: default_shift_lengths(),
            selected_agent_ids: vec![],
            notes: None,
        };
        assert!(matches!(
            request.plan(),
            Err(EngineError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_update_request_partial_fields() {
        let json = r#"{"end": "23:00"}"#;
        let request: UpdateShiftRequest = serde_json::from_str(json).unwrap();
        let edit = request.edit().unwrap();
        assert!(edit.start.is_none());
        assert!(edit.end.is_some());
        assert!(edit.notes.is_none());
    }

    #[test]
    fn test_shift_list_params_parse() {
        let params = ShiftListParams {
            start_date: Some("2026-03-01".to_string()),
            end_date: Some("2026-03-31".to_string()),
            agent_id: None,
        };
        let query = params.query().unwrap();
        assert!(query.start_date.is_some());
        assert!(query.end_date.is_some());

        let bad = ShiftListParams {
            start_date: Some("yesterday".to_string()),
            ..ShiftListParams::default()
        };
        assert!(bad.query().is_err());
    }
}
