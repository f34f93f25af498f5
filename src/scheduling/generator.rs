//! Schedule generation.
//!
//! Expands a generation plan into one shift candidate per
//! `(start time, agent)` combination. This is intentionally a plain
//! cartesian expansion in input order: no rotation, no fairness
//! weighting, no availability solving. The output is deterministic so
//! that repeated requests produce identical candidate lists for the
//! store's idempotent upsert.

use chrono::{Duration, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{EngineError, EngineResult};
use crate::models::{Agent, ShiftCandidate};

use super::duration::compute_duration;

/// Default shift length, in hours, when the plan supplies none.
const DEFAULT_SHIFT_LENGTH_HOURS: i64 = 8;

/// The inputs of one generation run.
///
/// Start times and lengths are paired by index; when the lists are not
/// equinumerous, the first configured length is the fallback for the
/// unmatched start times.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    /// The calendar day every generated shift starts on.
    pub start_date: NaiveDate,
    /// The start times to expand, in output order.
    pub start_times: Vec<NaiveTime>,
    /// Shift lengths in hours, paired with `start_times` by index.
    pub shift_lengths: Vec<Decimal>,
    /// Notes copied onto every candidate.
    pub notes: Option<String>,
}

/// Expands a plan into shift candidates, one per `(start time, agent)`.
///
/// The outer loop runs over start times and the inner loop over agents,
/// both in input order, so the output ordering is deterministic. The end
/// time is computed with calendar-aware addition (it may land on the
/// next day, which records an explicit end date), and the duration facts
/// are computed independently from the start/end times — both signals
/// agree by construction.
///
/// This function performs no I/O and has no side effects; identical
/// inputs always yield identical candidate lists.
///
/// # Errors
///
/// - [`EngineError::MissingField`] when `agents` or `start_times` is empty.
/// - [`EngineError::InvalidShiftLength`] when a length cannot be converted
///   to whole minutes.
pub fn generate_schedule(
    plan: &GenerationPlan,
    agents: &[Agent],
) -> EngineResult<Vec<ShiftCandidate>> {
    if agents.is_empty() {
        return Err(EngineError::MissingField {
            field: "agents".to_string(),
        });
    }
    if plan.start_times.is_empty() {
        return Err(EngineError::MissingField {
            field: "startTimes".to_string(),
        });
    }

    let fallback_length = plan
        .shift_lengths
        .first()
        .copied()
        .unwrap_or_else(|| Decimal::from(DEFAULT_SHIFT_LENGTH_HOURS));

    let mut schedule = Vec::with_capacity(plan.start_times.len() * agents.len());

    for (index, &start) in plan.start_times.iter().enumerate() {
        let length = plan
            .shift_lengths
            .get(index)
            .copied()
            .unwrap_or(fallback_length);
        let length_minutes = length_to_minutes(length)?;

        let start_dt = plan.start_date.and_time(start);
        let end_dt = start_dt + Duration::minutes(length_minutes);
        let end = end_dt.time();

        // An end on another calendar day is recorded explicitly.
        let end_date = (end_dt.date() != plan.start_date).then(|| end_dt.date());

        let duration = compute_duration(plan.start_date, start, end);

        for agent in agents {
            schedule.push(ShiftCandidate {
                agent_id: agent.id,
                agent_name: agent.name.clone(),
                date: plan.start_date,
                end_date,
                start,
                end,
                duration_hours: duration.duration_hours,
                is_overnight: duration.is_overnight,
                is_24h: duration.is_24h,
                notes: plan.notes.clone(),
            });
        }
    }

    Ok(schedule)
}

/// Converts a length in hours to whole minutes.
fn length_to_minutes(length: Decimal) -> EngineResult<i64> {
    (length * Decimal::from(60))
        .round()
        .to_i64()
        .ok_or_else(|| EngineError::InvalidShiftLength {
            value: length.to_string(),
        })
}
