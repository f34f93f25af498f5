//! Billing report aggregation.
//!
//! Joins persisted shifts with agent pay rates and produces per-agent
//! and grand totals. Amounts are rounded to 2 decimals per shift before
//! accumulation, so rounding error cannot compound across shifts — only
//! the final summary values are rounded again at output.
//!
//! The `{summary, grandTotalHours, grandTotalAmount}` shape of
//! [`ShiftReport`] is relied upon by a downstream document/export
//! collaborator and must be preserved.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Agent, AgentId, Shift, canonical_agent_id, hhmm};

/// The date range a report covers. Open bounds are allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRange {
    /// Inclusive lower bound on the shift start day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the shift start day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// One constituent shift inside an agent's summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    /// Start day of the shift.
    pub date: NaiveDate,
    /// Start time.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// End time.
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Hours worked.
    pub hours: Decimal,
    /// Billed amount for this shift, rounded to 2 decimals.
    pub amount: Decimal,
}

/// Aggregated totals for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    /// Display name, or the raw agent reference when the agent no longer
    /// exists.
    pub agent_name: String,
    /// Summed hours, rounded to 2 decimals at output.
    pub total_hours: Decimal,
    /// Summed amount, rounded to 2 decimals at output.
    pub total_amount: Decimal,
    /// The shifts behind the totals.
    pub items: Vec<ReportItem>,
}

/// A complete billing report. Ephemeral and derived; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReport {
    /// The requested range.
    pub range: ReportRange,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Per-agent rows, in first-seen shift order.
    pub summary: Vec<AgentSummary>,
    /// Sum of per-agent hours, rounded to 2 decimals.
    pub grand_total_hours: Decimal,
    /// Sum of per-agent amounts, rounded to 2 decimals.
    pub grand_total_amount: Decimal,
}

struct Accumulator {
    agent_name: String,
    hours: Decimal,
    amount: Decimal,
    items: Vec<ReportItem>,
}

/// Aggregates shifts into per-agent and grand totals.
///
/// Each shift joins to its agent through the canonical reference; an
/// unknown or unresolvable reference falls back to the raw text as the
/// display label with a pay rate of zero. No shift is double-counted and
/// no agent appears twice in the summary.
///
/// # Example
///
/// ```
/// use roster_engine::report::{ReportRange, aggregate_report};
///
/// let report = aggregate_report(&ReportRange::default(), &[], &[]);
/// assert!(report.summary.is_empty());
/// assert_eq!(report.grand_total_hours, rust_decimal::Decimal::ZERO);
/// ```
pub fn aggregate_report(range: &ReportRange, shifts: &[Shift], agents: &[Agent]) -> ShiftReport {
    let by_id: HashMap<AgentId, &Agent> = agents.iter().map(|a| (a.id, a)).collect();

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, Accumulator> = HashMap::new();

    for shift in shifts {
        let canonical = canonical_agent_id(&shift.agent_id);
        let agent = canonical.and_then(|id| by_id.get(&id).copied());
        let key = match canonical {
            Some(id) => id.to_string(),
            None => shift.agent_id.clone(),
        };
        let rate = agent.map(|a| a.hourly_rate).unwrap_or_default();
        // Rounded per shift; accumulation never re-introduces sub-cent
        // residue.
        let amount = (rate * shift.duration_hours).round_dp(2);

        let entry = totals.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Accumulator {
                agent_name: agent
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| shift.agent_id.clone()),
                hours: Decimal::ZERO,
                amount: Decimal::ZERO,
                items: Vec::new(),
            }
        });
        entry.hours += shift.duration_hours;
        entry.amount += amount;
        entry.items.push(ReportItem {
            date: shift.date,
            start: shift.start,
            end: shift.end,
            hours: shift.duration_hours,
            amount,
        });
    }

    let summary: Vec<AgentSummary> = order
        .iter()
        .filter_map(|key| totals.remove(key))
        .map(|acc| AgentSummary {
            agent_name: acc.agent_name,
            total_hours: acc.hours.round_dp(2),
            total_amount: acc.amount.round_dp(2),
            items: acc.items,
        })
        .collect();

    let grand_total_hours: Decimal = summary.iter().map(|s| s.total_hours).sum();
    let grand_total_amount: Decimal = summary.iter().map(|s| s.total_amount).sum();

    ShiftReport {
        range: *range,
        generated_at: Utc::now(),
        summary,
        grand_total_hours: grand_total_hours.round_dp(2),
        grand_total_amount: grand_total_amount.round_dp(2),
    }
}
