//! Shift persistence.
//!
//! The store is the boundary that enforces the scheduling uniqueness
//! invariant: one record per (agent, start day, start time) within a
//! tenant. Writes are idempotent against that key — a conflicting
//! create or upsert is a successful no-op, never an error — so repeated
//! or concurrent generation requests are safe.
//!
//! Bulk persistence runs as one atomic batch when the backend supports
//! it; otherwise it degrades to unordered per-record writes. The
//! degradation is explicit and logged, never silent.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use tokio::sync::RwLock;
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AgentId, Shift, ShiftCandidate, ShiftId, TenantId, TenantScope, agent_ref_key,
    canonical_agent_id,
};
use crate::scheduling::compute_duration;

/// The uniqueness key of a shift slot.
///
/// The agent component is normalized through [`agent_ref_key`], so legacy
/// reference encodings collide with the canonical form they designate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SlotKey {
    agent: String,
    tenant: TenantId,
    date: NaiveDate,
    start: NaiveTime,
}

impl SlotKey {
    fn new(agent_ref: &str, tenant: TenantId, date: NaiveDate, start: NaiveTime) -> Self {
        Self {
            agent: agent_ref_key(agent_ref),
            tenant,
            date,
            start,
        }
    }

    fn of(shift: &Shift) -> Self {
        Self::new(&shift.agent_id, shift.tenant_id, shift.date, shift.start)
    }
}

#[derive(Debug, Default)]
struct ShiftTable {
    rows: HashMap<ShiftId, Shift>,
    slots: HashMap<SlotKey, ShiftId>,
}

/// The fields of a shift to be created.
///
/// Duration, the overnight/24h flags and the end date are derived by the
/// store; callers supply only the observable inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShift {
    /// Agent reference; handlers pass the canonical identifier string.
    pub agent_ref: String,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Start day.
    pub date: NaiveDate,
    /// Start time.
    pub start: NaiveTime,
    /// End time.
    pub end: NaiveTime,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// A partial edit of an existing shift.
///
/// `None` fields keep the current value. Duration and day-span facts are
/// recomputed from the resolved start/end; the uniqueness-key fields
/// (agent, date) never change through an edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftEdit {
    /// New start time, if changing.
    pub start: Option<NaiveTime>,
    /// New end time, if changing.
    pub end: Option<NaiveTime>,
    /// New notes, if changing.
    pub notes: Option<String>,
}

/// Filters for a shift query. All filters are optional and combined with
/// the caller's tenant scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftQuery {
    /// Inclusive lower bound on the start day.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the start day.
    pub end_date: Option<NaiveDate>,
    /// Agent reference in any known encoding.
    pub agent: Option<String>,
}

/// The result of an idempotent create.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// A new record was written.
    Created(Shift),
    /// The slot was already occupied; the existing record is returned
    /// untouched.
    AlreadyExists(Shift),
}

impl CreateOutcome {
    /// The stored record, whether it was just written or already present.
    pub fn shift(&self) -> &Shift {
        match self {
            CreateOutcome::Created(shift) | CreateOutcome::AlreadyExists(shift) => shift,
        }
    }

    /// True when a new record was written.
    pub fn created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}

/// The result of a bulk upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkUpsertOutcome {
    /// Number of newly inserted records. Pre-existing matches are not
    /// recounted.
    pub inserted: u64,
    /// True when the batch ran as unordered per-record writes because the
    /// backend could not provide a transaction.
    pub fallback: bool,
}

/// In-memory shift store.
///
/// A `transactional` capability mirrors the deployment split of the
/// storage engine this fronts: when unset, bulk upserts cannot run as a
/// single atomic batch and degrade to per-record writes.
#[derive(Debug)]
pub struct ShiftStore {
    table: RwLock<ShiftTable>,
    transactional: bool,
}

impl ShiftStore {
    /// Creates an empty store with transaction support.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(ShiftTable::default()),
            transactional: true,
        }
    }

    /// Creates an empty store whose backend cannot run transactions;
    /// bulk upserts will take the logged non-atomic path.
    pub fn without_transactions() -> Self {
        Self {
            table: RwLock::new(ShiftTable::default()),
            transactional: false,
        }
    }

    /// Idempotently persists a batch of generated candidates.
    ///
    /// Each candidate upserts on the slot key. On insert all fields are
    /// written; on conflict the existing record is left untouched except
    /// that `notes` always follows the latest requested value. The
    /// returned count covers newly inserted records only, so a repeated
    /// identical batch reports zero.
    ///
    /// The whole batch is applied atomically when the backend supports
    /// transactions. Otherwise the operation degrades to unordered
    /// per-record writes — partial application is possible and the
    /// outcome flags the fallback.
    ///
    /// `tenant_of` maps each candidate's agent to the tenant the record
    /// is written under; candidates with no mapping are skipped with a
    /// warning.
    pub async fn bulk_upsert(
        &self,
        candidates: &[ShiftCandidate],
        tenant_of: &HashMap<AgentId, TenantId>,
    ) -> BulkUpsertOutcome {
        match self.bulk_upsert_atomic(candidates, tenant_of).await {
            Ok(inserted) => BulkUpsertOutcome {
                inserted,
                fallback: false,
            },
            Err(err) => {
                warn!(
                    error = %err,
                    total = candidates.len(),
                    "bulk upsert degraded to non-atomic writes"
                );
                let inserted = self.bulk_upsert_unordered(candidates, tenant_of).await;
                BulkUpsertOutcome {
                    inserted,
                    fallback: true,
                }
            }
        }
    }

    /// Applies the batch under a single write lock.
    async fn bulk_upsert_atomic(
        &self,
        candidates: &[ShiftCandidate],
        tenant_of: &HashMap<AgentId, TenantId>,
    ) -> EngineResult<u64> {
        if !self.transactional {
            return Err(EngineError::TransactionUnsupported);
        }
        let mut table = self.table.write().await;
        let mut inserted = 0;
        for candidate in candidates {
            let Some(&tenant) = tenant_of.get(&candidate.agent_id) else {
                warn!(agent = %candidate.agent_id, "skipping candidate with unknown tenant");
                continue;
            };
            if upsert_candidate(&mut table, candidate, tenant) {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Applies the batch one record at a time, re-acquiring the lock per
    /// record. No atomicity: some slots may land while others do not.
    async fn bulk_upsert_unordered(
        &self,
        candidates: &[ShiftCandidate],
        tenant_of: &HashMap<AgentId, TenantId>,
    ) -> u64 {
        let mut inserted = 0;
        for candidate in candidates {
            let Some(&tenant) = tenant_of.get(&candidate.agent_id) else {
                warn!(agent = %candidate.agent_id, "skipping candidate with unknown tenant");
                continue;
            };
            let mut table = self.table.write().await;
            if upsert_candidate(&mut table, candidate, tenant) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Idempotently creates a single shift.
    ///
    /// An occupied slot is a no-op success reporting the existing record,
    /// not an error.
    pub async fn create(&self, new: NewShift) -> CreateOutcome {
        let duration = compute_duration(new.date, new.start, new.end);
        let end_date = duration
            .is_overnight
            .then(|| new.date + Duration::days(1));
        let shift = Shift {
            id: ShiftId::new(),
            agent_id: new.agent_ref,
            tenant_id: new.tenant_id,
            date: new.date,
            end_date,
            start: new.start,
            end: new.end,
            duration_hours: duration.duration_hours,
            is_overnight: duration.is_overnight,
            is_24h: duration.is_24h,
            notes: new.notes,
            created_at: Utc::now(),
        };
        self.import(shift).await
    }

    /// Inserts a fully formed record, honoring the uniqueness key.
    ///
    /// Used by data imports, where legacy agent-reference encodings may
    /// still appear; the slot key normalizes them, so an import cannot
    /// duplicate a slot a canonical write already holds.
    pub async fn import(&self, shift: Shift) -> CreateOutcome {
        let mut table = self.table.write().await;
        if let Some(existing_id) = table.slots.get(&SlotKey::of(&shift)) {
            if let Some(existing) = table.rows.get(existing_id) {
                return CreateOutcome::AlreadyExists(existing.clone());
            }
        }
        table.slots.insert(SlotKey::of(&shift), shift.id);
        let stored = shift.clone();
        table.rows.insert(shift.id, shift);
        CreateOutcome::Created(stored)
    }

    /// Returns the shifts visible in `scope` matching `query`, ordered by
    /// (date, start).
    pub async fn query(&self, scope: &TenantScope, query: &ShiftQuery) -> Vec<Shift> {
        let table = self.table.read().await;
        let agent_key = query.agent.as_deref().map(agent_ref_key);
        let mut shifts: Vec<Shift> = table
            .rows
            .values()
            .filter(|s| scope.permits(s.tenant_id))
            .filter(|s| query.start_date.is_none_or(|d| s.date >= d))
            .filter(|s| query.end_date.is_none_or(|d| s.date <= d))
            .filter(|s| {
                agent_key
                    .as_deref()
                    .is_none_or(|key| agent_ref_key(&s.agent_id) == key)
            })
            .cloned()
            .collect();
        shifts.sort_by(|a, b| (a.date, a.start).cmp(&(b.date, b.start)));
        shifts
    }

    /// Looks up one shift within the caller's scope.
    pub async fn get(&self, scope: &TenantScope, id: ShiftId) -> Option<Shift> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .filter(|s| scope.permits(s.tenant_id))
            .cloned()
    }

    /// Number of shifts visible in `scope`.
    pub async fn count(&self, scope: &TenantScope) -> usize {
        let table = self.table.read().await;
        table
            .rows
            .values()
            .filter(|s| scope.permits(s.tenant_id))
            .count()
    }

    /// Applies a partial edit, recomputing duration, the overnight/24h
    /// flags and the end date from the resolved start/end.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] when the shift does not exist or is
    ///   outside the caller's scope.
    /// - [`EngineError::Conflict`] when a changed start time lands on a
    ///   slot held by a different record.
    pub async fn update(
        &self,
        scope: &TenantScope,
        id: ShiftId,
        edit: ShiftEdit,
    ) -> EngineResult<Shift> {
        let mut table = self.table.write().await;
        let current = table
            .rows
            .get(&id)
            .filter(|s| scope.permits(s.tenant_id))
            .cloned()
            .ok_or_else(|| EngineError::not_found("Shift", id))?;

        let start = edit.start.unwrap_or(current.start);
        let end = edit.end.unwrap_or(current.end);
        let notes = edit.notes.or_else(|| current.notes.clone());

        let new_key = SlotKey::new(&current.agent_id, current.tenant_id, current.date, start);
        if let Some(&occupant) = table.slots.get(&new_key) {
            if occupant != id {
                return Err(EngineError::Conflict {
                    message: format!(
                        "shift slot {} {} is already taken",
                        current.date,
                        start.format("%H:%M")
                    ),
                });
            }
        }

        let duration = compute_duration(current.date, start, end);
        let end_date = duration
            .is_overnight
            .then(|| current.date + Duration::days(1));

        table.slots.remove(&SlotKey::of(&current));
        table.slots.insert(new_key, id);

        let updated = Shift {
            start,
            end,
            notes,
            duration_hours: duration.duration_hours,
            is_overnight: duration.is_overnight,
            is_24h: duration.is_24h,
            end_date,
            ..current
        };
        table.rows.insert(id, updated.clone());
        Ok(updated)
    }

    /// Deletes one shift within the caller's scope.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] when the shift does not exist or is
    /// outside the caller's scope.
    pub async fn delete(&self, scope: &TenantScope, id: ShiftId) -> EngineResult<Shift> {
        let mut table = self.table.write().await;
        let in_scope = table
            .rows
            .get(&id)
            .is_some_and(|s| scope.permits(s.tenant_id));
        if !in_scope {
            return Err(EngineError::not_found("Shift", id));
        }
        let Some(shift) = table.rows.remove(&id) else {
            return Err(EngineError::not_found("Shift", id));
        };
        table.slots.remove(&SlotKey::of(&shift));
        Ok(shift)
    }

    /// Deletes every shift in scope whose agent reference designates
    /// `agent` under any known encoding. Returns the number removed.
    pub async fn remove_matching_agent(&self, scope: &TenantScope, agent: AgentId) -> u64 {
        let mut table = self.table.write().await;
        let doomed: Vec<ShiftId> = table
            .rows
            .values()
            .filter(|s| scope.permits(s.tenant_id))
            .filter(|s| canonical_agent_id(&s.agent_id) == Some(agent))
            .map(|s| s.id)
            .collect();
        remove_rows(&mut table, &doomed)
    }

    /// Deletes every shift in scope whose agent reference designates none
    /// of the `live` agents — including references that resolve to no
    /// identifier at all. Returns the number removed.
    pub async fn remove_orphans(&self, scope: &TenantScope, live: &[AgentId]) -> u64 {
        let live: HashSet<AgentId> = live.iter().copied().collect();
        let mut table = self.table.write().await;
        let doomed: Vec<ShiftId> = table
            .rows
            .values()
            .filter(|s| scope.permits(s.tenant_id))
            .filter(|s| {
                canonical_agent_id(&s.agent_id).is_none_or(|id| !live.contains(&id))
            })
            .map(|s| s.id)
            .collect();
        remove_rows(&mut table, &doomed)
    }
}

impl Default for ShiftStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Upserts one candidate; returns true when a new record was written.
fn upsert_candidate(table: &mut ShiftTable, candidate: &ShiftCandidate, tenant: TenantId) -> bool {
    let agent_ref = candidate.agent_id.to_string();
    let key = SlotKey::new(&agent_ref, tenant, candidate.date, candidate.start);
    if let Some(existing_id) = table.slots.get(&key).copied() {
        // The existing record wins; only the notes follow the latest
        // request. Prior edits to start/end stay intact.
        if let Some(notes) = &candidate.notes {
            if let Some(row) = table.rows.get_mut(&existing_id) {
                row.notes = Some(notes.clone());
            }
        }
        return false;
    }

    let shift = Shift {
        id: ShiftId::new(),
        agent_id: agent_ref,
        tenant_id: tenant,
        date: candidate.date,
        end_date: candidate.end_date,
        start: candidate.start,
        end: candidate.end,
        duration_hours: candidate.duration_hours,
        is_overnight: candidate.is_overnight,
        is_24h: candidate.is_24h,
        notes: candidate.notes.clone(),
        created_at: Utc::now(),
    };
    table.slots.insert(key, shift.id);
    table.rows.insert(shift.id, shift);
    true
}

fn remove_rows(table: &mut ShiftTable, ids: &[ShiftId]) -> u64 {
    let mut removed = 0;
    for id in ids {
        if let Some(shift) = table.rows.remove(id) {
            table.slots.remove(&SlotKey::of(&shift));
            removed += 1;
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Agent, AgentStatus};
    use crate::scheduling::{GenerationPlan, generate_schedule};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn t(time_str: &str) -> NaiveTime {
        NaiveTime::parse_from_str(time_str, "%H:%M").unwrap()
    }

    fn make_agent(name: &str, tenant: TenantId) -> Agent {
        Agent {
            id: AgentId::new(),
            name: name.to_string(),
            hourly_rate: Decimal::from(20),
            tenant_id: tenant,
            status: AgentStatus::Available,
        }
    }

    fn make_new_shift(agent: &Agent, date: &str, start: &str, end: &str) -> NewShift {
        NewShift {
            agent_ref: agent.id.to_string(),
            tenant_id: agent.tenant_id,
            date: make_date(date),
            start: t(start),
            end: t(end),
            notes: None,
        }
    }

    fn generated_batch(
        agents: &[Agent],
        times: &[&str],
        lengths: &[i64],
        notes: Option<&str>,
    ) -> (Vec<ShiftCandidate>, HashMap<AgentId, TenantId>) {
        let plan = GenerationPlan {
            start_date: make_date("2026-03-02"),
            start_times: times.iter().map(|s| t(s)).collect(),
            shift_lengths: lengths.iter().map(|&h| Decimal::from(h)).collect(),
            notes: notes.map(str::to_string),
        };
        let candidates = generate_schedule(&plan, agents).unwrap();
        let tenant_of = agents.iter().map(|a| (a.id, a.tenant_id)).collect();
        (candidates, tenant_of)
    }

    #[tokio::test]
    async fn test_bulk_upsert_is_idempotent() {
        let store = ShiftStore::new();
        let tenant = TenantId::new();
        let agents = vec![make_agent("Alice", tenant), make_agent("Bruno", tenant)];
        let (candidates, tenant_of) =
            generated_batch(&agents, &["08:00", "20:00"], &[12, 12], Some("round one"));

        let first = store.bulk_upsert(&candidates, &tenant_of).await;
        assert_eq!(first.inserted, 4);
        assert!(!first.fallback);

        let second = store.bulk_upsert(&candidates, &tenant_of).await;
        assert_eq!(second.inserted, 0);
        assert_eq!(store.count(&TenantScope::Tenant(tenant)).await, 4);
    }

    #[tokio::test]
    async fn test_repeat_upsert_refreshes_notes_only() {
        let store = ShiftStore::new();
        let tenant = TenantId::new();
        let agents = vec![make_agent("Alice", tenant)];
        let (candidates, tenant_of) = generated_batch(&agents, &["08:00"], &[8], Some("v1"));
        store.bulk_upsert(&candidates, &tenant_of).await;

        let scope = TenantScope::Tenant(tenant);
        let stored = store.query(&scope, &ShiftQuery::default()).await;
        let id = stored[0].id;

        // Edit the end time, then re-run generation with new notes.
        store
            .update(
                &scope,
                id,
                ShiftEdit {
                    end: Some(t("18:00")),
                    ..ShiftEdit::default()
                },
            )
            .await
            .unwrap();

        let (candidates, tenant_of) = generated_batch(&agents, &["08:00"], &[8], Some("v2"));
        let outcome = store.bulk_upsert(&candidates, &tenant_of).await;
        assert_eq!(outcome.inserted, 0);

        let after = store.get(&scope, id).await.unwrap();
        assert_eq!(after.notes.as_deref(), Some("v2"));
        // The edited end time survived the repeat generation.
        assert_eq!(after.end, t("18:00"));
        assert_eq!(after.duration_hours, Decimal::from(10));
    }

    #[tokio::test]
    async fn test_bulk_upsert_without_transactions_flags_fallback() {
        let store = ShiftStore::without_transactions();
        let tenant = TenantId::new();
        let agents = vec![make_agent("Alice", tenant), make_agent("Bruno", tenant)];
        let (candidates, tenant_of) = generated_batch(&agents, &["08:00"], &[8], None);

        let outcome = store.bulk_upsert(&candidates, &tenant_of).await;
        assert_eq!(outcome.inserted, 2);
        assert!(outcome.fallback);

        // Still idempotent on repeat.
        let repeat = store.bulk_upsert(&candidates, &tenant_of).await;
        assert_eq!(repeat.inserted, 0);
        assert!(repeat.fallback);
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let store = ShiftStore::new();
        let tenant = TenantId::new();
        let agent = make_agent("Alice", tenant);

        let first = store
            .create(make_new_shift(&agent, "2026-03-02", "08:00", "20:00"))
            .await;
        assert!(first.created());

        let second = store
            .create(make_new_shift(&agent, "2026-03-02", "08:00", "20:00"))
            .await;
        assert!(!second.created());
        assert_eq!(second.shift().id, first.shift().id);
        assert_eq!(store.count(&TenantScope::Tenant(tenant)).await, 1);
    }

    #[tokio::test]
    async fn test_create_derives_duration_and_end_date() {
        let store = ShiftStore::new();
        let tenant = TenantId::new();
        let agent = make_agent("Alice", tenant);

        let outcome = store
            .create(make_new_shift(&agent, "2026-03-02", "22:00", "06:00"))
            .await;
        let shift = outcome.shift();
        assert_eq!(shift.duration_hours, Decimal::from(8));
        assert!(shift.is_overnight);
        assert_eq!(shift.end_date, Some(make_date("2026-03-03")));
    }

    #[tokio::test]
    async fn test_legacy_encoding_occupies_the_same_slot() {
        let store = ShiftStore::new();
        let tenant = TenantId::new();
        let agent = make_agent("Alice", tenant);

        // Historical record written with the wrapped encoding.
        let mut legacy = make_new_shift(&agent, "2026-03-02", "08:00", "20:00");
        legacy.agent_ref = format!("ObjectId(\"{}\")", agent.id);
        assert!(store.create(legacy).await.created());

        // A canonical write for the same slot is a conflict no-op.
        let outcome = store
            .create(make_new_shift(&agent, "2026-03-02", "08:00", "20:00"))
            .await;
        assert!(!outcome.created());
        assert_eq!(store.count(&TenantScope::Tenant(tenant)).await, 1);
    }

    #[tokio::test]
    async fn test_update_recomputes_derived_fields() {
        let store = ShiftStore::new();
        let tenant = TenantId::new();
        let scope = TenantScope::Tenant(tenant);
        let agent = make_agent("Alice", tenant);

        let created = store
            .create(make_new_shift(&agent, "2026-03-02", "08:00", "20:00"))
            .await;
        let id = created.shift().id;

        let updated = store
            .update(
                &scope,
                id,
                ShiftEdit {
                    end: Some(t("08:00")),
                    notes: Some("double cover".to_string()),
                    ..ShiftEdit::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.duration_hours, Decimal::from(24));
        assert!(updated.is_overnight);
        assert!(updated.is_24h);
        assert_eq!(updated.end_date, Some(make_date("2026-03-03")));
        assert_eq!(updated.notes.as_deref(), Some("double cover"));
    }

    #[tokio::test]
    async fn test_update_keeps_unspecified_fields() {
        let store = ShiftStore::new();
        let tenant = TenantId::new();
        let scope = TenantScope::Tenant(tenant);
        let agent = make_agent("Alice", tenant);

        let mut new = make_new_shift(&agent, "2026-03-02", "08:00", "20:00");
        new.notes = Some("keep me".to_string());
        let id = store.create(new).await.shift().id;

        let updated = store
            .update(
                &scope,
                id,
                ShiftEdit {
                    start: Some(t("09:00")),
                    ..ShiftEdit::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.start, t("09:00"));
        assert_eq!(updated.end, t("20:00"));
        assert_eq!(updated.duration_hours, Decimal::from(11));
        assert_eq!(updated.notes.as_deref(), Some("keep me"));
    }

    #[tokio::test]
    async fn test_update_into_occupied_slot_is_a_conflict() {
        let store = ShiftStore::new();
        let tenant = TenantId::new();
        let scope = TenantScope::Tenant(tenant);
        let agent = make_agent("Alice", tenant);

        store
            .create(make_new_shift(&agent, "2026-03-02", "08:00", "16:00"))
            .await;
        let second = store
            .create(make_new_shift(&agent, "2026-03-02", "16:00", "22:00"))
            .await;

        let result = store
            .update(
                &scope,
                second.shift().id,
                ShiftEdit {
                    start: Some(t("08:00")),
                    ..ShiftEdit::default()
                },
            )
            .await;
        assert!(matches!(result, Err(EngineError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_out_of_scope_is_not_found() {
        let store = ShiftStore::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();
        let agent = make_agent("Alice", tenant_a);

        let id = store
            .create(make_new_shift(&agent, "2026-03-02", "08:00", "20:00"))
            .await
            .shift()
            .id;

        let result = store
            .update(&TenantScope::Tenant(tenant_b), id, ShiftEdit::default())
            .await;
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_query_filters_and_orders() {
        let store = ShiftStore::new();
        let tenant = TenantId::new();
        let scope = TenantScope::Tenant(tenant);
        let alice = make_agent("Alice", tenant);
        let bruno = make_agent("Bruno", tenant);

        store
            .create(make_new_shift(&bruno, "2026-03-04", "08:00", "16:00"))
            .await;
        store
            .create(make_new_shift(&alice, "2026-03-02", "20:00", "04:00"))
            .await;
        store
            .create(make_new_shift(&alice, "2026-03-02", "08:00", "16:00"))
            .await;
        store
            .create(make_new_shift(&alice, "2026-03-09", "08:00", "16:00"))
            .await;

        let all = store.query(&scope, &ShiftQuery::default()).await;
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].start, t("08:00"));
        assert_eq!(all[0].date, make_date("2026-03-02"));
        assert_eq!(all[1].start, t("20:00"));

        let ranged = store
            .query(
                &scope,
                &ShiftQuery {
                    start_date: Some(make_date("2026-03-02")),
                    end_date: Some(make_date("2026-03-04")),
                    agent: None,
                },
            )
            .await;
        assert_eq!(ranged.len(), 3);

        let by_agent = store
            .query(
                &scope,
                &ShiftQuery {
                    agent: Some(alice.id.to_string()),
                    ..ShiftQuery::default()
                },
            )
            .await;
        assert_eq!(by_agent.len(), 3);

        // The legacy-wrapped form matches the same records.
        let by_wrapped = store
            .query(
                &scope,
                &ShiftQuery {
                    agent: Some(format!("ObjectId(\"{}\")", alice.id)),
                    ..ShiftQuery::default()
                },
            )
            .await;
        assert_eq!(by_wrapped.len(), 3);
    }

    #[tokio::test]
    async fn test_tenant_scope_is_enforced_on_reads_and_deletes() {
        let store = ShiftStore::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();
        let agent = make_agent("Alice", tenant_a);

        let id = store
            .create(make_new_shift(&agent, "2026-03-02", "08:00", "20:00"))
            .await
            .shift()
            .id;

        let scope_b = TenantScope::Tenant(tenant_b);
        assert!(store.get(&scope_b, id).await.is_none());
        assert!(store.query(&scope_b, &ShiftQuery::default()).await.is_empty());
        assert!(matches!(
            store.delete(&scope_b, id).await,
            Err(EngineError::NotFound { .. })
        ));

        // Unrestricted scope sees everything.
        assert!(store.get(&TenantScope::Unrestricted, id).await.is_some());
        assert!(store.delete(&TenantScope::Unrestricted, id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_frees_the_slot() {
        let store = ShiftStore::new();
        let tenant = TenantId::new();
        let scope = TenantScope::Tenant(tenant);
        let agent = make_agent("Alice", tenant);

        let id = store
            .create(make_new_shift(&agent, "2026-03-02", "08:00", "20:00"))
            .await
            .shift()
            .id;
        store.delete(&scope, id).await.unwrap();

        let recreated = store
            .create(make_new_shift(&agent, "2026-03-02", "08:00", "20:00"))
            .await;
        assert!(recreated.created());
    }

    #[tokio::test]
    async fn test_fractional_duration_is_rounded() {
        let store = ShiftStore::new();
        let tenant = TenantId::new();
        let agent = make_agent("Alice", tenant);

        let outcome = store
            .create(make_new_shift(&agent, "2026-03-02", "09:00", "17:20"))
            .await;
        assert_eq!(
            outcome.shift().duration_hours,
            Decimal::from_str("8.33").unwrap()
        );
    }
}
