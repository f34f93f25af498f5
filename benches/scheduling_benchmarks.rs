//! Performance benchmarks for the shift scheduling engine.
//!
//! The generator is on the request path of every bulk scheduling call,
//! so its expansion and the duration math are benchmarked directly; the
//! bulk upsert is benchmarked through the store with a batch sized like
//! a large real-world generation run.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use roster_engine::models::{Agent, AgentId, AgentStatus, TenantId};
use roster_engine::scheduling::{GenerationPlan, compute_duration, generate_schedule};
use roster_engine::store::ShiftStore;

fn make_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

fn t(time_str: &str) -> NaiveTime {
    NaiveTime::parse_from_str(time_str, "%H:%M").unwrap()
}

fn make_agents(count: usize, tenant: TenantId) -> Vec<Agent> {
    (0..count)
        .map(|i| Agent {
            id: AgentId::new(),
            name: format!("agent-{i:04}"),
            hourly_rate: Decimal::from(20),
            tenant_id: tenant,
            status: AgentStatus::Available,
        })
        .collect()
}

fn make_plan() -> GenerationPlan {
    GenerationPlan {
        start_date: make_date("2026-03-02"),
        start_times: vec![t("06:00"), t("14:00"), t("22:00")],
        shift_lengths: vec![Decimal::from(8); 3],
        notes: Some("rotation".to_string()),
    }
}

fn bench_compute_duration(c: &mut Criterion) {
    let date = make_date("2026-03-02");
    let start = t("22:00");
    let end = t("06:00");

    c.bench_function("compute_duration_overnight", |b| {
        b.iter(|| compute_duration(black_box(date), black_box(start), black_box(end)))
    });
}

fn bench_generate_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_schedule");
    let tenant = TenantId::new();
    let plan = make_plan();

    for agent_count in [10usize, 50, 200] {
        let agents = make_agents(agent_count, tenant);
        group.throughput(Throughput::Elements((agent_count * 3) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(agent_count),
            &agents,
            |b, agents| b.iter(|| generate_schedule(black_box(&plan), black_box(agents)).unwrap()),
        );
    }
    group.finish();
}

fn bench_bulk_upsert(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let tenant = TenantId::new();
    let agents = make_agents(200, tenant);
    let plan = make_plan();
    let candidates = generate_schedule(&plan, &agents).unwrap();
    let tenant_of: HashMap<AgentId, TenantId> =
        agents.iter().map(|a| (a.id, a.tenant_id)).collect();

    c.bench_function("bulk_upsert_600_fresh", |b| {
        b.to_async(&rt).iter(|| async {
            let store = ShiftStore::new();
            store
                .bulk_upsert(black_box(&candidates), black_box(&tenant_of))
                .await
        })
    });

    c.bench_function("bulk_upsert_600_repeat", |b| {
        let store = rt.block_on(async {
            let store = ShiftStore::new();
            store.bulk_upsert(&candidates, &tenant_of).await;
            store
        });
        b.to_async(&rt)
            .iter(|| async { store.bulk_upsert(black_box(&candidates), black_box(&tenant_of)).await })
    });
}

criterion_group!(
    benches,
    bench_compute_duration,
    bench_generate_schedule,
    bench_bulk_upsert
);
criterion_main!(benches);
