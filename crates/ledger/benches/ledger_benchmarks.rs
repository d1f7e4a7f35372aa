use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{DateTime, Utc};
use splitledger_core::{EventId, GroupId, Money, UserId};
use splitledger_events::{ExpenseEvent, SettlementEvent, split_equally};
use splitledger_ledger::{aggregate, optimize};
use uuid::Uuid;

const MEMBERS: u128 = 12;

fn group() -> GroupId {
    GroupId::from_uuid(Uuid::from_u128(1))
}

fn user(n: u128) -> UserId {
    UserId::from_uuid(Uuid::from_u128(1_000 + n))
}

fn occurred_at() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
}

/// Synthetic history: rotating payers, each expense split among a sliding
/// window of members, with every tenth event a settlement.
fn history(events: usize) -> (Vec<ExpenseEvent>, Vec<SettlementEvent>) {
    let mut expenses = Vec::with_capacity(events);
    let mut settlements = Vec::new();

    for i in 0..events as u128 {
        let event_id = EventId::from_uuid(Uuid::from_u128(10_000 + i));
        if i % 10 == 9 {
            settlements.push(SettlementEvent {
                event_id,
                group_id: group(),
                payer: user(i % MEMBERS),
                receiver: user((i + 1) % MEMBERS),
                amount: Money::from_minor(500),
                occurred_at: occurred_at(),
            });
            continue;
        }

        let participants: Vec<UserId> = (0..4).map(|k| user((i + k) % MEMBERS)).collect();
        let total = Money::from_minor(1_000 + (i as i64 % 97) * 13);
        let shares = split_equally(total, &participants).unwrap_or_default();
        expenses.push(ExpenseEvent {
            event_id,
            group_id: group(),
            payer: user(i % MEMBERS),
            total,
            shares,
            description: None,
            occurred_at: occurred_at(),
        });
    }

    (expenses, settlements)
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group_bench = c.benchmark_group("aggregate");
    for size in [100usize, 1_000, 10_000] {
        let (expenses, settlements) = history(size);
        group_bench.throughput(Throughput::Elements(size as u64));
        group_bench.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| aggregate(group(), black_box(&expenses), black_box(&settlements)))
        });
    }
    group_bench.finish();
}

fn bench_optimize(c: &mut Criterion) {
    let mut group_bench = c.benchmark_group("optimize");
    for size in [100usize, 1_000, 10_000] {
        let (expenses, settlements) = history(size);
        let Ok(balances) = aggregate(group(), &expenses, &settlements) else {
            continue;
        };
        group_bench.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| optimize(black_box(&balances)))
        });
    }
    group_bench.finish();
}

criterion_group!(benches, bench_aggregate, bench_optimize);
criterion_main!(benches);
