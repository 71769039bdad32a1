use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tempfile::TempDir;

use cajuhub::database::{Database, DatabaseConfig};
use cajuhub::operations::{Page, ReservationManager};
use cajuhub::{Principal, Registration, Role, Shift, SlotKey, SlotLedger, SpaceDraft, SpaceId};

const LIST_SIZES: &[usize] = &[10, 100, 500];

struct Fixture {
    _dir: TempDir,
    db: Database,
    user: Principal,
    space: SpaceId,
}

fn setup() -> Fixture {
    let dir = TempDir::new().expect("failed to create temporary directory");
    let config = DatabaseConfig::new(dir.path().join("cajuhub.db"));
    let mut db = Database::open(config).expect("failed to open temporary database");

    let registration = Registration::new("Bench", "bench@example.com", "unused")
        .validate()
        .expect("valid registration");
    let user = db
        .create_user(&registration, "bench-hash", Role::User)
        .expect("failed to create user")
        .principal();
    let draft = SpaceDraft::new("Bench Room", 10, 10_000)
        .validate()
        .expect("valid draft");
    let space = db.insert_space(&draft).expect("failed to create space").id;

    Fixture {
        _dir: dir,
        db,
        user,
        space,
    }
}

/// The `index`-th distinct slot of a space, walking shifts then days.
fn nth_slot(space: SpaceId, index: usize) -> SlotKey {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
    let day = start
        .checked_add_days(Days::new((index / 3) as u64))
        .expect("date in range");
    SlotKey::new(space, day, Shift::ALL[index % 3])
}

fn populate(fixture: &mut Fixture, count: usize) {
    let mut ledger = SlotLedger::new(&mut fixture.db);
    for index in 0..count {
        ledger
            .claim(&nth_slot(fixture.space, index), fixture.user.id, None)
            .expect("claim on a fresh slot");
    }
}

fn bench_claim(c: &mut Criterion) {
    c.bench_function("claim_single", |b| {
        b.iter_batched(
            setup,
            |mut fixture| {
                let slot = nth_slot(fixture.space, 0);
                let reservation = SlotLedger::new(&mut fixture.db)
                    .claim(&slot, fixture.user.id, None)
                    .expect("claim succeeds");
                black_box(reservation);
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_claim_conflict(c: &mut Criterion) {
    c.bench_function("claim_conflict", |b| {
        b.iter_batched(
            || {
                let mut fixture = setup();
                populate(&mut fixture, 1);
                fixture
            },
            |mut fixture| {
                let slot = nth_slot(fixture.space, 0);
                let result = SlotLedger::new(&mut fixture.db).claim(&slot, fixture.user.id, None);
                black_box(result.is_err());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_claim_release(c: &mut Criterion) {
    c.bench_function("claim_release_cycle", |b| {
        b.iter_batched(
            setup,
            |mut fixture| {
                let slot = nth_slot(fixture.space, 0);
                let mut ledger = SlotLedger::new(&mut fixture.db);
                let reservation = ledger
                    .claim(&slot, fixture.user.id, None)
                    .expect("claim succeeds");
                black_box(ledger.release(reservation.id()).expect("release succeeds"));
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_reservations");

    for &size in LIST_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &count| {
            b.iter_batched(
                || {
                    let mut fixture = setup();
                    populate(&mut fixture, count);
                    fixture
                },
                |mut fixture| {
                    let user = fixture.user;
                    let rows = ReservationManager::new(&mut fixture.db)
                        .list(&user, Page::all())
                        .expect("list succeeds");
                    black_box(rows.len());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    ledger_bench,
    bench_claim,
    bench_claim_conflict,
    bench_claim_release,
    bench_list
);
criterion_main!(ledger_bench);
