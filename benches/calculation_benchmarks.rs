//! Performance benchmarks for the Incident Engine.
//!
//! Covers pricing a session, exporting it in both formats, and the summary
//! endpoint end to end.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use incident_engine::api::{AppState, create_router};
use incident_engine::calculation::price_all;
use incident_engine::config::{PricingSettings, Settings};
use incident_engine::export::{ExportFormat, ExportOptions, export};
use incident_engine::master_data::{MasterData, MasterDataCache};
use incident_engine::models::{Centre, EmployeeRates, EmployeeRecord, Incident};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

const EMPLOYEES: usize = 200;

fn employee_name(i: usize) -> String {
    format!("EMPLEADO {:03}", i)
}

/// Master data with 200 employees spread over 10 centres.
fn create_master() -> MasterData {
    let employees = (0..EMPLOYEES)
        .map(|i| {
            let rates = EmployeeRates::new(Decimal::new(1000 + i as i64, 2), Decimal::new(150, 2));
            let mut record = EmployeeRecord::new(&employee_name(i), rates);
            record.category = if i % 2 == 0 { "h ASL" } else { "Camarero" }.to_string();
            record.agreement = "99100165012016".to_string();
            record.home_centre = format!("{}", 4000 + i % 10);
            record
        })
        .collect();
    let centres = (0..10)
        .map(|i| Centre {
            code: format!("{}", 4000 + i),
            name: format!("Centro {}", i),
            supervisor: format!("Jefe {}", i),
        })
        .collect();
    MasterData::new(employees, centres)
        .with_night_rate("ASL", "99100165012016", Decimal::new(15, 1))
        .with_night_rate("Camarero", "99100165012016", Decimal::new(12, 1))
}

fn create_incidents(count: usize) -> Vec<Incident> {
    let date = NaiveDate::from_ymd_opt(2026, 1, 13).unwrap_or_default();
    (0..count)
        .map(|i| {
            let mut incident = Incident::new(employee_name(i % EMPLOYEES), date);
            incident.hours = Decimal::from(1 + i % 8);
            incident.transfers = Decimal::from(i % 3);
            if i % 4 == 0 {
                incident.night_shift = true;
                incident.night_hours = Decimal::from(2);
            }
            incident
        })
        .collect()
}

/// Benchmark: pricing sessions of growing size.
fn bench_pricing(c: &mut Criterion) {
    let master = create_master();
    let pricing = PricingSettings::default();

    let mut group = c.benchmark_group("pricing");
    for count in [1usize, 10, 100, 1000] {
        let incidents = create_incidents(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("rows", count), &incidents, |b, rows| {
            b.iter(|| black_box(price_all(black_box(rows), &master, &pricing)))
        });
    }
    group.finish();
}

/// Benchmark: exporting 500 rows to each format.
fn bench_export(c: &mut Criterion) {
    let master = create_master();
    let incidents = create_incidents(500);
    let pricing = PricingSettings::default();

    let mut group = c.benchmark_group("export");
    group.throughput(Throughput::Elements(incidents.len() as u64));
    group.sample_size(20);
    for format in [ExportFormat::Csv, ExportFormat::Xlsx] {
        let options = ExportOptions::new(format, &pricing);
        group.bench_function(format.to_string(), |b| {
            b.iter(|| black_box(export(&incidents, &master, &options).unwrap()))
        });
    }
    group.finish();
}

/// Benchmark: GET /sessions/:id/summary on a 100-row session.
fn bench_summary_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = AppState::new(
        Settings::default(),
        MasterDataCache::preloaded(create_master()),
    );
    let id = state.sessions().open("01-Enero", None);
    state
        .sessions()
        .with_session(id, |session| session.store.extend(create_incidents(100)))
        .unwrap();
    let router = create_router(state);
    let uri = format!("/sessions/{}/summary", id);

    c.bench_function("summary_100_rows", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(benches, bench_pricing, bench_export, bench_summary_endpoint);
criterion_main!(benches);
