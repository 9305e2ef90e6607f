use bottle_prep::models::{Co2AnnualMean, Observation, TargetVariable};
use bottle_prep::processors::{AtmosphericJoin, QualityFilter};
use bottle_prep::satellite::{extract_nearest, nearest_index, GridSnapshot, SatelliteProduct};
use bottle_prep::utils::coordinates::longitude_to_360;
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Synthetic bottle samples spread over the shelf, with every fifth DIC flag bad
fn create_observations(count: usize) -> Vec<Observation> {
    let base_date = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();

    (0..count)
        .map(|i| {
            let date = base_date + chrono::Duration::days((i % 3650) as i64);
            let dic_flag = if i % 5 == 0 { 3 } else { 2 };
            Observation::builder()
                .date(date)
                .position(-75.0 + (i % 100) as f64 * 0.1, 35.0 + (i % 80) as f64 * 0.1)
                .temperature(10.0 + (i % 15) as f64, 2)
                .salinity(33.0, 2)
                .dic(2000.0 + i as f64 * 0.01, Some(dic_flag))
                .talk(2200.0, Some(2))
                .build()
        })
        .collect()
}

// Quarter-degree SSH grid over the North Atlantic in 0..360 longitude
fn create_grid() -> GridSnapshot {
    let longitudes: Vec<f64> = (0..480).map(|i| 270.125 + i as f64 * 0.25).collect();
    let latitudes: Vec<f64> = (0..240).map(|i| 20.125 + i as f64 * 0.25).collect();
    let cells = longitudes.len() * latitudes.len();
    let adt: Vec<Option<f64>> = (0..cells)
        .map(|i| if i % 17 == 0 { None } else { Some(i as f64 * 1e-5) })
        .collect();

    GridSnapshot::new(longitudes, latitudes)
        .with_field("adt", adt.clone())
        .unwrap()
        .with_field("sla", adt)
        .unwrap()
}

fn benchmark_nearest_index(c: &mut Criterion) {
    let axis: Vec<f64> = (0..36000).map(|i| -179.995 + i as f64 * 0.01).collect();
    let targets = [-70.123, -45.5, 0.0, 12.345, 179.99];

    c.bench_function("nearest_index_mur_axis", |b| {
        b.iter(|| {
            let mut found = 0;
            for &target in &targets {
                if nearest_index(black_box(&axis), target).is_some() {
                    found += 1;
                }
            }
            black_box(found)
        })
    });
}

fn benchmark_extract_nearest(c: &mut Criterion) {
    let grid = create_grid();
    let observations = create_observations(500);

    c.bench_function("extract_nearest_ssh", |b| {
        b.iter(|| {
            let mut extracted = 0;
            for obs in &observations {
                if let Some((lon, lat)) = obs.position() {
                    if let Ok(Some(_)) = extract_nearest(&grid, "adt", longitude_to_360(lon), lat) {
                        extracted += 1;
                    }
                }
            }
            black_box(extracted)
        })
    });

    c.bench_function("product_sample_ssh", |b| {
        b.iter(|| {
            let mut sampled = 0;
            for obs in &observations {
                if let Some((lon, lat)) = obs.position() {
                    if let Ok(values) = SatelliteProduct::Ssh.sample(&grid, lon, lat) {
                        sampled += values.len();
                    }
                }
            }
            black_box(sampled)
        })
    });
}

fn benchmark_filter_and_join(c: &mut Criterion) {
    let co2: Vec<Co2AnnualMean> = (1980..2025)
        .map(|year| Co2AnnualMean::new(year, 338.0 + (year - 1980) as f64 * 2.0))
        .collect();
    let join = AtmosphericJoin::new(&co2);

    let mut group = c.benchmark_group("filter_and_join_by_size");

    for &size in &[1_000, 10_000, 50_000] {
        let observations = create_observations(size);
        group.bench_with_input(BenchmarkId::new("rows", size), &observations, |b, obs| {
            b.iter(|| {
                let filtered = QualityFilter::new(TargetVariable::Dic).apply(obs);
                let joined = join.join(filtered.kept);
                black_box(joined.records.len())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_nearest_index,
    benchmark_extract_nearest,
    benchmark_filter_and_join
);
criterion_main!(benches);
