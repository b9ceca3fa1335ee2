use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use transport_catalogue::{Catalogue, RouterSettings, TransportRouter};

/// A grid of `side * side` stops with two crossing bus lines per row/column
/// so every stop sees some service.
fn grid_catalogue(side: usize) -> Catalogue {
    fastrand::seed(7);
    let mut catalogue = Catalogue::new();
    for row in 0..side {
        for col in 0..side {
            let name = format!("stop-{row}-{col}");
            catalogue.add_stop(name, row as f64 * 0.01, col as f64 * 0.01);
        }
    }
    for row in 0..side {
        for col in 0..side - 1 {
            let a = format!("stop-{row}-{col}");
            let b = format!("stop-{row}-{}", col + 1);
            let metres = 200 + fastrand::u32(0..800);
            catalogue.add_distance(&a, &b, metres);
            catalogue.add_distance(&b, &a, metres);
        }
    }
    for row in 0..side {
        let stops: Vec<String> = (0..side).map(|col| format!("stop-{row}-{col}")).collect();
        catalogue.add_bus(format!("row-{row}"), &stops, false);
    }
    catalogue
}

fn router_construction_benchmark(c: &mut Criterion) {
    let catalogue = grid_catalogue(30);
    let settings = RouterSettings::new(5, 40.0).unwrap();
    c.bench_function("TransportRouter::new", |b| {
        b.iter(|| TransportRouter::new(black_box(&catalogue), black_box(settings)))
    });
}

fn find_route_benchmark(c: &mut Criterion) {
    let catalogue = grid_catalogue(30);
    let settings = RouterSettings::new(5, 40.0).unwrap();
    let router = TransportRouter::new(&catalogue, settings);
    c.bench_function("TransportRouter::find_route", |b| {
        b.iter(|| router.find_route(black_box("stop-0-0"), black_box("stop-0-29")))
    });
}

criterion_group!(benches, router_construction_benchmark, find_route_benchmark);
criterion_main!(benches);
