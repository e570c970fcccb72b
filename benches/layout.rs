use coursemap::config::LayoutConfig;
use coursemap::ir::{Course, Prerequisite};
use coursemap::layout::compute_layout;
use coursemap::paths::find_prerequisite_paths;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// `levels` rows of `width` courses; each course requires one course from the
/// row above and one of two alternatives further left.
fn layered_catalogue(levels: usize, width: usize) -> Vec<Course> {
    let mut out = Vec::with_capacity(levels * width);
    for level in 0..levels {
        for slot in 0..width {
            let id = format!("C{level}_{slot}");
            if level == 0 {
                out.push(Course::new(id));
                continue;
            }
            let above = level - 1;
            let expr = Prerequisite::and(vec![
                Prerequisite::leaf(format!("C{above}_{slot}")),
                Prerequisite::or(vec![
                    Prerequisite::leaf(format!("C{above}_{}", (slot + 1) % width)),
                    Prerequisite::leaf(format!("C{above}_{}", (slot + 3) % width)),
                ]),
            ]);
            out.push(Course::new(id).with_prerequisite(expr));
        }
    }
    out
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = LayoutConfig::default();
    for (levels, width) in [(3, 4), (5, 8), (6, 16)] {
        let courses = layered_catalogue(levels, width);
        let name = format!("{levels}x{width}");
        group.bench_with_input(BenchmarkId::from_parameter(name), &courses, |b, data| {
            b.iter(|| {
                let layout = compute_layout(black_box(data), &config);
                black_box(layout.intersections);
            });
        });
    }
    group.finish();
}

fn bench_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("paths");
    for (levels, width) in [(5, 8), (12, 24)] {
        let courses = layered_catalogue(levels, width);
        let selected = format!("C{}_0", levels - 1);
        let name = format!("{levels}x{width}");
        group.bench_with_input(BenchmarkId::from_parameter(name), &courses, |b, data| {
            b.iter(|| black_box(find_prerequisite_paths(black_box(&selected), data).len()));
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_layout, bench_paths
);
criterion_main!(benches);
