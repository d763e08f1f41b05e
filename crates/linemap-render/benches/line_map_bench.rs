//! Benchmarks for line-correspondence computation.
//!
//! Workloads per screen size:
//! - scroll: content scrolled up by three lines (the common case)
//! - edit: one line changed in place (no anchors; fast path)
//! - shuffle: two blocks swapped (anchors on both sides, validation work)
//!
//! Run with: cargo bench -p linemap-render --bench line_map_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use linemap_render::{Cell, LineMapContext, Screen};
use std::hint::black_box;

fn screen(width: u16, height: u16, offset: usize) -> Screen<Cell> {
    let rows: Vec<Vec<Cell>> = (0..height as usize)
        .map(|y| {
            format!("{:>6} | the quick brown fox jumps over the lazy dog", y + offset)
                .chars()
                .map(Cell::from_char)
                .collect()
        })
        .collect();
    Screen::from_rows(width, Cell::BLANK, &rows)
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_map/compute");

    for (w, h) in [(80u16, 24u16), (120, 40), (200, 60)] {
        group.throughput(Throughput::Elements(u64::from(h)));

        let old = screen(w, h, 0);
        let scrolled = screen(w, h, 3);
        let mut edited = old.clone();
        edited.fill_row(h / 2, Cell::from_char('#'));

        let half = h as usize / 2;
        let mut shuffled_rows: Vec<Vec<Cell>> = old.lines().skip(half).map(<[Cell]>::to_vec).collect();
        shuffled_rows.extend(old.lines().take(half).map(<[Cell]>::to_vec));
        let shuffled = Screen::from_rows(w, Cell::BLANK, &shuffled_rows);

        let mut ctx = LineMapContext::with_capacity(h as usize);
        for (name, new) in [("scroll", &scrolled), ("edit", &edited), ("shuffle", &shuffled)] {
            group.bench_with_input(
                BenchmarkId::new(name, format!("{w}x{h}")),
                new,
                |b, new| {
                    b.iter(|| {
                        let map = ctx.compute(black_box(&old), black_box(new), Cell::BLANK);
                        black_box(map.map(|m| m.mapped_count()).unwrap_or(0))
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_compute);
criterion_main!(benches);
