use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ncview_core::TessellationOptions;
use ncview_visualizer::{flatten_toolpath, parse_gcode, ToolpathCache};
use std::fmt::Write;

/// Pocketing-style program: zig-zag passes joined by arcs at several depths
fn sample_program(passes: usize) -> String {
    let mut program = String::from("G21\nG90\nG0 Z5\nG0 X0 Y0\n");
    for layer in 1..=3 {
        let _ = writeln!(program, "G1 Z-{}", layer);
        for pass in 0..passes {
            let y = pass as f64 * 2.0;
            let _ = writeln!(program, "G1 X100 Y{:.1} F1200", y);
            let _ = writeln!(program, "G3 X100 Y{:.1} I0 J1", y + 2.0);
            let _ = writeln!(program, "G1 X0");
            let _ = writeln!(program, "G2 X0 Y{:.1} R1", y + 2.0);
        }
        let _ = writeln!(program, "G0 Z5\nG0 X0 Y0");
    }
    program
}

fn bench_parse(c: &mut Criterion) {
    let program = sample_program(500);
    c.bench_function("parse_gcode_6k_lines", |b| {
        b.iter(|| parse_gcode(black_box(&program)))
    });
}

fn bench_cache_and_tessellation(c: &mut Criterion) {
    let toolpath = parse_gcode(&sample_program(500));
    c.bench_function("toolpath_cache_rebuild", |b| {
        b.iter(|| {
            let mut cache = ToolpathCache::new();
            cache.update(1, black_box(toolpath.segments.clone()), toolpath.bounds);
            cache
        })
    });
    let options = TessellationOptions::default();
    c.bench_function("flatten_toolpath_zoomed", |b| {
        b.iter(|| flatten_toolpath(black_box(&toolpath.segments), 20.0, &options))
    });
}

criterion_group!(benches, bench_parse, bench_cache_and_tessellation);
criterion_main!(benches);
