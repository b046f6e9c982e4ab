// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use pythia::model::encode;
use pythia::nav::SourceBuffer;

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group names in this file: `nav.buffer_new`, `nav.offset_lookup`
// - Case IDs: `lines_200`, `lines_20000`.
fn benches_nav(c: &mut Criterion) {
    let cases = [("lines_200", 200usize), ("lines_20000", 20_000usize)];

    {
        let mut group = c.benchmark_group("nav.buffer_new");

        for (case_id, lines) in cases {
            let text = fixtures::go_source(lines);
            group.throughput(Throughput::Bytes(text.len() as u64));
            group.bench_function(case_id, move |b| {
                b.iter(|| {
                    let buffer = SourceBuffer::new(black_box(text.as_str()));
                    black_box(buffer.line_count())
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("nav.offset_lookup");

        for (case_id, lines) in cases {
            let buffer = SourceBuffer::new(fixtures::go_source(lines));
            let probes: Vec<usize> = (1..=buffer.line_count()).step_by(7).collect();
            group.throughput(Throughput::Elements(probes.len() as u64));
            group.bench_function(case_id, move |b| {
                b.iter(|| {
                    let mut acc = 0usize;
                    for &line in &probes {
                        let Some(start) = buffer.char_offset(line, 3) else {
                            continue;
                        };
                        let end = buffer.char_offset(line, 12).unwrap_or(start);
                        if let Some((back, _)) = buffer.line_col_of(end) {
                            acc = acc.wrapping_add(back);
                        }
                        acc = acc.wrapping_add(encode("main.go", start, end).as_str().len());
                    }
                    black_box(acc)
                })
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_nav
}
criterion_main!(benches);
