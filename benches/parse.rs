// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use pythia::controller::InteractionController;
use pythia::format::parse_response;

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group names in this file: `format.parse_response`, `controller.write_output`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time.
fn benches_parse(c: &mut Criterion) {
    let cases = [
        fixtures::Case::Small,
        fixtures::Case::CallgraphLarge,
        fixtures::Case::LongMessages,
    ];

    {
        let mut group = c.benchmark_group("format.parse_response");

        for case in cases {
            let body = fixtures::response(case);
            group.throughput(Throughput::Bytes(body.len() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| black_box(fixtures::checksum(parse_response(black_box(&body)))))
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("controller.write_output");

        for case in cases {
            let body = fixtures::response(case);
            group.throughput(Throughput::Elements(body.lines().count() as u64));
            group.bench_function(case.id(), move |b| {
                let mut controller = InteractionController::new();
                b.iter(|| {
                    controller.write_output(black_box(&body));
                    black_box(controller.output().link_indices().count())
                })
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_parse
}
criterion_main!(benches);
