// SPDX-License-Identifier: Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mpds_phases_model::{parse_pearson, PhaseRecord};

const GE_RECORD: &str = r#"{"id":"https://mpds.io/phase_id/5019","formula":{"short":"Ge","full":"Ge cub"},"spg":227,"pearson":"cF8","entries":1571,"articles":748}"#;

fn bench_record_parse(c: &mut Criterion) {
    c.bench_function("phase_record_parse", |b| {
        b.iter(|| {
            serde_json::from_str::<PhaseRecord>(black_box(GE_RECORD)).expect("record parse")
        })
    });
    c.bench_function("pearson_parse", |b| {
        b.iter(|| parse_pearson(black_box("cF8")).expect("pearson parse"))
    });
}

criterion_group!(benches, bench_record_parse);
criterion_main!(benches);
