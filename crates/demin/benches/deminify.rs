use std::{hint::black_box, time::Duration};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use demin::{
    config::Logging,
    deminify::{DeminifiedModule, Deminifier, DeminifyOptions},
    parser::parse_script,
};

/// A minified bundle of `modules` defines, each depending on a few of the
/// modules before it
fn synthesize_bundle(modules: usize) -> String {
    let mut bundle = String::new();
    for i in 0..modules {
        let deps: Vec<String> = (i.saturating_sub(3)..i)
            .map(|dep| format!("\"lib/mod{dep}\""))
            .collect();
        let params: Vec<String> = (0..deps.len()).map(|p| format!("p{p}")).collect();
        let uses: String = params
            .iter()
            .map(|p| format!("x=x+{p}.default+{p}.value;"))
            .collect();
        bundle.push_str(&format!(
            "define(\"lib/mod{i}\",[\"require\",\"exports\",{deps}],function(r,e,{params}){{var \
             x=void 0;function f(p0){{return p0?!0:!1}}{uses}e.value=f(x);e.default={{x:x}}}});\n",
            deps = deps.join(","),
            params = params.join(","),
        ));
    }
    bundle
}

fn benchmark_deminify(c: &mut Criterion) {
    let mut group = c.benchmark_group("deminify");
    group.measurement_time(Duration::from_secs(10));

    for modules in [10, 100, 1000] {
        let bundle = synthesize_bundle(modules);
        group.throughput(Throughput::Bytes(bundle.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(modules), &bundle, |b, bundle| {
            b.iter(|| {
                let mut parsed =
                    parse_script("bench.js", bundle.clone()).expect("Failed to parse bundle");
                let mut sink: Vec<DeminifiedModule> = Vec::with_capacity(modules);
                let options = DeminifyOptions {
                    limit: None,
                    logging: Logging::None,
                };
                let emitted = Deminifier::new(&mut sink, options)
                    .run(&mut parsed.script)
                    .expect("Failed to deminify bundle");
                black_box(emitted)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_deminify);
criterion_main!(benches);
