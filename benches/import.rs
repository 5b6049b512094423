use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use criterion::Throughput;
use std::io::Cursor;
use su2_import::Mesh;


fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");
    for (name, input) in [
        ("surface", generator::surface(300)),
        ("volume", generator::volume(40)),
    ] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| Mesh::from_reader(Cursor::new(input.as_bytes())).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_import);
criterion_main!(benches);
