use std::fs;

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pedmap_convert::{
    ConversionConfig, Dataset, ExportFormat, Target, convert_dataset,
    dataset::FusedRecord,
    export::{genepop_table, structure_table},
    select_markers,
    table::{WideTable, long_rows},
};
use tempfile::tempdir;

const GENOTYPES: [&str; 4] = ["A A", "A B", "B B", "0 0"];

fn write_inputs(dir: &tempfile::TempDir, individuals: usize, markers: usize) {
    let mut ped = String::new();
    for i in 0..individuals {
        ped.push_str(&format!("FAM\tind{i}\t0\t0\t1\t-9"));
        for m in 0..markers {
            ped.push('\t');
            ped.push_str(GENOTYPES[(i + m) % GENOTYPES.len()]);
        }
        ped.push('\n');
    }
    let mut map = String::new();
    for m in 0..markers {
        map.push_str(&format!("1\trs{m}\t0\t{}\n", m * 1000));
    }
    fs::write(dir.path().join("bench.ped"), ped).unwrap();
    fs::write(dir.path().join("bench.map"), map).unwrap();
}

fn load(dir: &tempfile::TempDir) -> Vec<FusedRecord> {
    let mut dataset = Dataset::new(dir.path().join("bench.ped"), dir.path().join("bench.map"));
    dataset.read().unwrap().to_vec()
}

fn bench_reshape(c: &mut Criterion) {
    let mut group = c.benchmark_group("reshape");
    for &(individuals, markers) in &[(50usize, 200usize), (200, 1_000)] {
        let dir = tempdir().unwrap();
        write_inputs(&dir, individuals, markers);
        let records = load(&dir);
        let label = format!("{individuals}x{markers}");

        group.bench_with_input(BenchmarkId::new("pivot", &label), &records, |b, records| {
            b.iter(|| WideTable::pivot_joined(long_rows(black_box(records))));
        });
        group.bench_with_input(BenchmarkId::new("genepop", &label), &records, |b, records| {
            b.iter(|| genepop_table(black_box(records)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("structure", &label), &records, |b, records| {
            b.iter(|| structure_table(black_box(records)).unwrap());
        });

        let half: Vec<String> = (0..markers).step_by(2).map(|m| format!("rs{m}")).collect();
        let target = Target::new(half).unwrap();
        group.bench_with_input(
            BenchmarkId::new("select_markers", &label),
            &records,
            |b, records| {
                b.iter(|| select_markers(&target, black_box(records)));
            },
        );
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    write_inputs(&dir, 100, 500);

    c.bench_function("convert_csv_100x500", |b| {
        b.iter_batched(
            || ConversionConfig {
                ped: dir.path().join("bench.ped"),
                map: dir.path().join("bench.map"),
                output: dir.path().join("out"),
                format: ExportFormat::Csv,
                title: None,
                individuals: None,
                markers: None,
                write_report: false,
            },
            |config| convert_dataset(config).unwrap(),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_reshape, bench_end_to_end);
criterion_main!(benches);
