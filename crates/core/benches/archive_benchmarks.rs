use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::Utc;
use modelkit_core::{
    model_object, set_property, write_property, Archive, ChangeLog, ModelObject, Rect, Value,
};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
struct Card {
    id: Uuid,
    title: String,
    body: String,
    frame: Rect,
    pinned: bool,
    created_at: chrono::DateTime<Utc>,
    labels: Vec<Value>,
}

model_object!(Card, "Card", {
    id: Uuid,
    title: String,
    body: String,
    frame: Rect,
    pinned: bool,
    created_at: chrono::DateTime<Utc>,
    labels: Vec<Value>,
});

fn card(labels: usize) -> Card {
    Card {
        id: Uuid::now_v7(),
        title: "Quarterly planning".to_string(),
        body: "Agenda, owners, follow-ups".repeat(8),
        frame: Rect::new(10.0, 20.0, 320.0, 240.0),
        pinned: true,
        created_at: Utc::now(),
        labels: (0..labels).map(|i| Value::Text(format!("label-{i}"))).collect(),
    }
}

fn bench_archive_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("archive_round_trip");

    for labels in [0usize, 10, 100].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("encode", labels), labels, |b, &n| {
            let model = card(n);
            b.iter(|| black_box(model.encode()));
        });
        group.bench_with_input(BenchmarkId::new("decode", labels), labels, |b, &n| {
            let archive = card(n).encode();
            b.iter(|| black_box(Card::decode(&archive).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("json", labels), labels, |b, &n| {
            let archive = card(n).encode();
            b.iter(|| {
                let json = archive.to_json().unwrap();
                black_box(Archive::from_json(&json).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_property_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("property_writes");

    group.bench_function("unobserved", |b| {
        let mut model = card(0);
        b.iter(|| write_property(&mut model, "pinned", black_box(false)).unwrap());
    });

    group.bench_function("change_log", |b| {
        let mut model = card(0);
        let mut log = ChangeLog::new();
        b.iter(|| {
            set_property(&mut model, &mut log, "title", black_box("Retro")).unwrap();
            log.clear();
        });
    });

    group.bench_function("equality", |b| {
        let a = card(10);
        let copy = a.copy();
        b.iter(|| black_box(a.is_equal_to_model_object(Some(&copy))));
    });

    group.finish();
}

criterion_group!(benches, bench_archive_round_trip, bench_property_writes);
criterion_main!(benches);
