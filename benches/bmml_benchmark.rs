//! Benchmarks for bmml parsing, serialization and reference resolution.

use std::hint::black_box;

use bmml::elements::TieRef;
use bmml::{parse, to_string, Event, Registry, Serializer, XmlReader};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const MINUET: &str = include_str!("../fixtures/minuet.bmml");

/// A score with `parts` parts of four measures each. Every part ties its
/// first note to the last note of the previous part.
fn generated_score(parts: usize) -> String {
    let mut xml = String::from(r#"<score version="2010.1"><score_data>"#);
    for p in 0..parts {
        xml.push_str(&format!(r#"<part id="p{p}">"#));
        for m in 0..4 {
            for n in 0..4 {
                xml.push_str(&format!(
                    concat!(
                        r#"<note id="n{p}_{m}_{n}"><note_data><duration>192</duration>"#,
                        r#"<pitch>{pitch}</pitch></note_data>"#,
                        r#"<note_type id="t{p}_{m}_{n}" name="C" value="8th_or_128th">⠙</note_type></note>"#,
                    ),
                    p = p,
                    m = m,
                    n = n,
                    pitch = 60 + n,
                ));
            }
            xml.push_str(&format!(r#"<barline id="b{p}_{m}" value=" "> </barline>"#));
        }
        if p > 0 {
            xml.push_str(&format!(
                r#"<tie_ref id="n{}_3_3" start_ref="n{p}_0_0" type="stop"/>"#,
                p - 1
            ));
        }
        xml.push_str("</part>");
    }
    xml.push_str("</score_data></score>");
    xml
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parse");

    group.throughput(Throughput::Bytes(MINUET.len() as u64));
    group.bench_function("minuet", |b| b.iter(|| parse(black_box(MINUET), "minuet")));

    let registry = Registry::bmml();
    group.bench_function("minuet_shared_registry", |b| {
        b.iter(|| bmml::parse_with(XmlReader::from_str(black_box(MINUET)), &registry, "minuet"))
    });

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Serialize");
    let doc = parse(MINUET, "minuet").unwrap();

    group.bench_function("compact", |b| b.iter(|| to_string(black_box(&doc))));
    group.bench_function("pretty", |b| {
        let serializer = Serializer::new().with_indent("  ");
        b.iter(|| serializer.to_string(black_box(&doc)))
    });
    group.bench_function("braille_text", |b| b.iter(|| black_box(&doc).to_string()));

    group.finish();
}

fn bench_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("XmlReader");

    group.throughput(Throughput::Bytes(MINUET.len() as u64));
    group.bench_function("events", |b| {
        b.iter(|| {
            let mut reader = XmlReader::from_str(black_box(MINUET));
            let mut count = 0;
            loop {
                match reader.next_event() {
                    Ok(Event::Eof) => break,
                    Ok(_) => count += 1,
                    Err(_) => break,
                }
            }
            count
        })
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resolve");

    for parts in [1, 10, 100].iter() {
        let xml = generated_score(*parts);
        let doc = parse(&xml, "generated").unwrap();
        let ties: Vec<_> = doc
            .root()
            .descendants()
            .filter_map(|e| e.cast::<TieRef>())
            .collect();

        group.throughput(Throughput::Elements(doc.node_count() as u64));
        group.bench_with_input(BenchmarkId::new("parse", parts), &xml, |b, xml| {
            b.iter(|| parse(black_box(xml), "generated"))
        });
        group.bench_with_input(BenchmarkId::new("tie_refs", parts), &ties, |b, ties| {
            b.iter(|| {
                ties.iter()
                    .filter_map(|tie| tie.resolve(TieRef::ID).ok().flatten())
                    .count()
            })
        });
        group.bench_with_input(BenchmarkId::new("find_by_id", parts), &doc, |b, doc| {
            b.iter(|| doc.find_by_id(black_box("n0_0_0")))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_serialize, bench_reader, bench_resolve);
criterion_main!(benches);
