//! Parses a BMML document, writes it back, and checks that the output is
//! stable.
//!
//! ```text
//! cargo run --example roundtrip -- fixtures/minuet.bmml
//! ```

use bmml::{parse, parse_reader, to_string, Document, Serializer};

fn load() -> bmml::Result<Document> {
    match std::env::args().nth(1) {
        Some(path) => parse_reader(std::fs::File::open(&path)?, &path),
        None => parse(include_str!("../fixtures/minuet.bmml"), "minuet"),
    }
}

fn main() -> bmml::Result<()> {
    let doc = load()?;
    println!("{}: {} elements", doc.name(), doc.node_count());
    println!("braille: {doc}");

    let compact = to_string(&doc)?;
    let reparsed = parse(&compact, doc.name())?;
    let stable = to_string(&reparsed)? == compact;
    println!("compact output stable: {stable}");

    let pretty = Serializer::new()
        .with_declaration()
        .with_indent("  ")
        .to_string(&doc)?;
    println!("{pretty}");

    let from_pretty = to_string(&parse(&pretty, doc.name())?)?;
    println!("pretty output reparses identically: {}", from_pretty == compact);

    match doc.validate() {
        Ok(()) => println!("attribute values: ok"),
        Err(e) => println!("attribute values: {e}"),
    }
    Ok(())
}
