//! Lists every identifier reference in a score and the element it points to.
//!
//! ```text
//! cargo run --example references -- fixtures/minuet.bmml
//! ```

use bmml::{parse, parse_reader, AttributeKind, Document, IdRef};

fn load() -> bmml::Result<Document> {
    match std::env::args().nth(1) {
        Some(path) => parse_reader(std::fs::File::open(&path)?, &path),
        None => parse(include_str!("../fixtures/minuet.bmml"), "minuet"),
    }
}

fn main() -> bmml::Result<()> {
    let doc = load()?;
    let catalog = doc.catalog();

    for element in doc.root().descendants() {
        let tag = element.tag_name().as_str();
        for attr in element.node().attributes() {
            let is_reference = catalog
                .attribute(tag, &attr.name)
                .is_some_and(|decl| decl.kind == AttributeKind::IdRef);
            if !is_reference {
                continue;
            }

            let reference = IdRef::new(attr.value.to_string())?;
            match reference.resolve(&doc, element.node_id()) {
                Some(target) => {
                    let target = doc.element(target);
                    let parent = target
                        .parent()
                        .map(|p| p.tag_name().to_string())
                        .unwrap_or_default();
                    println!(
                        "<{tag}> {}=\"{reference}\" -> <{}> in <{parent}>",
                        attr.name,
                        target.tag_name()
                    );
                }
                None => println!("<{tag}> {}=\"{reference}\" -> dangling", attr.name),
            }
        }
    }

    for (id, holders) in doc.duplicate_identifiers() {
        println!("identifier '{id}' is held by {} elements", holders.len());
    }
    Ok(())
}
