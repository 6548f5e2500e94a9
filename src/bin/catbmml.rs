//! Prints the braille text of BMML documents, or re-serializes them.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bmml::{parse_reader, Document, Serializer};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Read BMML documents and print their braille music text.
#[derive(Parser)]
#[command(name = "catbmml")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Write the parsed document back as markup instead of braille text.
    #[arg(long)]
    xml: bool,

    /// Indent markup output by two spaces per level (implies --xml).
    #[arg(long)]
    pretty: bool,

    /// Check attribute values and identifiers after parsing.
    #[arg(long)]
    validate: bool,

    /// Documents to read; standard input when none are given.
    files: Vec<PathBuf>,
}

fn load(path: Option<&Path>) -> bmml::Result<Document> {
    match path {
        Some(path) => {
            let name = path.display().to_string();
            parse_reader(File::open(path)?, &name)
        }
        None => parse_reader(io::stdin().lock(), "<stdin>"),
    }
}

fn check(document: &Document) -> bmml::Result<()> {
    document.validate()?;
    if let Some((id, nodes)) = document.duplicate_identifiers().into_iter().next() {
        return Err(bmml::Error::invalid_value(format!(
            "identifier '{id}' is used by {} elements",
            nodes.len()
        )));
    }
    Ok(())
}

fn emit(cli: &Cli, document: &Document, out: &mut impl Write) -> bmml::Result<()> {
    if cli.xml || cli.pretty {
        let serializer = if cli.pretty {
            Serializer::new().with_declaration().with_indent("  ")
        } else {
            Serializer::new().with_declaration()
        };
        serializer.to_writer(document, &mut *out)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{document}")?;
    }
    Ok(())
}

fn run(cli: &Cli) -> bmml::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let paths: Vec<Option<&Path>> = if cli.files.is_empty() {
        vec![None]
    } else {
        cli.files.iter().map(|p| Some(p.as_path())).collect()
    };

    for path in paths {
        let document = load(path)?;
        tracing::info!(
            document = document.name(),
            elements = document.node_count(),
            "parsed"
        );
        if cli.validate {
            check(&document)?;
        }
        emit(cli, &document, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    // WARN by default, RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
