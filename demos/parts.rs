//! Splits every part of a score into measures and prints them.
//!
//! Measures end at barlines. In-accord signs open a new voice (`full`), a new
//! partial measure (`part`) or a new partial voice (`division`). Layout
//! elements are skipped.
//!
//! Output per measure: `[voice]`, `{partial measure}`, `(partial voice)`.
//!
//! ```text
//! cargo run --example parts -- fixtures/minuet.bmml
//! ```

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use bmml::elements::{
    Barline, Duration, GenericText, Inaccord, MusicHyphen, Newline, Note, NoteData, Part, PartName,
    Rest, RestData, Separator, Space, TimeSignature,
};
use bmml::enumerations::InaccordKind;
use bmml::{parse, parse_reader, Document, Element};

type PartialVoice<'a> = Vec<Element<'a>>;
type PartialMeasure<'a> = Vec<PartialVoice<'a>>;
type Voice<'a> = Vec<PartialMeasure<'a>>;

#[derive(Default)]
struct Measure<'a> {
    voices: Vec<Voice<'a>>,
}

impl<'a> Measure<'a> {
    fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    fn open(&mut self, kind: InaccordKind) {
        if kind == InaccordKind::Full || self.voices.is_empty() {
            self.voices.push(Voice::new());
        }
        let voice = self.voices.last_mut().map(|v| {
            if kind != InaccordKind::Division || v.is_empty() {
                v.push(PartialMeasure::new());
            }
            v
        });
        if let Some(partial) = voice.and_then(|v| v.last_mut()) {
            partial.push(PartialVoice::new());
        }
    }

    fn push(&mut self, element: Element<'a>) {
        if self.is_empty() {
            self.open(InaccordKind::Full);
        }
        if let Some(partial_voice) = self
            .voices
            .last_mut()
            .and_then(|v| v.last_mut())
            .and_then(|pm| pm.last_mut())
        {
            partial_voice.push(element);
        }
    }
}

fn duration_of(element: Element<'_>) -> Option<i32> {
    let duration = if let Some(note) = element.cast::<Note>() {
        note.find_element::<NoteData>()?.find_element::<Duration>()?
    } else {
        let rest = element.cast::<Rest>()?;
        rest.find_element::<RestData>()?.find_element::<Duration>()?
    };
    duration.value().ok()
}

impl fmt::Display for Measure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for voice in &self.voices {
            f.write_char('[')?;
            for partial_measure in voice {
                f.write_char('{')?;
                for partial_voice in partial_measure {
                    f.write_char('(')?;
                    for (i, element) in partial_voice.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", element.tag_name())?;
                        if let Some(duration) = duration_of(*element) {
                            write!(f, " {duration}")?;
                        }
                    }
                    f.write_char(')')?;
                }
                f.write_char('}')?;
            }
            f.write_char(']')?;
        }
        Ok(())
    }
}

fn is_layout_element(element: Element<'_>) -> bool {
    element.is::<Space>()
        || element.is::<Newline>()
        || element.is::<MusicHyphen>()
        || element.is::<Separator>()
        || element.is::<GenericText>()
        || element.is::<PartName>()
}

fn measures_by_part(doc: &Document) -> bmml::Result<BTreeMap<String, Vec<Measure<'_>>>> {
    let mut parts: BTreeMap<String, Vec<Measure<'_>>> = BTreeMap::new();
    let Some(data) = doc.score().data() else {
        return Ok(parts);
    };

    for child in data.children() {
        if let Some(ts) = child.cast::<TimeSignature>() {
            println!("global ts {}", ts.values()?);
            continue;
        }
        let Some(part) = child.cast::<Part>() else {
            continue;
        };
        let id = part.id()?.as_str().to_string();
        let measures = parts.entry(id).or_default();

        let mut current = Measure::default();
        for element in part.children() {
            if let Some(inaccord) = element.cast::<Inaccord>() {
                current.open(inaccord.value()?);
            } else if element.is::<Barline>() {
                if !current.is_empty() {
                    measures.push(std::mem::take(&mut current));
                }
            } else if !is_layout_element(element) {
                current.push(element);
            }
        }
        if !current.is_empty() {
            measures.push(current);
        }
    }
    Ok(parts)
}

fn print_parts(doc: &Document) -> bmml::Result<()> {
    for (id, measures) in measures_by_part(doc)? {
        println!("{id}");
        for measure in &measures {
            println!("{measure}");
        }
    }
    Ok(())
}

fn main() -> bmml::Result<()> {
    let files: Vec<String> = std::env::args().skip(1).collect();
    if files.is_empty() {
        let doc = parse(include_str!("../fixtures/minuet.bmml"), "minuet")?;
        return print_parts(&doc);
    }

    for path in &files {
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("Unable to open '{path}': {e}");
                continue;
            }
        };
        let doc = parse_reader(file, path)?;
        print_parts(&doc)?;
    }
    Ok(())
}
