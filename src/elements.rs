//! The BMML element table.
//!
//! One zero-sized marker type per element, each implementing
//! [`ElementType`]. Markers carry a descriptor constant per declared
//! attribute, and `Element<'_, Marker>` gains a named getter for each.
//! The same table feeds [`ElementKind`] and the built-in
//! [`Catalog`](crate::Catalog).

use crate::attribute::{
    Accessor, OptionalBool, OptionalEnum, OptionalString, RequiredEnum, RequiredId, RequiredIdRef,
    RequiredString,
};
use crate::catalog::AttributeDecl;
use crate::content::Content;
use crate::element::{ChildrenOfType, Element, ElementMut};
use crate::enumerations::*;
use crate::error::{Error, Result};

/// A concrete element type.
pub trait ElementType: 'static {
    /// The tag name.
    const TAG: &'static str;
    /// The declared content category.
    const CONTENT: Content;
    /// The matching [`ElementKind`].
    const KIND: ElementKind;
}

macro_rules! bmml_elements {
    ($(
        $ty:ident($tag:literal, $content:ident) {
            $($CONST:ident $method:ident($attr:literal): $kind:ty),* $(,)?
        }
    )*) => {
        /// Concrete element kinds, plus a fallback for unknown tags.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ElementKind {
            $(
                #[doc = concat!("`<", $tag, ">`")]
                $ty,
            )*
            /// A tag the registry does not know.
            Generic,
        }

        impl ElementKind {
            /// The kind built for `tag`.
            pub fn from_tag(tag: &str) -> Self {
                match tag {
                    $($tag => ElementKind::$ty,)*
                    _ => ElementKind::Generic,
                }
            }

            /// The tag of a concrete kind, `None` for `Generic`.
            pub fn tag(self) -> Option<&'static str> {
                match self {
                    $(ElementKind::$ty => Some($tag),)*
                    ElementKind::Generic => None,
                }
            }
        }

        $(
            #[doc = concat!("The `<", $tag, ">` element.")]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $ty;

            impl ElementType for $ty {
                const TAG: &'static str = $tag;
                const CONTENT: Content = Content::$content;
                const KIND: ElementKind = ElementKind::$ty;
            }

            impl $ty {
                $(
                    #[doc = concat!("The `", $attr, "` attribute.")]
                    pub const $CONST: $kind = <$kind>::new($attr);
                )*
            }

            impl<'a> Element<'a, $ty> {
                $(
                    #[doc = concat!("Reads the `", $attr, "` attribute.")]
                    pub fn $method(&self) -> <$kind as Accessor>::Output<'a> {
                        self.get($ty::$CONST)
                    }
                )*
            }
        )*

        /// Tag, content category and attribute declarations of every element.
        pub(crate) fn declarations() -> Vec<(&'static str, Content, Vec<AttributeDecl>)> {
            vec![
                $(($tag, Content::$content, vec![$($ty::$CONST.declaration()),*]),)*
            ]
        }
    };
}

bmml_elements! {
    AbbrName("abbr_name", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): OptionalString,
    }
    Accidental("accidental", Simple) {
        ID id("id"): RequiredId,
        EDITORIAL editorial("editorial"): OptionalString,
        STEP step("step"): OptionalString,
        PLACEMENT placement("placement"): OptionalEnum<AboveBelow>,
        CANCEL cancel("cancel"): OptionalString,
        VALUE value("value"): RequiredString,
    }
    AccordionRegister("accordion_register", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    AccordionRow("accordion_row", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    Alteration("alteration", Simple) {}
    Alternation("alternation", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    AlternationRef("alternation_ref", Empty) {
        ID id("id"): RequiredIdRef,
        TYPE r#type("type"): RequiredEnum<StartStop>,
    }
    AppoggiaturaRef("appoggiatura_ref", Empty) {
        ID id("id"): RequiredIdRef,
    }
    Barline("barline", Complex) {
        ID id("id"): RequiredId,
        TYPE r#type("type"): OptionalEnum<LeftMiddleRight>,
    }
    BarlineType("barline_type", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    Barre("barre", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredEnum<FullHalfVertical>,
    }
    Bow("bow", Simple) {
        ID id("id"): RequiredId,
        DOUBLED doubled("doubled"): OptionalBool,
        VALUE value("value"): RequiredEnum<UpDown>,
    }
    Breath("breath", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredEnum<FullHalfCaesura>,
    }
    Chord("chord", Complex) {
        ID id("id"): RequiredId,
    }
    ChordData("chord_data", Complex) {}
    ChordPrefix("chord_prefix", Simple) {
        ID id("id"): RequiredId,
    }
    ChordType("chord_type", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): OptionalString,
        DOT dot("dot"): OptionalString,
        DURATION duration("duration"): OptionalString,
        BASS bass("bass"): OptionalString,
        NOTES notes("notes"): RequiredString,
        ROOT root("root"): RequiredString,
    }
    Clef("clef", Simple) {
        ID id("id"): RequiredId,
        CROSS_STAFF cross_staff("cross_staff"): OptionalBool,
        EIGHT eight("eight"): OptionalEnum<AboveBelow>,
        LINE line("line"): OptionalString,
        NAME name("name"): RequiredString,
    }
    Coda("coda", Simple) {
        ID id("id"): RequiredId,
    }
    Dot("dot", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    Duration("duration", Simple) {}
    Dynamic("dynamic", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    EditorialMark("editorial_mark", Simple) {
        ID id("id"): RequiredId,
    }
    Ending("ending", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    Family("family", Simple) {}
    Fermata("fermata", Simple) {
        ID id("id"): RequiredId,
        SHAPE shape("shape"): OptionalString,
    }
    Fingering("fingering", Simple) {
        ID id("id"): RequiredId,
        ALTERNATIVE alternative("alternative"): OptionalString,
        VALUE value("value"): OptionalString,
    }
    FootCrossing("foot_crossing", Simple) {
        ID id("id"): RequiredId,
    }
    GenericText("generic_text", Simple) {
        ID id("id"): RequiredId,
        LANG lang("lang"): OptionalString,
        VALUE value("value"): OptionalString,
        TYPE r#type("type"): OptionalString,
    }
    Hand("hand", Simple) {
        ID id("id"): RequiredId,
        CHORD_DIR chord_dir("chord_dir"): OptionalEnum<UpDown>,
        VALUE value("value"): RequiredEnum<LeftRight>,
    }
    Harmonic("harmonic", Simple) {
        ID id("id"): RequiredId,
        DOUBLED doubled("doubled"): OptionalBool,
        VALUE value("value"): RequiredEnum<NaturalArtificial>,
    }
    Inaccord("inaccord", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredEnum<InaccordKind>,
    }
    Interval("interval", Complex) {
        ID id("id"): RequiredId,
    }
    IntervalData("interval_data", Complex) {}
    IntervalRef("interval_ref", Complex) {
        ID id("id"): RequiredIdRef,
    }
    IntervalType("interval_type", Simple) {
        ID id("id"): RequiredId,
        DOUBLED doubled("doubled"): OptionalBool,
        VALUE value("value"): RequiredString,
    }
    Intervals("intervals", Complex) {}
    KeySignature("key_signature", Simple) {
        ID id("id"): RequiredId,
        CANCEL cancel("cancel"): OptionalString,
        VALUE value("value"): RequiredString,
    }
    LineOfContinuation("line_of_continuation", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredEnum<StartStop>,
    }
    Lyric("lyric", Complex) {
        ID id("id"): RequiredId,
        LANG lang("lang"): OptionalString,
    }
    LyricPrefix("lyric_prefix", Simple) {
        ID id("id"): RequiredId,
    }
    LyricRepeat("lyric_repeat", Complex) {
        ID id("id"): RequiredId,
    }
    LyricRepetition("lyric_repetition", Simple) {
        ID id("id"): RequiredId,
        DOUBLED doubled("doubled"): OptionalBool,
    }
    Lyrics("lyrics", Complex) {}
    MergedText("merged_text", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    MetaData("meta_data", Mixed) {}
    Metronome("metronome", Complex) {
        ID id("id"): RequiredId,
    }
    MetronomeEqual("metronome_equal", Simple) {
        ID id("id"): RequiredId,
    }
    MetronomeNoteType("metronome_note_type", Simple) {
        ID id("id"): RequiredId,
        DOT dot("dot"): OptionalBool,
        VALUE value("value"): RequiredEnum<AmbiguousValue>,
    }
    MetronomeValue("metronome_value", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    MidiInstrument("midi_instrument", Empty) {
        VALUE value("value"): RequiredString,
    }
    MidiMetronome("midi_metronome", Empty) {
        VALUE value("value"): RequiredString,
    }
    Multimeasure("multimeasure", Simple) {}
    MusicHyphen("music_hyphen", Simple) {
        ID id("id"): RequiredId,
    }
    Name("name", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): OptionalString,
    }
    Newline("newline", Simple) {
        ID id("id"): RequiredId,
    }
    Note("note", Complex) {
        ID id("id"): RequiredId,
    }
    NoteData("note_data", Complex) {}
    NoteRef("note_ref", Empty) {
        ID id("id"): RequiredIdRef,
    }
    NoteType("note_type", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredEnum<AmbiguousValue>,
        NAME name("name"): RequiredEnum<DiatonicStep>,
    }
    Nuance("nuance", Simple) {
        ID id("id"): RequiredId,
        DOUBLED doubled("doubled"): OptionalBool,
        VALUE value("value"): RequiredString,
    }
    NuanceRef("nuance_ref", Empty) {
        ID id("id"): RequiredIdRef,
    }
    Nuances("nuances", Complex) {}
    Number("number", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    Octave("octave", Simple) {
        ID id("id"): RequiredId,
        POSITION position("position"): OptionalString,
        VALUE value("value"): RequiredString,
    }
    OrganPedal("organ_pedal", Simple) {
        ID id("id"): RequiredId,
        SUBSTITUTION substitution("substitution"): OptionalEnum<OrganPedalKind>,
        VALUE value("value"): RequiredEnum<OrganPedalKind>,
    }
    Ornament("ornament", Complex) {
        ID id("id"): RequiredId,
    }
    OrnamentType("ornament_type", Simple) {
        ID id("id"): RequiredId,
        DOUBLED doubled("doubled"): OptionalBool,
        VALUE value("value"): RequiredString,
    }
    Part("part", Complex) {
        ID id("id"): RequiredId,
    }
    PartData("part_data", Complex) {
        ID id("id"): RequiredId,
        TRANSPOSE transpose("transpose"): OptionalString,
        LANG lang("lang"): OptionalString,
        CHORD_DIR chord_dir("chord_dir"): OptionalEnum<UpDown>,
    }
    PartList("part_list", Complex) {}
    PartName("part_name", Simple) {
        ID id("id"): RequiredId,
    }
    Pedal("pedal", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    Pitch("pitch", Simple) {}
    Pizzicato("pizzicato", Simple) {
        ID id("id"): RequiredId,
        DOUBLED doubled("doubled"): OptionalBool,
        VALUE value("value"): RequiredEnum<LeftRight>,
    }
    Rasgueado("rasgueado", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredEnum<UpDown>,
    }
    Repeat("repeat", Complex) {
        ID id("id"): RequiredId,
    }
    RepeatData("repeat_data", Complex) {}
    RepeatRef("repeat_ref", Complex) {
        ID id("id"): RequiredIdRef,
    }
    Repeats("repeats", Complex) {}
    Repetition("repetition", Simple) {
        ID id("id"): RequiredId,
        SEPARATION separation("separation"): OptionalString,
        VALUE value("value"): RequiredString,
    }
    Rest("rest", Complex) {
        ID id("id"): RequiredId,
    }
    RestData("rest_data", Complex) {}
    RestType("rest_type", Simple) {
        ID id("id"): RequiredId,
        MULTIMEASURE multimeasure("multimeasure"): OptionalString,
        VALUE value("value"): RequiredEnum<AmbiguousValue>,
    }
    RhythmicGroup("rhythmic_group", Simple) {}
    RightStringFingering("right_string_fingering", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    Score("score", Complex) {
        VERSION version("version"): RequiredString,
    }
    ScoreData("score_data", Complex) {}
    ScoreHeader("score_header", Complex) {}
    Segno("segno", Simple) {
        ID id("id"): RequiredId,
    }
    Separator("separator", Simple) {
        ID id("id"): RequiredId,
    }
    ShiftLine("shift_line", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredEnum<GlissandoStartStop>,
    }
    Slur("slur", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    SlurRef("slur_ref", Empty) {
        ID id("id"): RequiredIdRef,
        START_REF start_ref("start_ref"): RequiredIdRef,
        TYPE r#type("type"): RequiredEnum<StartStopContinue>,
    }
    Slurs("slurs", Complex) {}
    Space("space", Simple) {
        ID id("id"): RequiredId,
    }
    Stem("stem", Complex) {
        ID id("id"): RequiredId,
    }
    StemData("stem_data", Complex) {}
    StemType("stem_type", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    InstrumentString("string", Simple) {
        ID id("id"): RequiredId,
        DOUBLED doubled("doubled"): OptionalBool,
        VALUE value("value"): RequiredString,
    }
    StringFingering("string_fingering", Simple) {
        ID id("id"): RequiredId,
        LINE_OF_CONTINUATION line_of_continuation("line_of_continuation"): OptionalEnum<StartStop>,
        VALUE value("value"): RequiredString,
    }
    StringPosition("string_position", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    Stroke("stroke", Simple) {
        ID id("id"): RequiredId,
        DOUBLED doubled("doubled"): OptionalBool,
        VALUE value("value"): RequiredEnum<UpDown>,
    }
    SyllabicMute("syllabic_mute", Simple) {
        ID id("id"): RequiredId,
        DOUBLED doubled("doubled"): OptionalBool,
    }
    SyllabicParenthesis("syllabic_parenthesis", Simple) {
        ID id("id"): RequiredId,
    }
    SyllabicSlur("syllabic_slur", Simple) {
        ID id("id"): RequiredId,
        VERSES verses("verses"): OptionalString,
        VALUE value("value"): RequiredString,
    }
    SyllabicText("syllabic_text", Simple) {
        ID id("id"): RequiredId,
        LANG lang("lang"): OptionalString,
        VALUE value("value"): OptionalString,
    }
    Syllable("syllable", Complex) {
        ID id("id"): RequiredId,
    }
    SyllableMute("syllable_mute", Complex) {
        ID id("id"): RequiredId,
    }
    SyllableRef("syllable_ref", Empty) {
        ID id("id"): RequiredIdRef,
    }
    Tie("tie", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredString,
    }
    TieRef("tie_ref", Empty) {
        ID id("id"): RequiredIdRef,
        START_REF start_ref("start_ref"): RequiredIdRef,
        TYPE r#type("type"): RequiredEnum<StartStop>,
    }
    Ties("ties", Complex) {}
    TimeSignature("time_signature", Simple) {
        ID id("id"): RequiredId,
        SINGLE_NUMBER single_number("single_number"): OptionalBool,
        FIGURE figure("figure"): OptionalBool,
        VALUES values("values"): RequiredString,
    }
    Tremolo("tremolo", Simple) {
        ID id("id"): RequiredId,
        DOUBLED doubled("doubled"): OptionalBool,
        VALUE value("value"): RequiredString,
    }
    TremoloRef("tremolo_ref", Empty) {
        ID id("id"): RequiredIdRef,
    }
    Tuplet("tuplet", Simple) {
        ID id("id"): RequiredId,
        DOUBLED doubled("doubled"): OptionalBool,
        VALUE value("value"): RequiredString,
    }
    TupletRef("tuplet_ref", Empty) {
        ID id("id"): RequiredIdRef,
        TYPE r#type("type"): RequiredEnum<StartStopContinue>,
        NOTES notes("notes"): RequiredString,
    }
    Tuplets("tuplets", Complex) {}
    Unknown("unknown", Simple) {
        ID id("id"): RequiredId,
    }
    ValuePrefix("value_prefix", Simple) {
        ID id("id"): RequiredId,
        VALUE value("value"): RequiredEnum<ValuePrefixKind>,
    }
}

impl<'a> Element<'a, Score> {
    /// The `score_header` child.
    pub fn header(&self) -> Option<Element<'a, ScoreHeader>> {
        self.find_element()
    }

    /// The `score_data` child.
    pub fn data(&self) -> Option<Element<'a, ScoreData>> {
        self.find_element()
    }
}

impl<'a> Element<'a, Ornament> {
    /// The `accidental` children.
    pub fn accidentals(&self) -> ChildrenOfType<'a, Accidental> {
        self.find_elements()
    }

    /// The `ornament_type` child.
    pub fn ornament_type(&self) -> Option<Element<'a, OrnamentType>> {
        self.find_element()
    }
}

fn parse_integer(tag: &str, text: &str) -> Result<i32> {
    text.parse()
        .map_err(|_| Error::invalid_value(format!("<{}> holds '{}', not an integer", tag, text)))
}

macro_rules! integer_text {
    ($($ty:ident),*) => {
        $(
            impl<'a> Element<'a, $ty> {
                /// The text content as an integer.
                pub fn value(&self) -> Result<i32> {
                    parse_integer($ty::TAG, self.text())
                }
            }

            impl<'a> ElementMut<'a, $ty> {
                /// Stores an integer as the text content.
                pub fn set_value(&mut self, value: i32) {
                    let mut buffer = itoa::Buffer::new();
                    self.set_text(buffer.format(value));
                }
            }
        )*
    };
}

integer_text!(Alteration, Duration, Pitch);
