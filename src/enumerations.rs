//! Closed sets of legal attribute tokens.
//!
//! Every enumeration maps each variant to exactly one token and back. Tokens
//! are matched case-sensitively in declaration order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A closed set of attribute tokens.
pub trait Enumeration: Copy + PartialEq + fmt::Debug + 'static {
    /// Name of the legal-value set, as in the catalog.
    const NAME: &'static str;

    /// All variants in declaration order.
    const VARIANTS: &'static [Self];

    /// The exact token for this variant.
    fn token(self) -> &'static str;

    /// Finds the first variant whose token equals `token`.
    fn from_token(token: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.token() == token)
    }

    /// All tokens in declaration order.
    fn tokens() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|v| v.token()).collect()
    }
}

macro_rules! bmml_enumerations {
    ($(
        $(#[$meta:meta])*
        $name:ident($set:literal) {
            $($variant:ident = $token:literal),+ $(,)?
        }
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
            pub enum $name {
                $(
                    #[allow(missing_docs)]
                    #[serde(rename = $token)]
                    $variant,
                )+
            }

            impl Enumeration for $name {
                const NAME: &'static str = $set;
                const VARIANTS: &'static [Self] = &[$($name::$variant),+];

                fn token(self) -> &'static str {
                    match self {
                        $($name::$variant => $token,)+
                    }
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.token())
                }
            }

            impl FromStr for $name {
                type Err = Error;

                fn from_str(s: &str) -> Result<Self> {
                    Self::from_token(s).ok_or_else(|| {
                        Error::invalid_value(format!("'{}' is not a {} token", s, $set))
                    })
                }
            }
        )*
    };
}

bmml_enumerations! {
    /// Kind of an in-accord division.
    InaccordKind("inaccord_t") {
        Full = "full",
        Part = "part",
        Division = "division",
    }

    /// Organ pedalling: toe or heel of either foot.
    OrganPedalKind("organ_pedal_t") {
        LeftToe = "left_toe",
        LeftHeel = "left_heel",
        RightToe = "right_toe",
        RightHeel = "right_heel",
    }

    /// Breath mark kind.
    FullHalfCaesura("full_half_caesura") {
        Full = "full",
        Half = "half",
        Caesura = "caesura",
    }

    /// Barre kind.
    FullHalfVertical("full_half_vertical") {
        Full = "full",
        Half = "half",
        Vertical = "vertical",
    }

    /// Glissando or slide boundary.
    GlissandoStartStop("glissando_start_stop") {
        Glissando = "glissando",
        Start = "start",
        Stop = "stop",
    }

    /// Harmonic kind.
    NaturalArtificial("natural_artificial") {
        Natural = "natural",
        Artificial = "artificial",
    }

    /// Direction of a bow, stem or arpeggio.
    UpDown("up_down") {
        Up = "up",
        Down = "down",
    }

    /// Placement relative to the staff or note.
    AboveBelow("above_below") {
        Above = "above",
        Below = "below",
    }

    /// A braille note value, which is ambiguous between two durations.
    AmbiguousValue("ambiguous_value") {
        EighthOr128th = "8th_or_128th",
        QuarterOr64th = "quarter_or_64th",
        HalfOr32nd = "half_or_32nd",
        WholeOr16th = "whole_or_16th",
        Brevis = "brevis",
        Longa = "longa",
    }

    /// Diatonic pitch step.
    DiatonicStep("diatonic_step") {
        A = "A",
        B = "B",
        C = "C",
        D = "D",
        E = "E",
        F = "F",
        G = "G",
    }

    /// Boundary of a spanner.
    StartStop("start_stop") {
        Start = "start",
        Stop = "stop",
    }

    /// Boundary of a spanner that may continue.
    StartStopContinue("start_stop_continue") {
        Start = "start",
        Stop = "stop",
        Continue = "continue",
    }

    /// Hand or side.
    LeftRight("left_right") {
        Left = "left",
        Right = "right",
    }

    /// Position of a barline within the measure.
    LeftMiddleRight("left_middle_right") {
        Left = "left",
        Middle = "middle",
        Right = "right",
    }

    /// Value prefix sign distinguishing large from small note values.
    ValuePrefixKind("value_prefix_t") {
        Separator = "separator",
        Large = "large",
        Small = "small",
        TwoHundredFiftySixth = "256th",
    }
}
