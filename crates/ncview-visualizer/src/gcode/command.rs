//! G-Code command classification
//!
//! Turns the command word of a tokenized line into a closed set of variants
//! once, so downstream stages match on motion kinds instead of strings.

use ncview_core::MotionKind;
use std::fmt;

/// Classified command word of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    /// G0/G00, G1/G01, G2/G02, G3/G03
    Motion(MotionKind),
    /// No command word; the line continues the last motion mode
    ModalMotion,
    /// Anything else (M3, G4, G90, T1 ...). Produces no geometry.
    Other(String),
}

impl LineCommand {
    /// Classify an optional command word
    pub fn classify(word: Option<&str>) -> Self {
        let Some(word) = word else {
            return Self::ModalMotion;
        };
        match extract_gcode_num(word).and_then(MotionKind::from_gcode_number) {
            Some(kind) => Self::Motion(kind),
            None => Self::Other(word.to_string()),
        }
    }

    pub fn motion(&self) -> Option<MotionKind> {
        match self {
            Self::Motion(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for LineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Motion(kind) => write!(f, "{}", kind.gcode()),
            Self::ModalMotion => write!(f, "(modal)"),
            Self::Other(word) => write!(f, "{}", word),
        }
    }
}

/// Extract the G number from a word (e.g. "G01" -> Some(1), "g2" -> Some(2))
///
/// Only whole words of the form `G<digits>` match; `G1.5` and `G` do not.
pub fn extract_gcode_num(word: &str) -> Option<u32> {
    let mut chars = word.chars();
    if !matches!(chars.next(), Some('G' | 'g')) {
        return None;
    }
    let digits = chars.as_str();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok()
}
