//! Key sheets: on-disk machine configuration.
//!
//! A key sheet is the daily setting list for one machine: rotor order,
//! start positions, ring settings, plugboard pairs, and the reflector.
//! Sheets are stored as JSON; letters serialize as single characters and
//! rotor types by their historical names, so a sheet stays hand-editable.

use crate::alphabet::Letter;
use crate::machine::rotor::SLOT_COUNT;
use crate::machine::wiring::{Reflector, RotorType};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Most plug pairs a 26-letter board can hold.
pub const MAX_PLUG_PAIRS: usize = 13;

/// One machine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySheet {
    /// Rotor type per slot, slot 0 (rightmost, fastest) first.
    pub rotors: [RotorType; SLOT_COUNT],
    /// Start position per slot.
    pub start_positions: [Letter; SLOT_COUNT],
    /// Ring setting per slot.
    pub ring_settings: [Letter; SLOT_COUNT],
    /// Plugboard pairs; each pair is programmed in both directions.
    pub plug_pairs: Vec<(Letter, Letter)>,
    /// Reflector selection.
    pub reflector: Reflector,
}

impl KeySheet {
    /// Check the sheet for semantic errors: self-paired plugs, a letter
    /// used by two plugs, or more pairs than the board has sockets.
    pub fn validate(&self) -> Result<(), KeySheetError> {
        if self.plug_pairs.len() > MAX_PLUG_PAIRS {
            return Err(KeySheetError::TooManyPairs(self.plug_pairs.len()));
        }

        let mut used = [false; 26];
        for &(a, b) in &self.plug_pairs {
            if a == b {
                return Err(KeySheetError::SelfPair(a));
            }
            for end in [a, b] {
                if used[end.index() as usize] {
                    return Err(KeySheetError::DuplicateEnd(end));
                }
                used[end.index() as usize] = true;
            }
        }

        Ok(())
    }
}

impl Default for KeySheet {
    /// The reset configuration: rotors I, II, III, everything at 'A',
    /// no plugs, reflector B.
    fn default() -> Self {
        Self {
            rotors: [RotorType::I, RotorType::II, RotorType::III],
            start_positions: [Letter::A; SLOT_COUNT],
            ring_settings: [Letter::A; SLOT_COUNT],
            plug_pairs: Vec::new(),
            reflector: Reflector::B,
        }
    }
}

/// Load a key sheet from a JSON file.
pub fn load_key_sheet<P: AsRef<Path>>(path: P) -> Result<KeySheet, KeySheetError> {
    let contents = std::fs::read_to_string(path.as_ref())
        .map_err(|e| KeySheetError::IoError(e.to_string()))?;
    let sheet: KeySheet =
        serde_json::from_str(&contents).map_err(|e| KeySheetError::ParseError(e.to_string()))?;
    sheet.validate()?;
    Ok(sheet)
}

/// Save a key sheet to a JSON file.
pub fn save_key_sheet<P: AsRef<Path>>(path: P, sheet: &KeySheet) -> Result<(), KeySheetError> {
    sheet.validate()?;
    let contents = serde_json::to_string_pretty(sheet)
        .map_err(|e| KeySheetError::ParseError(e.to_string()))?;
    std::fs::write(path.as_ref(), contents).map_err(|e| KeySheetError::IoError(e.to_string()))
}

/// Errors from loading, saving, or validating a key sheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeySheetError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("too many plug pairs: {0} (max 13)")]
    TooManyPairs(usize),

    #[error("plug pair connects {0} to itself")]
    SelfPair(Letter),

    #[error("letter {0} used by more than one plug pair")]
    DuplicateEnd(Letter),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    #[test]
    fn test_default_is_valid() {
        assert_eq!(KeySheet::default().validate(), Ok(()));
    }

    #[test]
    fn test_json_roundtrip() {
        let sheet = KeySheet {
            rotors: [RotorType::III, RotorType::I, RotorType::II],
            start_positions: [letter('W'), letter('X'), letter('C')],
            ring_settings: [letter('B'), Letter::A, letter('F')],
            plug_pairs: vec![(letter('A'), letter('N')), (letter('Q'), letter('Z'))],
            reflector: Reflector::B,
        };
        let json = serde_json::to_string(&sheet).unwrap();
        let back: KeySheet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sheet);
    }

    #[test]
    fn test_letters_serialize_as_characters() {
        let json = serde_json::to_string(&KeySheet::default()).unwrap();
        assert!(json.contains("\"A\""), "{}", json);
        assert!(json.contains("\"III\""), "{}", json);
    }

    #[test]
    fn test_self_pair_rejected() {
        let sheet = KeySheet {
            plug_pairs: vec![(letter('A'), letter('A'))],
            ..KeySheet::default()
        };
        assert_eq!(sheet.validate(), Err(KeySheetError::SelfPair(letter('A'))));
    }

    #[test]
    fn test_duplicate_end_rejected() {
        let sheet = KeySheet {
            plug_pairs: vec![(letter('A'), letter('N')), (letter('N'), letter('Q'))],
            ..KeySheet::default()
        };
        assert_eq!(
            sheet.validate(),
            Err(KeySheetError::DuplicateEnd(letter('N')))
        );
    }

    #[test]
    fn test_too_many_pairs_rejected() {
        let pairs: Vec<(Letter, Letter)> = (0..28)
            .step_by(2)
            .map(|i| (Letter::from_raw(i % 26), Letter::from_raw((i + 1) % 26)))
            .collect();
        let sheet = KeySheet {
            plug_pairs: pairs,
            ..KeySheet::default()
        };
        assert_eq!(sheet.validate(), Err(KeySheetError::TooManyPairs(14)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = serde_json::from_str::<KeySheet>("{\"rotors\": [\"IX\"]}");
        assert!(err.is_err());
    }
}
