//! Fixed wiring tables for the supported rotor types and reflectors.
//!
//! Each rotor type is a permutation of the alphabet (given here in its
//! historical letter form) plus a turnover letter. The forward
//! (right-to-left) and inverse (left-to-right) lookup tables are built
//! from the wiring strings at compile time. All tables are immutable for
//! the process lifetime.

use crate::alphabet::Letter;
use serde::{Deserialize, Serialize};
use std::fmt;

const ROTOR_I_WIRING: &[u8; 26] = b"EKMFLGDQVZNTOWYHXUSPAIBRCJ";
const ROTOR_II_WIRING: &[u8; 26] = b"AJDKSIRUXBLHWTMCQGZNPYFVOE";
const ROTOR_III_WIRING: &[u8; 26] = b"BDFHJLCPRTXVZNYEIWGAKMUSQO";
const REFLECTOR_B_WIRING: &[u8; 26] = b"YRUHQSLDPXNGOKMIEBFZCWVJAT";

/// Turnover letters for rotors I, II, III.
const TURNOVERS: [u8; 3] = [b'Q' - b'A', b'E' - b'A', b'V' - b'A'];

const fn forward_table(wiring: &[u8; 26]) -> [u8; 26] {
    let mut table = [0u8; 26];
    let mut i = 0;
    while i < 26 {
        table[i] = wiring[i] - b'A';
        i += 1;
    }
    table
}

const fn inverse_table(wiring: &[u8; 26]) -> [u8; 26] {
    let mut table = [0u8; 26];
    let mut i = 0;
    while i < 26 {
        table[(wiring[i] - b'A') as usize] = i as u8;
        i += 1;
    }
    table
}

static FORWARD: [[u8; 26]; 3] = [
    forward_table(ROTOR_I_WIRING),
    forward_table(ROTOR_II_WIRING),
    forward_table(ROTOR_III_WIRING),
];

static INVERSE: [[u8; 26]; 3] = [
    inverse_table(ROTOR_I_WIRING),
    inverse_table(ROTOR_II_WIRING),
    inverse_table(ROTOR_III_WIRING),
];

static REFLECTOR_B: [u8; 26] = forward_table(REFLECTOR_B_WIRING);

/// Rotor types from the original Enigma I.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotorType {
    I,
    II,
    III,
}

impl RotorType {
    /// All supported rotor types, in selector-index order.
    pub const ALL: [RotorType; 3] = [RotorType::I, RotorType::II, RotorType::III];

    /// Create from the `SET_ROTORS` selector index.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(RotorType::I),
            1 => Some(RotorType::II),
            2 => Some(RotorType::III),
            _ => None,
        }
    }

    /// The `SET_ROTORS` selector index for this type.
    pub const fn index(self) -> u8 {
        match self {
            RotorType::I => 0,
            RotorType::II => 1,
            RotorType::III => 2,
        }
    }

    /// Create from the historical name ("I", "II", "III").
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "I" => Some(RotorType::I),
            "II" => Some(RotorType::II),
            "III" => Some(RotorType::III),
            _ => None,
        }
    }

    /// Right-to-left lookup table.
    pub(crate) fn forward(self) -> &'static [u8; 26] {
        &FORWARD[self.index() as usize]
    }

    /// Left-to-right (inverse) lookup table.
    pub(crate) fn inverse(self) -> &'static [u8; 26] {
        &INVERSE[self.index() as usize]
    }

    /// The position at which stepping past it carries into the next slot.
    pub fn turnover(self) -> Letter {
        Letter::from_raw(TURNOVERS[self.index() as usize])
    }
}

impl fmt::Display for RotorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotorType::I => write!(f, "I"),
            RotorType::II => write!(f, "II"),
            RotorType::III => write!(f, "III"),
        }
    }
}

/// Reflector selection. Only the B reflector wiring is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Reflector {
    #[default]
    B,
}

impl Reflector {
    /// Create from the historical name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "B" => Some(Reflector::B),
            _ => None,
        }
    }

    /// Stateless single-table lookup, no position or ring adjustment.
    #[inline]
    pub fn reflect(self, input: Letter) -> Letter {
        match self {
            Reflector::B => Letter::from_raw(REFLECTOR_B[input.index() as usize]),
        }
    }
}

impl fmt::Display for Reflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reflector::B => write!(f, "B"),
        }
    }
}
