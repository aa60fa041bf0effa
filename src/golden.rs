//! Golden software model.
//!
//! A direct, single-call implementation of the machine used as the
//! oracle for differential testing of the tick-driven core. It shares
//! the wiring constants but nothing else: rotors pre-rotate their wiring
//! by the ring setting at construction instead of offsetting per lookup,
//! and the stepping logic runs inline rather than through the command
//! channel. Agreement between the two formulations is itself part of
//! what the differential tests check.

use crate::alphabet::Letter;
use crate::keysheet::KeySheet;
use crate::machine::wiring::{Reflector, RotorType};
use serde::{Deserialize, Serialize};

/// One rotor of the golden model.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GoldenRotor {
    /// Right-to-left table with the ring setting folded in.
    right_to_left: [u8; 26],
    /// Left-to-right table with the ring setting folded in.
    left_to_right: [u8; 26],
    turnover: u8,
    ring_setting: u8,
    position: u8,
}

impl GoldenRotor {
    fn new(rotor_type: RotorType, start: Letter, ring_setting: Letter) -> Self {
        let base = rotor_type.forward();
        let ring = ring_setting.index() as usize;

        // Rotating the core against the contact ring once up front
        // replaces the per-lookup ring offset of the live machine.
        let mut right_to_left = [0u8; 26];
        for (i, entry) in right_to_left.iter_mut().enumerate() {
            *entry = base[(i + 26 - ring) % 26];
        }
        let mut left_to_right = [0u8; 26];
        for (i, &wired) in right_to_left.iter().enumerate() {
            left_to_right[wired as usize] = i as u8;
        }

        Self {
            right_to_left,
            left_to_right,
            turnover: rotor_type.turnover().index(),
            ring_setting: ring_setting.index(),
            position: start.index(),
        }
    }

    fn is_at_turnover(&self) -> bool {
        self.position == self.turnover
    }

    /// Advance one step; true if the step carries into the next rotor.
    fn step(&mut self) -> bool {
        let carry = self.is_at_turnover();
        self.position = (self.position + 1) % 26;
        carry
    }

    fn right_to_left(&self, right: u8) -> u8 {
        let contact = (right + self.position) % 26;
        let wired = self.right_to_left[contact as usize];
        (wired + self.ring_setting + 26 - self.position) % 26
    }

    fn left_to_right(&self, left: u8) -> u8 {
        let contact = (left + self.position + 26 - self.ring_setting) % 26;
        let wired = self.left_to_right[contact as usize];
        (wired + 26 - self.position) % 26
    }
}

/// The golden reference machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenMachine {
    rotors: [GoldenRotor; 3],
    reflector: Reflector,
    plugboard: [u8; 26],
    double_step: bool,
}

impl GoldenMachine {
    /// Build from `(rotor_type, start, ring_setting)` triples (slot 0,
    /// the rightmost wheel, first), a reflector, and a plug pair list.
    /// Each pair is installed in both directions.
    pub fn new(
        rotors: [(RotorType, Letter, Letter); 3],
        reflector: Reflector,
        plug_pairs: &[(Letter, Letter)],
    ) -> Self {
        let mut plugboard = [0u8; 26];
        for (i, entry) in plugboard.iter_mut().enumerate() {
            *entry = i as u8;
        }
        for &(a, b) in plug_pairs {
            plugboard[a.index() as usize] = b.index();
            plugboard[b.index() as usize] = a.index();
        }

        let [r0, r1, r2] = rotors;
        Self {
            rotors: [
                GoldenRotor::new(r0.0, r0.1, r0.2),
                GoldenRotor::new(r1.0, r1.1, r1.2),
                GoldenRotor::new(r2.0, r2.1, r2.2),
            ],
            reflector,
            plugboard,
            double_step: false,
        }
    }

    /// Build from a key sheet.
    pub fn from_key_sheet(sheet: &KeySheet) -> Self {
        Self::new(
            [
                (sheet.rotors[0], sheet.start_positions[0], sheet.ring_settings[0]),
                (sheet.rotors[1], sheet.start_positions[1], sheet.ring_settings[1]),
                (sheet.rotors[2], sheet.start_positions[2], sheet.ring_settings[2]),
            ],
            sheet.reflector,
            &sheet.plug_pairs,
        )
    }

    /// Current rotor positions, slot 0 first.
    pub fn positions(&self) -> [Letter; 3] {
        [
            Letter::from_raw(self.rotors[0].position),
            Letter::from_raw(self.rotors[1].position),
            Letter::from_raw(self.rotors[2].position),
        ]
    }

    /// Advance the rotors for one keystroke, double-stepping included.
    fn advance(&mut self) {
        let carry = self.rotors[0].step();
        if carry || self.double_step {
            self.rotors[1].step();
            if self.double_step {
                self.double_step = false;
                self.rotors[2].step();
            } else if self.rotors[1].is_at_turnover() {
                self.double_step = true;
            }
        }
    }

    /// One substitution at the current rotor state, with no stepping.
    pub fn transform(&self, letter: Letter) -> Letter {
        let mut signal = self.plugboard[letter.index() as usize];
        for rotor in &self.rotors {
            signal = rotor.right_to_left(signal);
        }
        signal = self.reflector.reflect(Letter::from_raw(signal)).index();
        for rotor in self.rotors.iter().rev() {
            signal = rotor.left_to_right(signal);
        }
        Letter::from_raw(self.plugboard[signal as usize])
    }

    /// Encipher one letter: step the rotors, then substitute.
    pub fn cipher(&mut self, letter: Letter) -> Letter {
        self.advance();
        self.transform(letter)
    }

    /// Encipher a message: uppercase, strip non-letters, `cipher` each
    /// remaining character.
    pub fn process_message(&mut self, text: &str) -> String {
        text.chars()
            .filter_map(|c| Letter::from_char(c).ok())
            .map(|l| self.cipher(l).to_char())
            .collect()
    }
}
