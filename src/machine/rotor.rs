//! Rotor bank: per-slot rotation state and wiring traversal.
//!
//! The bank holds three independent rotor slots (slot 0 is the fastest,
//! rightmost wheel) plus the reflector. Traversal is a pure function of
//! the current slot state; mutation happens only through the explicit
//! load/increment operations driven by the sequencer.

use crate::alphabet::{add26, sub26, Letter};
use crate::machine::wiring::{Reflector, RotorType};
use serde::{Deserialize, Serialize};

/// Number of rotor slots in the machine.
pub const SLOT_COUNT: usize = 3;

/// Default rotor assignment after reset, slot 0 (rightmost) first.
const DEFAULT_TYPES: [RotorType; SLOT_COUNT] = [RotorType::I, RotorType::II, RotorType::III];

/// State of one rotor slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotorSlot {
    /// Current rotation, advanced by [`RotorBank::increment`].
    pub position: Letter,
    /// Fixed offset between the wiring core and the visible dial.
    pub ring_setting: Letter,
    /// Which wiring/turnover table this slot uses.
    pub rotor_type: RotorType,
}

impl RotorSlot {
    fn new(rotor_type: RotorType) -> Self {
        Self {
            position: Letter::A,
            ring_setting: Letter::A,
            rotor_type,
        }
    }

    /// Net displacement of the wiring core: position minus ring setting.
    ///
    /// The wiring pattern is fixed to the rotor core while the ring
    /// setting shifts that core relative to the contact ring, so one
    /// combined offset models both displacements. It is added on entry
    /// and subtracted on exit, which keeps the two traversal directions
    /// mutually inverse.
    #[inline]
    fn combined_offset(&self) -> u8 {
        sub26(self.position.index(), self.ring_setting.index())
    }
}

/// The three rotor slots and the reflector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotorBank {
    slots: [RotorSlot; SLOT_COUNT],
    reflector: Reflector,
}

impl RotorBank {
    /// Create a bank in the reset configuration: rotors I, II, III in
    /// slots 0, 1, 2, all positions and ring settings at 'A'.
    pub fn new() -> Self {
        Self {
            slots: [
                RotorSlot::new(DEFAULT_TYPES[0]),
                RotorSlot::new(DEFAULT_TYPES[1]),
                RotorSlot::new(DEFAULT_TYPES[2]),
            ],
            reflector: Reflector::B,
        }
    }

    /// Restore the reset configuration.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Read one slot's state.
    ///
    /// # Panics
    /// Panics if `s` is not a valid slot index.
    #[inline]
    pub fn slot(&self, s: usize) -> &RotorSlot {
        assert!(s < SLOT_COUNT, "rotor slot {} out of range (0-2)", s);
        &self.slots[s]
    }

    /// All three positions, slot 0 first.
    pub fn positions(&self) -> [Letter; SLOT_COUNT] {
        [
            self.slots[0].position,
            self.slots[1].position,
            self.slots[2].position,
        ]
    }

    /// The installed reflector.
    pub fn reflector(&self) -> Reflector {
        self.reflector
    }

    /// True iff slot `s` sits at the turnover letter of its rotor type.
    pub fn turnover(&self, s: usize) -> bool {
        let slot = self.slot(s);
        slot.position == slot.rotor_type.turnover()
    }

    /// Advance slot `s` by one position, wrapping Z back to A.
    pub fn increment(&mut self, s: usize) {
        let position = self.slot(s).position;
        self.slots[s].position = Letter::from_raw(add26(position.index(), 1));
    }

    /// Overwrite slot `s`'s start position.
    pub fn load_start(&mut self, s: usize, value: Letter) {
        assert!(s < SLOT_COUNT, "rotor slot {} out of range (0-2)", s);
        self.slots[s].position = value;
    }

    /// Overwrite slot `s`'s ring setting.
    pub fn load_ring(&mut self, s: usize, value: Letter) {
        assert!(s < SLOT_COUNT, "rotor slot {} out of range (0-2)", s);
        self.slots[s].ring_setting = value;
    }

    /// Select which rotor type slot `s` uses.
    pub fn load_type(&mut self, s: usize, rotor_type: RotorType) {
        assert!(s < SLOT_COUNT, "rotor slot {} out of range (0-2)", s);
        self.slots[s].rotor_type = rotor_type;
    }

    /// One substitution through slot `s`, entry side to reflector side.
    pub fn traverse_right_to_left(&self, s: usize, input: Letter) -> Letter {
        let slot = self.slot(s);
        let combined = slot.combined_offset();
        let contact = add26(input.index(), combined);
        let wired = slot.rotor_type.forward()[contact as usize];
        Letter::from_raw(sub26(wired, combined))
    }

    /// One substitution through slot `s`, reflector side back to entry side.
    pub fn traverse_left_to_right(&self, s: usize, input: Letter) -> Letter {
        let slot = self.slot(s);
        let combined = slot.combined_offset();
        let contact = add26(input.index(), combined);
        let wired = slot.rotor_type.inverse()[contact as usize];
        Letter::from_raw(sub26(wired, combined))
    }

    /// Pass the signal through the reflector.
    #[inline]
    pub fn reflect(&self, input: Letter) -> Letter {
        self.reflector.reflect(input)
    }
}

impl Default for RotorBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    #[test]
    fn test_reset_configuration() {
        let bank = RotorBank::new();
        assert_eq!(bank.slot(0).rotor_type, RotorType::I);
        assert_eq!(bank.slot(1).rotor_type, RotorType::II);
        assert_eq!(bank.slot(2).rotor_type, RotorType::III);
        assert_eq!(bank.positions(), [Letter::A; 3]);
    }

    #[test]
    fn test_increment_wraps() {
        let mut bank = RotorBank::new();
        bank.load_start(0, letter('Z'));
        bank.increment(0);
        assert_eq!(bank.slot(0).position, Letter::A);
    }

    #[test]
    fn test_turnover_tracks_rotor_type() {
        let mut bank = RotorBank::new();
        bank.load_start(0, letter('Q'));
        assert!(bank.turnover(0));
        bank.increment(0);
        assert!(!bank.turnover(0));

        // Same position, different rotor type, different turnover letter.
        bank.load_start(1, letter('Q'));
        assert!(!bank.turnover(1));
        bank.load_ring(1, letter('E'));
        // Ring setting does not shift the turnover point.
        assert!(!bank.turnover(1));
        bank.load_start(1, letter('E'));
        assert!(bank.turnover(1));
    }

    #[test]
    fn test_traversal_at_rest_follows_wiring() {
        let bank = RotorBank::new();
        // Slot 0 is rotor I at position A, ring 0: A enters contact 0 and
        // exits on the wiring table value.
        assert_eq!(bank.traverse_right_to_left(0, Letter::A), letter('E'));
        assert_eq!(bank.traverse_left_to_right(0, letter('E')), Letter::A);
    }

    #[test]
    fn test_traversal_with_rotation() {
        let mut bank = RotorBank::new();
        bank.load_start(0, letter('B'));
        // Rotor I advanced one step: contact = A+1 = B, wiring[B] = K,
        // exit = K - 1 = J.
        assert_eq!(bank.traverse_right_to_left(0, Letter::A), letter('J'));
    }

    #[test]
    fn test_ring_setting_cancels_rotation() {
        let mut bank = RotorBank::new();
        bank.load_start(0, letter('B'));
        bank.load_ring(0, letter('B'));
        // Equal position and ring setting leave the core at rest.
        assert_eq!(bank.traverse_right_to_left(0, Letter::A), letter('E'));
    }

    #[test]
    fn test_directions_are_mutually_inverse() {
        let mut bank = RotorBank::new();
        bank.load_start(0, letter('R'));
        bank.load_ring(0, letter('F'));
        bank.load_start(1, letter('X'));
        bank.load_ring(1, letter('C'));
        for s in 0..SLOT_COUNT {
            for input in Letter::all() {
                let out = bank.traverse_right_to_left(s, input);
                assert_eq!(
                    bank.traverse_left_to_right(s, out),
                    input,
                    "slot {} input {}",
                    s,
                    input
                );
            }
        }
    }

    #[test]
    fn test_traversal_is_a_permutation() {
        let mut bank = RotorBank::new();
        bank.load_start(2, letter('M'));
        bank.load_ring(2, letter('K'));
        let mut seen = [false; 26];
        for input in Letter::all() {
            let out = bank.traverse_right_to_left(2, input);
            assert!(!seen[out.index() as usize]);
            seen[out.index() as usize] = true;
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_bad_slot_panics() {
        let bank = RotorBank::new();
        bank.slot(3);
    }
}
