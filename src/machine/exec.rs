//! Top-level machine wiring.
//!
//! [`Machine`] owns the rotor bank, the plugboard, and the sequencer,
//! and feeds the sequencer one command per tick. On top of the raw tick
//! interface it offers the collapsed synchronous calls an application
//! wants: `encipher` one letter, `process_message`, and `configure` from
//! a key sheet. All of them drive the same command channel the hardware
//! exposed.

use crate::alphabet::Letter;
use crate::keysheet::{KeySheet, KeySheetError};
use crate::machine::command::{Command, CommandError};
use crate::machine::plugboard::Plugboard;
use crate::machine::rotor::RotorBank;
use crate::machine::sequencer::{Sequencer, TickStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The complete machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Rotor slots and reflector.
    pub rotors: RotorBank,
    /// The plugboard.
    pub plugboard: Plugboard,
    /// The control sequencer.
    pub sequencer: Sequencer,
    /// Tick count since construction (for profiling and the TUI).
    pub ticks: u64,
}

impl Machine {
    /// Create a machine in the reset configuration.
    pub fn new() -> Self {
        Self {
            rotors: RotorBank::new(),
            plugboard: Plugboard::new(),
            sequencer: Sequencer::new(),
            ticks: 0,
        }
    }

    /// Execute one tick with a decoded command.
    pub fn tick(&mut self, cmd: Command) -> TickStatus {
        self.ticks += 1;
        self.sequencer
            .tick(cmd, &mut self.rotors, &mut self.plugboard)
    }

    /// Execute one tick with a raw command byte.
    pub fn tick_raw(&mut self, byte: u8) -> Result<TickStatus, CommandError> {
        Ok(self.tick(Command::decode(byte)?))
    }

    /// Issue one command and run the sequencer back to idle.
    pub fn issue(&mut self, cmd: Command) -> TickStatus {
        let mut status = self.tick(cmd);
        while !self.sequencer.is_idle() {
            let next = self.tick(Command::Nop);
            status.result_ready |= next.result_ready;
        }
        status
    }

    /// Reset everything: positions, ring settings, rotor types,
    /// plugboard, double-step flag, held output.
    pub fn reset(&mut self) {
        self.tick(Command::Reset);
    }

    /// The held output letter, stable until the next encipherment
    /// completes ('A' after reset).
    pub fn output(&self) -> Letter {
        self.sequencer.output()
    }

    /// Encipher one letter.
    ///
    /// Collapses the multi-tick protocol into a single call: issues
    /// `ENCRYPT` and ticks until the result settles (at most 12 ticks).
    pub fn encipher(&mut self, letter: Letter) -> Letter {
        self.issue(Command::Encrypt(letter));
        self.output()
    }

    /// Encipher a message: uppercase, strip non-letters, encipher each
    /// remaining character.
    pub fn process_message(&mut self, text: &str) -> String {
        text.chars()
            .filter_map(|c| Letter::from_char(c).ok())
            .map(|l| self.encipher(l).to_char())
            .collect()
    }

    /// Drive a full key-sheet configuration through the command channel:
    /// reset, rotor types, start positions, ring settings, then each
    /// plug pair in both directions.
    pub fn configure(&mut self, sheet: &KeySheet) -> Result<(), MachineError> {
        sheet.validate()?;

        self.issue(Command::Reset);
        for &rotor_type in &sheet.rotors {
            self.issue(Command::SetRotors(rotor_type));
        }
        for &start in &sheet.start_positions {
            self.issue(Command::LoadStart(start));
        }
        for &ring in &sheet.ring_settings {
            self.issue(Command::LoadRing(ring));
        }
        for &(a, b) in &sheet.plug_pairs {
            self.issue(Command::LoadPlugAddr(a));
            self.issue(Command::LoadPlugData(b));
            self.issue(Command::LoadPlugAddr(b));
            self.issue(Command::LoadPlugData(a));
        }

        Ok(())
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors surfaced by the machine's configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("invalid command: {0}")]
    Command(#[from] CommandError),

    #[error("invalid key sheet: {0}")]
    KeySheet(#[from] KeySheetError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::golden::GoldenMachine;
    use crate::machine::wiring::{Reflector, RotorType};
    use proptest::prelude::*;

    fn letter(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    fn sheet(
        rotors: [RotorType; 3],
        starts: &str,
        rings: &str,
        plugs: &[(char, char)],
    ) -> KeySheet {
        let mut s = [Letter::A; 3];
        let mut r = [Letter::A; 3];
        for (i, c) in starts.chars().enumerate() {
            s[i] = letter(c);
        }
        for (i, c) in rings.chars().enumerate() {
            r[i] = letter(c);
        }
        KeySheet {
            rotors,
            start_positions: s,
            ring_settings: r,
            plug_pairs: plugs.iter().map(|&(a, b)| (letter(a), letter(b))).collect(),
            reflector: Reflector::B,
        }
    }

    #[test]
    fn test_default_machine_enciphers_a_to_f() {
        // Rotors I, II, III in slots 0..2, all at 'A', rings 0, no plugs.
        let mut machine = Machine::new();
        assert_eq!(machine.encipher(Letter::A), letter('F'));
    }

    #[test]
    fn test_standard_wheel_order_reference() {
        // Wheel order I/II/III left to right means slot 0 = III. This is
        // the textbook Enigma I setup, and typing AAAAA gives BDZGO.
        let mut machine = Machine::new();
        machine
            .configure(&sheet(
                [RotorType::III, RotorType::II, RotorType::I],
                "AAA",
                "AAA",
                &[],
            ))
            .unwrap();
        assert_eq!(machine.process_message("AAAAA"), "BDZGO");
    }

    #[test]
    fn test_encipherment_is_self_inverse() {
        let config = sheet(
            [RotorType::II, RotorType::III, RotorType::I],
            "KWQ",
            "BAC",
            &[('A', 'N'), ('G', 'T')],
        );
        let mut forward = Machine::new();
        forward.configure(&config).unwrap();
        let ciphertext = forward.process_message("THEQUICKBROWNFOX");

        let mut backward = Machine::new();
        backward.configure(&config).unwrap();
        assert_eq!(backward.process_message(&ciphertext), "THEQUICKBROWNFOX");
    }

    #[test]
    fn test_no_letter_enciphers_to_itself() {
        let mut machine = Machine::new();
        machine
            .configure(&sheet(
                [RotorType::I, RotorType::III, RotorType::II],
                "PZM",
                "ACQ",
                &[('B', 'Y')],
            ))
            .unwrap();
        // Sweep the alphabet from each of 60 successive machine states.
        for _ in 0..60 {
            for input in Letter::all() {
                let mut probe = machine.clone();
                assert_ne!(probe.encipher(input), input);
            }
            machine.encipher(Letter::A);
        }
    }

    #[test]
    fn test_reset_reproduces_reference_ciphertext() {
        let mut machine = Machine::new();
        machine
            .configure(&sheet(
                [RotorType::III, RotorType::I, RotorType::II],
                "QEV",
                "BBB",
                &[('A', 'Z')],
            ))
            .unwrap();
        machine.process_message("SCRAMBLE");

        machine.reset();
        // Back to the default configuration in every register.
        assert_eq!(machine.rotors.positions(), [Letter::A; 3]);
        assert_eq!(machine.rotors.slot(0).rotor_type, RotorType::I);
        assert_eq!(machine.rotors.slot(2).rotor_type, RotorType::III);
        assert!(machine.plugboard.pairs().is_empty());
        assert_eq!(machine.output(), Letter::A);
        assert_eq!(machine.encipher(Letter::A), letter('F'));
    }

    #[test]
    fn test_process_message_strips_and_uppercases() {
        let config = sheet([RotorType::I, RotorType::II, RotorType::III], "AAA", "AAA", &[]);
        let mut a = Machine::new();
        a.configure(&config).unwrap();
        let mut b = Machine::new();
        b.configure(&config).unwrap();
        assert_eq!(
            a.process_message("attack at 04:00!"),
            b.process_message("ATTACKAT")
        );
    }

    #[test]
    fn test_double_step_trace_matches_golden() {
        let config = sheet(
            [RotorType::I, RotorType::II, RotorType::III],
            "QDA",
            "AAA",
            &[],
        );
        let mut machine = Machine::new();
        machine.configure(&config).unwrap();
        let mut golden = GoldenMachine::from_key_sheet(&config);

        for _ in 0..4 {
            machine.encipher(Letter::A);
            golden.cipher(Letter::A);
            assert_eq!(machine.rotors.positions(), golden.positions());
        }
        // Two keystrokes in, slot 1 has moved twice and slot 2 once.
        assert_eq!(machine.rotors.positions()[1], letter('F'));
        assert_eq!(machine.rotors.positions()[2], letter('B'));
    }

    #[test]
    fn test_raw_byte_channel() {
        let mut machine = Machine::new();
        // ENCRYPT('A') = code 4, operand 0.
        machine.tick_raw(4 << 5).unwrap();
        while !machine.sequencer.is_idle() {
            machine.tick_raw(0).unwrap();
        }
        assert_eq!(machine.output(), letter('F'));

        // Out-of-range operand is rejected without ticking the core.
        let before = machine.ticks;
        assert!(machine.tick_raw((4 << 5) | 29).is_err());
        assert_eq!(machine.ticks, before);
    }

    #[test]
    fn test_invalid_key_sheet_rejected() {
        let mut machine = Machine::new();
        let bad = KeySheet {
            plug_pairs: vec![(Letter::A, Letter::A)],
            ..KeySheet::default()
        };
        assert!(matches!(
            machine.configure(&bad),
            Err(MachineError::KeySheet(_))
        ));
    }

    // Differential testing against the golden model.

    fn arb_rotor_type() -> impl Strategy<Value = RotorType> {
        prop_oneof![
            Just(RotorType::I),
            Just(RotorType::II),
            Just(RotorType::III),
        ]
    }

    fn arb_letter() -> impl Strategy<Value = Letter> {
        (0u8..26).prop_map(Letter::from_raw)
    }

    fn arb_plug_pairs() -> impl Strategy<Value = Vec<(Letter, Letter)>> {
        // Draw 12 distinct letters and pair off a prefix, which keeps
        // every pair disjoint by construction.
        let pool = proptest::sample::subsequence((0u8..26).collect::<Vec<_>>(), 12);
        (0usize..=6, pool).prop_map(|(pairs, pool)| {
            pool.chunks(2)
                .take(pairs)
                .map(|chunk| (Letter::from_raw(chunk[0]), Letter::from_raw(chunk[1])))
                .collect()
        })
    }

    fn arb_key_sheet() -> impl Strategy<Value = KeySheet> {
        (
            [arb_rotor_type(), arb_rotor_type(), arb_rotor_type()],
            [arb_letter(), arb_letter(), arb_letter()],
            [arb_letter(), arb_letter(), arb_letter()],
            arb_plug_pairs(),
        )
            .prop_map(|(rotors, start_positions, ring_settings, plug_pairs)| KeySheet {
                rotors,
                start_positions,
                ring_settings,
                plug_pairs,
                reflector: Reflector::B,
            })
    }

    proptest! {
        #[test]
        fn prop_machine_matches_golden_model(
            config in arb_key_sheet(),
            message in "[A-Z]{1,80}",
        ) {
            let mut machine = Machine::new();
            machine.configure(&config).unwrap();
            let mut golden = GoldenMachine::from_key_sheet(&config);

            for c in message.chars() {
                let input = Letter::from_char(c).unwrap();
                prop_assert_eq!(machine.encipher(input), golden.cipher(input));
                prop_assert_eq!(machine.rotors.positions(), golden.positions());
            }
        }

        #[test]
        fn prop_round_trip_recovers_plaintext(
            config in arb_key_sheet(),
            message in "[A-Z]{1,40}",
        ) {
            let mut forward = Machine::new();
            forward.configure(&config).unwrap();
            let ciphertext = forward.process_message(&message);

            let mut backward = Machine::new();
            backward.configure(&config).unwrap();
            prop_assert_eq!(backward.process_message(&ciphertext), message);
        }

        #[test]
        fn prop_no_fixed_points(
            config in arb_key_sheet(),
            message in "[A-Z]{1,40}",
        ) {
            let mut machine = Machine::new();
            machine.configure(&config).unwrap();
            for c in message.chars() {
                let input = Letter::from_char(c).unwrap();
                prop_assert_ne!(machine.encipher(input), input);
            }
        }
    }
}
