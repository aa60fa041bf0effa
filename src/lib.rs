//! # Enigma Emulator
//!
//! A tick-driven emulator of the Enigma I rotor cipher machine: three
//! rotor slots with the historically accurate double-stepping anomaly, a
//! fixed reflector, and a programmable plugboard, all driven through an
//! 8-bit command channel by an explicit control sequencer.
//!
//! A direct (non-tick) golden model is included and serves as the oracle
//! for differential testing of the sequencer core.

pub mod alphabet;
pub mod golden;
pub mod keysheet;
pub mod machine;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export commonly used types
pub use alphabet::Letter;
pub use golden::GoldenMachine;
pub use keysheet::{load_key_sheet, save_key_sheet, KeySheet, KeySheetError};
pub use machine::{
    Command, CommandError, Machine, MachineError, Phase, Plugboard, Reflector, RotorBank,
    RotorType, Sequencer, TickStatus,
};

#[cfg(feature = "tui")]
pub use tui::run_interactive;
