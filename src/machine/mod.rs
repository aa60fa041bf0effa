//! The machine core.
//!
//! This module implements the complete Enigma I topology:
//! - 3 rotor slots over fixed wiring tables, with double-stepping
//! - a fixed reflector and a programmable plugboard
//! - the command channel and the tick-driven control sequencer
//! - the top-level machine wiring them together

pub mod command;
pub mod exec;
pub mod plugboard;
pub mod rotor;
pub mod sequencer;
pub mod wiring;

pub use command::{Command, CommandError};
pub use exec::{Machine, MachineError};
pub use plugboard::Plugboard;
pub use rotor::{RotorBank, RotorSlot, SLOT_COUNT};
pub use sequencer::{Phase, Sequencer, TickStatus};
pub use wiring::{Reflector, RotorType};
