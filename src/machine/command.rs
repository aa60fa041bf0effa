//! The command channel: a 3-bit command code plus a 5-bit operand.
//!
//! One byte is sampled per tick. Bits 0-4 carry the operand (a letter
//! index, or a rotor-type selector for `SET_ROTORS`); bits 5-7 carry the
//! command code. All eight code values are assigned, so decoding can
//! only fail on an out-of-range operand, which is rejected explicitly
//! rather than masked: the hardware's bit-masking behavior on such
//! operands was unspecified.

use crate::alphabet::Letter;
use crate::machine::wiring::RotorType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A decoded command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Do nothing this tick.
    Nop,
    /// Load a start position into the next rotor slot.
    LoadStart(Letter),
    /// Load a ring setting into the next rotor slot.
    LoadRing(Letter),
    /// Return to idle and clear all configuration state.
    Reset,
    /// Encipher one letter (aliased `SCRAMBLE` in later revisions).
    Encrypt(Letter),
    /// Latch a plugboard write address.
    LoadPlugAddr(Letter),
    /// Write the mapping for the latched plugboard address.
    LoadPlugData(Letter),
    /// Select the rotor type for the next rotor slot.
    SetRotors(RotorType),
}

const CODE_NOP: u8 = 0;
const CODE_LOAD_START: u8 = 1;
const CODE_LOAD_RING: u8 = 2;
const CODE_RESET: u8 = 3;
const CODE_ENCRYPT: u8 = 4;
const CODE_LOAD_PLUG_ADDR: u8 = 5;
const CODE_LOAD_PLUG_DATA: u8 = 6;
const CODE_SET_ROTORS: u8 = 7;

const OPERAND_MASK: u8 = 0b0001_1111;
const CODE_SHIFT: u32 = 5;

impl Command {
    /// Decode one command byte.
    ///
    /// `NOP` and `RESET` ignore their operand bits; all other commands
    /// reject operands outside their valid range.
    pub fn decode(byte: u8) -> Result<Self, CommandError> {
        let code = byte >> CODE_SHIFT;
        let operand = byte & OPERAND_MASK;

        let letter = |code: u8| {
            Letter::new(operand).map_err(|_| CommandError::OperandOutOfRange { code, operand })
        };

        match code {
            CODE_NOP => Ok(Command::Nop),
            CODE_RESET => Ok(Command::Reset),
            CODE_LOAD_START => Ok(Command::LoadStart(letter(code)?)),
            CODE_LOAD_RING => Ok(Command::LoadRing(letter(code)?)),
            CODE_ENCRYPT => Ok(Command::Encrypt(letter(code)?)),
            CODE_LOAD_PLUG_ADDR => Ok(Command::LoadPlugAddr(letter(code)?)),
            CODE_LOAD_PLUG_DATA => Ok(Command::LoadPlugData(letter(code)?)),
            CODE_SET_ROTORS => RotorType::from_index(operand)
                .map(Command::SetRotors)
                .ok_or(CommandError::RotorTypeOutOfRange(operand)),
            _ => unreachable!("command code is 3 bits"),
        }
    }

    /// Encode back to a command byte.
    pub fn encode(self) -> u8 {
        let (code, operand) = match self {
            Command::Nop => (CODE_NOP, 0),
            Command::LoadStart(l) => (CODE_LOAD_START, l.index()),
            Command::LoadRing(l) => (CODE_LOAD_RING, l.index()),
            Command::Reset => (CODE_RESET, 0),
            Command::Encrypt(l) => (CODE_ENCRYPT, l.index()),
            Command::LoadPlugAddr(l) => (CODE_LOAD_PLUG_ADDR, l.index()),
            Command::LoadPlugData(l) => (CODE_LOAD_PLUG_DATA, l.index()),
            Command::SetRotors(t) => (CODE_SET_ROTORS, t.index()),
        };
        (code << CODE_SHIFT) | operand
    }

    /// The 3-bit command code.
    pub fn code(self) -> u8 {
        self.encode() >> CODE_SHIFT
    }
}

/// Errors from decoding a command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("operand {operand} out of range for command code {code} (0-25)")]
    OperandOutOfRange { code: u8, operand: u8 },

    #[error("rotor type index {0} is not mapped")]
    RotorTypeOutOfRange(u8),
}
