//! The 26-letter machine alphabet and its modular arithmetic.
//!
//! This module provides the core value types for the machine:
//! - [`Letter`] - A validated letter index in `0..=25`
//! - [`arith`] - Addition and subtraction mod 26

pub mod arith;
mod letter;

pub use arith::{add26, sub26};
pub use letter::{AlphabetError, Letter, ALPHABET_LEN};
