//! Plugboard: a programmable 26-entry letter-swap table.
//!
//! The board is an array-backed substitution map, identity at reset.
//! Programming uses a two-phase protocol: `write_address` latches the
//! entry to program, `write_data` stores its mapping. The machine does
//! not enforce symmetry; to plug A into N the caller writes both
//! `A -> N` and `N -> A`, which keeps the table an involution so that
//! the keyboard-side and lamp-side passes read the same mapping.

use crate::alphabet::Letter;
use serde::{Deserialize, Serialize};

/// The programmable plugboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugboard {
    map: [Letter; 26],
    /// Entry latched by the last `write_address`.
    addr: Letter,
    /// When false the board passes every letter through unchanged.
    enabled: bool,
}

impl Plugboard {
    /// Create an identity plugboard (no plugs, enabled).
    pub fn new() -> Self {
        let mut map = [Letter::A; 26];
        for letter in Letter::all() {
            map[letter.index() as usize] = letter;
        }
        Self {
            map,
            addr: Letter::A,
            enabled: true,
        }
    }

    /// Restore the identity mapping and clear the address latch.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Latch the entry to be programmed by the next [`write_data`].
    ///
    /// [`write_data`]: Plugboard::write_data
    pub fn write_address(&mut self, letter: Letter) {
        self.addr = letter;
    }

    /// Store `letter` as the mapping of the latched entry.
    pub fn write_data(&mut self, letter: Letter) {
        self.map[self.addr.index() as usize] = letter;
    }

    /// Substitute one letter. Identity when the board is disabled.
    #[inline]
    pub fn lookup(&self, letter: Letter) -> Letter {
        if self.enabled {
            self.map[letter.index() as usize]
        } else {
            letter
        }
    }

    /// Switch the board between mapping and pass-through mode.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True when the board applies its mapping.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True iff every programmed pair was written in both directions.
    pub fn is_involution(&self) -> bool {
        Letter::all().all(|letter| self.lookup(self.lookup(letter)) == letter)
    }

    /// The programmed pairs, each reported once with the lower letter first.
    pub fn pairs(&self) -> Vec<(Letter, Letter)> {
        Letter::all()
            .filter_map(|letter| {
                let mapped = self.map[letter.index() as usize];
                (letter < mapped).then_some((letter, mapped))
            })
            .collect()
    }
}

impl Default for Plugboard {
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

    /// Program one pair in both directions, per the command protocol.
    fn plug(board: &mut Plugboard, a: char, b: char) {
        board.write_address(letter(a));
        board.write_data(letter(b));
        board.write_address(letter(b));
        board.write_data(letter(a));
    }

    #[test]
    fn test_identity_at_reset() {
        let board = Plugboard::new();
        for l in Letter::all() {
            assert_eq!(board.lookup(l), l);
        }
        assert!(board.is_involution());
        assert!(board.pairs().is_empty());
    }

    #[test]
    fn test_pair_swaps_both_ways() {
        let mut board = Plugboard::new();
        plug(&mut board, 'A', 'N');
        assert_eq!(board.lookup(letter('A')), letter('N'));
        assert_eq!(board.lookup(letter('N')), letter('A'));
        assert_eq!(board.lookup(letter('B')), letter('B'));
    }

    #[test]
    fn test_involution_after_full_programming() {
        let mut board = Plugboard::new();
        plug(&mut board, 'A', 'N');
        plug(&mut board, 'Q', 'Z');
        plug(&mut board, 'C', 'K');
        assert!(board.is_involution());
        for l in Letter::all() {
            assert_eq!(board.lookup(board.lookup(l)), l);
        }
    }

    #[test]
    fn test_one_directional_write_breaks_involution() {
        let mut board = Plugboard::new();
        board.write_address(letter('A'));
        board.write_data(letter('N'));
        assert!(!board.is_involution());
    }

    #[test]
    fn test_disabled_passes_through() {
        let mut board = Plugboard::new();
        plug(&mut board, 'A', 'N');
        board.set_enabled(false);
        assert_eq!(board.lookup(letter('A')), letter('A'));
        board.set_enabled(true);
        assert_eq!(board.lookup(letter('A')), letter('N'));
    }

    #[test]
    fn test_pairs_reported_once() {
        let mut board = Plugboard::new();
        plug(&mut board, 'N', 'A');
        plug(&mut board, 'Q', 'Z');
        assert_eq!(
            board.pairs(),
            vec![(letter('A'), letter('N')), (letter('Q'), letter('Z'))]
        );
    }

    #[test]
    fn test_reset_clears_programming() {
        let mut board = Plugboard::new();
        plug(&mut board, 'A', 'N');
        board.reset();
        assert_eq!(board.lookup(letter('A')), letter('A'));
    }
}
