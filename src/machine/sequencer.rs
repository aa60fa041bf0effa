//! Control sequencer: the tick-driven state machine at the heart of the
//! machine.
//!
//! The sequencer consumes one command per tick. Configuration commands
//! take two ticks (accept, then apply); an encipherment runs a chain of
//! 9 to 12 ticks: the stepping phases (with the double-stepping
//! anomaly), six rotor traversals, one reflection, and a settle tick
//! that latches the output. State committed during one tick is only
//! read by later ticks, matching the synchronous-update discipline of
//! the original control table.

use crate::alphabet::Letter;
use crate::machine::command::Command;
use crate::machine::plugboard::Plugboard;
use crate::machine::rotor::{RotorBank, SLOT_COUNT};
use crate::machine::wiring::RotorType;
use serde::{Deserialize, Serialize};

/// Control point of the sequencer, one per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Ready to accept one command.
    Idle,
    /// Write the latched operand as a start position.
    LoadStart,
    /// Write the latched operand as a ring setting.
    LoadRing,
    /// Write the latched rotor-type selection.
    LoadType,
    /// Forward the latched operand to the plugboard address latch.
    LoadPlugAddr,
    /// Forward the latched operand to the plugboard data port.
    LoadPlugData,
    /// Advance slot 0 and decide whether slot 1 must step too.
    Step0,
    /// Advance slot 1 (carry from slot 0, or a scheduled double step).
    Step1,
    /// Inspect slot 1 after its step: schedule or apply the double step.
    CheckTurnover,
    /// Advance slot 2 (the scheduled double step reached the slow wheel).
    Step2,
    /// Entry traversal through slot 0.
    Traverse0,
    /// Entry traversal through slot 1.
    Traverse1,
    /// Entry traversal through slot 2.
    Traverse2,
    /// Reflector pass.
    Reflect,
    /// Return traversal through slot 2.
    TraverseBack2,
    /// Return traversal through slot 1.
    TraverseBack1,
    /// Return traversal through slot 0.
    TraverseBack0,
    /// Final plugboard pass; latch and hold the result.
    Settle,
}

/// Status lines raised by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickStatus {
    /// High while the sequencer can accept a command.
    pub ready: bool,
    /// Pulses on the tick that latches a finished encipherment.
    pub result_ready: bool,
}

/// The control sequencer.
///
/// Owns no datapath state of its own beyond the in-flight signal and the
/// held output; the rotor bank and plugboard are passed in per tick so
/// the sequencer remains the single writer of their selection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequencer {
    phase: Phase,
    /// Next slot targeted by the bulk-load commands, shared between
    /// start-position, ring-setting, and rotor-type loads.
    slot_cnt: usize,
    /// Scheduled middle-rotor step for the next encipherment.
    double_step: bool,
    /// Operand latched when a command is accepted.
    operand: Letter,
    /// Rotor-type selection latched by `SET_ROTORS`.
    type_operand: RotorType,
    /// The signal value carried between traversal ticks.
    signal: Letter,
    /// Held output, stable until the next encipherment settles.
    output: Letter,
}

impl Sequencer {
    /// Create a sequencer in the idle state.
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            slot_cnt: 0,
            double_step: false,
            operand: Letter::A,
            type_operand: RotorType::I,
            signal: Letter::A,
            output: Letter::A,
        }
    }

    /// Return to idle and clear all control state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The current control point.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while the sequencer can accept a command.
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// True while a middle-rotor double step is scheduled for the next
    /// encipherment.
    pub fn double_step_pending(&self) -> bool {
        self.double_step
    }

    /// The held output letter ('A' after reset).
    pub fn output(&self) -> Letter {
        self.output
    }

    /// Execute one tick.
    ///
    /// Commands other than `RESET` are only sampled in the idle phase;
    /// mid-sequence they are absorbed as no-ops. `RESET` is honored from
    /// any phase and abandons an in-flight encipherment.
    pub fn tick(
        &mut self,
        cmd: Command,
        rotors: &mut RotorBank,
        plugboard: &mut Plugboard,
    ) -> TickStatus {
        let mut status = TickStatus::default();

        if cmd == Command::Reset {
            self.reset();
            rotors.reset();
            plugboard.reset();
            return status;
        }

        match self.phase {
            Phase::Idle => {
                status.ready = true;
                match cmd {
                    Command::Nop | Command::Reset => {}
                    Command::LoadStart(l) => {
                        self.operand = l;
                        self.phase = Phase::LoadStart;
                    }
                    Command::LoadRing(l) => {
                        self.operand = l;
                        self.phase = Phase::LoadRing;
                    }
                    Command::SetRotors(t) => {
                        self.type_operand = t;
                        self.phase = Phase::LoadType;
                    }
                    Command::LoadPlugAddr(l) => {
                        self.operand = l;
                        self.phase = Phase::LoadPlugAddr;
                    }
                    Command::LoadPlugData(l) => {
                        self.operand = l;
                        self.phase = Phase::LoadPlugData;
                    }
                    Command::Encrypt(l) => {
                        self.operand = l;
                        self.phase = Phase::Step0;
                    }
                }
            }

            Phase::LoadStart => {
                rotors.load_start(self.slot_cnt, self.operand);
                self.advance_slot_cnt();
                self.phase = Phase::Idle;
            }

            Phase::LoadRing => {
                rotors.load_ring(self.slot_cnt, self.operand);
                self.advance_slot_cnt();
                self.phase = Phase::Idle;
            }

            Phase::LoadType => {
                rotors.load_type(self.slot_cnt, self.type_operand);
                self.advance_slot_cnt();
                self.phase = Phase::Idle;
            }

            Phase::LoadPlugAddr => {
                plugboard.write_address(self.operand);
                self.phase = Phase::Idle;
            }

            Phase::LoadPlugData => {
                plugboard.write_data(self.operand);
                self.phase = Phase::Idle;
            }

            Phase::Step0 => {
                // The turnover test must see the position before the
                // increment commits: stepping past the turnover letter
                // is what carries into slot 1.
                let carry = rotors.turnover(0);
                rotors.increment(0);
                self.phase = if carry || self.double_step {
                    Phase::Step1
                } else {
                    Phase::Traverse0
                };
            }

            Phase::Step1 => {
                rotors.increment(1);
                self.phase = Phase::CheckTurnover;
            }

            Phase::CheckTurnover => {
                if self.double_step {
                    self.phase = Phase::Step2;
                } else if rotors.turnover(1) {
                    // Slot 1 landed on its own turnover: it will step
                    // again on the next encipherment, dragging slot 2
                    // with it.
                    self.double_step = true;
                    self.phase = Phase::Traverse0;
                } else {
                    self.phase = Phase::Traverse0;
                }
            }

            Phase::Step2 => {
                rotors.increment(2);
                self.double_step = false;
                self.phase = Phase::Traverse0;
            }

            Phase::Traverse0 => {
                let entry = plugboard.lookup(self.operand);
                self.signal = rotors.traverse_right_to_left(0, entry);
                self.phase = Phase::Traverse1;
            }

            Phase::Traverse1 => {
                self.signal = rotors.traverse_right_to_left(1, self.signal);
                self.phase = Phase::Traverse2;
            }

            Phase::Traverse2 => {
                self.signal = rotors.traverse_right_to_left(2, self.signal);
                self.phase = Phase::Reflect;
            }

            Phase::Reflect => {
                self.signal = rotors.reflect(self.signal);
                self.phase = Phase::TraverseBack2;
            }

            Phase::TraverseBack2 => {
                self.signal = rotors.traverse_left_to_right(2, self.signal);
                self.phase = Phase::TraverseBack1;
            }

            Phase::TraverseBack1 => {
                self.signal = rotors.traverse_left_to_right(1, self.signal);
                self.phase = Phase::TraverseBack0;
            }

            Phase::TraverseBack0 => {
                self.signal = rotors.traverse_left_to_right(0, self.signal);
                self.phase = Phase::Settle;
            }

            Phase::Settle => {
                self.output = plugboard.lookup(self.signal);
                status.result_ready = true;
                self.phase = Phase::Idle;
            }
        }

        status
    }

    fn advance_slot_cnt(&mut self) {
        self.slot_cnt = (self.slot_cnt + 1) % SLOT_COUNT;
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}
