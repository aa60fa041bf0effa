//! Panel application state and logic.

use crate::machine::{Command, Machine};
use crate::Letter;

/// Interactive panel state.
pub struct InteractiveApp {
    /// The machine on the bench.
    pub machine: Machine,
    /// Pristine copy used by the reset key.
    initial: Machine,
    /// Plaintext typed so far.
    pub plaintext: String,
    /// Ciphertext produced so far.
    pub ciphertext: String,
    /// Last lamp lit, if any.
    pub lamp: Option<Letter>,
    /// When true, each keystroke only issues the command; the sequencer
    /// is advanced one tick at a time with the space bar.
    pub step_mode: bool,
    /// Letter whose encipherment is currently in flight (step mode).
    pending: Option<Letter>,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
}

impl InteractiveApp {
    /// Create a panel around a configured machine.
    pub fn new(machine: Machine) -> Self {
        Self {
            initial: machine.clone(),
            machine,
            plaintext: String::new(),
            ciphertext: String::new(),
            lamp: None,
            step_mode: false,
            pending: None,
            should_quit: false,
            status: "Type letters to encipher. Tab: step mode, Backspace: reset, Esc: quit."
                .into(),
        }
    }

    /// Handle one typed letter.
    pub fn key_letter(&mut self, c: char) {
        let Ok(input) = Letter::from_char(c) else {
            return;
        };

        if self.step_mode {
            if self.pending.is_some() {
                self.status = "Encipherment in flight; advance with space.".into();
                return;
            }
            self.machine.tick(Command::Encrypt(input));
            self.pending = Some(input);
            self.lamp = None;
            self.status = format!("ENCRYPT({}) accepted; phase {:?}", input, self.machine.sequencer.phase());
        } else {
            let output = self.machine.encipher(input);
            self.record(input, output);
        }
    }

    /// Advance the sequencer one tick (step mode).
    pub fn step_tick(&mut self) {
        let Some(input) = self.pending else {
            self.status = "Nothing in flight; type a letter first.".into();
            return;
        };

        let status = self.machine.tick(Command::Nop);
        if status.result_ready {
            let output = self.machine.output();
            self.record(input, output);
            self.pending = None;
        } else {
            self.status = format!("phase {:?}", self.machine.sequencer.phase());
        }
    }

    /// Toggle tick-stepping mode. Refused mid-encipherment.
    pub fn toggle_step_mode(&mut self) {
        if self.pending.is_some() {
            self.status = "Finish the current encipherment first.".into();
            return;
        }
        self.step_mode = !self.step_mode;
        self.status = if self.step_mode {
            "Step mode: letters issue ENCRYPT, space advances one tick.".into()
        } else {
            "Auto mode: letters encipher in one stroke.".into()
        };
    }

    /// Reset to the initial configuration and clear the log.
    pub fn reset(&mut self) {
        self.machine = self.initial.clone();
        self.plaintext.clear();
        self.ciphertext.clear();
        self.lamp = None;
        self.pending = None;
        self.status = "Reset to initial configuration.".into();
    }

    fn record(&mut self, input: Letter, output: Letter) {
        self.plaintext.push(input.to_char());
        self.ciphertext.push(output.to_char());
        self.lamp = Some(output);
        let [p0, p1, p2] = self.machine.rotors.positions();
        self.status = format!("{} → {}  rotors {}{}{}", input, output, p2, p1, p0);
    }
}

/// Run the interactive panel around a configured machine.
pub fn run_interactive(machine: Machine) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create app
    let mut app = InteractiveApp::new(machine);

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        // Handle input
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => app.should_quit = true,
                        KeyCode::Tab => app.toggle_step_mode(),
                        KeyCode::Backspace => app.reset(),
                        KeyCode::Char(' ') => {
                            if app.step_mode {
                                app.step_tick();
                            }
                        }
                        KeyCode::Char(c) => app.key_letter(c),
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
