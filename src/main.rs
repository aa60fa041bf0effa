//! Enigma Emulator - CLI Entry Point
//!
//! Commands:
//! - `enigma-emu encrypt <message>` - Encipher a message
//! - `enigma-emu keysheet <path>` - Write a key-sheet template
//! - `enigma-emu interactive` - Interactive machine panel
//! - `enigma-emu test` - Run the built-in self-test

use clap::{Parser, Subcommand};
use enigma::{GoldenMachine, KeySheet, Letter, Machine, RotorType};

#[derive(Parser)]
#[command(name = "enigma-emu")]
#[command(version = "0.1.0")]
#[command(about = "A tick-driven emulator of the Enigma I rotor cipher machine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encipher a message (deciphering is the same operation)
    Encrypt {
        /// The message; non-letters are stripped, case is ignored
        message: String,
        /// Key sheet JSON file to configure from
        #[arg(short, long)]
        keysheet: Option<String>,
        /// Rotor order, slot 0 (rightmost) first, e.g. "III,II,I"
        #[arg(long)]
        rotors: Option<String>,
        /// Start positions, slot 0 first, e.g. "AAA"
        #[arg(long)]
        start: Option<String>,
        /// Ring settings, slot 0 first, e.g. "AAA"
        #[arg(long)]
        rings: Option<String>,
        /// Plugboard pairs, e.g. "AN,QZ"
        #[arg(long)]
        plugs: Option<String>,
        /// Show rotor positions per letter
        #[arg(short, long)]
        trace: bool,
    },
    /// Write a key-sheet template to a JSON file
    Keysheet {
        /// Output path
        path: String,
    },
    /// Interactive machine panel
    Interactive {
        /// Key sheet JSON file to configure from
        #[arg(short, long)]
        keysheet: Option<String>,
    },
    /// Run the built-in self-test
    Test,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Encrypt {
            message,
            keysheet,
            rotors,
            start,
            rings,
            plugs,
            trace,
        }) => {
            encrypt_message(&message, keysheet, rotors, start, rings, plugs, trace);
        }
        Some(Commands::Keysheet { path }) => {
            write_keysheet_template(&path);
        }
        Some(Commands::Interactive { keysheet }) => {
            interactive(keysheet);
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("Enigma Emulator v0.1.0");
            println!("A tick-driven rotor cipher machine");
            println!();
            println!("Use --help for available commands");
            println!();
            demo_machine();
        }
    }
}

/// Assemble the effective key sheet from a file and/or flag overrides.
fn build_key_sheet(
    keysheet: Option<String>,
    rotors: Option<String>,
    start: Option<String>,
    rings: Option<String>,
    plugs: Option<String>,
) -> Result<KeySheet, String> {
    let mut sheet = match keysheet {
        Some(path) => enigma::load_key_sheet(&path).map_err(|e| e.to_string())?,
        None => KeySheet::default(),
    };

    if let Some(spec) = rotors {
        sheet.rotors = parse_rotors(&spec)?;
    }
    if let Some(spec) = start {
        sheet.start_positions = parse_letter_triple(&spec)?;
    }
    if let Some(spec) = rings {
        sheet.ring_settings = parse_letter_triple(&spec)?;
    }
    if let Some(spec) = plugs {
        sheet.plug_pairs = parse_plugs(&spec)?;
    }

    sheet.validate().map_err(|e| e.to_string())?;
    Ok(sheet)
}

fn parse_rotors(spec: &str) -> Result<[RotorType; 3], String> {
    let names: Vec<&str> = spec.split(',').map(str::trim).collect();
    if names.len() != 3 {
        return Err(format!("expected 3 rotor names, found {}", names.len()));
    }
    let mut rotors = [RotorType::I; 3];
    for (i, name) in names.iter().enumerate() {
        rotors[i] =
            RotorType::from_name(name).ok_or_else(|| format!("unknown rotor type: {}", name))?;
    }
    Ok(rotors)
}

fn parse_letter_triple(spec: &str) -> Result<[Letter; 3], String> {
    let chars: Vec<char> = spec.chars().collect();
    if chars.len() != 3 {
        return Err(format!("expected 3 letters, found {}", chars.len()));
    }
    let mut letters = [Letter::A; 3];
    for (i, &c) in chars.iter().enumerate() {
        letters[i] = Letter::from_char(c).map_err(|e| e.to_string())?;
    }
    Ok(letters)
}

fn parse_plugs(spec: &str) -> Result<Vec<(Letter, Letter)>, String> {
    if spec.is_empty() {
        return Ok(Vec::new());
    }
    spec.split(',')
        .map(|pair| {
            let chars: Vec<char> = pair.trim().chars().collect();
            if chars.len() != 2 {
                return Err(format!("plug pair must be 2 letters: {:?}", pair));
            }
            let a = Letter::from_char(chars[0]).map_err(|e| e.to_string())?;
            let b = Letter::from_char(chars[1]).map_err(|e| e.to_string())?;
            Ok((a, b))
        })
        .collect()
}

/// Format ciphertext in the historical five-letter groups.
fn format_groups(text: &str) -> String {
    text.chars()
        .collect::<Vec<_>>()
        .chunks(5)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

fn encrypt_message(
    message: &str,
    keysheet: Option<String>,
    rotors: Option<String>,
    start: Option<String>,
    rings: Option<String>,
    plugs: Option<String>,
    trace: bool,
) {
    let sheet = match build_key_sheet(keysheet, rotors, start, rings, plugs) {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut machine = Machine::new();
    if let Err(e) = machine.configure(&sheet) {
        eprintln!("❌ Failed to configure machine: {}", e);
        std::process::exit(1);
    }

    println!(
        "🔧 Rotors {} {} {} (slot 0 first), start {}{}{}, rings {}{}{}",
        sheet.rotors[0],
        sheet.rotors[1],
        sheet.rotors[2],
        sheet.start_positions[0],
        sheet.start_positions[1],
        sheet.start_positions[2],
        sheet.ring_settings[0],
        sheet.ring_settings[1],
        sheet.ring_settings[2],
    );
    println!();

    let ciphertext = if trace {
        let mut out = String::new();
        for c in message.chars() {
            if let Ok(input) = Letter::from_char(c) {
                let output = machine.encipher(input);
                let [p0, p1, p2] = machine.rotors.positions();
                println!("{} → {}  rotors {}{}{}", input, output, p2, p1, p0);
                out.push(output.to_char());
            }
        }
        println!();
        out
    } else {
        machine.process_message(message)
    };

    println!("━━━ Ciphertext ━━━");
    println!("{}", format_groups(&ciphertext));
}

fn write_keysheet_template(path: &str) {
    let sheet = KeySheet::default();
    match enigma::save_key_sheet(path, &sheet) {
        Ok(()) => {
            println!("✓ Wrote key-sheet template to {}", path);
            println!("  Edit rotors, start_positions, ring_settings and plug_pairs as needed.");
        }
        Err(e) => {
            eprintln!("❌ Failed to write key sheet: {}", e);
            std::process::exit(1);
        }
    }
}

fn interactive(keysheet: Option<String>) {
    let sheet = match build_key_sheet(keysheet, None, None, None, None) {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut machine = Machine::new();
    if let Err(e) = machine.configure(&sheet) {
        eprintln!("❌ Failed to configure machine: {}", e);
        std::process::exit(1);
    }

    #[cfg(feature = "tui")]
    {
        println!("🚀 Launching machine panel...");
        if let Err(e) = enigma::run_interactive(machine) {
            eprintln!("❌ Panel error: {}", e);
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "tui"))]
    {
        let _ = machine;
        eprintln!("❌ Built without the 'tui' feature");
        std::process::exit(1);
    }
}

fn demo_machine() {
    println!("━━━ Machine Demo ━━━");
    println!();

    let mut machine = Machine::new();
    let plaintext = "ENIGMA";
    let ciphertext = machine.process_message(plaintext);
    println!("Default setup (rotors I II III, all at A):");
    println!("  {} → {}", plaintext, ciphertext);

    let [p0, p1, p2] = machine.rotors.positions();
    println!("  Rotor windows now read {}{}{}", p2, p1, p0);
    println!();

    let mut back = Machine::new();
    println!("Running the ciphertext through a fresh machine:");
    println!("  {} → {}", ciphertext, back.process_message(&ciphertext));
    println!();
    println!("✓ The machine is its own inverse");
}

fn run_self_test() {
    println!("━━━ Enigma Emulator Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;

    let mut check = |name: &str, ok: bool| {
        if ok {
            println!("{}... ✓", name);
            passed += 1;
        } else {
            println!("{}... ✗", name);
            failed += 1;
        }
    };

    // Test 1: known answer on the default configuration
    let mut machine = Machine::new();
    check(
        "Default configuration enciphers A to F",
        machine.encipher(Letter::A).to_char() == 'F',
    );

    // Test 2: historical reference with standard wheel order
    let mut sheet = KeySheet::default();
    sheet.rotors = [RotorType::III, RotorType::II, RotorType::I];
    let mut machine = Machine::new();
    machine.configure(&sheet).expect("valid sheet");
    check(
        "Wheel order I/II/III yields BDZGO for AAAAA",
        machine.process_message("AAAAA") == "BDZGO",
    );

    // Test 3: round trip
    let mut forward = Machine::new();
    let ciphertext = forward.process_message("SELFTEST");
    let mut backward = Machine::new();
    check(
        "Enciphering is self-inverse",
        backward.process_message(&ciphertext) == "SELFTEST",
    );

    // Test 4: no fixed points
    let mut ok = true;
    let mut machine = Machine::new();
    for _ in 0..26 {
        for input in Letter::all() {
            let mut probe = machine.clone();
            if probe.encipher(input) == input {
                ok = false;
            }
        }
        machine.encipher(Letter::A);
    }
    check("No letter enciphers to itself", ok);

    // Test 5: differential against the golden model
    let mut sheet = KeySheet::default();
    sheet.rotors = [RotorType::II, RotorType::I, RotorType::III];
    sheet.start_positions = [
        Letter::from_char('Q').unwrap(),
        Letter::from_char('D').unwrap(),
        Letter::from_char('X').unwrap(),
    ];
    sheet.ring_settings = [
        Letter::from_char('B').unwrap(),
        Letter::A,
        Letter::from_char('M').unwrap(),
    ];
    sheet.plug_pairs = vec![(
        Letter::from_char('A').unwrap(),
        Letter::from_char('N').unwrap(),
    )];
    let mut machine = Machine::new();
    machine.configure(&sheet).expect("valid sheet");
    let mut golden = GoldenMachine::from_key_sheet(&sheet);
    check(
        "Tick-driven core matches the golden model",
        machine.process_message("DIFFERENTIALTEST") == golden.process_message("DIFFERENTIALTEST"),
    );

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
