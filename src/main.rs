//! AGC Simulator - CLI Entry Point
//!
//! Commands:
//! - `agc-sim exec <instr>...` - Dispatch instructions against a fresh machine
//! - `agc-sim state` - Print the power-on state
//! - `agc-sim test` - Run the built-in self-test

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "agc-sim")]
#[command(version)]
#[command(about = "An instruction-level simulator of a Block II-style Apollo Guidance Computer")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch instructions in order, then print the final state
    Exec {
        /// Instructions such as "CA 0o10" or "EXTEND"
        #[arg(required = true)]
        instructions: Vec<String>,
        /// Preload an erasable cell before running (ADDR=VALUE, decimal or 0o octal)
        #[arg(short, long = "poke", value_name = "ADDR=VALUE")]
        pokes: Vec<String>,
        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
        /// Keep going after a failed instruction
        #[arg(short = 'k', long)]
        keep_going: bool,
    },
    /// Print the construction-time machine state
    State {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the built-in self-test
    Test,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Exec { instructions, pokes, json, keep_going }) => {
            exec_instructions(&instructions, &pokes, json, keep_going);
        }
        Some(Commands::State { json }) => {
            print_state(&agc::Agc::new(), json);
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("AGC Simulator v{}", env!("CARGO_PKG_VERSION"));
            println!("A Block II Apollo Guidance Computer instruction simulator");
            println!();
            println!("Use --help for available commands");
            println!();
            demo_ones_complement();
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn parse_poke(text: &str) -> Result<(usize, agc::Word), String> {
    use agc::cpu::decode::parse_operand;

    let (addr, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected ADDR=VALUE, got {}", text))?;
    let addr = parse_operand(addr.trim()).map_err(|e| e.to_string())?;
    let value = parse_operand(value.trim()).map_err(|e| e.to_string())?;
    Ok((addr as usize, agc::Word::new(value)))
}

fn exec_instructions(instructions: &[String], pokes: &[String], json: bool, keep_going: bool) {
    use agc::Agc;

    let mut machine = Agc::new();

    for poke in pokes {
        let result = parse_poke(poke)
            .and_then(|(addr, value)| machine.mem.write(addr, value).map_err(|e| e.to_string()));
        if let Err(e) = result {
            eprintln!("error: bad --poke {}: {}", poke, e);
            std::process::exit(1);
        }
    }

    let mut failed = false;
    for line in instructions {
        if let Err(e) = machine.execute_line(line) {
            eprintln!("error: {}: {}", line, e);
            failed = true;
            if !keep_going {
                break;
            }
        }
    }

    print_state(&machine, json);

    if failed {
        std::process::exit(1);
    }
}

fn print_state(machine: &agc::Agc, json: bool) {
    let snap = machine.snapshot();

    if json {
        match serde_json::to_string_pretty(&snap) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("error: failed to serialize state: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("A  = {}   L  = {}", snap.a, snap.l);
    println!("Q  = {}   Z  = {}", snap.q, snap.pc);
    println!("Mode:    {:?}", snap.mode);
    println!("Cycles:  {}", snap.cycles);
    println!(
        "Interrupts: enabled={} pending={}",
        snap.interrupts.enabled, snap.interrupts.pending
    );
    if !snap.erasable.is_empty() {
        println!("Erasable:");
        for (addr, value) in &snap.erasable {
            println!("  {:04o}: {}", addr, value);
        }
    }
    if !snap.dsky.is_empty() {
        let queued: Vec<String> = snap.dsky.iter().map(|w| w.to_string()).collect();
        println!("DSKY:    {}", queued.join(" "));
    }
}

fn demo_ones_complement() {
    use agc::word::{arith, Word};

    println!("━━━ One's-Complement Demo ━━━");
    println!();

    let five = Word::new(5);
    let minus_five = arith::complement(five);
    println!("  +5 = {}   -5 = {}", five, minus_five);
    println!("  +0 = {}   -0 = {}", Word::ZERO, Word::NEG_ZERO);
    println!();

    let sum = arith::add(Word::new(0o77776), Word::new(2));
    println!("  -1 + 2 = {} (end-around carry)", sum);
    let zero = arith::add(Word::NEG_ZERO, Word::NEG_ZERO);
    println!("  -0 + -0 = {} (normalized)", zero);
    let diff = arith::subtract(Word::new(0o1234), Word::new(0o1234));
    println!("  x - x = {}", diff);
    println!();
}

fn run_self_test() {
    use agc::{Agc, CpuError, Mode, Word};
    use agc::word::arith;

    println!("━━━ AGC Simulator Self-Test ━━━");
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

    check(
        "Complement involution",
        (0..=0x7FFFu16).all(|v| arith::complement(arith::complement(Word::new(v))) == Word::new(v)),
    );
    check("-0 + -0 = +0", arith::add(Word::NEG_ZERO, Word::NEG_ZERO) == Word::ZERO);
    check("0x7FFE + 1 = +0", arith::add(Word::new(0x7FFE), Word::ONE) == Word::ZERO);
    check(
        "Zero tests",
        arith::is_zero(Word::ZERO) && arith::is_zero(Word::NEG_ZERO) && !arith::is_zero(Word::ONE),
    );
    check(
        "Sign",
        arith::sign(Word::ZERO) == 0 && arith::sign(Word::ONE) == 1 && arith::sign(Word::new(0x4001)) == -1,
    );
    check(
        "Subtract self",
        (1..=0x7FFFu16).all(|v| arith::subtract(Word::new(v), Word::new(v)) == Word::ZERO),
    );

    let mut machine = Agc::new();
    let ok = machine.mem.write(0, Word::ONE).is_ok()
        && machine.execute("INCR", Some(0)).is_ok()
        && machine.mem.read(0) == Ok(Word::new(2))
        && machine.execute("AD", Some(0)).is_ok()
        && machine.regs.a == Word::new(2)
        && machine.execute("SU", Some(0)).is_ok()
        && machine.regs.a == Word::ZERO;
    check("INCR/AD/SU", ok);

    let mut machine = Agc::new();
    let ok = machine.execute("DV", Some(1)).is_ok()
        && machine.regs.a == Word::ZERO
        && machine.regs.l == Word::ZERO
        && machine.interrupts.pending;
    check("DV by zero", ok);

    let mut machine = Agc::new();
    let ok = machine.execute("EXTEND", None).is_ok()
        && machine.execute("MP", Some(0)).is_ok()
        && machine.mode() == Mode::Normal
        && machine.execute("UNKNOWN_OP", None)
            == Err(CpuError::UnknownInstruction("UNKNOWN_OP".to_string()))
        && machine.mode() == Mode::Normal;
    check("EXTEND one-shot", ok);

    let mut machine = Agc::new();
    machine.interface_counter_write(99, Word::new(5));
    let ok = machine.dsky_output().is_none() && machine.interface_counter_read(99).is_none();
    check("Peripheral sentinels", ok);

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
