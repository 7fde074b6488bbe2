#![deny(unsafe_code)]

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{event, Level};
use tracing_subscriber::prelude::*;

use base::prelude::*;
use cpu::{AddressRef, MachineVariant, MemoryConfiguration, MemoryOpFailure, MemoryUnit};

const ABOUT: &str = "Resolve AGC addresses and try out its one's-complement arithmetic";

/// Where an operand lives when we run an instruction.  It is a
/// location in unswitched erasable memory.
const SCRATCH: AddressRef = AddressRef::Direct { address: 0o100 };
const ACCUMULATOR: AddressRef = AddressRef::Direct { address: 0o0 };

/// Calculator for the address resolution and arithmetic of the
/// Apollo Guidance Computer.  All numbers are octal.
#[derive(Parser, Debug)]
#[clap(version, about=ABOUT, long_about = None)]
struct Cli {
    /// Which AGC to emulate
    #[clap(long, global = true, value_enum, default_value_t = Variant::Cm)]
    variant: Variant,

    /// Erasable bank selected by EBANK (0-7)
    #[clap(long, global = true, value_parser = parse_octal, default_value = "0")]
    ebank: Word,

    /// Fixed bank selected by FBANK (0-37)
    #[clap(long, global = true, value_parser = parse_octal, default_value = "0")]
    fbank: Word,

    /// Set the superbank bit
    #[clap(long, global = true)]
    superbank: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show where an instruction's address field points
    Deduce {
        #[clap(value_parser = parse_octal)]
        field: Word,
    },
    /// Run one arithmetic instruction and show the result
    Arith {
        #[clap(value_enum)]
        op: Op,
        /// Initial contents of A (16 bits)
        #[clap(long, value_parser = parse_octal, default_value = "0")]
        a: Word,
        /// Operand value (15 bits), stored in erasable memory
        #[clap(long, value_parser = parse_octal, default_value = "0")]
        operand: Word,
        /// Apply INCR, AUG, DIM or SU to A rather than to the operand
        #[clap(long)]
        on_a: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Variant {
    Cm,
    Lm,
}

impl From<Variant> for MachineVariant {
    fn from(v: Variant) -> MachineVariant {
        match v {
            Variant::Cm => MachineVariant::CommandModule,
            Variant::Lm => MachineVariant::LunarModule,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Op {
    Ad,
    Com,
    Incr,
    Aug,
    Dim,
    Su,
    Double,
}

#[derive(Debug)]
enum Fail {
    Memory(MemoryOpFailure),
    Initialisation(String),
}

impl Display for Fail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Fail::Memory(e) => write!(f, "memory operation failed: {e}"),
            Fail::Initialisation(msg) => f.write_str(msg.as_str()),
        }
    }
}

impl Error for Fail {}

impl From<MemoryOpFailure> for Fail {
    fn from(e: MemoryOpFailure) -> Fail {
        Fail::Memory(e)
    }
}

impl From<BitAssertionFailed> for Fail {
    fn from(e: BitAssertionFailed) -> Fail {
        Fail::Memory(MemoryOpFailure::from(e))
    }
}

fn parse_octal(s: &str) -> Result<Word, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    Word::from_str_radix(digits, 8).map_err(|e| format!("'{s}' is not an octal number: {e}"))
}

fn configure_memory(cli: &Cli) -> Result<MemoryUnit, Fail> {
    let mut mem = MemoryUnit::new(&MemoryConfiguration {
        variant: cli.variant.into(),
    });
    if cli.ebank > 7 {
        return Err(Fail::Initialisation(format!(
            "there is no erasable bank {:o}",
            cli.ebank
        )));
    }
    mem.registers_mut().set_ebank(cli.ebank << 8)?;
    mem.registers_mut().set_fbank(cli.fbank)?;
    mem.set_superbank(cli.superbank);
    event!(
        Level::DEBUG,
        "{} memory with EBANK={:o} FBANK={:o} superbank={}",
        mem.variant(),
        mem.registers().ebank(),
        mem.registers().fbank(),
        mem.superbank()
    );
    Ok(mem)
}

fn describe(addr: &AddressRef) -> String {
    match addr {
        AddressRef::Direct { address } => format!("direct {address:04o}"),
        AddressRef::Banked {
            memory_type,
            bank,
            offset,
        } => format!("{memory_type:?} bank {bank:o} offset {offset:04o}"),
        AddressRef::DeadBank => "dead bank".to_string(),
    }
}

fn describe_register(value: Word) -> String {
    if has_overflowed(value) {
        let sign = if is_negative(value, REGISTER_BITS) {
            "negative"
        } else {
            "positive"
        };
        format!("{value:06o} ({sign} overflow)")
    } else {
        format!("{value:06o}")
    }
}

fn arith(mem: &mut MemoryUnit, op: Op, a: Word, operand: Word, on_a: bool) -> Result<(), Fail> {
    mem.registers_mut().set_a(a)?;
    mem.write(&SCRATCH, operand)?;
    let target = if on_a { &ACCUMULATOR } else { &SCRATCH };
    match op {
        Op::Ad => cpu::ad(mem, &SCRATCH)?,
        Op::Com => cpu::com(mem)?,
        Op::Incr => cpu::incr(mem, target)?,
        Op::Aug => cpu::aug(mem, target)?,
        Op::Dim => cpu::dim(mem, target)?,
        Op::Su => cpu::su(mem, target)?,
        Op::Double => cpu::double(mem)?,
    }
    println!("A       = {}", describe_register(mem.registers().a()));
    println!("operand = {:05o}", mem.read(&SCRATCH)?);
    Ok(())
}

fn run_calculator() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // See
    // https://docs.rs/tracing-subscriber/0.3/tracing_subscriber/fmt/index.html#filtering-events-with-environment-variables
    // for instructions on how to select which trace messages get
    // printed.
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            return Err(Box::new(e));
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let mut mem = configure_memory(&cli)?;
    match cli.command {
        Command::Deduce { field } => {
            let addr = mem.deduce_address(field);
            println!("{field:04o} -> {}", describe(&addr));
        }
        Command::Arith {
            op,
            a,
            operand,
            on_a,
        } => {
            arith(&mut mem, op, a, operand, on_a)?;
        }
    }
    Ok(())
}

fn main() {
    match run_calculator() {
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Ok(()) => {
            std::process::exit(0);
        }
    }
}
