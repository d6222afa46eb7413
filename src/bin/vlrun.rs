use clap::{Parser, ValueEnum};
use clap_num::maybe_hex;
use itertools::Itertools;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use vltest::fixtures;
use vltest::harness::EventLog;
use vltest::mem::Memory;
use vltest::program::{Status, VlTest};
use vltest::unit::{SoftVectorUnit, VectorUnit};

/// Run the vector-length smoke-test fixtures
///
/// Each fixture negotiates vector lengths for a shrinking element
/// count against a software vector unit, optionally loading the
/// elements as it goes, and reports completion. The observable event
/// trace is printed after each run.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
struct Args {
    /// Which fixture to run
    #[arg(value_enum, default_value = "all")]
    fixture: Fixture,

    /// Vector register width in bits
    #[arg(long, default_value_t = 128)]
    vlen: u32,

    /// Base address of the vle32 fixture's data buffer
    #[arg(long, value_parser = maybe_hex::<u32>, default_value_t = 0x1000)]
    base: u32,

    /// Single step through each iteration and print unit state
    #[arg(short, long)]
    debug: bool,
}

#[derive(ValueEnum, Copy, Clone, PartialEq, Eq, Debug)]
enum Fixture {
    VsetvliM1,
    VsetvliM2,
    Vle32,
    All,
}

fn press_enter_to_continue() {
    let mut stdin = io::stdin();
    let mut stdout = io::stdout();

    write!(stdout, "Press enter to continue...").unwrap();
    stdout.flush().unwrap();

    // Read a single byte and discard
    let _ = stdin.read(&mut [0u8]).unwrap();
}

fn run_fixture(name: &str, mut program: VlTest, mem: &Memory, args: &Args) -> bool {
    let mut unit = SoftVectorUnit::new(args.vlen);
    let mut log = EventLog::new();

    println!("{name}: {} elements at VLEN={}", program.remaining(), args.vlen);

    let outcome = if args.debug {
        loop {
            match program.step(&mut unit, mem, &mut log) {
                Ok(Status::Running) => {
                    println!(
                        "iteration {}: vl={} remaining={}",
                        program.iterations(),
                        unit.vl(),
                        program.remaining()
                    );
                    press_enter_to_continue();
                }
                Ok(Status::Done) => break Ok(()),
                Err(e) => break Err(e),
            }
        }
    } else {
        program.run(&mut unit, mem, &mut log).map(|_| ())
    };

    let trace = log
        .drain()
        .iter()
        .map(|event| format!("  {event}"))
        .join("\n");
    if !trace.is_empty() {
        println!("{trace}");
    }

    match outcome {
        Ok(()) => {
            println!("{name}: complete after {} iterations\n", program.iterations());
            true
        }
        Err(e) => {
            eprintln!("{name}: failed: {e}\n");
            false
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut passed = true;

    if matches!(args.fixture, Fixture::VsetvliM1 | Fixture::All) {
        let mem = Memory::default();
        passed &= run_fixture("vsetvli_m1", fixtures::vsetvli_m1(), &mem, &args);
    }
    if matches!(args.fixture, Fixture::VsetvliM2 | Fixture::All) {
        let mem = Memory::default();
        passed &= run_fixture("vsetvli_m2", fixtures::vsetvli_m2(), &mem, &args);
    }
    if matches!(args.fixture, Fixture::Vle32 | Fixture::All) {
        let mut mem = Memory::default();
        match fixtures::vle32(&mut mem, args.base) {
            Ok(program) => passed &= run_fixture("vle32", program, &mem, &args),
            Err(e) => {
                eprintln!("vle32: buffer setup failed: {e}\n");
                passed = false;
            }
        }
    }

    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
