use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use turing_engine::{
    check_input, Driver, DriverConfig, MachineLibrary, Program, ProgramLoader, Status,
    TuringMachine, BLANK_SYMBOL, MACHINES, MAX_EXECUTION_STEPS,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
#[command(after_help = "EXAMPLES:
  turing-cli list
  turing-cli run --machine 2 --input aabb --debug
  turing-cli run --program machines/even-ones.tm --input 1010 --json
  cat machines/an-bn.tm | turing-cli run --input ab")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in machines
    List {
        /// Only show machines whose name contains this text
        query: Option<String>,
    },
    /// Run a machine on an input
    Run(RunArgs),
    /// Parse and validate definition files
    Check {
        /// Definition files (.tm or .json)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Built-in machine, by name or index
    #[arg(short, long, conflicts_with = "program")]
    machine: Option<String>,

    /// Definition file (.tm or .json). Read from stdin when neither this nor
    /// --machine is given
    #[arg(short, long)]
    program: Option<PathBuf>,

    /// The input written to the tape
    #[arg(short, long, default_value = "")]
    input: String,

    /// Print each configuration of the execution
    #[arg(short = 'd', long)]
    debug: bool,

    /// Give up after this many steps
    #[arg(long, default_value_t = MAX_EXECUTION_STEPS)]
    max_steps: usize,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let result = match cli.command {
        Command::List { query } => {
            list(query.as_deref().unwrap_or(""));
            Ok(())
        }
        Command::Run(args) => run(&args),
        Command::Check { files } => check(&files),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn list(query: &str) {
    for index in MachineLibrary::search(query) {
        let entry = &MACHINES[index];
        println!(
            "{index}: {:<20} Σ={:<8} {}",
            entry.name, entry.alphabet, entry.description
        );
    }
}

fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let mut machine = TuringMachine::new(load_program(args)?)?;

    check_input(&args.input)?;
    machine.load(&args.input);

    let driver = Driver::new(DriverConfig {
        max_steps: args.max_steps,
        record_trace: args.json && args.debug,
    });

    let report = if args.debug && !args.json {
        print_configuration(&machine);
        driver.run_with(&mut machine, |status, machine| {
            if status == Status::Running {
                print_configuration(machine);
            }
        })
    } else {
        driver.run(&mut machine)
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Machine: {}", machine.program().name);
        println!("Result: {}", report.outcome);
        println!("Steps: {}", report.last.steps);
        println!("Tape: {}", report.last.tape.trim_matches(BLANK_SYMBOL));
    }

    Ok(())
}

fn load_program(args: &RunArgs) -> Result<Program, Box<dyn Error>> {
    load_program_from(args, atty::isnt(atty::Stream::Stdin), io::stdin())
}

/// Resolves the program from `--machine`, `--program`, piped `stdin`, or the
/// first library machine, in that order.
fn load_program_from<R: Read>(
    args: &RunArgs,
    piped: bool,
    mut stdin: R,
) -> Result<Program, Box<dyn Error>> {
    let program = if let Some(query) = &args.machine {
        debug!(query = %query, "resolving library machine");
        MachineLibrary::resolve(query)?.program()
    } else if let Some(path) = &args.program {
        debug!(path = %path.display(), "loading definition file");
        ProgramLoader::load_program(path)?
    } else if piped {
        debug!("reading definition from stdin");
        let mut buffer = String::new();
        stdin.read_to_string(&mut buffer)?;
        ProgramLoader::load_program_from_string(&buffer)?
    } else {
        debug!("no program given, using the first library machine");
        MachineLibrary::entry_by_index(0)?.program()
    };

    Ok(program)
}

fn check(files: &[PathBuf]) -> Result<(), Box<dyn Error>> {
    let mut failures = 0;

    for path in files {
        match ProgramLoader::load_program(path) {
            Ok(program) => println!(
                "ok     {} ({}, {} rules, symbols {})",
                path.display(),
                program.name,
                program.rules.len(),
                program.rules.alphabet().into_iter().collect::<String>()
            ),
            Err(e) => {
                failures += 1;
                println!("error  {}: {}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {} definitions failed", files.len()).into());
    }

    Ok(())
}

/// Prints one configuration, marking the cell under the head with brackets.
fn print_configuration(machine: &TuringMachine) {
    let tape: String = machine
        .tape()
        .cells()
        .enumerate()
        .map(|(i, symbol)| {
            if i == machine.head() {
                format!("[{symbol}]")
            } else {
                format!(" {symbol} ")
            }
        })
        .collect();

    println!(
        "Step: {:>4}, State: {:<8} Tape: {}",
        machine.step_count(),
        machine.state(),
        tape
    );
}
