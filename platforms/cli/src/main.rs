use automata::{unreachable_states, DocumentLoader, Step, Symbol, Tape, TuringMachine};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Runs Turing machines and DFAs stored as JSON documents.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  automata-cli tm machine.json --input aab
  automata-cli tm machine.json --input \".a,.b,.a\" --separator ,
  automata-cli dfa automaton.json aabb ccaa
  cat machine.json | automata-cli tm -")]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Log every step of the execution
    #[clap(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run a Turing machine document
    Tm {
        /// Machine document, or `-` to read it from stdin
        file: String,

        /// Replace the saved tape with this input, one symbol per character
        /// unless --separator is given. The machine is reset to its start state.
        #[clap(short, long)]
        input: Option<String>,

        /// Split --input on this string, for symbols longer than one character
        #[clap(long, requires = "input")]
        separator: Option<String>,

        /// Stop after this many steps even if the machine has not halted
        #[clap(short, long)]
        max_steps: Option<usize>,

        /// Write the machine, with its final tape and state, to this file
        #[clap(short, long)]
        save: Option<PathBuf>,
    },
    /// Evaluate words with a DFA document
    Dfa {
        /// Automaton document
        file: PathBuf,

        /// Words to evaluate
        words: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "automata=trace" } else { "automata=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Tm {
            file,
            input,
            separator,
            max_steps,
            save,
        } => {
            let input = input.map(|input| input_symbols(&input, separator.as_deref()));
            run_turing(&file, input, max_steps, save.as_deref())
        }
        Command::Dfa { file, words } => run_dfa(&file, &words),
    }
}

fn run_turing(
    file: &str,
    input: Option<Vec<Symbol>>,
    max_steps: Option<usize>,
    save: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let mut machine = if file == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        DocumentLoader::load_turing_from_string(&content)?
    } else {
        DocumentLoader::load_turing(Path::new(file))?
    };

    let definition = machine.definition().clone();
    let unreachable = unreachable_states(
        definition.start(),
        definition.states(),
        &**definition.transitions(),
    );
    if !unreachable.is_empty() {
        warn!("Unreachable states: {}", unreachable.join(", "));
    }

    if let Some(input) = input {
        let tape = definition.input_tape(input)?;
        machine.load_tape(tape);
        machine.reset();
    }

    let accepted = match max_steps {
        Some(limit) => match run_bounded(&mut machine, limit) {
            Some(accepted) => accepted,
            None => {
                println!("Machine did not halt within {limit} steps.");
                report_tape(machine.tape(), machine.state());
                return save_machine(&machine, save);
            }
        },
        None => machine.run(),
    };

    if let Some(halt) = machine.last_halt() {
        println!("Machine halted: {halt}");
    }
    println!("{}", if accepted { "Accepted" } else { "Rejected" });
    report_tape(machine.tape(), machine.state());

    save_machine(&machine, save)
}

/// Splits the `--input` argument into tape symbols.
///
/// # Arguments
///
/// * `input` - The raw argument. An empty string is an empty tape.
/// * `separator` - Delimiter between symbols, or `None` for one symbol per character.
fn input_symbols(input: &str, separator: Option<&str>) -> Vec<Symbol> {
    match separator {
        _ if input.is_empty() => Vec::new(),
        Some(separator) if !separator.is_empty() => {
            input.split(separator).map(Symbol::from).collect()
        }
        _ => input.chars().map(Symbol::from).collect(),
    }
}

/// Steps the machine at most `limit` times. `None` means it was still running.
fn run_bounded(machine: &mut TuringMachine, limit: usize) -> Option<bool> {
    for _ in 0..limit {
        if let Step::Halt(halt) = machine.step() {
            return Some(halt.is_accepted());
        }
    }
    None
}

fn report_tape(tape: &Tape, state: &str) {
    println!("State: {state}");
    println!("Tape: {tape}");
    println!("Head: {}", tape.head());
}

fn save_machine(machine: &TuringMachine, save: Option<&Path>) -> Result<(), Box<dyn Error>> {
    if let Some(path) = save {
        automata::save_turing(machine, path)?;
    }
    Ok(())
}

fn run_dfa(file: &Path, words: &[String]) -> Result<(), Box<dyn Error>> {
    let dfa = DocumentLoader::load_dfa(file)?;

    let unreachable = unreachable_states(dfa.start(), dfa.states(), &**dfa.transitions());
    if !unreachable.is_empty() {
        warn!("Unreachable states: {}", unreachable.join(", "));
    }

    for word in words {
        println!("{word}:");
        println!("{}", dfa.evaluate_str(word));
    }

    Ok(())
}
