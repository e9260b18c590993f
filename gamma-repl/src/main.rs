mod error;

use clap::Parser;
use error::{report, report_syntax_error};
use gamma_cards::{CardRecord, Config, Gamma, Parameters};
use gamma_compute::eval::Limits;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs, io::{self, IsTerminal, Read}, path::PathBuf, process::ExitCode};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Shows the result cards Gamma finds for math input, such as `diff(cos(x)^7, x)`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// A file with one input per line. Without it, input is read from stdin, or interactively
    /// from a terminal.
    file: Option<PathBuf>,

    /// Evaluate this card for every input instead of listing the cards that apply.
    #[arg(long)]
    card: Option<String>,

    /// Describe the card instead of evaluating it.
    #[arg(long, requires = "card", conflicts_with = "params")]
    info: bool,

    /// The variable the card works with.
    #[arg(long, default_value = "x")]
    var: String,

    /// A parameter of the card, as `name=value`. Can be repeated.
    #[arg(long = "param", value_parser = parse_parameter, requires = "card")]
    params: Vec<(String, String)>,

    /// The number of evaluation steps each input may take.
    #[arg(long)]
    steps: Option<usize>,

    /// The number of significant digits in numeric approximations.
    #[arg(long)]
    digits: Option<u32>,
}

fn parse_parameter(text: &str) -> Result<(String, String), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected `name=value`, got `{}`", text))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

/// What to do with each input.
enum Mode {
    /// List the cards that apply.
    Cards,

    /// Describe a single card.
    Info {
        id: String,
        var: String,
    },

    /// Evaluate a single card.
    Card {
        id: String,
        var: String,
        parameters: Parameters,
    },
}

struct Session {
    gamma: Gamma,
    mode: Mode,
}

impl Session {
    fn new(cli: &Cli) -> Self {
        let mut limits = Limits::builder();
        if let Some(steps) = cli.steps {
            limits = limits.max_steps(steps);
        }
        let mut config = Config::builder().limits(limits.build());
        if let Some(digits) = cli.digits {
            config = config.digits(digits);
        }

        let mode = match &cli.card {
            Some(id) if cli.info => Mode::Info { id: id.clone(), var: cli.var.clone() },
            Some(id) => Mode::Card {
                id: id.clone(),
                var: cli.var.clone(),
                parameters: cli.params.iter().cloned().collect(),
            },
            None => Mode::Cards,
        };
        Self { gamma: Gamma::new(config.build()), mode }
    }

    /// Handles a single input, printing the results to stdout and errors to stderr.
    fn run(&self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            return;
        }
        debug!(input, "handling input");

        match &self.mode {
            Mode::Cards => print_records(&self.gamma.classify_and_evaluate(input)),
            Mode::Info { id, var } => match self.gamma.get_card_info(id, input, var) {
                Ok(info) => {
                    println!("{} (variable {})", info.title, info.var);
                    if let Some(input) = info.input {
                        println!("    {}", input);
                    }
                    if !info.pre_output.is_empty() {
                        println!("    {}", info.pre_output);
                    }
                },
                Err(err) => report(&err),
            },
            Mode::Card { id, var, parameters } => {
                match self.gamma.evaluate_card(id, input, var, parameters) {
                    Ok(output) => {
                        println!("{}", output.value);
                        println!("    {}", output.output);
                    },
                    Err(err) => report(&err),
                }
            },
        }
    }

    /// Handles every line of the text.
    fn run_all(&self, text: &str) {
        text.lines().for_each(|line| self.run(line));
    }
}

fn print_records(records: &[CardRecord]) {
    for record in records {
        match record {
            CardRecord::Output { title, input, output } => {
                if input.is_empty() {
                    println!("{}", title);
                } else {
                    println!("{}: {}", title, input);
                }
                if let Some(output) = output {
                    println!("    {}", output);
                }
            },
            CardRecord::Error { error, .. } => eprintln!("error: {}", error),
            CardRecord::SyntaxError { exception_info, .. } => report_syntax_error(exception_info),
            CardRecord::Card { card, var, title, input, pre_output, parameters } => {
                println!("[{}] {} (variable {})", card, title, var);
                if let Some(input) = input {
                    println!("    {}", input);
                }
                if !pre_output.is_empty() {
                    println!("    {}", pre_output);
                }
                if !parameters.is_empty() {
                    println!("    parameters: {}", parameters.join(", "));
                }
            },
        }
    }
}

fn interactive(session: &Session) -> Result<(), ReadlineError> {
    let mut rl = DefaultEditor::new()?;

    fn process_line(rl: &mut DefaultEditor, session: &Session) -> Result<(), ReadlineError> {
        let input = rl.readline("> ")?;
        if input.trim().is_empty() {
            return Ok(());
        }

        rl.add_history_entry(&input)?;

        session.run(&input);
        Ok(())
    }

    loop {
        match process_line(&mut rl, session) {
            Ok(()) => (),
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => return Ok(()),
            Err(err) => return Err(err),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let session = Session::new(&cli);

    if let Some(path) = &cli.file {
        // one input per line of the file
        match fs::read_to_string(path) {
            Ok(text) => session.run_all(&text),
            Err(err) => {
                eprintln!("error: cannot read {}: {}", path.display(), err);
                return ExitCode::FAILURE;
            },
        }
    } else if !io::stdin().is_terminal() {
        let mut text = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut text) {
            eprintln!("error: cannot read stdin: {}", err);
            return ExitCode::FAILURE;
        }
        session.run_all(&text);
    } else if let Err(err) = interactive(&session) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use super::*;

    fn session(args: &[&str]) -> Session {
        let cli = Cli::try_parse_from(std::iter::once("gamma").chain(args.iter().copied())).unwrap();
        Session::new(&cli)
    }

    #[test]
    fn arguments_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn modes() {
        assert!(matches!(session(&[]).mode, Mode::Cards));
        assert!(matches!(
            session(&["--card", "diff", "--info", "--var", "y"]).mode,
            Mode::Info { ref id, ref var } if id == "diff" && var == "y",
        ));
        match session(&["--card", "approximator", "--param", "digits = 5"]).mode {
            Mode::Card { id, parameters, .. } => {
                assert_eq!(id, "approximator");
                assert_eq!(parameters.get("digits").map(String::as_str), Some("5"));
            },
            _ => panic!("expected the card mode"),
        }
    }

    #[test]
    fn info_needs_a_card() {
        assert!(Cli::try_parse_from(["gamma", "--info"]).is_err());
        assert!(Cli::try_parse_from(["gamma", "--card", "diff", "--info", "--param", "a=1"]).is_err());
    }
}
