use std::{
    io::{self, BufRead, IsTerminal, Write},
    path::PathBuf,
    process::ExitCode,
};

use chrono::NaiveDate;
use clap::{Parser, Subcommand, error::ErrorKind};
use colored::Colorize;
use helden_lib::{
    Session,
    clock::FixedClock,
    session::config::CoreConfig,
};
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod measurement;
mod profile;
mod view;

#[derive(Parser, Debug)]
#[command(name = "helden")]
#[command(author, version, about)]
struct Cli {
    /// Use this configuration file instead of the default one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `helden_lib=trace` (defaults to $RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Stamp new measurements with this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    today: Option<NaiveDate>,
}

/// One line of input
#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "helden")]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Operate on profiles
    #[command(subcommand)]
    Profile(profile::Command),
    /// Set the start weight and private code of the active profile
    Start { weight: String, code: Option<String> },
    /// Record a new weight for the active profile
    Measure { weight: String },
    /// Show raw weights if the code is correct
    Unlock { code: Option<String> },
    /// Hide raw weights again
    Hide,
    /// Show the active profile's progress
    View,
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // Logging
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::from_default_env(),
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let cfg = match &cli.config {
        Some(path) => CoreConfig::load_from(path),
        None => CoreConfig::load(),
    };
    let cfg = match cfg {
        Ok(cfg) => cfg.into_handle(),
        Err(err) => {
            error!("Failed to load configuration: {err}");
            eprintln!("{} {err}", "error:".red().bold());
            return sysexits::ExitCode::Config.into();
        }
    };

    let mut session = match cli.today {
        Some(date) => Session::with_clock(cfg, FixedClock(date)),
        None => Session::new(cfg),
    };

    match run(&mut session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Failed to read input: {err}");
            sysexits::ExitCode::IoErr.into()
        }
    }
}

fn run(session: &mut Session) -> io::Result<()> {
    let interactive = io::stdin().is_terminal();
    let mut lines = io::stdin().lock().lines();

    view::print(&session.current_view(), session);

    loop {
        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }

        let Some(line) = lines.next().transpose()? else {
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        let line = match parse_line(&line) {
            Ok(line) => line,
            Err(err) => {
                err.print()?;
                continue;
            }
        };

        match &line.command {
            Command::Profile(cmd) => profile::handle(session, cmd),
            Command::Start { weight, code } => {
                measurement::start(session, weight, code.as_deref().unwrap_or_default())
            }
            Command::Measure { weight } => measurement::measure(session, weight),
            Command::Unlock { code } => {
                session.submit_code(code.as_deref().unwrap_or_default());
                view::print_message(session);
            }
            Command::Hide => session.hide(),
            Command::View => view::print(&session.current_view(), session),
            Command::Quit => return Ok(()),
        }
    }
}

/// Split a line into words the way a shell would, so quoted codes and names
/// keep their spaces, and parse the words as a command.
fn parse_line(input: &str) -> Result<Line, clap::Error> {
    let words = shell_words::split(input)
        .map_err(|err| clap::Error::raw(ErrorKind::InvalidValue, format!("{err}\n")))?;

    Line::try_parse_from(words)
}
