//! Canopy CLI: a console for browsing and editing a remote JSON tree.
//!
//! Three modes:
//! - **Shell mode**: `canopy [flags] COMMAND`: single command, exit
//! - **REPL mode**: `canopy [flags]`: interactive prompt (if stdin is TTY)
//! - **Pipe mode**: `echo "get users" | canopy --url my-project`: line-by-line from stdin

mod commands;
mod format;
mod parse;
mod repl;
mod state;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use tracing_subscriber::EnvFilter;

use canopy_executor::{Console, ConsoleConfig, Error, CONFIG_FILE_NAME};
use canopy_intelligence::PlanGenerator;

use commands::build_cli;
use format::{format_error, OutputMode};
use parse::matches_to_action;
use state::{ConfirmMode, SessionState};

fn main() {
    init_tracing();

    let cli = build_cli();
    let matches = cli.get_matches();

    // Handle `init` before loading any config.
    if matches.subcommand_name() == Some("init") {
        run_init();
        return;
    }

    // Determine output mode
    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else if matches.get_flag("raw") {
        OutputMode::Raw
    } else {
        OutputMode::Human
    };

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(1);
        }
    };

    let interactive = matches.subcommand().is_none() && std::io::stdin().is_terminal();
    let confirm = if matches.get_flag("yes") {
        ConfirmMode::Assume
    } else if interactive {
        ConfirmMode::Ask
    } else {
        ConfirmMode::Refuse
    };

    let planner = config
        .model
        .as_ref()
        .map(|model| Box::new(model.planner()) as Box<dyn PlanGenerator>);
    let console = Console::new(config.view.tree_view());
    let mut state = SessionState::new(console, planner, confirm);

    if let Err(e) = connect_initial(&matches, &config, &mut state) {
        eprintln!("{}", format_error(&e, output_mode));
        process::exit(1);
    }

    // Dispatch mode
    if matches.subcommand().is_some() {
        // Shell mode: parse, execute, format, exit
        let exit_code = match matches_to_action(&matches) {
            Ok(action) => {
                if repl::execute_action(action, &mut state, output_mode) {
                    0
                } else {
                    1
                }
            }
            Err(e) => {
                eprintln!("(error) {}", e);
                1
            }
        };
        process::exit(exit_code);
    } else if interactive {
        repl::run_repl(&mut state, output_mode);
    } else {
        let exit_code = repl::run_pipe(&mut state, output_mode);
        process::exit(exit_code);
    }
}

/// Log to stderr, filtered by `CANOPY_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CANOPY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// `--config PATH` must exist; `./canopy.toml` is optional.
fn load_config(matches: &clap::ArgMatches) -> Result<ConsoleConfig, Error> {
    match matches.get_one::<String>("config") {
        Some(path) => ConsoleConfig::from_file(&PathBuf::from(path)),
        None => ConsoleConfig::load_or_default(Path::new(CONFIG_FILE_NAME)),
    }
}

/// Flags win over the config file; `--memory` wins over both.
fn connect_initial(
    matches: &clap::ArgMatches,
    config: &ConsoleConfig,
    state: &mut SessionState,
) -> Result<(), Error> {
    if matches.get_flag("memory") {
        return state.connect(canopy_store::MEMORY_LOCATION, None);
    }
    let url = matches
        .get_one::<String>("url")
        .cloned()
        .or_else(|| config.store.url.clone());
    let auth = matches
        .get_one::<String>("auth")
        .cloned()
        .or_else(|| config.store.auth.clone());
    match url {
        Some(url) => state.connect(&url, auth.as_deref()),
        None => Ok(()),
    }
}

fn run_init() {
    let path = Path::new(CONFIG_FILE_NAME);
    match ConsoleConfig::write_default_if_missing(path) {
        Ok(true) => println!("Wrote {}", path.display()),
        Ok(false) => println!("{} already exists; left unchanged", path.display()),
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(1);
        }
    }
}
