//! REPL loop with rustyline, plus the action dispatcher shared by all modes.
//!
//! Interactive mode: prompt, meta-commands, history, TAB completion.
//! Pipe mode: read lines from stdin, execute each.

use std::io::{self, BufRead, Write};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Editor, Helper};

use canopy_executor::Error;

use crate::commands::build_repl_cmd;
use crate::format::{
    format_error, format_message, format_output, format_plan, format_report, format_status,
    format_tree, OutputMode,
};
use crate::parse::{check_meta_command, matches_to_action, CliAction, ConsoleOp, MetaCommand};
use crate::state::{ConfirmMode, SessionState};

/// Run the interactive REPL.
pub fn run_repl(state: &mut SessionState, mode: OutputMode) {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .build();

    let mut rl: Editor<CanopyHelper, _> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("(error) cannot start line editor: {}", e);
            return;
        }
    };
    rl.set_helper(Some(CanopyHelper));

    // Load history
    let history_path = history_file();
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = state.prompt();
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(trimmed);

                // Check meta-commands first
                if let Some(meta) = check_meta_command(trimmed) {
                    match meta {
                        MetaCommand::Quit => break,
                        MetaCommand::Clear => {
                            // ANSI clear screen
                            print!("\x1B[2J\x1B[1;1H");
                        }
                        MetaCommand::Help { command } => {
                            print_help(command.as_deref());
                        }
                    }
                    continue;
                }

                run_line(trimmed, state, mode);
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C: just show new prompt
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D: exit
                break;
            }
            Err(err) => {
                eprintln!("(error) {:?}", err);
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }
}

/// Run in pipe mode: read lines from stdin, execute each.
pub fn run_pipe(state: &mut SessionState, mode: OutputMode) -> i32 {
    let stdin = io::stdin();
    let mut exit_code = 0;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if !run_line(trimmed, state, mode) {
            exit_code = 1;
        }
    }

    exit_code
}

/// Tokenize, parse, and execute one line. Returns true on success.
fn run_line(line: &str, state: &mut SessionState, mode: OutputMode) -> bool {
    // Tokenize with shlex (respects quotes)
    let tokens = match shlex::split(line) {
        Some(t) if !t.is_empty() => t,
        Some(_) => return true,
        None => {
            eprintln!("(error) Invalid quoting: {}", line);
            return false;
        }
    };

    let matches = match build_repl_cmd().try_get_matches_from(tokens) {
        Ok(m) => m,
        Err(e) => {
            // clap error: show help text
            eprintln!("{}", e);
            return false;
        }
    };

    match matches_to_action(&matches) {
        Ok(action) => execute_action(action, state, mode),
        Err(e) => {
            eprintln!("(error) {}", e);
            false
        }
    }
}

/// Execute a parsed action. Returns true on success, false on error.
pub fn execute_action(action: CliAction, state: &mut SessionState, mode: OutputMode) -> bool {
    let result = match action {
        CliAction::Execute(cmd) => state
            .execute(cmd)
            .map(|output| format_output(&output, mode)),
        CliAction::Console(op) => execute_console_op(op, state, mode),
        CliAction::Meta(_) => Err(Error::invalid_state(
            "meta-commands are only available in REPL mode",
        )),
    };
    match result {
        Ok(text) => {
            if !text.is_empty() {
                println!("{}", text);
            }
            true
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            false
        }
    }
}

fn execute_console_op(
    op: ConsoleOp,
    state: &mut SessionState,
    mode: OutputMode,
) -> canopy_executor::Result<String> {
    let ok = || format_message("OK", mode);
    match op {
        ConsoleOp::Connect { target, auth } => {
            state.connect(&target, auth.as_deref())?;
            Ok(format_status(state.console().connection(), mode))
        }
        ConsoleOp::Disconnect => {
            state.disconnect();
            Ok(ok())
        }
        ConsoleOp::Status => Ok(format_status(state.console().connection(), mode)),
        ConsoleOp::Refresh => {
            state.console_mut().refresh()?;
            Ok(format_tree(&state.console().visible_nodes(), mode))
        }
        ConsoleOp::Tree { depth } => {
            state.console().executor()?;
            if let Some(depth) = depth {
                state.console_mut().view_mut().expand_to_depth(depth);
            }
            Ok(format_tree(&state.console().visible_nodes(), mode))
        }
        ConsoleOp::Set { path, raw } => {
            let console = state.console_mut();
            console.begin_edit(&path)?;
            match console.commit_edit(&path, &raw) {
                Ok(_) => Ok(ok()),
                Err(e) => {
                    console.cancel_edit(&path);
                    Err(e)
                }
            }
        }
        ConsoleOp::Update { path, value } => {
            state.console_mut().merge(&path, value)?;
            Ok(ok())
        }
        ConsoleOp::Add { path, key, raw } => {
            let console = state.console_mut();
            console.begin_child(&path)?;
            match console.commit_child(&path, &key, &raw) {
                Ok(child) => Ok(format_message(&format!("Added {}", child), mode)),
                Err(e) => {
                    console.cancel_child(&path);
                    Err(e)
                }
            }
        }
        ConsoleOp::Delete { path } => {
            let pending = state.console().request_delete(&path)?;
            let question = format!("Delete {} and everything under it?", pending.path());
            if !confirmed(state.confirm_mode(), &question)? {
                return Ok(format_message("Cancelled", mode));
            }
            state.console_mut().confirm_delete(pending)?;
            Ok(ok())
        }
        ConsoleOp::Expand { path } => {
            state.console_mut().view_mut().expand(&path);
            Ok(String::new())
        }
        ConsoleOp::Collapse { path } => {
            state.console_mut().view_mut().collapse(&path);
            Ok(String::new())
        }
        ConsoleOp::Toggle { path } => {
            let expanded = state.console_mut().view_mut().toggle(&path);
            let word = if expanded { "expanded" } else { "collapsed" };
            Ok(format_message(word, mode))
        }
        ConsoleOp::ExpandAll => {
            state.console_mut().view_mut().expand_all();
            Ok(String::new())
        }
        ConsoleOp::CollapseAll => {
            state.console_mut().view_mut().collapse_all();
            Ok(String::new())
        }
        ConsoleOp::Plan { instruction, at } => {
            let shown = format_plan(state.propose_plan(&instruction, at)?, mode);
            let apply = match state.confirm_mode() {
                ConfirmMode::Assume => true,
                ConfirmMode::Refuse => false,
                ConfirmMode::Ask => {
                    println!("{}", shown);
                    if ask("Apply this plan?")? {
                        true
                    } else {
                        return Ok(format_message(
                            "Plan kept; use 'confirm' to apply or 'discard' to drop it",
                            mode,
                        ));
                    }
                }
            };
            if !apply {
                return Ok(format!(
                    "{}\n{}",
                    shown,
                    format_message("Plan not applied; run 'confirm' or pass --yes", mode)
                ));
            }
            let report = state.confirm_plan()?;
            if state.confirm_mode() == ConfirmMode::Ask {
                Ok(format_report(&report, mode))
            } else {
                Ok(format!("{}\n{}", shown, format_report(&report, mode)))
            }
        }
        ConsoleOp::ShowPlan => match state.plans().plan() {
            Some(plan) => Ok(format_plan(plan, mode)),
            None => Err(Error::invalid_state("no plan awaiting confirmation")),
        },
        ConsoleOp::Confirm => {
            let report = state.confirm_plan()?;
            Ok(format_report(&report, mode))
        }
        ConsoleOp::Discard => {
            state.discard_plan()?;
            Ok(format_message("Plan discarded", mode))
        }
    }
}

/// Resolve a confirmation under the session's policy.
fn confirmed(policy: ConfirmMode, question: &str) -> canopy_executor::Result<bool> {
    match policy {
        ConfirmMode::Assume => Ok(true),
        ConfirmMode::Refuse => Err(Error::invalid_input(
            "refusing without confirmation; pass --yes",
        )),
        ConfirmMode::Ask => ask(question),
    }
}

/// Ask a y/N question on the terminal. Anything but y/yes is a no.
fn ask(question: &str) -> canopy_executor::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout()
        .flush()
        .map_err(|e| Error::invalid_state(format!("cannot prompt: {}", e)))?;
    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .map_err(|e| Error::invalid_state(format!("cannot read answer: {}", e)))?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn history_file() -> Option<String> {
    std::env::var("HOME")
        .ok()
        .map(|h| format!("{}/.canopy_history", h))
}

fn print_help(command: Option<&str>) {
    if let Some(cmd) = command {
        // Show help for a specific command
        let cli = build_repl_cmd();
        match cli.try_get_matches_from(vec![cmd, "--help"]) {
            Ok(_) => {}
            Err(e) => println!("{}", e),
        }
    } else {
        println!("Available commands:");
        println!("  connect      Connect to a store (URL, project id, or memory:)");
        println!("  disconnect   Drop the connection");
        println!("  status       Show the connection");
        println!("  ping         Probe the store");
        println!("  tree         Render the tree (--depth N resets expansion)");
        println!("  refresh      Re-read the whole tree");
        println!("  get          Read a subtree");
        println!("  keys         List keys under a path");
        println!("  set          Replace a value (type is inferred)");
        println!("  update       Merge a JSON object into a value");
        println!("  add          Add a child under a path");
        println!("  del          Delete a subtree");
        println!("  expand       Expand a node (also collapse, toggle, expand-all, collapse-all)");
        println!("  plan         Turn an instruction into an action plan");
        println!("  show-plan    Show the proposed plan");
        println!("  confirm      Apply the proposed plan");
        println!("  discard      Drop the proposed plan");
        println!();
        println!("Meta-commands:");
        println!("  help [command]         Show help");
        println!("  quit / exit            Exit REPL");
        println!("  clear                  Clear screen");
    }
}

// =========================================================================
// TAB Completion
// =========================================================================

/// Known top-level commands for TAB completion.
const TOP_LEVEL_COMMANDS: &[&str] = &[
    "connect",
    "disconnect",
    "status",
    "ping",
    "tree",
    "refresh",
    "get",
    "keys",
    "set",
    "update",
    "add",
    "del",
    "expand",
    "collapse",
    "toggle",
    "expand-all",
    "collapse-all",
    "plan",
    "show-plan",
    "confirm",
    "discard",
    "help",
    "quit",
    "exit",
    "clear",
];

struct CanopyHelper;

impl Helper for CanopyHelper {}
impl Validator for CanopyHelper {}
impl Highlighter for CanopyHelper {}
impl Hinter for CanopyHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Completer for CanopyHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_pos = &line[..pos];
        let parts: Vec<&str> = line_to_pos.split_whitespace().collect();
        let trailing_space = line_to_pos.ends_with(' ');

        if parts.is_empty() || (parts.len() == 1 && !trailing_space) {
            // Completing top-level command
            let prefix = parts.first().copied().unwrap_or("");
            let start = pos - prefix.len();
            let candidates: Vec<Pair> = TOP_LEVEL_COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(prefix))
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect();
            Ok((start, candidates))
        } else {
            Ok((pos, vec![]))
        }
    }
}
