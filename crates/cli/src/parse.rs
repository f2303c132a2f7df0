//! ArgMatches → Command/ConsoleOp/MetaCommand conversion.
//!
//! Translates clap's parsed arguments into the appropriate action:
//! - Read-only store commands → `CliAction::Execute(Command)`
//! - Anything that touches the snapshot, view, or plan → `CliAction::Console`
//! - REPL meta-commands → `CliAction::Meta`

use clap::ArgMatches;

use canopy_core::{TreePath, TreeValue};
use canopy_executor::Command;

/// The result of parsing user input.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// A read-only command executed directly against the store.
    Execute(Command),
    /// An operation on the console session.
    Console(ConsoleOp),
    /// A REPL-only meta-command.
    #[allow(dead_code)]
    Meta(MetaCommand),
}

/// Operations that go through the console (snapshot, view state, plans).
#[derive(Debug, PartialEq)]
pub enum ConsoleOp {
    /// Connect to a store URL, or to the in-memory store
    Connect {
        /// Store URL or `memory`
        target: String,
        /// Auth token appended to every request
        auth: Option<String>,
    },
    /// Drop the connection and all session state
    Disconnect,
    /// Show connection and plan state
    Status,
    /// Re-read the whole tree
    Refresh,
    /// Render the visible tree
    Tree {
        /// Expand this many levels instead of the saved view state
        depth: Option<usize>,
    },
    /// Overwrite a node with an inferred value
    Set {
        /// Node to overwrite
        path: TreePath,
        /// Text typed by the user, inferred like an edit
        raw: String,
    },
    /// Merge JSON keys into a node
    Update {
        /// Node to merge into
        path: TreePath,
        /// Object of keys to replace
        value: TreeValue,
    },
    /// Add a child under a node
    Add {
        /// Parent node
        path: TreePath,
        /// New child key
        key: String,
        /// Child value text, inferred like a new child
        raw: String,
    },
    /// Remove a node
    Delete {
        /// Node to remove
        path: TreePath,
    },
    /// Expand a node in the view
    Expand {
        /// Node to expand
        path: TreePath,
    },
    /// Collapse a node in the view
    Collapse {
        /// Node to collapse
        path: TreePath,
    },
    /// Flip a node between expanded and collapsed
    Toggle {
        /// Node to flip
        path: TreePath,
    },
    /// Expand every container
    ExpandAll,
    /// Collapse every container
    CollapseAll,
    /// Ask the generator for a plan
    Plan {
        /// Natural-language request
        instruction: String,
        /// Scope the context to this subtree
        at: Option<TreePath>,
    },
    /// Show the pending plan
    ShowPlan,
    /// Execute the pending plan
    Confirm,
    /// Drop the pending plan
    Discard,
}

/// REPL meta-commands.
#[derive(Debug, PartialEq)]
pub enum MetaCommand {
    /// Show help, optionally for one command
    Help {
        /// Command to describe
        command: Option<String>,
    },
    /// Leave the REPL
    Quit,
    /// Clear the screen
    Clear,
}

/// Check for REPL meta-commands before delegating to clap.
///
/// Returns `Some(MetaCommand)` if the line is a meta-command, `None` otherwise.
pub fn check_meta_command(line: &str) -> Option<MetaCommand> {
    let trimmed = line.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next()?;

    match cmd {
        "quit" | "exit" => Some(MetaCommand::Quit),
        "clear" => Some(MetaCommand::Clear),
        "help" => {
            let command = parts
                .next()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            Some(MetaCommand::Help { command })
        }
        _ => None,
    }
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, sub) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    let op = match sub_name {
        "get" => {
            return Ok(CliAction::Execute(Command::Read {
                path: optional_path(sub)?,
            }))
        }
        "keys" => {
            return Ok(CliAction::Execute(Command::Keys {
                path: optional_path(sub)?,
            }))
        }
        "ping" => return Ok(CliAction::Execute(Command::Probe)),
        "connect" => ConsoleOp::Connect {
            target: required(sub, "target")?.to_string(),
            auth: sub.get_one::<String>("token").cloned(),
        },
        "disconnect" => ConsoleOp::Disconnect,
        "status" => ConsoleOp::Status,
        "refresh" => ConsoleOp::Refresh,
        "tree" => ConsoleOp::Tree {
            depth: sub.get_one::<usize>("depth").copied(),
        },
        "set" => ConsoleOp::Set {
            path: required_path(sub)?,
            raw: required(sub, "value")?.to_string(),
        },
        "update" => ConsoleOp::Update {
            path: required_path(sub)?,
            value: parse_object(required(sub, "value")?)?,
        },
        "add" => ConsoleOp::Add {
            path: required_path(sub)?,
            key: required(sub, "key")?.to_string(),
            raw: required(sub, "value")?.to_string(),
        },
        "del" => ConsoleOp::Delete {
            path: required_path(sub)?,
        },
        "expand" => ConsoleOp::Expand {
            path: required_path(sub)?,
        },
        "collapse" => ConsoleOp::Collapse {
            path: required_path(sub)?,
        },
        "toggle" => ConsoleOp::Toggle {
            path: required_path(sub)?,
        },
        "expand-all" => ConsoleOp::ExpandAll,
        "collapse-all" => ConsoleOp::CollapseAll,
        "plan" => {
            let words: Vec<&str> = sub
                .get_many::<String>("instruction")
                .map(|vals| vals.map(String::as_str).collect())
                .unwrap_or_default();
            let at = match sub.get_one::<String>("at") {
                Some(raw) => Some(parse_path(raw)?),
                None => None,
            };
            ConsoleOp::Plan {
                instruction: words.join(" "),
                at,
            }
        }
        "show-plan" => ConsoleOp::ShowPlan,
        "confirm" => ConsoleOp::Confirm,
        "discard" => ConsoleOp::Discard,
        other => return Err(format!("Unknown command: {}", other)),
    };
    Ok(CliAction::Console(op))
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str, String> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing argument: {}", id))
}

fn parse_path(raw: &str) -> Result<TreePath, String> {
    raw.parse::<TreePath>().map_err(|e| e.to_string())
}

fn required_path(matches: &ArgMatches) -> Result<TreePath, String> {
    parse_path(required(matches, "path")?)
}

fn optional_path(matches: &ArgMatches) -> Result<TreePath, String> {
    match matches.get_one::<String>("path") {
        Some(raw) => parse_path(raw),
        None => Ok(TreePath::root()),
    }
}

/// `update` takes a JSON object; anything else is refused up front.
fn parse_object(raw: &str) -> Result<TreeValue, String> {
    let value: TreeValue = raw
        .parse()
        .map_err(|e| format!("Invalid JSON: {}", e))?;
    if !value.is_object() {
        return Err(format!("Expected a JSON object, got {}", value.kind_name()));
    }
    Ok(value)
}
