//! Clap command tree definition.
//!
//! Builds the full `clap::Command` tree used by both shell mode (directly)
//! and REPL mode (via `try_get_matches_from`).

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
///
/// This is shared between shell mode and REPL mode.
pub fn build_cli() -> Command {
    let cli = Command::new("canopy")
        .about("Console for browsing and editing a remote JSON tree")
        .subcommand_required(false)
        .arg(
            Arg::new("url")
                .long("url")
                .short('u')
                .help("Database URL or bare project id")
                .global(true),
        )
        .arg(
            Arg::new("auth")
                .long("auth")
                .help("Access token sent with every request")
                .global(true),
        )
        .arg(
            Arg::new("memory")
                .long("memory")
                .help("Ephemeral in-memory tree, no network")
                .action(ArgAction::SetTrue)
                .conflicts_with("url")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .help("Config file (default: ./canopy.toml when present)")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .conflicts_with("raw")
                .global(true),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Raw output mode (bare values, no decoration)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("yes")
                .long("yes")
                .short('y')
                .help("Confirm deletions and plans without asking")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_init());
    with_console_commands(cli)
}

/// Build a command tree for REPL mode (no global flags).
pub fn build_repl_cmd() -> Command {
    let cmd = Command::new("repl").multicall(true).subcommand_required(true);
    with_console_commands(cmd)
}

fn with_console_commands(cmd: Command) -> Command {
    cmd.subcommand(build_connect())
        .subcommand(Command::new("disconnect").about("Drop the connection and view state"))
        .subcommand(Command::new("status").about("Show the connection"))
        .subcommand(Command::new("ping").about("Probe the connected store"))
        .subcommand(Command::new("refresh").about("Re-read the whole tree"))
        .subcommand(build_tree())
        .subcommand(build_get())
        .subcommand(build_keys())
        .subcommand(build_set())
        .subcommand(build_update())
        .subcommand(build_add())
        .subcommand(build_del())
        .subcommand(path_command("expand", "Expand a node"))
        .subcommand(path_command("collapse", "Collapse a node"))
        .subcommand(path_command("toggle", "Toggle a node"))
        .subcommand(Command::new("expand-all").about("Expand every node"))
        .subcommand(Command::new("collapse-all").about("Collapse every node"))
        .subcommand(build_plan())
        .subcommand(Command::new("show-plan").about("Show the plan awaiting confirmation"))
        .subcommand(Command::new("confirm").about("Apply the proposed plan"))
        .subcommand(Command::new("discard").about("Drop the proposed plan"))
}

fn path_arg(required: bool) -> Arg {
    let arg = Arg::new("path")
        .value_name("PATH")
        .help("Slash-separated path (empty or / for the root)");
    if required {
        arg.required(true)
    } else {
        arg
    }
}

fn path_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(path_arg(true))
}

// =========================================================================
// Connection
// =========================================================================

fn build_init() -> Command {
    Command::new("init")
        .about("Write a default canopy.toml in the current directory")
}

fn build_connect() -> Command {
    Command::new("connect")
        .about("Connect to a store ('memory:' for an empty in-memory tree)")
        .arg(
            Arg::new("target")
                .required(true)
                .value_name("URL")
                .help("Database URL, bare project id, or memory:"),
        )
        .arg(
            Arg::new("token")
                .value_name("TOKEN")
                .help("Access token sent with every request"),
        )
}

// =========================================================================
// Tree
// =========================================================================

fn build_tree() -> Command {
    Command::new("tree")
        .about("Render the tree")
        .arg(
            Arg::new("depth")
                .long("depth")
                .short('d')
                .value_parser(clap::value_parser!(usize))
                .help("Reset expansion to this many levels"),
        )
}

fn build_get() -> Command {
    Command::new("get")
        .about("Read a subtree from the store")
        .arg(path_arg(false))
}

fn build_keys() -> Command {
    Command::new("keys")
        .about("List keys directly under a path")
        .arg(path_arg(false))
}

// =========================================================================
// Editing
// =========================================================================

fn build_set() -> Command {
    Command::new("set")
        .about("Replace the value at a path (true/false/null/numbers/JSON are inferred)")
        .arg(path_arg(true))
        .arg(
            Arg::new("value")
                .required(true)
                .value_name("VALUE")
                .help("New value"),
        )
}

fn build_update() -> Command {
    Command::new("update")
        .about("Merge a JSON object into the value at a path")
        .arg(path_arg(true))
        .arg(
            Arg::new("value")
                .required(true)
                .value_name("JSON")
                .help("Object whose keys replace the existing ones"),
        )
}

fn build_add() -> Command {
    Command::new("add")
        .about("Add a child under a path")
        .arg(path_arg(true))
        .arg(
            Arg::new("key")
                .required(true)
                .value_name("KEY")
                .help("Child key"),
        )
        .arg(
            Arg::new("value")
                .required(true)
                .value_name("VALUE")
                .help("Child value ({...} and [...] are parsed as JSON)"),
        )
}

fn build_del() -> Command {
    Command::new("del")
        .about("Delete a subtree (asks for confirmation)")
        .arg(path_arg(true))
}

// =========================================================================
// Plans
// =========================================================================

fn build_plan() -> Command {
    Command::new("plan")
        .about("Turn an instruction into an action plan")
        .arg(
            Arg::new("instruction")
                .required(true)
                .num_args(1..)
                .value_name("INSTRUCTION")
                .help("What to change, in plain words"),
        )
        .arg(
            Arg::new("at")
                .long("at")
                .value_name("PATH")
                .help("Show the generator the subtree at this path"),
        )
}
