/// Centralized argument handling for burnswap
///
/// Command-line arguments are captured once and can be overridden by tests.
/// The logger reads `--debug-<tag>`, `--verbose` and `--quiet` from here; the
/// bridge binary reads `--config` and `--help`.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Default location of the TOML configuration file
pub const DEFAULT_CONFIG_PATH: &str = "data/config.toml";

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by binaries and tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Path of the configuration file (`--config <path>`)
pub fn config_path() -> String {
    get_arg_value("--config").unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// Prints usage for the event bridge binary
pub fn print_help() {
    println!("burnswap - reclaim token account rent and swap it in one transaction");
    println!();
    println!("USAGE:");
    println!("    burnswap [--config <path>] [--debug-<tag>]... [--verbose] [--quiet]");
    println!();
    println!("Reads inbound events as JSON lines on stdin and writes notifications");
    println!("as JSON lines on stdout. Logs go to stderr and the log file.");
    println!();
    println!("OPTIONS:");
    println!("    --config <path>   Configuration file (default: {})", DEFAULT_CONFIG_PATH);
    println!("    --debug-<tag>     Enable debug logs for a tag (rpc, wallet, tokens,");
    println!("                      metadata, swap, transactions, events, config, system)");
    println!("    --verbose         Enable verbose logs for every tag");
    println!("    --quiet           Only show warnings and errors");
    println!("    -h, --help        Show this message");
}
