//! Parses the process arguments with the `users` demo rules.
//!
//! ```text
//! cargo run -p argtree-demos --example users -- add alice -r admin
//! cargo run -p argtree-demos --example users -- help group
//! ```

use std::process::ExitCode;

use argtree_core::Processed;
use argtree_demos::{init_logging, users_helper};
use tracing::{debug, error};

fn main() -> ExitCode {
    init_logging();

    let helper = match users_helper() {
        Ok(helper) => helper,
        Err(err) => {
            error!(name = err.name(), "invalid rules: {err}");
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    debug!(?args, "parsing process arguments");
    match helper.parse_and_process(&args) {
        Processed::Result(result) => {
            println!("commands:  {}", result.commands.join(" "));
            for (name, count) in &result.flags {
                println!("flag:      {name} x{count}");
            }
            for (name, values) in &result.options {
                println!("option:    {name} = {}", values.join(", "));
            }
            println!("arguments: {}", result.arguments.join(" "));
            if !result.tailing_arguments.is_empty() {
                println!("tailing:   {}", result.tailing_arguments.join(" "));
            }
            if !result.unknown_flags.is_empty() {
                println!("unknown:   {}", result.unknown_flags.join(" "));
            }
            ExitCode::SUCCESS
        }
        Processed::Help(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Processed::Error(lines) => {
            for line in lines {
                eprintln!("{line}");
            }
            ExitCode::FAILURE
        }
    }
}
