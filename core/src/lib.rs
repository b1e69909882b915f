//! Rule-tree command-line argument parsing.
//!
//! A program's command line is described as a tree of rules:
//!
//! - [`CommandConfig`]: a (sub-)command with optional shortcut and bounds on
//!   its positional arguments.
//! - [`FlagConfig`]: a switch counted by occurrence (`-v`, `--verbose`).
//! - [`OptionConfig`]: a named value (`-o FILE`, `--output=FILE`), optionally
//!   repeatable.
//!
//! Rules are registered through a [`RuleBuilder`] into a [`RuleTree`]. Flags
//! and options are inherited by sub-commands, and a sub-command may shadow an
//! inherited name. The [`Helper`] façade owns the tree, parses argument
//! vectors into a [`ParseResult`], and renders help pages and error reports,
//! optionally translated through a [`LangPackage`].
//!
//! Whole rule sets can also be loaded from JSON or YAML with [`Definition`].
//!
//! # Example
//!
//! ```
//! use argtree_core::*;
//!
//! let mut helper = Helper::new(HelperOptions::new("Files v1", "files", "Copy files."));
//! helper
//!     .add_flag(FlagConfig::new("verbose").with_shortcut('v'))?
//!     .add_command_with(CommandConfig::new("copy").with_shortcut("cp"), |copy| {
//!         copy.set_min_arguments(2)
//!             .add_option(OptionConfig::new("exclude").with_shortcut('x').allow_multiple())?;
//!         Ok(())
//!     })?;
//!
//! let result = helper
//!     .parse(&["-v", "cp", "-x", "*.tmp", "--exclude=*.bak", "src", "dst"])
//!     .expect("valid command line");
//! assert_eq!(result.commands, vec!["copy"]);
//! assert_eq!(result.flag_count("verbose"), 1);
//! assert_eq!(result.option("exclude").map(<[String]>::len), Some(2));
//! assert_eq!(result.arguments, vec!["src", "dst"]);
//!
//! let err = helper.parse(&["copy", "only-one"]).unwrap_err();
//! assert_eq!(err.name(), "arguments_lacked");
//! assert_eq!(helper.generate_error_output(&err)[0], "ERROR arguments_lacked: Too few arguments.");
//! # Ok::<(), RuleError>(())
//! ```

mod builder;
mod definition;
mod error;
mod help;
mod helper;
mod lang;
mod parser;
mod preferences;
mod result;
mod rules;
pub mod token;
mod types;
pub mod validate;

pub use builder::{HELP, RuleBuilder};
pub use definition::{CommandDefinition, Definition};
pub use error::{EntryKind, Error, ParseError, Result, RuleError};
pub use helper::{Helper, Processed};
pub use lang::LangPackage;
pub use parser::{Parser, ParserState, is_help_request};
pub use preferences::{HelperOptions, Preferences};
pub use result::ParseResult;
pub use rules::{CommandInfo, FlagLike, NodeId, RuleNode, RuleTree};
pub use types::*;
