//! Error types for rule construction and argument parsing.
//!
//! Two disjoint classes are kept apart:
//!
//! - [`RuleError`] is raised while the rule tree is being built (malformed or
//!   duplicated names, lookups of entries that do not exist). These are
//!   mistakes in the caller's rule definitions.
//! - [`ParseError`] is raised while parsing a live argument vector. These are
//!   mistakes in user input and are meant to be rendered with
//!   [`Helper::generate_error_output`](crate::Helper::generate_error_output).
//!
//! [`Error`] wraps both together with the I/O and deserialization failures of
//! the file-loading entry points.

use std::fmt;

use thiserror::Error;

/// The kind of rule entry an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A (sub-)command.
    Command,
    /// A flag counted by occurrence.
    Flag,
    /// An option carrying a value.
    Option,
}

impl EntryKind {
    /// Lower-case label used in messages and symbolic error names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Flag => "flag",
            Self::Option => "option",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build-time errors raised while constructing a rule tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The full name does not match the allowed format.
    #[error("the name of {kind} is malformed: {name}")]
    InvalidName { kind: EntryKind, name: String },
    /// The shortcut does not match the allowed format.
    #[error("the shortcut of {kind} '{name}' is malformed: {shortcut}")]
    InvalidShortcut {
        kind: EntryKind,
        name: String,
        shortcut: String,
    },
    /// The full name is already taken in this scope.
    #[error("the name of {kind} has already been used: {name}")]
    DuplicateName { kind: EntryKind, name: String },
    /// The shortcut is already taken in this scope.
    #[error("the shortcut of {kind} '{name}' has already been used: {shortcut}")]
    DuplicateShortcut {
        kind: EntryKind,
        name: String,
        shortcut: String,
    },
    /// No command with this name or shortcut exists.
    #[error("the command does not exist: {name}")]
    NoSuchCommand { name: String },
    /// No flag with this name or shortcut exists.
    #[error("the flag does not exist: {name}")]
    NoSuchFlag { name: String },
    /// No option with this name or shortcut exists.
    #[error("the option does not exist: {name}")]
    NoSuchOption { name: String },
}

impl RuleError {
    /// Symbolic snake_case name, also used as the language package key suffix.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidName { kind, .. } => match kind {
                EntryKind::Command => "invalid_command_name",
                EntryKind::Flag => "invalid_flag_name",
                EntryKind::Option => "invalid_option_name",
            },
            Self::InvalidShortcut { kind, .. } => match kind {
                EntryKind::Command => "invalid_command_shortcut",
                EntryKind::Flag => "invalid_flag_shortcut",
                EntryKind::Option => "invalid_option_shortcut",
            },
            Self::DuplicateName { kind, .. } => match kind {
                EntryKind::Command => "dup_command_name",
                EntryKind::Flag => "dup_flag_name",
                EntryKind::Option => "dup_option_name",
            },
            Self::DuplicateShortcut { kind, .. } => match kind {
                EntryKind::Command => "dup_command_shortcut",
                EntryKind::Flag => "dup_flag_shortcut",
                EntryKind::Option => "dup_option_shortcut",
            },
            Self::NoSuchCommand { .. } => "no_such_command",
            Self::NoSuchFlag { .. } => "no_such_flag",
            Self::NoSuchOption { .. } => "no_such_option",
        }
    }

    /// Numeric code. Build-time errors are numbered from 1.
    pub fn code(&self) -> u32 {
        let offset = |kind: &EntryKind| match kind {
            EntryKind::Option => 0,
            EntryKind::Command => 1,
            EntryKind::Flag => 2,
        };
        match self {
            Self::NoSuchCommand { .. } => 1,
            Self::NoSuchOption { .. } => 2,
            Self::NoSuchFlag { .. } => 3,
            Self::DuplicateName { kind, .. } => 4 + offset(kind),
            Self::DuplicateShortcut { kind, .. } => 7 + offset(kind),
            Self::InvalidName { kind, .. } => 10 + offset(kind),
            Self::InvalidShortcut { kind, .. } => 13 + offset(kind),
        }
    }
}

/// Runtime errors raised while parsing an argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A command-mode node was never resolved to a sub-command.
    #[error(
        "the command is required before arguments{}",
        .input.as_deref().map(|token| format!(": {token}")).unwrap_or_default()
    )]
    CommandRequired { input: Option<String> },
    /// An option was referenced without a usable value.
    #[error("the value of option is required: {input}")]
    OptionValueRequired { input: String },
    /// Fewer positional arguments than the active command requires.
    #[error("too few arguments: expected at least {expected}, got {actual}")]
    ArgumentsLacked { expected: usize, actual: usize },
}

impl ParseError {
    /// Symbolic snake_case name, also used as the language package key suffix.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OptionValueRequired { .. } => "option_value_required",
            Self::CommandRequired { .. } => "command_required",
            Self::ArgumentsLacked { .. } => "arguments_lacked",
        }
    }

    /// Numeric code. Runtime errors are numbered from 1000.
    pub fn code(&self) -> u32 {
        match self {
            Self::OptionValueRequired { .. } => 1000,
            Self::CommandRequired { .. } => 1001,
            Self::ArgumentsLacked { .. } => 1002,
        }
    }
}

/// Errors from the crate's file-loading entry points.
#[derive(Debug, Error)]
pub enum Error {
    /// Rule definition rejected by the builder.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Argument vector rejected by the parser.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File extension is not one of `json`, `yaml`, `yml`.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Symbolic name and numeric code of an engine error, if `err` is one.
///
/// Looks through [`Error`] to the rule or parse error it wraps.
pub(crate) fn identify(err: &(dyn std::error::Error + 'static)) -> Option<(&'static str, u32)> {
    if let Some(e) = err.downcast_ref::<ParseError>() {
        return Some((e.name(), e.code()));
    }
    if let Some(e) = err.downcast_ref::<RuleError>() {
        return Some((e.name(), e.code()));
    }
    match err.downcast_ref::<Error>() {
        Some(Error::Rule(e)) => Some((e.name(), e.code())),
        Some(Error::Parse(e)) => Some((e.name(), e.code())),
        _ => None,
    }
}
