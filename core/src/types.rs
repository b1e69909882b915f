//! Rule entry definitions: commands, flags and options.
//!
//! These are the inputs handed to the [`RuleBuilder`](crate::RuleBuilder).
//! Once inserted into a tree, names are stored in canonical (lower-cased)
//! form. All types are serializable so rule sets can be kept in JSON or YAML
//! files (see [`Definition`](crate::Definition)).

use serde::{Deserialize, Serialize};

/// Configuration of a (sub-)command.
///
/// # Examples
///
/// ```
/// use argtree_core::CommandConfig;
///
/// let users = CommandConfig::new("users")
///     .with_shortcut("u")
///     .with_description("Manage users")
///     .with_min_arguments(1);
/// assert_eq!(users.shortcut.as_deref(), Some("u"));
/// assert_eq!(users.max_arguments, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Full name, matched case-insensitively.
    pub name: String,
    /// Optional shortcut, matched case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    /// Description displayed in help.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Minimum quantity of positional arguments.
    #[serde(default)]
    pub min_arguments: usize,
    /// Maximum quantity of positional arguments; `None` means unbounded.
    ///
    /// Arguments beyond the bound become tailing arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_arguments: Option<usize>,
}

impl CommandConfig {
    /// Creates a command with no shortcut and unbounded arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shortcut: None,
            description: None,
            min_arguments: 0,
            max_arguments: None,
        }
    }

    /// Sets the shortcut.
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Sets the minimum quantity of positional arguments.
    pub fn with_min_arguments(mut self, qty: usize) -> Self {
        self.min_arguments = qty;
        self
    }

    /// Sets the maximum quantity of positional arguments.
    pub fn with_max_arguments(mut self, qty: impl Into<Option<usize>>) -> Self {
        self.max_arguments = qty.into();
        self
    }
}

/// Configuration of a flag: a zero-argument switch counted by occurrence.
///
/// # Examples
///
/// ```
/// use argtree_core::FlagConfig;
///
/// let verbose = FlagConfig::new("verbose")
///     .with_shortcut('v')
///     .with_description("Print more output");
/// assert_eq!(verbose.shortcut, Some('v'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagConfig {
    /// Full name, matched case-insensitively.
    pub name: String,
    /// Single-letter shortcut, matched case-sensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<char>,
    /// Description displayed in help.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FlagConfig {
    /// Creates a flag without shortcut or description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shortcut: None,
            description: None,
        }
    }

    /// Sets the single-letter shortcut.
    pub fn with_shortcut(mut self, shortcut: char) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Configuration of an option: an entry that takes a value.
///
/// When `multiple` is set, repeated occurrences accumulate; otherwise the
/// last occurrence wins.
///
/// # Examples
///
/// ```
/// use argtree_core::OptionConfig;
///
/// let include = OptionConfig::new("include")
///     .with_shortcut('I')
///     .allow_multiple();
/// assert!(include.multiple);
///
/// let output = OptionConfig::new("output").with_shortcut('o');
/// assert!(!output.multiple);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionConfig {
    /// Full name, matched case-insensitively.
    pub name: String,
    /// Single-letter shortcut, matched case-sensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<char>,
    /// Description displayed in help.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Can this option appear multiple times?
    #[serde(default)]
    pub multiple: bool,
}

impl OptionConfig {
    /// Creates a single-valued option without shortcut or description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shortcut: None,
            description: None,
            multiple: false,
        }
    }

    /// Sets the single-letter shortcut.
    pub fn with_shortcut(mut self, shortcut: char) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Marks as accumulating multiple occurrences.
    pub fn allow_multiple(mut self) -> Self {
        self.multiple = true;
        self
    }
}
