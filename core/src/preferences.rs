//! Parser preferences and helper construction options.
//!
//! # Example YAML
//!
//! ```yaml
//! title: My Tool v1.0
//! command: mytool
//! description: Does useful things.
//! preferences:
//!   disable_help_command: true
//!   disable_flags_after_arguments: true
//! language:
//!   "help:usage": "Usage"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lang::LangPackage;

/// Boolean switches altering parser and help behaviour. All default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Disable the implicit `help [COMMAND...]` sub-command.
    pub disable_help_command: bool,
    /// Disable the implicit `--help` flag.
    pub disable_help_flag: bool,
    /// Disable the `-h` shortcut of the implicit help flag.
    pub disable_help_flag_shortcut: bool,
    /// Treat flag-like tokens after the first positional argument as arguments.
    pub disable_flags_after_arguments: bool,
    /// Disable the `-xVALUE` option syntax.
    pub disable_option_attach_mode: bool,
    /// Disable the `--name=VALUE` / `-x=VALUE` option syntax.
    ///
    /// `--name=VALUE` is then taken as a positional argument, while `-x=VALUE`
    /// is read as `-x` with the attached value `=VALUE` when attach mode is on.
    pub disable_option_assign_mode: bool,
    /// Disable the `--name VALUE` / `-x VALUE` option syntax.
    pub disable_option_follow_mode: bool,
}

/// Everything needed to create a [`Helper`](crate::Helper).
///
/// # Examples
///
/// ```
/// use argtree_core::{HelperOptions, Preferences};
///
/// let options = HelperOptions::new("Tool v1", "tool", "Does things.")
///     .with_preferences(Preferences {
///         disable_help_command: true,
///         ..Preferences::default()
///     });
/// assert!(options.preferences.disable_help_command);
/// assert!(options.language.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperOptions {
    /// Title printed in the first line of help.
    pub title: String,
    /// The program name used in usage lines.
    pub command: String,
    /// Description of the program.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preferences: Preferences,
    /// Translations overlaid on the built-in English package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LangPackage>,
}

impl HelperOptions {
    pub fn new(
        title: impl Into<String>,
        command: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            command: command.into(),
            description: description.into(),
            preferences: Preferences::default(),
            language: None,
        }
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_language(mut self, language: LangPackage) -> Self {
        self.language = Some(language);
        self
    }

    /// Loads options from a JSON or YAML file, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::Error::Io) if the file cannot be read,
    /// [`Json`](crate::Error::Json)/[`Yaml`](crate::Error::Yaml) if parsing
    /// fails, or [`UnsupportedFormat`](crate::Error::UnsupportedFormat) for
    /// other extensions.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        crate::definition::load_file(path.as_ref())
    }
}
