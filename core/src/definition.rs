//! Declarative rule definitions loaded from JSON or YAML.
//!
//! A [`Definition`] describes a whole program: helper options plus the root
//! command's arguments, flags, options and nested sub-commands. It is the
//! file format read by the `argtree` CLI.
//!
//! # Example YAML
//!
//! ```yaml
//! title: Users v1.0
//! command: users
//! flags:
//!   - name: verbose
//!     shortcut: v
//! commands:
//!   - name: add
//!     shortcut: a
//!     min_arguments: 1
//!     options:
//!       - name: role
//!         shortcut: r
//!         multiple: true
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::builder::RuleBuilder;
use crate::error::{Error, Result, RuleError};
use crate::lang::LangPackage;
use crate::preferences::{HelperOptions, Preferences};
use crate::types::{CommandConfig, FlagConfig, OptionConfig};

/// A complete program definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub title: String,
    pub command: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LangPackage>,
    /// Minimum positional arguments of the root command.
    #[serde(default)]
    pub min_arguments: usize,
    /// Maximum positional arguments of the root command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_arguments: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandDefinition>,
}

/// A sub-command with its own rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    #[serde(flatten)]
    pub config: CommandConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandDefinition>,
}

impl Definition {
    /// Loads a definition from a `.json`, `.yaml` or `.yml` file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](Error::Io) if the file cannot be read,
    /// [`Json`](Error::Json)/[`Yaml`](Error::Yaml) if parsing fails, or
    /// [`UnsupportedFormat`](Error::UnsupportedFormat) for other extensions.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_file(path.as_ref())
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// The helper options part of the definition.
    pub fn helper_options(&self) -> HelperOptions {
        let mut options = HelperOptions::new(&self.title, &self.command, &self.description)
            .with_preferences(self.preferences);
        options.language = self.language.clone();
        options
    }

    /// Registers the root rules and every sub-command through `builder`.
    pub(crate) fn apply(&self, builder: &mut RuleBuilder<'_>) -> std::result::Result<(), RuleError> {
        builder
            .set_min_arguments(self.min_arguments)
            .set_max_arguments(self.max_arguments);
        apply_entries(builder, &self.flags, &self.options, &self.commands)
    }
}

impl CommandDefinition {
    pub fn new(config: CommandConfig) -> Self {
        Self {
            config,
            flags: Vec::new(),
            options: Vec::new(),
            commands: Vec::new(),
        }
    }
}

fn apply_entries(
    builder: &mut RuleBuilder<'_>,
    flags: &[FlagConfig],
    options: &[OptionConfig],
    commands: &[CommandDefinition],
) -> std::result::Result<(), RuleError> {
    for flag in flags {
        builder.add_flag(flag.clone())?;
    }
    for option in options {
        builder.add_option(option.clone())?;
    }
    for command in commands {
        builder.add_command_with(command.config.clone(), |child| {
            apply_entries(child, &command.flags, &command.options, &command.commands)
        })?;
    }
    Ok(())
}

/// Reads a JSON or YAML file into `T`, picking the format by extension.
pub(crate) fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "json" => {
            let reader = BufReader::new(File::open(path)?);
            Ok(serde_json::from_reader(reader)?)
        }
        "yaml" | "yml" => {
            let reader = BufReader::new(File::open(path)?);
            Ok(serde_yaml::from_reader(reader)?)
        }
        _ => Err(Error::UnsupportedFormat(path.display().to_string())),
    }
}
