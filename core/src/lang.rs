//! Language packages for help and error text.
//!
//! A language package is a flat map from fixed keys to display text. Keys in
//! use:
//!
//! - `help:usage`, `help:usage:options`, `help:usage:sub-options`,
//!   `help:usage:arguments`, `help:usage:command`, `help:commands`,
//!   `help:options`: labels of the help layout;
//! - `cmd:<path>:desc`, `cmd:<path>:arguments`: per-command text, where
//!   `<path>` is the command path joined by `:` (the root uses `cmd:desc`);
//! - `cmd:<path>:flags:<name>:desc`, `flags:<name>:desc`,
//!   `flags:<name>:argument`: per-flag/option text;
//! - `errors:<error name>`, `errors:unknown`, `errors:help_tips`: error output.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

const ENGLISH: &[(&str, &str)] = &[
    ("help:usage", "USAGE"),
    ("help:usage:options", "OPTIONS"),
    ("help:usage:sub-options", "COMMAND-OPTIONS"),
    ("help:usage:arguments", "[...ARGS]"),
    ("help:usage:command", "COMMAND"),
    ("help:commands", "Commands"),
    ("help:options", "Options"),
    ("cmd:help:desc", "Show help of commands."),
    ("cmd:help:arguments", "[...COMMANDS]"),
    ("flags:help:desc", "Show help document."),
    ("errors:option_value_required", "The value of option is required."),
    ("errors:command_required", "The command is required before arguments."),
    ("errors:arguments_lacked", "Too few arguments."),
    ("errors:no_such_command", "The command does not exist."),
    ("errors:unknown", "Something wrong while parsing arguments for CLI."),
    ("errors:help_tips", "Please use following commands get help"),
];

/// A flat `key → text` translation table.
///
/// # Examples
///
/// ```
/// use argtree_core::LangPackage;
///
/// let french = LangPackage::from_pairs([("help:usage", "UTILISATION")]);
/// let lang = LangPackage::english().overlay(&french);
///
/// assert_eq!(lang.get("help:usage"), Some("UTILISATION"));
/// assert_eq!(lang.get("help:options"), Some("Options"));
/// assert_eq!(lang.get("cmd:users:desc"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LangPackage {
    entries: BTreeMap<String, String>,
}

impl LangPackage {
    /// The built-in English package.
    pub fn english() -> Self {
        Self::from_pairs(ENGLISH.iter().copied())
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses a package from a JSON object of strings.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parses a package from a YAML mapping of strings.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Loads a package from a JSON or YAML file, chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        crate::definition::load_file(path.as_ref())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Returns a copy of `self` with every entry of `overrides` applied on top.
    pub fn overlay(mut self, overrides: &LangPackage) -> Self {
        for (key, text) in &overrides.entries {
            self.entries.insert(key.clone(), text.clone());
        }
        self
    }

    /// Looks up `key`, falling back to the key itself.
    pub(crate) fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
