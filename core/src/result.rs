//! The structured outcome of a parse.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structured result of parsing one argument vector.
///
/// Produced fresh by each [`Helper::parse`](crate::Helper::parse) call.
/// Maps are ordered by key so results compare and serialize
/// deterministically.
///
/// # Examples
///
/// ```
/// use argtree_core::{FlagConfig, Helper, HelperOptions, OptionConfig};
///
/// let mut helper = Helper::new(HelperOptions::new("Demo", "demo", "A demo."));
/// helper.add_flag(FlagConfig::new("verbose").with_shortcut('v')).unwrap();
/// helper.add_option(OptionConfig::new("output").with_shortcut('o')).unwrap();
///
/// let result = helper.parse(&["-vv", "--output", "a.txt", "input"]).unwrap();
/// assert!(result.successful);
/// assert_eq!(result.flag_count("verbose"), 2);
/// assert_eq!(result.option_value("output"), Some("a.txt"));
/// assert_eq!(result.arguments, vec!["input"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Whether parsing completed and all requirements were met.
    pub successful: bool,
    /// Resolved command path, canonical names in descent order.
    pub commands: Vec<String>,
    /// Option values by canonical option name, in order of occurrence.
    pub options: BTreeMap<String, Vec<String>>,
    /// Occurrence counts by canonical flag name.
    pub flags: BTreeMap<String, usize>,
    /// Positional arguments.
    pub arguments: Vec<String>,
    /// Positional arguments beyond the command's maximum, and everything after `--`.
    pub tailing_arguments: Vec<String>,
    /// Flag-like tokens that did not resolve, without duplicates.
    pub unknown_flags: Vec<String>,
}

impl ParseResult {
    /// Number of times the flag was given.
    pub fn flag_count(&self, name: &str) -> usize {
        self.flags.get(name).copied().unwrap_or(0)
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flag_count(name) > 0
    }

    /// All values given for the option.
    pub fn option(&self, name: &str) -> Option<&[String]> {
        self.options.get(name).map(Vec::as_slice)
    }

    /// The last value given for the option.
    pub fn option_value(&self, name: &str) -> Option<&str> {
        self.options
            .get(name)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Total of positional and tailing arguments.
    pub fn count_arguments(&self) -> usize {
        self.arguments.len() + self.tailing_arguments.len()
    }

    pub(crate) fn save_flag(&mut self, name: &str) {
        *self.flags.entry(name.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn save_option(&mut self, name: &str, value: &str, multiple: bool) {
        let values = self.options.entry(name.to_string()).or_default();
        if !multiple {
            values.clear();
        }
        values.push(value.to_string());
    }

    pub(crate) fn save_unknown_flag(&mut self, token: &str) {
        if !self.unknown_flags.iter().any(|known| known == token) {
            self.unknown_flags.push(token.to_string());
        }
    }
}
