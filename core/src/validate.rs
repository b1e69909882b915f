//! Name and shortcut format validation.
//!
//! Rule entries are checked against fixed formats before they are inserted
//! into the tree:
//!
//! | entry                    | format                  |
//! |--------------------------|-------------------------|
//! | flag/option full name    | `^[a-z][-a-z0-9]+$`     |
//! | flag/option shortcut     | `^[A-Za-z]$`            |
//! | command full name        | `^[a-z][-a-z0-9]+$`     |
//! | command shortcut         | `^[a-z][-a-z0-9]*$`     |
//!
//! Full names and command shortcuts are matched case-insensitively (they are
//! lower-cased before storage); flag/option shortcuts are case-sensitive.
//!
//! # Examples
//!
//! ```
//! use argtree_core::validate::{is_valid_command_shortcut, is_valid_name, is_valid_shortcut};
//!
//! assert!(is_valid_name("dry-run"));
//! assert!(!is_valid_name("x"));
//! assert!(is_valid_shortcut('V'));
//! assert!(!is_valid_shortcut('1'));
//! assert!(is_valid_command_shortcut("u"));
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{EntryKind, RuleError};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z][-a-z0-9]+$").expect("static regex must compile"));
static COMMAND_SHORTCUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z][-a-z0-9]*$").expect("static regex must compile"));

/// Returns `true` if `name` is a valid full name for a command, flag or option.
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Returns `true` if `shortcut` is a valid single-letter flag/option shortcut.
pub fn is_valid_shortcut(shortcut: char) -> bool {
    shortcut.is_ascii_alphabetic()
}

/// Returns `true` if `shortcut` is a valid command shortcut.
pub fn is_valid_command_shortcut(shortcut: &str) -> bool {
    COMMAND_SHORTCUT_RE.is_match(shortcut)
}

/// Checks a (lower-cased) full name for the given entry kind.
pub(crate) fn check_name(kind: EntryKind, name: &str) -> Result<(), RuleError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(RuleError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

/// Checks a flag or option shortcut.
pub(crate) fn check_shortcut(kind: EntryKind, name: &str, shortcut: char) -> Result<(), RuleError> {
    if is_valid_shortcut(shortcut) {
        Ok(())
    } else {
        Err(RuleError::InvalidShortcut {
            kind,
            name: name.to_string(),
            shortcut: shortcut.to_string(),
        })
    }
}

/// Checks a (lower-cased) command shortcut.
pub(crate) fn check_command_shortcut(name: &str, shortcut: &str) -> Result<(), RuleError> {
    if is_valid_command_shortcut(shortcut) {
        Ok(())
    } else {
        Err(RuleError::InvalidShortcut {
            kind: EntryKind::Command,
            name: name.to_string(),
            shortcut: shortcut.to_string(),
        })
    }
}
