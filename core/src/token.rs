//! Lexical classification of raw argument tokens.
//!
//! Classification is purely syntactic: it does not know which flags or
//! options exist. The parser engine resolves the classified pieces against
//! the rule tree and decides what applies.

use std::sync::LazyLock;

use regex::Regex;

/// Regex patterns for the flag-like token forms.
static PATTERNS: LazyLock<TokenPatterns> = LazyLock::new(TokenPatterns::new);

struct TokenPatterns {
    // --name=value
    long_assign: Regex,
    // --name
    long: Regex,
    // -x=value
    short_assign: Regex,
    // -x followed by anything
    short: Regex,
    // -abc
    short_cluster: Regex,
}

impl TokenPatterns {
    fn new() -> Self {
        Self {
            long_assign: Regex::new(r"(?is)^--([a-z][-a-z0-9]+)=(.+)$")
                .expect("static regex must compile"),
            long: Regex::new(r"(?i)^--([a-z][-a-z0-9]+)$").expect("static regex must compile"),
            short_assign: Regex::new(r"(?is)^-([a-z])=(.+)$").expect("static regex must compile"),
            short: Regex::new(r"(?is)^-([a-z])(.*)$").expect("static regex must compile"),
            short_cluster: Regex::new(r"(?i)^-[a-z]+$").expect("static regex must compile"),
        }
    }
}

/// The lexical form of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// Exactly `--`.
    Terminator,
    /// `--name=value`.
    LongAssign { name: &'a str, value: &'a str },
    /// `--name`.
    Long { name: &'a str },
    /// `-x=value`.
    ShortAssign { shortcut: char, value: &'a str },
    /// `-x` optionally followed by more characters.
    ///
    /// `rest` is everything after the shortcut letter; `cluster` is true when
    /// the whole token is letters after the dash, so it may also be read as a
    /// group of shortcuts.
    Short {
        shortcut: char,
        rest: &'a str,
        cluster: bool,
    },
    /// Anything else: a command name or positional argument.
    Word,
}

/// Classifies a single token.
///
/// # Examples
///
/// ```
/// use argtree_core::token::{classify, TokenKind};
///
/// assert_eq!(classify("--"), TokenKind::Terminator);
/// assert_eq!(classify("--out=a=b"), TokenKind::LongAssign { name: "out", value: "a=b" });
/// assert_eq!(classify("-vx"), TokenKind::Short { shortcut: 'v', rest: "x", cluster: true });
/// assert_eq!(classify("-o/tmp"), TokenKind::Short { shortcut: 'o', rest: "/tmp", cluster: false });
/// assert_eq!(classify("-"), TokenKind::Word);
/// ```
pub fn classify(token: &str) -> TokenKind<'_> {
    if token == "--" {
        return TokenKind::Terminator;
    }

    let p = &*PATTERNS;

    if let Some(caps) = p.long_assign.captures(token) {
        if let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) {
            return TokenKind::LongAssign {
                name: name.as_str(),
                value: value.as_str(),
            };
        }
    }

    if let Some(name) = p.long.captures(token).and_then(|caps| caps.get(1)) {
        return TokenKind::Long {
            name: name.as_str(),
        };
    }

    if let Some(caps) = p.short_assign.captures(token) {
        if let (Some(shortcut), Some(value)) = (first_char(caps.get(1)), caps.get(2)) {
            return TokenKind::ShortAssign {
                shortcut,
                value: value.as_str(),
            };
        }
    }

    if let Some(caps) = p.short.captures(token) {
        if let (Some(shortcut), Some(rest)) = (first_char(caps.get(1)), caps.get(2)) {
            return TokenKind::Short {
                shortcut,
                rest: rest.as_str(),
                cluster: p.short_cluster.is_match(token),
            };
        }
    }

    TokenKind::Word
}

fn first_char(m: Option<regex::Match<'_>>) -> Option<char> {
    m.and_then(|m| m.as_str().chars().next())
}
