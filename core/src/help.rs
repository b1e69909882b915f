//! Help and error text rendering.
//!
//! Output is a list of lines without trailing whitespace. Two-column
//! sections (commands, options) are aligned on the widest left column:
//!
//! ```text
//! Options:
//!
//!   -h, --help             Show help document.
//!   -o, --output <file>    Where to write.
//!       --verbose          Print more.
//! ```

use std::error::Error as StdError;

use crate::builder::HELP;
use crate::error::{RuleError, identify};
use crate::lang::LangPackage;
use crate::preferences::Preferences;
use crate::result::ParseResult;
use crate::rules::{FlagLike, NodeId, RuleTree};

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;

/// Splits on `\r\n`, `\r` and `\n`.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split("\r\n").flat_map(|line| line.split(['\r', '\n']))
}

/// Line accumulator with indentation.
#[derive(Debug, Default)]
struct TextBuffer {
    lines: Vec<String>,
    indent: usize,
}

impl TextBuffer {
    fn indent_in(&mut self) {
        self.indent += INDENT;
    }

    fn indent_out(&mut self) {
        self.indent = self.indent.saturating_sub(INDENT);
    }

    /// Appends one line at the current indentation. Blank lines are dropped.
    fn append_line(&mut self, line: &str) {
        let line = line.trim_end();
        if !line.is_empty() {
            self.lines.push(format!("{}{}", " ".repeat(self.indent), line));
        }
    }

    /// Appends each line of a possibly multi-line text.
    fn append_text(&mut self, text: &str) {
        for line in split_lines(text) {
            self.append_line(line);
        }
    }

    fn append_empty_line(&mut self) {
        self.lines.push(String::new());
    }

    /// Appends `(left, right)` rows with the right column aligned.
    ///
    /// Continuation lines of a multi-line right column line up under its
    /// first line.
    fn append_columns(&mut self, rows: &[(String, String)]) {
        let width = rows
            .iter()
            .map(|(left, _)| left.chars().count())
            .max()
            .unwrap_or(0);
        for (left, right) in rows {
            let mut lines = split_lines(right);
            let first = lines.next().unwrap_or("");
            let pad = COLUMN_GAP + width - left.chars().count();
            self.append_line(&format!("{left}{}{first}", " ".repeat(pad)));
            for more in lines {
                self.append_line(&format!("{}{more}", " ".repeat(COLUMN_GAP + width)));
            }
        }
    }

    fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Language key of a command-scoped entry: `cmd:<path>:<suffix>`, or
/// `cmd:<suffix>` for the root.
fn command_key(path: &[&str], suffix: &str) -> String {
    if path.is_empty() {
        format!("cmd:{suffix}")
    } else {
        format!("cmd:{}:{suffix}", path.join(":"))
    }
}

/// Renders help pages and error reports for one rule tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HelpGenerator<'a> {
    pub tree: &'a RuleTree,
    pub preferences: &'a Preferences,
    pub lang: &'a LangPackage,
    pub title: &'a str,
    pub command: &'a str,
}

impl HelpGenerator<'_> {
    /// Resolves the command a help request is about.
    ///
    /// Without a result, or with an empty path, that is the root.
    pub fn target(&self, result: Option<&ParseResult>) -> Result<NodeId, RuleError> {
        let Some(result) = result else {
            return Ok(self.tree.root());
        };
        let help_command = !self.preferences.disable_help_command;
        let path = if help_command
            && result
                .commands
                .first()
                .is_some_and(|first| first.eq_ignore_ascii_case(HELP))
        {
            &result.arguments
        } else {
            &result.commands
        };
        self.resolve_path(
            path.iter()
                .map(|segment| segment.to_lowercase())
                .filter(|segment| !(help_command && segment == HELP)),
        )
    }

    /// Walks `path` down from the root.
    pub fn resolve_path<I, S>(&self, path: I) -> Result<NodeId, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        path.into_iter()
            .try_fold(self.tree.root(), |node, segment| {
                self.tree.get_command(node, segment.as_ref())
            })
    }

    /// Full help page of `node`.
    pub fn render_help(&self, node: NodeId) -> Vec<String> {
        let mut buf = TextBuffer::default();
        let path = self.tree.path(node);

        buf.append_line(self.title);
        buf.append_line(&self.usage_line(node, &path));
        buf.append_empty_line();

        let info = self.tree.node(node).info();
        let description = self
            .lang
            .get(&command_key(&path, "desc"))
            .unwrap_or(info.description.as_str());
        buf.append_text(description);

        if self.tree.is_command_mode(node) {
            self.render_commands(&mut buf, node);
        }
        if self.tree.count_flags(node) + self.tree.count_options(node) > 0 {
            self.render_options(&mut buf, node, &path);
        }
        buf.into_lines()
    }

    fn usage_line(&self, node: NodeId, path: &[&str]) -> String {
        let root = self.tree.root();
        let mut parts = vec![
            format!("{}:", self.lang.text("help:usage")),
            self.command.to_string(),
        ];
        if self.tree.count_flags(root) + self.tree.count_options(root) > 0 {
            parts.push(format!("[...{}]", self.lang.text("help:usage:options")));
        }
        if self.tree.is_command_mode(root) {
            parts.extend(path.iter().map(|segment| segment.to_string()));
            if self.tree.is_command_mode(node) {
                parts.push(self.lang.text("help:usage:command").to_string());
            }
            if self.tree.count_flags(node) + self.tree.count_options(node) > 0 {
                parts.push(format!("[...{}]", self.lang.text("help:usage:sub-options")));
            }
        }
        if self.tree.node(node).info().max_arguments != Some(0) {
            let placeholder = self
                .lang
                .get(&command_key(path, "arguments"))
                .unwrap_or_else(|| self.lang.text("help:usage:arguments"));
            parts.push(placeholder.to_string());
        }
        parts.retain(|part| !part.is_empty());
        parts.join(" ")
    }

    fn render_commands(&self, buf: &mut TextBuffer, node: NodeId) {
        let rows: Vec<(String, String)> = self
            .tree
            .commands(node)
            .map(|child| {
                let info = self.tree.node(child).info();
                let left = match &info.shortcut {
                    Some(shortcut) => format!("{}, {shortcut}", info.name),
                    None => info.name.clone(),
                };
                let right = self
                    .lang
                    .get(&command_key(&self.tree.path(child), "desc"))
                    .unwrap_or(info.description.as_str());
                (left, right.trim().to_string())
            })
            .collect();

        buf.append_empty_line();
        buf.append_line(&format!("{}:", self.lang.text("help:commands")));
        buf.append_empty_line();
        buf.indent_in();
        buf.append_columns(&rows);
        buf.indent_out();
    }

    fn render_options(&self, buf: &mut TextBuffer, node: NodeId, path: &[&str]) {
        let mut names = self.tree.flag_names(node);
        names.extend(self.tree.option_names(node));

        let mut rows = Vec::with_capacity(names.len());
        for name in names {
            let Some((_, kind, _)) = self.tree.resolve_flag_like(node, name) else {
                continue;
            };
            let (shortcut, description) = match kind {
                FlagLike::Flag => match self.tree.flag(node, name) {
                    Some(flag) => (flag.shortcut, flag.description.as_deref()),
                    None => continue,
                },
                FlagLike::Option => match self.tree.option(node, name) {
                    Some(option) => (option.shortcut, option.description.as_deref()),
                    None => continue,
                },
            };

            let mut left = match shortcut {
                Some(c) => format!("-{c}, --{name}"),
                None => format!("    --{name}"),
            };
            if kind == FlagLike::Option {
                left.push(' ');
                left.push_str(self.flag_text(path, name, "argument").unwrap_or("<arg>"));
            }
            let right = self
                .flag_text(path, name, "desc")
                .or(description)
                .unwrap_or("");
            rows.push((left, right.trim().to_string()));
        }

        buf.append_empty_line();
        buf.append_line(&format!("{}:", self.lang.text("help:options")));
        buf.append_empty_line();
        buf.indent_in();
        buf.append_columns(&rows);
        buf.indent_out();
    }

    /// Command-scoped language text of a flag, then the global one.
    fn flag_text(&self, path: &[&str], name: &str, suffix: &str) -> Option<&str> {
        let key = format!("flags:{name}:{suffix}");
        self.lang
            .get(&command_key(path, &key))
            .or_else(|| self.lang.get(&key))
    }

    /// Error report followed by hints on how to get help.
    pub fn render_error(&self, err: &(dyn StdError + 'static)) -> Vec<String> {
        let mut buf = TextBuffer::default();
        match identify(err) {
            Some((name, _)) => {
                let message = self
                    .lang
                    .get(&format!("errors:{name}"))
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string());
                buf.append_line(&format!("ERROR {name}: {message}"));
            }
            None => {
                buf.append_line(&format!("ERROR unknown: {}", self.lang.text("errors:unknown")));
            }
        }

        let tips = self.help_tips();
        if !tips.is_empty() {
            buf.append_empty_line();
            buf.append_line(&format!("{}:", self.lang.text("errors:help_tips")));
            buf.indent_in();
            for tip in &tips {
                buf.append_line(tip);
            }
            buf.indent_out();
        }
        buf.into_lines()
    }

    fn help_tips(&self) -> Vec<String> {
        let command_mode = self.tree.is_command_mode(self.tree.root());
        if !self.preferences.disable_help_command && command_mode {
            return vec![format!("{} help [...COMMAND]", self.command)];
        }
        if self.preferences.disable_help_flag {
            return Vec::new();
        }
        let target = if command_mode {
            format!("{} [...COMMAND]", self.command)
        } else {
            self.command.to_string()
        };
        let mut tips = vec![format!("{target} --help")];
        if !self.preferences.disable_help_flag_shortcut {
            tips.push(format!("{target} -h"));
        }
        tips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_buffer_indents_and_drops_blank_lines() {
        let mut buf = TextBuffer::default();
        buf.append_line("Title   ");
        buf.append_line("   ");
        buf.append_empty_line();
        buf.indent_in();
        buf.append_text("a\n\nb");
        buf.indent_out();
        buf.indent_out();
        buf.append_line("c");
        assert_eq!(buf.into_lines(), vec!["Title", "", "  a", "  b", "c"]);
    }

    #[test]
    fn test_columns_align_on_widest_left() {
        let mut buf = TextBuffer::default();
        buf.append_columns(&[
            ("a".to_string(), "first".to_string()),
            ("long-name".to_string(), "second\nmore".to_string()),
            ("bare".to_string(), String::new()),
        ]);
        assert_eq!(
            buf.into_lines(),
            vec![
                "a          first",
                "long-name  second",
                "           more",
                "bare",
            ]
        );
    }

    #[test]
    fn test_split_lines_accepts_every_line_ending() {
        let lines: Vec<&str> = split_lines("a\r\nb\rc\nd").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);

        let mut buf = TextBuffer::default();
        buf.append_columns(&[("-x".to_string(), "first\rsecond".to_string())]);
        buf.append_text("one\rtwo");
        assert_eq!(buf.into_lines(), vec!["-x  first", "    second", "one", "two"]);
    }

    #[test]
    fn test_command_key() {
        assert_eq!(command_key(&[], "desc"), "cmd:desc");
        assert_eq!(command_key(&["users", "add"], "arguments"), "cmd:users:add:arguments");
    }
}
