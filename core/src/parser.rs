//! The token state machine.
//!
//! Tokens are consumed left to right. Each one is classified with
//! [`classify`] and then dispatched according to the current
//! [`ParserState`]:
//!
//! | State                 | Accepts                                              |
//! |-----------------------|------------------------------------------------------|
//! | `ReadingCommand`      | `--`, flag-like tokens, a sub-command name           |
//! | `ReadingArguments`    | `--`, flag-like tokens, positional arguments         |
//! | `ReadingOptionValue`  | any token, taken verbatim as the pending option value |
//!
//! Flag-like forms are tried in a fixed order: `--name=value`, `--name`,
//! `-x=value`, `-xVALUE`, `-abc`. A token that fits none of them (or is not
//! applicable to the known rules) falls through to command or argument
//! handling.
//!
//! Encountering the help flag stops the scan; the result is then returned as
//! is, without the end-of-input requirements being checked.

use tracing::{debug, trace};

use crate::builder::HELP;
use crate::error::ParseError;
use crate::preferences::Preferences;
use crate::result::ParseResult;
use crate::rules::{FlagLike, NodeId, RuleTree};
use crate::token::{TokenKind, classify};
use crate::types::OptionConfig;

/// What the parser expects from the next token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// The active command has sub-commands and none has been chosen yet.
    ReadingCommand,
    /// The active command takes positional arguments.
    ReadingArguments,
    /// An option was named and its value is the next token.
    ReadingOptionValue,
}

/// Returns `true` if `result` asks for help under `preferences`.
///
/// That is the case when the help command is enabled and was the first
/// command, or when the help flag is enabled and was given.
pub fn is_help_request(preferences: &Preferences, result: &ParseResult) -> bool {
    let by_command = !preferences.disable_help_command
        && result
            .commands
            .first()
            .is_some_and(|first| first.eq_ignore_ascii_case(HELP));
    let by_flag = !preferences.disable_help_flag && result.has_flag(HELP);
    by_command || by_flag
}

/// An option waiting for its value.
#[derive(Debug, Clone)]
struct PendingOption {
    name: String,
    multiple: bool,
    // the token that named the option, for error messages
    input: String,
}

/// A flag-like key resolved from the active node.
///
/// Options carry the config of the node that defines them, so a descendant
/// reusing the name cannot change how an inherited option is stored.
#[derive(Debug, Clone, Copy)]
enum Entry<'t> {
    Flag(&'t str),
    Option(&'t OptionConfig),
}

/// Mutable state of one parse run.
#[derive(Debug)]
struct ParserContext {
    node: NodeId,
    state: ParserState,
    pending: Option<PendingOption>,
    halted: bool,
    result: ParseResult,
}

/// Parses argument vectors against a [`RuleTree`].
///
/// A parser only borrows the tree; every call to [`parse`](Self::parse)
/// starts from fresh state, so one parser may serve many calls and threads.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'t> {
    tree: &'t RuleTree,
    preferences: Preferences,
}

impl<'t> Parser<'t> {
    pub fn new(tree: &'t RuleTree, preferences: Preferences) -> Self {
        Self { tree, preferences }
    }

    /// Parses `args` (program name excluded).
    ///
    /// # Errors
    ///
    /// - [`ParseError::OptionValueRequired`] when an option gets no value or
    ///   its value cannot be taken in the enabled syntaxes;
    /// - [`ParseError::CommandRequired`] when a command-mode node is left
    ///   without a sub-command;
    /// - [`ParseError::ArgumentsLacked`] when fewer positional arguments than
    ///   the active command's minimum were given.
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<ParseResult, ParseError> {
        let mut ctx = ParserContext {
            node: self.tree.root(),
            state: ParserState::ReadingCommand,
            pending: None,
            halted: false,
            result: ParseResult::default(),
        };
        self.reset_state(&mut ctx);

        let mut cursor = 0;
        while cursor < args.len() && !ctx.halted {
            let token = args[cursor].as_ref();
            cursor += 1;
            trace!(token, state = ?ctx.state, "reading token");

            match ctx.state {
                ParserState::ReadingOptionValue => self.read_option_value(&mut ctx, token),
                state => {
                    let kind = classify(token);
                    if kind == TokenKind::Terminator {
                        ctx.result
                            .tailing_arguments
                            .extend(args[cursor..].iter().map(|a| a.as_ref().to_string()));
                        break;
                    }
                    if state == ParserState::ReadingCommand {
                        self.read_command(&mut ctx, token, kind)?;
                    } else {
                        self.read_argument(&mut ctx, token, kind)?;
                    }
                }
            }
        }

        self.finish(ctx)
    }

    fn read_command(&self, ctx: &mut ParserContext, token: &str, kind: TokenKind<'_>) -> Result<(), ParseError> {
        if self.try_flag_like(ctx, token, kind)? {
            return Ok(());
        }
        match self.tree.find_command(ctx.node, token) {
            Some(child) => {
                let name = &self.tree.node(child).info().name;
                debug!(command = %name, "descending into sub-command");
                ctx.result.commands.push(name.clone());
                ctx.node = child;
                self.reset_state(ctx);
                Ok(())
            }
            None => Err(ParseError::CommandRequired {
                input: Some(token.to_string()),
            }),
        }
    }

    fn read_argument(&self, ctx: &mut ParserContext, token: &str, kind: TokenKind<'_>) -> Result<(), ParseError> {
        let flags_closed =
            self.preferences.disable_flags_after_arguments && ctx.result.count_arguments() > 0;
        if !flags_closed && self.try_flag_like(ctx, token, kind)? {
            return Ok(());
        }
        self.save_argument(ctx, token);
        Ok(())
    }

    fn read_option_value(&self, ctx: &mut ParserContext, token: &str) {
        if let Some(pending) = ctx.pending.take() {
            ctx.result.save_option(&pending.name, token, pending.multiple);
        }
        self.reset_state(ctx);
    }

    /// Handles the flag-like forms. Returns `false` if the token should be
    /// taken as a command or argument instead.
    fn try_flag_like(&self, ctx: &mut ParserContext, token: &str, kind: TokenKind<'_>) -> Result<bool, ParseError> {
        match kind {
            TokenKind::LongAssign { name, value } => {
                self.assign(ctx, token, name, value);
                Ok(true)
            }
            TokenKind::ShortAssign { shortcut, value } => {
                if self.preferences.disable_option_assign_mode {
                    // `-o=b` is then an attached value "=b", or nothing
                    let rest = &token[1 + shortcut.len_utf8()..];
                    let kind = TokenKind::Short {
                        shortcut,
                        rest,
                        cluster: false,
                    };
                    return self.try_flag_like(ctx, token, kind);
                }
                let mut buf = [0u8; 4];
                self.assign(ctx, token, shortcut.encode_utf8(&mut buf), value);
                Ok(true)
            }
            TokenKind::Long { name } => {
                match self.lookup(ctx.node, name) {
                    Some(Entry::Option(option)) => {
                        if self.preferences.disable_option_follow_mode {
                            return Err(ParseError::OptionValueRequired {
                                input: token.to_string(),
                            });
                        }
                        self.await_value(ctx, option, token);
                    }
                    Some(Entry::Flag(canonical)) => self.save_flag(ctx, canonical),
                    None => ctx.result.save_unknown_flag(token),
                }
                Ok(true)
            }
            TokenKind::Short {
                shortcut,
                rest,
                cluster,
            } => {
                if !rest.is_empty() && !self.preferences.disable_option_attach_mode {
                    let mut buf = [0u8; 4];
                    let key = shortcut.encode_utf8(&mut buf);
                    if let Some(Entry::Option(option)) = self.lookup(ctx.node, key) {
                        ctx.result.save_option(&option.name, rest, option.multiple);
                        return Ok(true);
                    }
                }
                if cluster {
                    self.read_cluster(ctx, &token[1..])?;
                    return Ok(true);
                }
                Ok(false)
            }
            TokenKind::Terminator | TokenKind::Word => Ok(false),
        }
    }

    /// `--name=value` and `-x=value`.
    fn assign(&self, ctx: &mut ParserContext, token: &str, key: &str, value: &str) {
        if self.preferences.disable_option_assign_mode {
            self.save_argument(ctx, token);
            return;
        }
        match self.lookup(ctx.node, key) {
            Some(Entry::Option(option)) => {
                ctx.result.save_option(&option.name, value, option.multiple);
            }
            _ => ctx.result.save_unknown_flag(token),
        }
    }

    /// `-abc`: a group of flag shortcuts, optionally ending with one option.
    fn read_cluster(&self, ctx: &mut ParserContext, letters: &str) -> Result<(), ParseError> {
        let resolved: Vec<(char, Option<Entry<'t>>)> = letters
            .chars()
            .map(|c| {
                let mut buf = [0u8; 4];
                (c, self.lookup(ctx.node, c.encode_utf8(&mut buf)))
            })
            .collect();

        let options: Vec<usize> = resolved
            .iter()
            .enumerate()
            .filter(|(_, (_, found))| matches!(found, Some(Entry::Option(_))))
            .map(|(i, _)| i)
            .collect();

        let value_required = |i: usize| ParseError::OptionValueRequired {
            input: format!("-{}", resolved[i].0),
        };
        if let Some(&first) = options.first() {
            if self.preferences.disable_option_follow_mode {
                return Err(value_required(first));
            }
            if let Some(&second) = options.get(1) {
                return Err(value_required(second));
            }
            if first + 1 != resolved.len() {
                return Err(value_required(first));
            }
        }

        for (c, found) in resolved {
            match found {
                Some(Entry::Flag(name)) => self.save_flag(ctx, name),
                Some(Entry::Option(option)) => {
                    let input = format!("-{c}");
                    self.await_value(ctx, option, &input);
                }
                None => ctx.result.save_unknown_flag(&format!("-{c}")),
            }
        }
        Ok(())
    }

    fn save_flag(&self, ctx: &mut ParserContext, name: &str) {
        ctx.result.save_flag(name);
        if name == HELP && !self.preferences.disable_help_flag {
            debug!("help flag given, skipping remaining tokens");
            ctx.halted = true;
        }
    }

    fn save_argument(&self, ctx: &mut ParserContext, token: &str) {
        let info = self.tree.node(ctx.node).info();
        let full = info
            .max_arguments
            .is_some_and(|max| ctx.result.count_arguments() >= max);
        if full {
            ctx.result.tailing_arguments.push(token.to_string());
        } else {
            ctx.result.arguments.push(token.to_string());
        }
    }

    fn await_value(&self, ctx: &mut ParserContext, option: &OptionConfig, input: &str) {
        ctx.pending = Some(PendingOption {
            name: option.name.clone(),
            multiple: option.multiple,
            input: input.to_string(),
        });
        ctx.state = ParserState::ReadingOptionValue;
    }

    fn lookup(&self, node: NodeId, key: &str) -> Option<Entry<'t>> {
        let (defined_at, kind, name) = self.tree.resolve_flag_like(node, key)?;
        match kind {
            FlagLike::Flag => Some(Entry::Flag(name)),
            FlagLike::Option => self.tree.node(defined_at).option(name).map(Entry::Option),
        }
    }

    fn reset_state(&self, ctx: &mut ParserContext) {
        ctx.state = if self.tree.is_command_mode(ctx.node) {
            ParserState::ReadingCommand
        } else {
            ParserState::ReadingArguments
        };
    }

    fn finish(&self, mut ctx: ParserContext) -> Result<ParseResult, ParseError> {
        if is_help_request(&self.preferences, &ctx.result) {
            return Ok(ctx.result);
        }
        match ctx.state {
            ParserState::ReadingArguments => {
                let expected = self.tree.node(ctx.node).info().min_arguments;
                let actual = ctx.result.count_arguments();
                if actual < expected {
                    return Err(ParseError::ArgumentsLacked { expected, actual });
                }
                ctx.result.successful = true;
                Ok(ctx.result)
            }
            ParserState::ReadingCommand => Err(ParseError::CommandRequired { input: None }),
            ParserState::ReadingOptionValue => Err(ParseError::OptionValueRequired {
                input: ctx.pending.map(|p| p.input).unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::RuleBuilder;
    use crate::types::{CommandConfig, FlagConfig, OptionConfig};

    fn tree_with(preferences: Preferences) -> RuleTree {
        let mut tree = RuleTree::new(CommandConfig::new("app"));
        let mut b = RuleBuilder::new(&mut tree, NodeId::ROOT, preferences);
        b.add_flag(FlagConfig::new("verbose").with_shortcut('v'))
            .and_then(|b| b.add_flag(FlagConfig::new("quiet").with_shortcut('q')))
            .and_then(|b| b.add_option(OptionConfig::new("output").with_shortcut('o')))
            .and_then(|b| {
                b.add_option(OptionConfig::new("tag").with_shortcut('t').allow_multiple())
            })
            .expect("rules should build");
        tree
    }

    fn parse(tree: &RuleTree, preferences: Preferences, args: &[&str]) -> Result<ParseResult, ParseError> {
        Parser::new(tree, preferences).parse(args)
    }

    fn ok(args: &[&str]) -> ParseResult {
        let tree = tree_with(Preferences::default());
        parse(&tree, Preferences::default(), args).expect("parse should succeed")
    }

    fn err(preferences: Preferences, args: &[&str]) -> ParseError {
        let tree = tree_with(preferences);
        parse(&tree, preferences, args).expect_err("parse should fail")
    }

    #[test]
    fn test_help_request_detection() {
        let prefs = Preferences::default();
        let mut result = ParseResult::default();
        assert!(!is_help_request(&prefs, &result));
        result.commands.push("HELP".to_string());
        assert!(is_help_request(&prefs, &result));

        let no_command = Preferences {
            disable_help_command: true,
            ..Preferences::default()
        };
        assert!(!is_help_request(&no_command, &result));
        result.save_flag("help");
        assert!(is_help_request(&no_command, &result));
    }

    #[test]
    fn test_flags_count_occurrences() {
        let result = ok(&["-v", "--verbose", "-vv", "-q"]);
        assert_eq!(result.flag_count("verbose"), 4);
        assert_eq!(result.flag_count("quiet"), 1);
        assert!(result.successful);
    }

    #[test]
    fn test_option_syntaxes() {
        let result = ok(&["--output=a", "-o", "b", "-oc", "-o=d", "--output", "e"]);
        assert_eq!(result.option("output"), Some(&["e".to_string()][..]));

        let result = ok(&["-ta", "--tag=b", "-t", "c"]);
        assert_eq!(result.option("tag").map(<[String]>::len), Some(3));
        assert_eq!(result.option_value("tag"), Some("c"));
    }

    #[test]
    fn test_option_value_is_taken_verbatim() {
        let result = ok(&["--output", "--verbose", "-o", "--"]);
        assert_eq!(result.option_value("output"), Some("--"));
        assert_eq!(result.flag_count("verbose"), 0);
        assert!(result.tailing_arguments.is_empty());
    }

    #[test]
    fn test_cluster_with_trailing_option() {
        let result = ok(&["-vqo", "out.txt", "file"]);
        assert_eq!(result.flag_count("verbose"), 1);
        assert_eq!(result.flag_count("quiet"), 1);
        assert_eq!(result.option_value("output"), Some("out.txt"));
        assert_eq!(result.arguments, vec!["file"]);
    }

    #[test]
    fn test_cluster_option_not_last() {
        // with attach mode on, "-ovq" would be "-o" with value "vq"
        let prefs = Preferences {
            disable_option_attach_mode: true,
            ..Preferences::default()
        };
        let e = err(prefs, &["-ovq"]);
        assert_eq!(
            e,
            ParseError::OptionValueRequired {
                input: "-o".to_string()
            }
        );
    }

    #[test]
    fn test_cluster_with_two_options_reports_second() {
        let e = err(Preferences::default(), &["-vot"]);
        assert_eq!(
            e,
            ParseError::OptionValueRequired {
                input: "-t".to_string()
            }
        );
    }

    #[test]
    fn test_cluster_records_unknown_letters() {
        let result = ok(&["-vxyx", "-Z"]);
        assert_eq!(result.flag_count("verbose"), 1);
        assert_eq!(result.unknown_flags, vec!["-x", "-y", "-Z"]);
    }

    #[test]
    fn test_unknown_long_forms() {
        let result = ok(&["--color", "--verbose=yes", "--color", "--width=80"]);
        assert_eq!(result.unknown_flags, vec!["--color", "--verbose=yes", "--width=80"]);
        assert!(result.flags.is_empty());
    }

    #[test]
    fn test_follow_mode_disabled() {
        let prefs = Preferences {
            disable_option_follow_mode: true,
            ..Preferences::default()
        };
        assert_eq!(
            err(prefs, &["--output", "x"]),
            ParseError::OptionValueRequired {
                input: "--output".to_string()
            }
        );
        assert_eq!(
            err(prefs, &["-vo"]),
            ParseError::OptionValueRequired {
                input: "-o".to_string()
            }
        );
        let tree = tree_with(prefs);
        let result = parse(&tree, prefs, &["--output=x", "-oy"]).unwrap();
        assert_eq!(result.option_value("output"), Some("y"));
    }

    #[test]
    fn test_attach_mode_disabled() {
        let prefs = Preferences {
            disable_option_attach_mode: true,
            ..Preferences::default()
        };
        let tree = tree_with(prefs);
        let result = parse(&tree, prefs, &["-o/tmp"]).unwrap();
        assert_eq!(result.option("output"), None);
        assert_eq!(result.arguments, vec!["-o/tmp"]);
        // -ov is now a cluster with the option first
        let e = parse(&tree, prefs, &["-ov"]).unwrap_err();
        assert_eq!(e.name(), "option_value_required");
    }

    #[test]
    fn test_assign_mode_disabled() {
        let prefs = Preferences {
            disable_option_assign_mode: true,
            ..Preferences::default()
        };
        let tree = tree_with(prefs);
        let result = parse(&tree, prefs, &["--output=a", "-o=b", "c"]).unwrap();
        // the short form falls back to an attached value
        assert_eq!(result.option_value("output"), Some("=b"));
        assert_eq!(result.arguments, vec!["--output=a", "c"]);

        let result = parse(&tree, prefs, &["-v=x", "-Z=y"]).unwrap();
        assert_eq!(result.flag_count("verbose"), 0);
        assert!(result.unknown_flags.is_empty());
        assert_eq!(result.arguments, vec!["-v=x", "-Z=y"]);
    }

    #[test]
    fn test_assign_mode_disabled_without_attach() {
        let prefs = Preferences {
            disable_option_assign_mode: true,
            disable_option_attach_mode: true,
            ..Preferences::default()
        };
        let tree = tree_with(prefs);
        let result = parse(&tree, prefs, &["-o=b"]).unwrap();
        assert_eq!(result.option("output"), None);
        assert_eq!(result.arguments, vec!["-o=b"]);
    }

    #[test]
    fn test_flags_after_arguments_disabled() {
        let prefs = Preferences {
            disable_flags_after_arguments: true,
            ..Preferences::default()
        };
        let tree = tree_with(prefs);
        let result = parse(&tree, prefs, &["-v", "file", "-v", "--output=x"]).unwrap();
        assert_eq!(result.flag_count("verbose"), 1);
        assert_eq!(result.arguments, vec!["file", "-v", "--output=x"]);
    }

    #[test]
    fn test_terminator_collects_tailing_arguments() {
        let result = ok(&["a", "--", "-v", "--", "b"]);
        assert_eq!(result.arguments, vec!["a"]);
        assert_eq!(result.tailing_arguments, vec!["-v", "--", "b"]);
        assert_eq!(result.flag_count("verbose"), 0);
    }

    #[test]
    fn test_missing_option_value_at_end() {
        assert_eq!(
            err(Preferences::default(), &["-v", "--output"]),
            ParseError::OptionValueRequired {
                input: "--output".to_string()
            }
        );
        assert_eq!(
            err(Preferences::default(), &["-vo"]),
            ParseError::OptionValueRequired {
                input: "-o".to_string()
            }
        );
    }

    #[test]
    fn test_help_flag_stops_parsing() {
        let tree = tree_with(Preferences::default());
        let result = parse(&tree, Preferences::default(), &["-h", "--output"]).unwrap();
        assert!(!result.successful);
        assert!(result.has_flag("help"));
        assert!(result.option("output").is_none());

        let result = parse(&tree, Preferences::default(), &["-vh", "x"]).unwrap();
        assert_eq!(result.flag_count("verbose"), 1);
        assert!(result.arguments.is_empty());
    }

    fn command_tree(preferences: Preferences) -> RuleTree {
        let mut tree = RuleTree::new(CommandConfig::new("app"));
        let mut b = RuleBuilder::new(&mut tree, NodeId::ROOT, preferences);
        b.add_flag(FlagConfig::new("verbose").with_shortcut('v'))
            .and_then(|b| {
                b.add_command_with(CommandConfig::new("users").with_shortcut("u"), |users| {
                    users
                        .add_option(OptionConfig::new("verbose").with_shortcut('V'))?
                        .add_command(
                            CommandConfig::new("add")
                                .with_min_arguments(1)
                                .with_max_arguments(2),
                        )?;
                    Ok(())
                })
            })
            .expect("rules should build");
        tree
    }

    #[test]
    fn test_command_descent_and_argument_bounds() {
        let prefs = Preferences::default();
        let tree = command_tree(prefs);
        let result = parse(&tree, prefs, &["U", "ADD", "a", "b", "c", "d"]).unwrap();
        assert_eq!(result.commands, vec!["users", "add"]);
        assert_eq!(result.arguments, vec!["a", "b"]);
        assert_eq!(result.tailing_arguments, vec!["c", "d"]);
        assert!(result.successful);
    }

    #[test]
    fn test_command_required() {
        let prefs = Preferences::default();
        let tree = command_tree(prefs);
        assert_eq!(
            parse(&tree, prefs, &["users"]).unwrap_err(),
            ParseError::CommandRequired { input: None }
        );
        assert_eq!(
            parse(&tree, prefs, &["groups"]).unwrap_err(),
            ParseError::CommandRequired {
                input: Some("groups".to_string())
            }
        );
    }

    #[test]
    fn test_arguments_lacked_counts_tailing() {
        let prefs = Preferences::default();
        let tree = command_tree(prefs);
        assert_eq!(
            parse(&tree, prefs, &["users", "add"]).unwrap_err(),
            ParseError::ArgumentsLacked {
                expected: 1,
                actual: 0
            }
        );
        let result = parse(&tree, prefs, &["users", "add", "--", "x"]).unwrap();
        assert!(result.successful);
        assert_eq!(result.tailing_arguments, vec!["x"]);
    }

    #[test]
    fn test_nearest_definition_wins() {
        let prefs = Preferences::default();
        let tree = command_tree(prefs);
        let result = parse(&tree, prefs, &["-v", "users", "--verbose", "x", "add", "-v", "a"]).unwrap();
        assert_eq!(result.flag_count("verbose"), 2);
        assert_eq!(result.option_value("verbose"), Some("x"));
    }

    #[test]
    fn test_inherited_multiple_option_survives_shadowing_flag() {
        let prefs = Preferences::default();
        let mut tree = RuleTree::new(CommandConfig::new("app"));
        let mut b = RuleBuilder::new(&mut tree, NodeId::ROOT, prefs);
        b.add_option(OptionConfig::new("tag").with_shortcut('t').allow_multiple())
            .and_then(|b| {
                b.add_command_with(CommandConfig::new("sub"), |sub| {
                    sub.add_flag(FlagConfig::new("tag"))?;
                    Ok(())
                })
            })
            .expect("rules should build");

        let result = parse(&tree, prefs, &["sub", "-t", "a", "-tb", "-t=c", "--tag"]).unwrap();
        assert_eq!(
            result.option("tag"),
            Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
        );
        assert_eq!(result.flag_count("tag"), 1);
    }

    #[test]
    fn test_option_value_returns_to_command_state() {
        let prefs = Preferences::default();
        let tree = command_tree(prefs);
        let result = parse(&tree, prefs, &["users", "-V", "x", "add", "a"]).unwrap();
        assert_eq!(result.commands, vec!["users", "add"]);
        assert_eq!(result.arguments, vec!["a"]);
    }

    #[test]
    fn test_help_command_skips_requirements() {
        let prefs = Preferences::default();
        let tree = command_tree(prefs);
        let result = parse(&tree, prefs, &["help", "users"]).unwrap();
        assert_eq!(result.commands, vec!["help"]);
        assert_eq!(result.arguments, vec!["users"]);
        assert!(!result.successful);
    }
}
