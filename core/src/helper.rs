//! The user-facing façade tying rules, parser and help together.

use std::error::Error as StdError;

use tracing::debug;

use crate::builder::RuleBuilder;
use crate::definition::Definition;
use crate::error::{ParseError, RuleError};
use crate::help::HelpGenerator;
use crate::lang::LangPackage;
use crate::parser::{Parser, is_help_request};
use crate::preferences::{HelperOptions, Preferences};
use crate::result::ParseResult;
use crate::rules::{NodeId, RuleTree};
use crate::types::{CommandConfig, FlagConfig, OptionConfig};

/// Outcome of [`Helper::parse_and_process`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
    /// Parsing succeeded and no help was requested.
    Result(ParseResult),
    /// The help page that was asked for.
    Help(Vec<String>),
    /// An error report with help hints.
    Error(Vec<String>),
}

/// Owns a rule tree and exposes rule registration, parsing and help.
///
/// Rules are registered up front; afterwards the helper is only read, so
/// `&Helper` can be shared across threads and each [`parse`](Self::parse)
/// call works on its own state.
///
/// # Examples
///
/// ```
/// use argtree_core::*;
///
/// let mut helper = Helper::new(HelperOptions::new("Users v1", "users", "Manage users."));
/// helper.add_command_with(CommandConfig::new("add").with_min_arguments(1), |add| {
///     add.add_option(OptionConfig::new("role").with_shortcut('r'))?;
///     Ok(())
/// })?;
///
/// match helper.parse_and_process(&["add", "-r", "admin", "alice"]) {
///     Processed::Result(result) => {
///         assert_eq!(result.commands, vec!["add"]);
///         assert_eq!(result.option_value("role"), Some("admin"));
///     }
///     Processed::Help(lines) | Processed::Error(lines) => panic!("unexpected output: {lines:?}"),
/// }
///
/// let Processed::Help(lines) = helper.parse_and_process(&["help", "add"]) else {
///     panic!("expected help output");
/// };
/// assert_eq!(lines[0], "Users v1");
/// assert_eq!(lines[1], "USAGE: users [...OPTIONS] add [...COMMAND-OPTIONS] [...ARGS]");
/// # Ok::<(), RuleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Helper {
    title: String,
    command: String,
    preferences: Preferences,
    lang: LangPackage,
    tree: RuleTree,
}

impl Helper {
    /// Creates a helper with only the root command.
    ///
    /// The language package in `options` is overlaid on the built-in English
    /// package.
    pub fn new(options: HelperOptions) -> Self {
        let lang = match &options.language {
            Some(custom) => LangPackage::english().overlay(custom),
            None => LangPackage::english(),
        };
        let root = CommandConfig::new(options.command.clone()).with_description(options.description);
        let mut helper = Self {
            title: options.title,
            command: options.command,
            preferences: options.preferences,
            lang,
            tree: RuleTree::new(root),
        };
        // registers the root help flag
        helper.builder();
        helper
    }

    /// Creates a helper and registers every rule of `definition`.
    ///
    /// # Errors
    ///
    /// The first [`RuleError`] raised by the definition's rules.
    pub fn from_definition(definition: &Definition) -> Result<Self, RuleError> {
        let mut helper = Self::new(definition.helper_options());
        definition.apply(&mut helper.builder())?;
        Ok(helper)
    }

    /// A builder scoped to the root command.
    pub fn builder(&mut self) -> RuleBuilder<'_> {
        RuleBuilder::new(&mut self.tree, NodeId::ROOT, self.preferences)
    }

    pub fn add_command(&mut self, config: CommandConfig) -> Result<&mut Self, RuleError> {
        self.builder().add_command(config)?;
        Ok(self)
    }

    pub fn add_command_with<F>(&mut self, config: CommandConfig, build: F) -> Result<&mut Self, RuleError>
    where
        F: FnOnce(&mut RuleBuilder<'_>) -> Result<(), RuleError>,
    {
        self.builder().add_command_with(config, build)?;
        Ok(self)
    }

    pub fn add_flag(&mut self, config: FlagConfig) -> Result<&mut Self, RuleError> {
        self.builder().add_flag(config)?;
        Ok(self)
    }

    pub fn add_option(&mut self, config: OptionConfig) -> Result<&mut Self, RuleError> {
        self.builder().add_option(config)?;
        Ok(self)
    }

    pub fn set_min_arguments(&mut self, qty: usize) -> &mut Self {
        self.builder().set_min_arguments(qty);
        self
    }

    pub fn set_max_arguments(&mut self, qty: impl Into<Option<usize>>) -> &mut Self {
        self.builder().set_max_arguments(qty);
        self
    }

    /// Re-enters the scope of an existing root sub-command.
    pub fn with<F>(&mut self, command: &str, build: F) -> Result<&mut Self, RuleError>
    where
        F: FnOnce(&mut RuleBuilder<'_>) -> Result<(), RuleError>,
    {
        self.builder().with(command, build)?;
        Ok(self)
    }

    pub fn tree(&self) -> &RuleTree {
        &self.tree
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// The effective language package.
    pub fn lang(&self) -> &LangPackage {
        &self.lang
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Parses `args` (program name excluded) against the registered rules.
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<ParseResult, ParseError> {
        let parsed = Parser::new(&self.tree, self.preferences).parse(args);
        if let Err(err) = &parsed {
            debug!(error = err.name(), code = err.code(), "parse failed");
        }
        parsed
    }

    /// Returns `true` if `result` asks for help.
    pub fn is_help_request(&self, result: &ParseResult) -> bool {
        is_help_request(&self.preferences, result)
    }

    /// Help page for the command a parse result points at.
    ///
    /// With `None`, or when no command path was given, the root page is
    /// produced. A result of the `help` command is resolved through its
    /// arguments, so `help users add` renders the page of `users add`.
    ///
    /// # Errors
    ///
    /// `NoSuchCommand` if a path segment does not resolve.
    pub fn generate_help_output(&self, result: Option<&ParseResult>) -> Result<Vec<String>, RuleError> {
        let generator = self.generator();
        let node = generator.target(result)?;
        Ok(generator.render_help(node))
    }

    /// Help page for an explicit command path, e.g. `["users", "add"]`.
    ///
    /// # Errors
    ///
    /// `NoSuchCommand` if a path segment does not resolve.
    pub fn generate_help_for_path<S: AsRef<str>>(&self, path: &[S]) -> Result<Vec<String>, RuleError> {
        let generator = self.generator();
        let node = generator.resolve_path(path)?;
        Ok(generator.render_help(node))
    }

    /// Error report for `err`, followed by help hints.
    ///
    /// Errors of this crate are shown by symbolic name; anything else is
    /// reported as `unknown`.
    pub fn generate_error_output(&self, err: &(dyn StdError + 'static)) -> Vec<String> {
        self.generator().render_error(err)
    }

    /// Parses `args` and turns help requests and failures into printable
    /// output.
    pub fn parse_and_process<S: AsRef<str>>(&self, args: &[S]) -> Processed {
        let result = match self.parse(args) {
            Ok(result) => result,
            Err(err) => return Processed::Error(self.generate_error_output(&err)),
        };
        if !self.is_help_request(&result) {
            return Processed::Result(result);
        }
        debug!(commands = ?result.commands, "rendering help");
        match self.generate_help_output(Some(&result)) {
            Ok(lines) => Processed::Help(lines),
            Err(err) => Processed::Error(self.generate_error_output(&err)),
        }
    }

    fn generator(&self) -> HelpGenerator<'_> {
        HelpGenerator {
            tree: &self.tree,
            preferences: &self.preferences,
            lang: &self.lang,
            title: &self.title,
            command: &self.command,
        }
    }
}
