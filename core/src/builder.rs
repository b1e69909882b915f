//! Fluent construction of a [`RuleTree`].
//!
//! A [`RuleBuilder`] is a handle scoped to one node of the tree. Adding a
//! command with a callback (or calling [`RuleBuilder::with`]) opens a nested
//! builder scoped to the child; the scope ends when the callback returns, so
//! a whole tree is assembled in one declarative pass.
//!
//! The builder also wires in the implicit help entries, unless disabled by
//! [`Preferences`]:
//!
//! - a `help` flag (shortcut `h`) on every node it creates, and
//! - a `help` sub-command at the root once any other command exists.

use tracing::debug;

use crate::error::RuleError;
use crate::preferences::Preferences;
use crate::rules::{NodeId, RuleTree};
use crate::types::{CommandConfig, FlagConfig, OptionConfig};

/// Name of the implicit help flag and help command.
pub const HELP: &str = "help";

/// Builder handle scoped to one node of a [`RuleTree`].
///
/// # Examples
///
/// ```
/// use argtree_core::*;
///
/// let mut tree = RuleTree::new(CommandConfig::new("app"));
/// let mut builder = RuleBuilder::new(&mut tree, NodeId::ROOT, Preferences::default());
/// builder
///     .add_flag(FlagConfig::new("verbose").with_shortcut('v'))?
///     .add_command_with(CommandConfig::new("users").with_shortcut("u"), |users| {
///         users
///             .add_command(CommandConfig::new("add").with_min_arguments(1))?
///             .add_option(OptionConfig::new("role").allow_multiple())?;
///         Ok(())
///     })?;
///
/// let root = tree.root();
/// assert_eq!(tree.command_names(root), vec!["help", "users"]);
/// let users = tree.find_command(root, "u").unwrap();
/// assert!(tree.find_command(users, "add").is_some());
/// assert!(tree.find_command(users, "help").is_none()); // root only
/// # Ok::<(), RuleError>(())
/// ```
#[derive(Debug)]
pub struct RuleBuilder<'a> {
    tree: &'a mut RuleTree,
    node: NodeId,
    preferences: Preferences,
}

impl<'a> RuleBuilder<'a> {
    /// Opens a builder scoped to `node`.
    ///
    /// The implicit help flag is registered on `node` if it is missing. A
    /// node that already defines its own `help` entry keeps it, and if `h` is
    /// taken by another entry the help flag is registered without shortcut.
    pub fn new(tree: &'a mut RuleTree, node: NodeId, preferences: Preferences) -> Self {
        let mut builder = Self {
            tree,
            node,
            preferences,
        };
        if let Err(err) = builder.ensure_help_flag(node) {
            debug!(error = err.name(), "implicit help flag not registered: {err}");
        }
        builder
    }

    /// The node this builder is scoped to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn tree(&self) -> &RuleTree {
        &*self.tree
    }

    /// Registers a sub-command of the current node.
    pub fn add_command(&mut self, config: CommandConfig) -> Result<&mut Self, RuleError> {
        self.insert_command(config)?;
        Ok(self)
    }

    /// Registers a sub-command and builds its rules inside `build`.
    pub fn add_command_with<F>(&mut self, config: CommandConfig, build: F) -> Result<&mut Self, RuleError>
    where
        F: FnOnce(&mut RuleBuilder<'_>) -> Result<(), RuleError>,
    {
        let id = self.insert_command(config)?;
        self.scoped(id, build)?;
        Ok(self)
    }

    /// Registers an option of the current node.
    pub fn add_option(&mut self, config: OptionConfig) -> Result<&mut Self, RuleError> {
        self.tree.add_option(self.node, config)?;
        Ok(self)
    }

    /// Registers a flag of the current node.
    pub fn add_flag(&mut self, config: FlagConfig) -> Result<&mut Self, RuleError> {
        self.tree.add_flag(self.node, config)?;
        Ok(self)
    }

    /// Sets the minimum quantity of positional arguments. Default `0`.
    pub fn set_min_arguments(&mut self, qty: usize) -> &mut Self {
        self.tree.set_min_arguments(self.node, qty);
        self
    }

    /// Sets the maximum quantity of positional arguments; `None` is unbounded.
    ///
    /// Positional arguments beyond the bound become tailing arguments.
    pub fn set_max_arguments(&mut self, qty: impl Into<Option<usize>>) -> &mut Self {
        self.tree.set_max_arguments(self.node, qty.into());
        self
    }

    /// Re-enters an existing sub-command's scope.
    ///
    /// # Errors
    ///
    /// `NoSuchCommand` if the current node has no such sub-command, or any
    /// error returned by `build`.
    pub fn with<F>(&mut self, command: &str, build: F) -> Result<&mut Self, RuleError>
    where
        F: FnOnce(&mut RuleBuilder<'_>) -> Result<(), RuleError>,
    {
        let id = self.tree.get_command(self.node, command)?;
        self.scoped(id, build)?;
        Ok(self)
    }

    fn scoped<F>(&mut self, id: NodeId, build: F) -> Result<(), RuleError>
    where
        F: FnOnce(&mut RuleBuilder<'_>) -> Result<(), RuleError>,
    {
        let mut child = RuleBuilder::new(&mut *self.tree, id, self.preferences);
        build(&mut child)
    }

    fn insert_command(&mut self, config: CommandConfig) -> Result<NodeId, RuleError> {
        let id = self.tree.add_command(self.node, config)?;
        self.ensure_help_flag(id)?;
        if self.tree.node(self.node).is_root() {
            self.ensure_help_command()?;
        }
        Ok(id)
    }

    fn ensure_help_flag(&mut self, id: NodeId) -> Result<(), RuleError> {
        if self.preferences.disable_help_flag || self.tree.node(id).defines(HELP) {
            return Ok(());
        }
        let mut flag = FlagConfig::new(HELP);
        if !self.preferences.disable_help_flag_shortcut && !self.tree.node(id).defines("h") {
            flag = flag.with_shortcut('h');
        }
        debug!(command = %self.tree.node(id).info().name, "registering implicit help flag");
        self.tree.add_flag(id, flag)
    }

    fn ensure_help_command(&mut self) -> Result<(), RuleError> {
        let root = self.tree.root();
        if self.preferences.disable_help_command || self.tree.find_command(root, HELP).is_some() {
            return Ok(());
        }
        debug!("registering implicit help command");
        let id = self.tree.add_command(root, CommandConfig::new(HELP))?;
        self.ensure_help_flag(id)
    }
}
