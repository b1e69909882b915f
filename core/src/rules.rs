//! The rule tree: an arena of command nodes linked by parent indices.
//!
//! Each [`RuleNode`] owns its flags, options and sub-commands. Nodes refer to
//! their parent by [`NodeId`] rather than by reference, so name resolution
//! walks indices up the arena and no ownership cycles exist. The tree is
//! built once, usually through [`RuleBuilder`](crate::RuleBuilder), and is
//! read-only while parsing.
//!
//! Flags and options share one namespace per node. Inherited lookups check
//! the node first and then its ancestors, so a child may redefine a parent's
//! name and shadow it inside its own scope.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{EntryKind, RuleError};
use crate::types::{CommandConfig, FlagConfig, OptionConfig};
use crate::validate;

/// Handle of a node inside a [`RuleTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The implicit root command.
    pub const ROOT: NodeId = NodeId(0);
}

/// Whether a flag-like name resolved to a flag or an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagLike {
    Flag,
    Option,
}

/// Command-level information of a node, in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    pub shortcut: Option<String>,
    pub description: String,
    pub min_arguments: usize,
    pub max_arguments: Option<usize>,
}

impl CommandInfo {
    fn from_config(config: CommandConfig, name: String, shortcut: Option<String>) -> Self {
        Self {
            name,
            shortcut,
            description: config.description.unwrap_or_default(),
            min_arguments: config.min_arguments,
            max_arguments: config.max_arguments,
        }
    }
}

/// One level of the command tree.
#[derive(Debug, Clone)]
pub struct RuleNode {
    info: CommandInfo,
    parent: Option<NodeId>,
    flags: BTreeMap<String, FlagConfig>,
    options: BTreeMap<String, OptionConfig>,
    flag_like: HashMap<String, FlagLike>,
    shortcuts: HashMap<char, String>,
    commands: BTreeMap<String, NodeId>,
    command_shortcuts: HashMap<String, String>,
}

impl RuleNode {
    fn new(info: CommandInfo, parent: Option<NodeId>) -> Self {
        Self {
            info,
            parent,
            flags: BTreeMap::new(),
            options: BTreeMap::new(),
            flag_like: HashMap::new(),
            shortcuts: HashMap::new(),
            commands: BTreeMap::new(),
            command_shortcuts: HashMap::new(),
        }
    }

    pub fn info(&self) -> &CommandInfo {
        &self.info
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// A node is in command mode iff it has at least one sub-command.
    pub fn is_command_mode(&self) -> bool {
        !self.commands.is_empty()
    }

    /// Flags defined directly on this node, sorted by name.
    pub fn flags(&self) -> impl Iterator<Item = &FlagConfig> {
        self.flags.values()
    }

    /// Options defined directly on this node, sorted by name.
    pub fn options(&self) -> impl Iterator<Item = &OptionConfig> {
        self.options.values()
    }

    /// An option defined on this node, by canonical name.
    pub fn option(&self, name: &str) -> Option<&OptionConfig> {
        self.options.get(name)
    }

    /// Returns `true` if this node itself defines the flag/option name or shortcut.
    pub fn defines(&self, key: &str) -> bool {
        self.lookup_flag_like(key).is_some()
    }

    fn lookup_flag_like(&self, key: &str) -> Option<(FlagLike, &str)> {
        let mut chars = key.chars();
        let name = match (chars.next(), chars.next()) {
            (Some(shortcut), None) => self.shortcuts.get(&shortcut)?.as_str(),
            _ => {
                let (name, _) = self.flag_like.get_key_value(key.to_lowercase().as_str())?;
                name.as_str()
            }
        };
        self.flag_like.get(name).map(|kind| (*kind, name))
    }
}

/// Immutable-after-build hierarchy of command rules.
///
/// # Examples
///
/// ```
/// use argtree_core::{CommandConfig, FlagConfig, RuleTree};
///
/// let mut tree = RuleTree::new(CommandConfig::new("app"));
/// let root = tree.root();
/// tree.add_flag(root, FlagConfig::new("verbose").with_shortcut('v')).unwrap();
/// let users = tree.add_command(root, CommandConfig::new("users").with_shortcut("u")).unwrap();
///
/// assert_eq!(tree.find_command(root, "U"), Some(users));
/// assert!(tree.flag(users, "verbose").is_some()); // inherited
/// assert_eq!(tree.path(users), vec!["users"]);
/// ```
#[derive(Debug, Clone)]
pub struct RuleTree {
    nodes: Vec<RuleNode>,
}

impl RuleTree {
    /// Creates a tree holding only the root command.
    ///
    /// The root name is the program name and is kept verbatim.
    pub fn new(root: CommandConfig) -> Self {
        let name = root.name.clone();
        let info = CommandInfo::from_config(root, name, None);
        Self {
            nodes: vec![RuleNode::new(info, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the node for a handle issued by this tree.
    pub fn node(&self, id: NodeId) -> &RuleNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut RuleNode {
        &mut self.nodes[id.0]
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates `id` and then each of its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |current| self.node(*current).parent)
    }

    pub fn is_command_mode(&self, id: NodeId) -> bool {
        self.node(id).is_command_mode()
    }

    /// Canonical command path from the root (exclusive) down to `id`.
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut path: Vec<&str> = self
            .ancestors(id)
            .filter(|node| !self.node(*node).is_root())
            .map(|node| self.node(node).info.name.as_str())
            .collect();
        path.reverse();
        path
    }

    /// Finds a direct sub-command of `id` by name or shortcut, case-insensitively.
    pub fn find_command(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let node = self.node(id);
        let name = name.to_lowercase();
        let canonical = node.command_shortcuts.get(&name).unwrap_or(&name);
        node.commands.get(canonical).copied()
    }

    /// Like [`find_command`](Self::find_command), failing with `NoSuchCommand`.
    pub fn get_command(&self, id: NodeId, name: &str) -> Result<NodeId, RuleError> {
        self.find_command(id, name)
            .ok_or_else(|| RuleError::NoSuchCommand {
                name: name.to_lowercase(),
            })
    }

    /// Names of the direct sub-commands of `id`, sorted.
    pub fn command_names(&self, id: NodeId) -> Vec<&str> {
        self.node(id).commands.keys().map(String::as_str).collect()
    }

    /// Direct sub-commands of `id`, sorted by name.
    pub fn commands(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).commands.values().copied()
    }

    /// Resolves a flag/option name or single-letter shortcut.
    ///
    /// Full names are matched case-insensitively, shortcuts case-sensitively.
    /// The nearest node (starting from `id`) that defines the key wins.
    /// Returns the defining node, the entry kind and the canonical name.
    pub fn resolve_flag_like(&self, id: NodeId, key: &str) -> Option<(NodeId, FlagLike, &str)> {
        self.ancestors(id).find_map(|node| {
            self.node(node)
                .lookup_flag_like(key)
                .map(|(kind, name)| (node, kind, name))
        })
    }

    /// Finds a flag visible from `id`.
    pub fn flag(&self, id: NodeId, key: &str) -> Option<&FlagConfig> {
        match self.resolve_flag_like(id, key)? {
            (node, FlagLike::Flag, name) => self.node(node).flags.get(name),
            _ => None,
        }
    }

    /// Finds an option visible from `id`.
    pub fn option(&self, id: NodeId, key: &str) -> Option<&OptionConfig> {
        match self.resolve_flag_like(id, key)? {
            (node, FlagLike::Option, name) => self.node(node).options.get(name),
            _ => None,
        }
    }

    /// Like [`flag`](Self::flag), failing with `NoSuchFlag`.
    pub fn get_flag(&self, id: NodeId, key: &str) -> Result<&FlagConfig, RuleError> {
        self.flag(id, key).ok_or_else(|| RuleError::NoSuchFlag {
            name: key.to_string(),
        })
    }

    /// Like [`option`](Self::option), failing with `NoSuchOption`.
    pub fn get_option(&self, id: NodeId, key: &str) -> Result<&OptionConfig, RuleError> {
        self.option(id, key).ok_or_else(|| RuleError::NoSuchOption {
            name: key.to_string(),
        })
    }

    /// Names of all flags visible from `id` (own and inherited), sorted.
    pub fn flag_names(&self, id: NodeId) -> BTreeSet<&str> {
        self.ancestors(id)
            .flat_map(|node| self.node(node).flags.keys().map(String::as_str))
            .collect()
    }

    /// Names of all options visible from `id` (own and inherited), sorted.
    pub fn option_names(&self, id: NodeId) -> BTreeSet<&str> {
        self.ancestors(id)
            .flat_map(|node| self.node(node).options.keys().map(String::as_str))
            .collect()
    }

    /// Number of flags defined on `id` plus all of its ancestors.
    pub fn count_flags(&self, id: NodeId) -> usize {
        self.ancestors(id).map(|node| self.node(node).flags.len()).sum()
    }

    /// Number of options defined on `id` plus all of its ancestors.
    pub fn count_options(&self, id: NodeId) -> usize {
        self.ancestors(id).map(|node| self.node(node).options.len()).sum()
    }

    /// Adds a sub-command under `parent` and returns its handle.
    ///
    /// # Errors
    ///
    /// `InvalidName`/`InvalidShortcut` when a format is rejected,
    /// `DuplicateName`/`DuplicateShortcut` when a sibling already uses it.
    pub fn add_command(&mut self, parent: NodeId, config: CommandConfig) -> Result<NodeId, RuleError> {
        let name = config.name.to_lowercase();
        validate::check_name(EntryKind::Command, &name)?;
        if self.find_command(parent, &name).is_some() {
            return Err(RuleError::DuplicateName {
                kind: EntryKind::Command,
                name,
            });
        }

        let shortcut = config.shortcut.as_deref().map(str::to_lowercase);
        if let Some(shortcut) = &shortcut {
            validate::check_command_shortcut(&name, shortcut)?;
            if self.find_command(parent, shortcut).is_some() {
                return Err(RuleError::DuplicateShortcut {
                    kind: EntryKind::Command,
                    name,
                    shortcut: shortcut.clone(),
                });
            }
        }

        let id = NodeId(self.nodes.len());
        let info = CommandInfo::from_config(config, name.clone(), shortcut.clone());
        self.nodes.push(RuleNode::new(info, Some(parent)));

        let node = self.node_mut(parent);
        if let Some(shortcut) = shortcut {
            node.command_shortcuts.insert(shortcut, name.clone());
        }
        node.commands.insert(name, id);
        Ok(id)
    }

    /// Adds a flag to `id`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`add_command`](Self::add_command), checked against
    /// the node's shared flag/option namespace.
    pub fn add_flag(&mut self, id: NodeId, mut config: FlagConfig) -> Result<(), RuleError> {
        config.name = config.name.to_lowercase();
        self.claim_flag_like(id, EntryKind::Flag, &config.name, config.shortcut)?;

        let node = self.node_mut(id);
        node.flag_like.insert(config.name.clone(), FlagLike::Flag);
        node.flags.insert(config.name.clone(), config);
        Ok(())
    }

    /// Adds an option to `id`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`add_flag`](Self::add_flag).
    pub fn add_option(&mut self, id: NodeId, mut config: OptionConfig) -> Result<(), RuleError> {
        config.name = config.name.to_lowercase();
        self.claim_flag_like(id, EntryKind::Option, &config.name, config.shortcut)?;

        let node = self.node_mut(id);
        node.flag_like.insert(config.name.clone(), FlagLike::Option);
        node.options.insert(config.name.clone(), config);
        Ok(())
    }

    /// Validates a flag-like name/shortcut pair and reserves the shortcut.
    fn claim_flag_like(
        &mut self,
        id: NodeId,
        kind: EntryKind,
        name: &str,
        shortcut: Option<char>,
    ) -> Result<(), RuleError> {
        validate::check_name(kind, name)?;
        let node = self.node_mut(id);
        if node.flag_like.contains_key(name) {
            return Err(RuleError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }

        if let Some(shortcut) = shortcut {
            validate::check_shortcut(kind, name, shortcut)?;
            if node.shortcuts.contains_key(&shortcut) {
                return Err(RuleError::DuplicateShortcut {
                    kind,
                    name: name.to_string(),
                    shortcut: shortcut.to_string(),
                });
            }
            node.shortcuts.insert(shortcut, name.to_string());
        }
        Ok(())
    }

    pub fn set_min_arguments(&mut self, id: NodeId, qty: usize) {
        self.node_mut(id).info.min_arguments = qty;
    }

    pub fn set_max_arguments(&mut self, id: NodeId, qty: Option<usize>) {
        self.node_mut(id).info.max_arguments = qty;
    }
}
