//! Shared rule sets for the demo programs.
//!
//! Run them with `cargo run -p argtree-demos --example users -- <TOKENS>`.

use argtree_core::{
    CommandConfig, FlagConfig, Helper, HelperOptions, LangPackage, OptionConfig, RuleError,
};

/// A user-management tool with nested sub-commands.
///
/// ```text
/// users [-v] add <NAME> [-r ROLE]... [--home DIR]
/// users [-v] list [--format FMT]
/// users [-v] group add|remove <GROUP> <USER>...
/// ```
pub fn users_helper() -> Result<Helper, RuleError> {
    let lang = LangPackage::from_pairs([
        ("cmd:add:arguments", "<NAME>"),
        ("cmd:group:add:arguments", "<GROUP> <USER>..."),
        ("cmd:group:remove:arguments", "<GROUP> <USER>..."),
        ("flags:format:argument", "<table|json>"),
        ("cmd:add:flags:home:argument", "<dir>"),
    ]);
    let options = HelperOptions::new("Users v1.0", "users", "Manage local users and groups.")
        .with_language(lang);

    let mut helper = Helper::new(options);
    helper
        .add_flag(
            FlagConfig::new("verbose")
                .with_shortcut('v')
                .with_description("Print more details."),
        )?
        .add_command_with(
            CommandConfig::new("add")
                .with_shortcut("a")
                .with_description("Create a user.")
                .with_min_arguments(1)
                .with_max_arguments(1),
            |add| {
                add.add_option(
                    OptionConfig::new("role")
                        .with_shortcut('r')
                        .with_description("Role to grant.\nMay be given more than once.")
                        .allow_multiple(),
                )?
                .add_option(OptionConfig::new("home").with_description("Home directory."))?;
                Ok(())
            },
        )?
        .add_command_with(
            CommandConfig::new("list")
                .with_shortcut("ls")
                .with_description("List users.")
                .with_max_arguments(0),
            |list| {
                list.add_option(
                    OptionConfig::new("format")
                        .with_shortcut('f')
                        .with_description("Output format."),
                )?;
                Ok(())
            },
        )?
        .add_command_with(
            CommandConfig::new("group").with_description("Manage groups."),
            |group| {
                group
                    .add_command(
                        CommandConfig::new("add")
                            .with_description("Add users to a group.")
                            .with_min_arguments(2),
                    )?
                    .add_command(
                        CommandConfig::new("remove")
                            .with_shortcut("rm")
                            .with_description("Remove users from a group.")
                            .with_min_arguments(2),
                    )?;
                Ok(())
            },
        )?;
    Ok(helper)
}

/// Installs a stderr subscriber honouring `RUST_LOG`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
