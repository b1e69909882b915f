//! Builds a helper from a YAML definition and prints every help page.
//!
//! ```text
//! cargo run -p argtree-demos --example definition
//! ```

use argtree_core::{Definition, Helper, NodeId, RuleTree};
use argtree_demos::init_logging;

const DEFINITION: &str = r#"
title: Archiver v0.3
command: arc
description: Pack and unpack archives.
preferences:
  disable_help_command: true
flags:
  - name: quiet
    shortcut: q
    description: Print nothing but errors.
commands:
  - name: pack
    shortcut: p
    description: Create an archive.
    min_arguments: 2
    options:
      - name: level
        shortcut: l
        description: Compression level, 0 to 9.
      - name: exclude
        shortcut: x
        multiple: true
        description: Glob of files to leave out.
  - name: unpack
    shortcut: u
    description: Extract an archive.
    min_arguments: 1
    max_arguments: 1
    options:
      - name: into
        description: Target directory.
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let definition = Definition::from_yaml(DEFINITION)?;
    let helper = Helper::from_definition(&definition)?;

    let mut paths = Vec::new();
    collect_paths(helper.tree(), helper.tree().root(), &mut paths);
    for path in paths {
        for line in helper.generate_help_for_path(&path)? {
            println!("{line}");
        }
        println!();
    }

    let result = helper.parse(&["pack", "-l9", "-x", "*.tmp", "out.arc", "src"])?;
    println!("{}", summary(&result));
    Ok(())
}

/// Depth-first list of command paths, root first.
fn collect_paths(tree: &RuleTree, node: NodeId, out: &mut Vec<Vec<String>>) {
    out.push(tree.path(node).into_iter().map(str::to_string).collect());
    for child in tree.commands(node) {
        collect_paths(tree, child, out);
    }
}

fn summary(result: &argtree_core::ParseResult) -> String {
    format!(
        "{} level={} exclude={:?} args={:?}",
        result.commands.join(" "),
        result.option_value("level").unwrap_or("-"),
        result.option("exclude").unwrap_or_default(),
        result.arguments,
    )
}
