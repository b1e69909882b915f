use argtree_core::{
    CommandConfig, Definition, FlagConfig, Helper, HelperOptions, OptionConfig, ParseError,
    ParseResult, Preferences, Processed, RuleError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `app [-v] [--output F] [--tag T]... users|u <NAME>... | group add <NAME>... | build [ARGS]`
fn app_helper(preferences: Preferences) -> Helper {
    let options = HelperOptions::new("App v1", "app", "An application.")
        .with_preferences(preferences);
    let mut helper = Helper::new(options);
    helper
        .add_flag(FlagConfig::new("verbose").with_shortcut('v'))
        .and_then(|h| h.add_option(OptionConfig::new("output").with_shortcut('o')))
        .and_then(|h| {
            h.add_option(
                OptionConfig::new("tag")
                    .with_shortcut('t')
                    .allow_multiple(),
            )
        })
        .and_then(|h| {
            h.add_command(
                CommandConfig::new("users")
                    .with_shortcut("u")
                    .with_min_arguments(1),
            )
        })
        .and_then(|h| {
            h.add_command_with(CommandConfig::new("group"), |group| {
                group.add_command(CommandConfig::new("add").with_min_arguments(1))?;
                Ok(())
            })
        })
        .and_then(|h| h.add_command(CommandConfig::new("build")))
        .expect("rules should build");
    helper
}

fn bounded_helper(min: usize, max: Option<usize>) -> Helper {
    let mut helper = Helper::new(HelperOptions::new("Tool", "tool", "A tool."));
    helper.set_min_arguments(min).set_max_arguments(max);
    helper
        .add_flag(FlagConfig::new("verbose").with_shortcut('v'))
        .and_then(|h| h.add_option(OptionConfig::new("name").with_shortcut('n')))
        .expect("rules should build");
    helper
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Name resolution
// ---------------------------------------------------------------------------

#[test]
fn full_names_ignore_case_and_shortcuts_do_not() {
    let helper = bounded_helper(0, None);

    let result = helper.parse(&["--VERBOSE", "--Name", "x"]).unwrap();
    assert_eq!(result.flag_count("verbose"), 1);
    assert_eq!(result.option_value("name"), Some("x"));

    let result = helper.parse(&["-V"]).unwrap();
    assert_eq!(result.flag_count("verbose"), 0);
    assert_eq!(result.unknown_flags, vec!["-V"]);
}

#[test]
fn commands_resolve_by_name_or_shortcut_case_insensitively() {
    let helper = app_helper(Preferences::default());
    for token in ["users", "USERS", "u", "U"] {
        let result = helper.parse(&[token, "alice"]).unwrap();
        assert_eq!(result.commands, vec!["users"], "token {token}");
    }
}

#[test]
fn parse_is_repeatable_and_deterministic() {
    let args = ["-v", "--tag", "a", "u", "-t", "b", "alice"];
    let first = app_helper(Preferences::default()).parse(&args).unwrap();
    let second = app_helper(Preferences::default()).parse(&args).unwrap();
    assert_eq!(first, second);

    let helper = app_helper(Preferences::default());
    assert_eq!(helper.parse(&args).unwrap(), helper.parse(&args).unwrap());
}

// ---------------------------------------------------------------------------
// Flags and options
// ---------------------------------------------------------------------------

#[test]
fn every_flag_spelling_counts_once() {
    let helper = bounded_helper(0, None);
    let result = helper.parse(&["--verbose", "-v", "-vv"]).unwrap();
    assert_eq!(result.flag_count("verbose"), 4);
}

#[test]
fn option_syntaxes_agree() {
    let helper = bounded_helper(0, None);
    for args in [
        vec!["--name", "x"],
        vec!["--name=x"],
        vec!["-n", "x"],
        vec!["-n=x"],
        vec!["-nx"],
    ] {
        let result = helper.parse(&args).unwrap();
        assert_eq!(result.option_value("name"), Some("x"), "args {args:?}");
    }
}

#[test]
fn multiple_options_accumulate_and_single_ones_keep_the_last() {
    let helper = app_helper(Preferences::default());
    let result = helper
        .parse(&["-t", "a", "--tag=b", "-o", "first", "--output", "second", "build"])
        .unwrap();
    assert_eq!(result.option("tag"), Some(&strings(&["a", "b"])[..]));
    assert_eq!(result.option("output"), Some(&strings(&["second"])[..]));
}

#[test]
fn option_values_are_not_interpreted() {
    let helper = bounded_helper(0, None);
    let result = helper.parse(&["--name", "--verbose"]).unwrap();
    assert_eq!(result.option_value("name"), Some("--verbose"));
    assert_eq!(result.flag_count("verbose"), 0);
}

#[test]
fn unknown_flags_are_collected_once() {
    let helper = bounded_helper(0, None);
    let result = helper
        .parse(&["--color", "--color", "--size=3", "-vx"])
        .unwrap();
    assert!(result.successful);
    assert_eq!(result.unknown_flags, vec!["--color", "--size=3", "-x"]);
    assert_eq!(result.flag_count("verbose"), 1);
}

#[test]
fn trailing_option_without_value_fails() {
    let helper = bounded_helper(0, None);
    assert_eq!(
        helper.parse(&["--name"]).unwrap_err(),
        ParseError::OptionValueRequired {
            input: "--name".to_string()
        }
    );
    assert_eq!(
        helper.parse(&["-vn"]).unwrap_err(),
        ParseError::OptionValueRequired {
            input: "-n".to_string()
        }
    );
}

// ---------------------------------------------------------------------------
// Arguments and commands
// ---------------------------------------------------------------------------

#[test]
fn arguments_beyond_maximum_become_tailing() {
    let helper = bounded_helper(2, Some(2));
    let result = helper.parse(&["a", "b", "c"]).unwrap();
    assert!(result.successful);
    assert_eq!(result.arguments, strings(&["a", "b"]));
    assert_eq!(result.tailing_arguments, strings(&["c"]));
    assert!(result.count_arguments() >= 2);
}

#[test]
fn terminator_passes_everything_after_it_through() {
    let helper = app_helper(Preferences::default());
    let result = helper.parse(&["build", "--", "--not-a-flag", "x"]).unwrap();
    assert!(result.successful);
    assert_eq!(result.commands, vec!["build"]);
    assert!(result.arguments.is_empty());
    assert_eq!(result.tailing_arguments, strings(&["--not-a-flag", "x"]));
    assert!(result.unknown_flags.is_empty());
}

#[test]
fn command_mode_root_requires_a_command() {
    let helper = app_helper(Preferences::default());
    let empty: [&str; 0] = [];
    assert_eq!(
        helper.parse(&empty).unwrap_err(),
        ParseError::CommandRequired { input: None }
    );
    assert_eq!(
        helper.parse(&["-v"]).unwrap_err(),
        ParseError::CommandRequired { input: None }
    );
    assert_eq!(
        helper.parse(&["deploy"]).unwrap_err(),
        ParseError::CommandRequired {
            input: Some("deploy".to_string())
        }
    );
}

#[test]
fn shortcut_command_with_minimum_arguments() {
    let helper = app_helper(Preferences::default());

    let result = helper.parse(&["u", "alice"]).unwrap();
    assert!(result.successful);
    assert_eq!(result.commands, vec!["users"]);
    assert_eq!(result.arguments, vec!["alice"]);

    assert_eq!(
        helper.parse(&["u"]).unwrap_err(),
        ParseError::ArgumentsLacked {
            expected: 1,
            actual: 0
        }
    );
}

#[test]
fn nested_commands_are_listed_in_descent_order() {
    let helper = app_helper(Preferences::default());
    let result = helper.parse(&["GROUP", "add", "-v", "bob"]).unwrap();
    assert_eq!(result.commands, vec!["group", "add"]);
    assert_eq!(result.arguments, vec!["bob"]);
    assert_eq!(result.flag_count("verbose"), 1);
}

#[test]
fn flags_after_arguments_can_be_disabled() {
    let helper = app_helper(Preferences {
        disable_flags_after_arguments: true,
        ..Preferences::default()
    });
    let result = helper.parse(&["u", "-v", "alice", "-v", "--tag=x"]).unwrap();
    assert_eq!(result.flag_count("verbose"), 1);
    assert_eq!(result.arguments, strings(&["alice", "-v", "--tag=x"]));
    assert!(result.option("tag").is_none());
}

// ---------------------------------------------------------------------------
// Help requests
// ---------------------------------------------------------------------------

#[test]
fn help_requests_skip_requirements() {
    let helper = app_helper(Preferences::default());

    for args in [vec!["help"], vec!["help", "users"], vec!["users", "--help"], vec!["-h"]] {
        let result = helper.parse(&args).unwrap();
        assert!(!result.successful, "args {args:?}");
        assert!(helper.is_help_request(&result), "args {args:?}");
    }
}

#[test]
fn help_flag_stops_reading_tokens() {
    let helper = app_helper(Preferences::default());
    let result = helper.parse(&["users", "-h", "--output"]).unwrap();
    assert_eq!(result.flag_count("help"), 1);
    assert!(result.option("output").is_none());
}

#[test]
fn disabled_help_entries_are_ordinary_input() {
    let helper = app_helper(Preferences {
        disable_help_command: true,
        disable_help_flag: true,
        ..Preferences::default()
    });
    assert_eq!(
        helper.parse(&["help"]).unwrap_err(),
        ParseError::CommandRequired {
            input: Some("help".to_string())
        }
    );
    let result = helper.parse(&["build", "--help"]).unwrap();
    assert!(result.successful);
    assert_eq!(result.unknown_flags, vec!["--help"]);
}

#[test]
fn parse_and_process_routes_outcomes() {
    let helper = app_helper(Preferences::default());

    match helper.parse_and_process(&["build", "x"]) {
        Processed::Result(result) => assert_eq!(result.arguments, vec!["x"]),
        Processed::Help(lines) | Processed::Error(lines) => {
            panic!("unexpected output: {lines:?}")
        }
    }

    let Processed::Help(help) = helper.parse_and_process(&["help", "group", "add"]) else {
        panic!("expected help output");
    };
    assert_eq!(help[0], "App v1");
    assert_eq!(
        help[1],
        "USAGE: app [...OPTIONS] group add [...COMMAND-OPTIONS] [...ARGS]"
    );

    let Processed::Error(error) = helper.parse_and_process(&["users"]) else {
        panic!("expected error output");
    };
    assert!(error[0].starts_with("ERROR arguments_lacked: "));
    assert_eq!(error.last().map(String::as_str), Some("  app help [...COMMAND]"));
}

#[test]
fn help_for_unknown_command_is_a_rule_error() {
    let helper = app_helper(Preferences::default());
    let result = helper.parse(&["help", "deploy"]).unwrap();
    assert_eq!(
        helper.generate_help_output(Some(&result)).unwrap_err(),
        RuleError::NoSuchCommand {
            name: "deploy".to_string()
        }
    );
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

#[test]
fn definition_builds_the_same_rules_as_the_builder() {
    let yaml = r#"
title: App v1
command: app
description: An application.
flags:
  - name: verbose
    shortcut: v
options:
  - name: output
    shortcut: o
  - name: tag
    shortcut: t
    multiple: true
commands:
  - name: users
    shortcut: u
    min_arguments: 1
  - name: group
    commands:
      - name: add
        min_arguments: 1
  - name: build
"#;
    let definition = Definition::from_yaml(yaml).unwrap();
    let from_file = Helper::from_definition(&definition).unwrap();
    let built = app_helper(Preferences::default());

    let args = ["-vt", "a", "group", "add", "--output=o", "bob"];
    assert_eq!(from_file.parse(&args).unwrap(), built.parse(&args).unwrap());
    for path in [&[][..], &["group"][..], &["group", "add"][..]] {
        assert_eq!(
            from_file.generate_help_for_path(path).unwrap(),
            built.generate_help_for_path(path).unwrap(),
            "path {path:?}"
        );
    }
}

#[test]
fn result_round_trips_through_json() {
    let helper = app_helper(Preferences::default());
    let result = helper
        .parse(&["-v", "--tag", "a", "build", "x", "--", "y"])
        .unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let back: ParseResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}
