//! Property-based tests for command construction and version keys

use proptest::prelude::*;
use solc_runner::command::{self, COMBINED_JSON, STDIN_MARKER};
use solc_runner::{OutputSelection, SolcOption, SolcVersion, ToolHandle};

fn selection() -> impl Strategy<Value = OutputSelection> {
    prop_oneof![
        Just(OutputSelection::Ast),
        Just(OutputSelection::Bin),
        Just(OutputSelection::Interface),
        Just(OutputSelection::Abi),
        Just(OutputSelection::Metadata),
        Just(OutputSelection::AstJson),
    ]
}

fn option() -> impl Strategy<Value = SolcOption> {
    prop_oneof![
        selection().prop_map(SolcOption::from),
        ("l-[a-z-]{0,12}", prop::collection::vec("[a-z0-9]{1,8}", 0..4))
            .prop_map(|(name, values)| SolcOption::list(name, values)),
        ("x-[a-z-]{0,12}", prop::option::of("[a-z0-9]{1,8}"))
            .prop_map(|(name, value)| SolcOption::custom(name, value)),
    ]
}

fn handle() -> ToolHandle {
    ToolHandle::new(SolcVersion::V0_8, "/opt/solc/0.8/solc")
}

fn selections(options: &[SolcOption]) -> Vec<&'static str> {
    options
        .iter()
        .filter_map(|option| match option {
            SolcOption::Output(selection) => Some(selection.name()),
            _ => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn test_stdin_marker_is_last(
        options in prop::collection::vec(option(), 0..10),
        optimize in any::<bool>(),
        combined in any::<bool>(),
    ) {
        let spec = command::build(&handle(), optimize, combined, &options).unwrap();
        prop_assert_eq!(spec.args.last().map(String::as_str), Some(STDIN_MARKER));
        prop_assert_eq!(spec.args.first().map(String::as_str) == Some("--optimize"), optimize);
    }

    #[test]
    fn test_combined_json_folds_in_order(options in prop::collection::vec(option(), 0..10)) {
        let spec = command::build(&handle(), false, true, &options).unwrap();

        let positions: Vec<usize> = spec
            .args
            .iter()
            .enumerate()
            .filter(|(_, arg)| arg.as_str() == COMBINED_JSON)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(positions, vec![0]);
        prop_assert_eq!(&spec.args[1], &selections(&options).join(","));
    }

    #[test]
    fn test_layout_matches_option_kinds(
        options in prop::collection::vec(option(), 0..10),
        combined in any::<bool>(),
    ) {
        let spec = command::build(&handle(), false, combined, &options).unwrap();

        let mut expected = Vec::new();
        let names = selections(&options);
        if combined {
            expected.push(COMBINED_JSON.to_string());
            expected.push(names.join(","));
        } else {
            expected.extend(names.iter().map(|name| format!("--{name}")));
        }
        for option in options.iter().filter(|o| matches!(o, SolcOption::List { .. })) {
            expected.extend(option.render().unwrap());
        }
        for option in options.iter().filter(|o| matches!(o, SolcOption::Custom { .. })) {
            expected.extend(option.render().unwrap());
        }
        expected.push(STDIN_MARKER.to_string());

        prop_assert_eq!(spec.args, expected);
    }

    #[test]
    fn test_build_is_deterministic(
        options in prop::collection::vec(option(), 0..10),
        optimize in any::<bool>(),
        combined in any::<bool>(),
    ) {
        let first = command::build(&handle(), optimize, combined, &options).unwrap();
        let second = command::build(&handle(), optimize, combined, &options).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_only_known_version_keys_parse(key in "[0-9]{1,2}\\.[0-9]{1,2}") {
        let parsed = key.parse::<SolcVersion>();
        let known = matches!(key.as_str(), "0.6" | "0.7" | "0.8");
        prop_assert_eq!(parsed.is_ok(), known);
        if let Ok(version) = parsed {
            prop_assert_eq!(version.as_str(), key.as_str());
        }
    }
}
