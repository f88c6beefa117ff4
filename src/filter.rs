//! Parsing of human-readable layer filters such as `status==Confirmed`.

use crate::error::MapError;
use log::warn;
use serde_json::{Value, json};

/// Comparison operators, longest first so `>=` is never split as `>`.
const OPERATORS: [&str; 6] = ["==", "!=", ">=", "<=", ">", "<"];

/// Parse one `<field><op><value>` condition into `[field, op, value]`.
///
/// All whitespace is removed before matching. Input without a known operator
/// is reported and yields `None`.
pub fn parse_condition(input: &str) -> Option<Value> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    let parsed = OPERATORS.iter().find_map(|op| {
        compact
            .split_once(*op)
            .map(|(field, value)| json!([field, *op, value]))
    });

    if parsed.is_none() {
        warn!(
            "{}",
            MapError::invalid_input(format!("no comparison operator in filter {input:?}"))
        );
    }

    parsed
}

/// Parse a list of filter strings.
///
/// A single string yields its condition. Several strings yield
/// `["all", condition]` built from the first condition that parses; the
/// remaining ones are dropped. Unparseable strings are skipped.
pub fn parse_filter<S: AsRef<str>>(inputs: &[S]) -> Option<Value> {
    match inputs {
        [] => None,
        [single] => parse_condition(single.as_ref()),
        many => {
            let first = many.iter().find_map(|input| parse_condition(input.as_ref()))?;
            warn!(
                "combining {} filters keeps only the first condition",
                many.len()
            );
            Some(json!(["all", first]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod condition {
        use super::*;

        #[test]
        fn splits_on_equality() {
            assert_eq!(
                parse_condition("status==Confirmed"),
                Some(json!(["status", "==", "Confirmed"]))
            );
        }

        #[test]
        fn two_character_operators_win_over_single() {
            assert_eq!(parse_condition("c>=d"), Some(json!(["c", ">=", "d"])));
            assert_eq!(parse_condition("c<=d"), Some(json!(["c", "<=", "d"])));
            assert_eq!(parse_condition("c!=d"), Some(json!(["c", "!=", "d"])));
            assert_eq!(parse_condition("c>d"), Some(json!(["c", ">", "d"])));
            assert_eq!(parse_condition("c<d"), Some(json!(["c", "<", "d"])));
        }

        #[test]
        fn strips_whitespace() {
            assert_eq!(
                parse_condition("  mag >= 4.5 "),
                Some(json!(["mag", ">=", "4.5"]))
            );
        }

        #[test]
        fn missing_operator_yields_none() {
            assert_eq!(parse_condition("status=Confirmed"), None);
            assert_eq!(parse_condition(""), None);
        }
    }

    mod combined {
        use super::*;

        #[test]
        fn empty_list_has_no_filter() {
            assert_eq!(parse_filter::<&str>(&[]), None);
        }

        #[test]
        fn single_string_is_a_bare_condition() {
            assert_eq!(
                parse_filter(&["status==Confirmed"]),
                Some(json!(["status", "==", "Confirmed"]))
            );
        }

        #[test]
        fn several_strings_keep_only_the_first_condition() {
            assert_eq!(
                parse_filter(&["a==b", "c>=d"]),
                Some(json!(["all", ["a", "==", "b"]]))
            );
        }

        #[test]
        fn bad_entries_do_not_fail_the_batch() {
            assert_eq!(
                parse_filter(&["nonsense", "c>=d"]),
                Some(json!(["all", ["c", ">=", "d"]]))
            );
            assert_eq!(parse_filter(&["x", "y"]), None);
        }
    }
}
