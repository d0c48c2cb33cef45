//! Input normalization
//!
//! Turns the input notation used in problem statements into the byte stream a
//! solution program reads from stdin. Each language picks its format in
//! `languages.toml`; the runner never sees anything but the final text.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::HarnessError;

/// How raw case input is fed to a solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// Passed through unchanged
    #[default]
    Raw,
    /// First `[a, b, c]` group, rewritten as a length-prefixed array:
    /// `"<count>\n<a b c>"`
    IntArray,
}

impl InputFormat {
    pub fn apply(&self, raw: &str) -> Result<String, HarnessError> {
        match self {
            InputFormat::Raw => Ok(raw.to_string()),
            InputFormat::IntArray => int_array(raw),
        }
    }
}

fn bracket_group() -> &'static Regex {
    static BRACKETS: OnceLock<Regex> = OnceLock::new();
    BRACKETS.get_or_init(|| Regex::new(r"\[([^\[\]]*)\]").expect("static pattern is valid"))
}

fn int_array(raw: &str) -> Result<String, HarnessError> {
    let body = bracket_group()
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| {
            HarnessError::MalformedInput(format!("no bracketed integer list in {:?}", raw))
        })?
        .as_str();

    let nums = if body.trim().is_empty() {
        Vec::new()
    } else {
        body.split(',')
            .map(|token| {
                let token = token.trim();
                token.parse::<i64>().map_err(|_| {
                    HarnessError::MalformedInput(format!("{:?} is not an integer", token))
                })
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let joined = nums
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(format!("{}\n{}", nums.len(), joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_array_basic() {
        let out = InputFormat::IntArray.apply("[2, 7, 11, 15]").unwrap();
        assert_eq!(out, "4\n2 7 11 15");
    }

    #[test]
    fn test_int_array_empty_list() {
        assert_eq!(InputFormat::IntArray.apply("[]").unwrap(), "0\n");
    }

    #[test]
    fn test_int_array_takes_first_group_from_statement_text() {
        let out = InputFormat::IntArray
            .apply("nums = [3,-1 ,  4], target = [9]")
            .unwrap();
        assert_eq!(out, "3\n3 -1 4");
    }

    #[test]
    fn test_int_array_without_brackets_is_malformed() {
        let err = InputFormat::IntArray.apply("no array here").unwrap_err();
        assert!(matches!(err, HarnessError::MalformedInput(_)));
    }

    #[test]
    fn test_int_array_bad_token_is_malformed() {
        let err = InputFormat::IntArray.apply("[1, two, 3]").unwrap_err();
        match err {
            HarnessError::MalformedInput(msg) => assert!(msg.contains("two")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_raw_is_identity() {
        let raw = "  hello\nworld \n";
        assert_eq!(InputFormat::Raw.apply(raw).unwrap(), raw);
    }

    #[test]
    fn test_format_deserializes_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            input_format: InputFormat,
        }
        let w: Wrapper = toml::from_str("input_format = \"int_array\"").unwrap();
        assert_eq!(w.input_format, InputFormat::IntArray);
    }
}
