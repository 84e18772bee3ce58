//! Parser for the textual grounded-operation form emitted by the model.
//!
//! Accepted shape:
//!   `[Grounded Operation:] NAME(arg=value, arg=value, ...)`
//!
//! e.g. `TYPE(box=[[387,248,727,317]], text='hello, world', element_info='Search')`.
//!
//! Arguments are split on top-level commas: commas inside brackets or inside a
//! quoted value never separate arguments. A quote opened right after `=` only
//! closes when the next non-blank character is `,` or the end of the call, so
//! quoted values may contain commas, `key=value` fragments and apostrophes.
//! String values are kept verbatim, quotes included; the normalizer strips them.
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{DispatchError, DispatchResult};
use crate::operation::types::GroundedOperation;

fn call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^\s*(?:Grounded\s+Operation\s*:\s*)?([A-Za-z_]+)\s*\((.*)\)\s*$")
            .expect("static regex")
    })
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("static regex"))
}

pub fn parse_grounded_operation(input: &str) -> DispatchResult<GroundedOperation> {
    let caps = call_re()
        .captures(input)
        .ok_or_else(|| DispatchError::Parse(format!("not an operation call: {input:?}")))?;
    let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let args = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    let mut op = GroundedOperation::new(name);
    for (key, value) in split_args(args) {
        match key {
            "box" => op.bbox = Some(parse_box(value)?),
            "text" => op.text = Some(value.to_string()),
            "key" => op.key = Some(value.to_string()),
            "app" => op.app = Some(value.to_string()),
            other => tracing::trace!(arg = other, "ignoring argument"),
        }
    }
    tracing::debug!(operation = %op.operation, "parsed grounded operation");
    Ok(op)
}

/// One input line: a JSON object, or the textual call form.
pub fn parse_line(line: &str) -> DispatchResult<GroundedOperation> {
    let trimmed = line.trim();
    if trimmed.starts_with('{') {
        Ok(serde_json::from_str(trimmed)?)
    } else {
        parse_grounded_operation(trimmed)
    }
}

fn split_args(args: &str) -> Vec<(&str, &str)> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut prev = None;
    let mut start = 0;

    for (i, c) in args.char_indices() {
        match quote {
            Some(q) => {
                if c == q && closes_quote(&args[i + c.len_utf8()..]) {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' if prev == Some('=') => quote = Some(c),
                '[' | '(' | '{' => depth += 1,
                ']' | ')' | '}' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    parts.push(&args[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
        if !c.is_whitespace() {
            prev = Some(c);
        }
    }
    parts.push(&args[start..]);

    parts
        .into_iter()
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            let key = key.trim();
            if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                tracing::trace!(fragment = part, "skipping malformed argument");
                return None;
            }
            Some((key, value.trim()))
        })
        .collect()
}

fn closes_quote(rest: &str) -> bool {
    let rest = rest.trim_start();
    rest.is_empty() || rest.starts_with(',')
}

fn parse_box(value: &str) -> DispatchResult<[f64; 4]> {
    let numbers = number_re()
        .find_iter(value)
        .map(|m| m.as_str().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DispatchError::Parse(format!("bad box number in {value:?}: {e}")))?;

    <[f64; 4]>::try_from(numbers.as_slice()).map_err(|_| {
        DispatchError::Parse(format!(
            "box needs exactly 4 numbers, got {} in {value:?}",
            numbers.len()
        ))
    })
}
