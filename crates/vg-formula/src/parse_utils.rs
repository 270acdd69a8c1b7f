use std::time::Duration;

use winnow::ascii::multispace0;
use winnow::combinator::opt;
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{literal, take_while};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

pub fn ident<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    // First character must be alphabetic or underscore (not digit).
    if !input.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.').parse_next(input)
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// String literal, single- or double-quoted.
pub fn quoted_string(input: &mut &str) -> ModalResult<String> {
    winnow::combinator::alt((double_quoted, single_quoted)).parse_next(input)
}

fn double_quoted(input: &mut &str) -> ModalResult<String> {
    literal("\"").parse_next(input)?;
    let content = take_while(0.., |c: char| c != '"').parse_next(input)?;
    winnow::combinator::cut_err(literal("\""))
        .context(StrContext::Expected(StrContextValue::Description(
            "closing double quote",
        )))
        .parse_next(input)?;
    Ok(content.to_string())
}

fn single_quoted(input: &mut &str) -> ModalResult<String> {
    literal("'").parse_next(input)?;
    let content = take_while(0.., |c: char| c != '\'').parse_next(input)?;
    winnow::combinator::cut_err(literal("'"))
        .context(StrContext::Expected(StrContextValue::Description(
            "closing single quote",
        )))
        .parse_next(input)?;
    Ok(content.to_string())
}

// ---------------------------------------------------------------------------
// Number literal
// ---------------------------------------------------------------------------

/// Parse a number literal: integer or float.
pub fn number_literal(input: &mut &str) -> ModalResult<f64> {
    let integer_part = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    let has_dot = opt(literal(".")).parse_next(input)?.is_some();
    if has_dot {
        let frac_part = take_while(1.., |c: char| c.is_ascii_digit())
            .context(StrContext::Expected(StrContextValue::Description(
                "digits after decimal point",
            )))
            .parse_next(input)?;
        let s = format!("{integer_part}.{frac_part}");
        let v: f64 = s.parse().map_err(|_| ErrMode::Cut(ContextError::new()))?;
        Ok(v)
    } else {
        let v: f64 = integer_part
            .parse()
            .map_err(|_| ErrMode::Cut(ContextError::new()))?;
        Ok(v)
    }
}

// ---------------------------------------------------------------------------
// Whitespace
// ---------------------------------------------------------------------------

/// Skip insignificant whitespace.
pub fn ws_skip(input: &mut &str) -> ModalResult<()> {
    let _ = multispace0.parse_next(input)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Shift durations
// ---------------------------------------------------------------------------

/// Parse a `shift` duration value like `"30s"`, `"5m"`, `"12h"`, `"1d"`,
/// `"1w"`. Returns `None` for anything else.
pub fn parse_shift(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.len() < 2 {
        return None;
    }
    let (num_part, suffix) = s.split_at(s.len() - 1);
    let value: u64 = num_part.parse().ok()?;
    let secs = match suffix {
        "s" => value,
        "m" => value * 60,
        "h" => value * 3600,
        "d" => value * 86400,
        "w" => value * 7 * 86400,
        _ => return None,
    };
    Some(Duration::from_secs(secs))
}

/// Render a shift duration back in its shortest unit form.
pub fn format_shift(d: Duration) -> String {
    let secs = d.as_secs();
    if secs == 0 {
        return "0s".to_string();
    }
    if secs.is_multiple_of(7 * 86400) {
        format!("{}w", secs / (7 * 86400))
    } else if secs.is_multiple_of(86400) {
        format!("{}d", secs / 86400)
    } else if secs.is_multiple_of(3600) {
        format!("{}h", secs / 3600)
    } else if secs.is_multiple_of(60) {
        format!("{}m", secs / 60)
    } else {
        format!("{secs}s")
    }
}
