//! Hand-written parser for extended crontab lines.
//!
//! Grammar per line:
//!
//! ```text
//! <minute> <hour> <day-of-month> <month> <day-of-week> [<param>...]
//! ```
//!
//! Each field is `*`, `H`, `H(a-b)`, `n`, `a-b`, `a-b/s`, `*/s`, `H/s`,
//! `H(a-b)/s`, or a comma-separated list of those. The parameter section
//! begins at the first token containing `=`; parameters are `key=value`
//! pairs separated by comma or whitespace, and a value may be
//! double-quoted to embed either. Malformed input fails with the 1-based
//! line number and offending token; nothing is clamped or dropped.

use super::field::{FieldMatcher, FieldPosition, FieldToken};
use super::hash::Seed;
use super::line::ScheduleLine;
use crate::error::{Result, TempoError};
use crate::params::ParameterMap;

/// Parse one non-blank, non-comment specification line.
pub(crate) fn parse_line(text: &str, line: usize, seed: Seed) -> Result<ScheduleLine> {
    let (fields, rest) = split_fields(text, line)?;

    let minute = bind_field(fields[0], FieldPosition::Minute, line, seed)?;
    let hour = bind_field(fields[1], FieldPosition::Hour, line, seed)?;
    let day_of_month = bind_field(fields[2], FieldPosition::DayOfMonth, line, seed)?;
    let month = bind_field(fields[3], FieldPosition::Month, line, seed)?;
    let day_of_week = bind_field(fields[4], FieldPosition::DayOfWeek, line, seed)?;

    let params = parse_params(rest, line)?;

    Ok(ScheduleLine {
        minute,
        hour,
        day_of_month,
        month,
        day_of_week,
        params,
        source_line: line,
    })
}

/// Split off the five whitespace-separated field tokens, returning them
/// and the remaining parameter region.
fn split_fields(text: &str, line: usize) -> Result<([&str; 5], &str)> {
    let mut rest = text;
    let mut fields = [""; 5];
    for (found, slot) in fields.iter_mut().enumerate() {
        rest = rest.trim_start();
        let end = rest
            .find(char::is_whitespace)
            .unwrap_or(rest.len());
        let token = &rest[..end];
        if token.is_empty() || token.contains('=') {
            // Ran into the parameter section (or end of line) before five
            // time fields were seen.
            return Err(TempoError::FieldCount { line, found });
        }
        *slot = token;
        rest = &rest[end..];
    }
    Ok((fields, rest))
}

fn bind_field(
    text: &str,
    position: FieldPosition,
    line: usize,
    seed: Seed,
) -> Result<FieldMatcher> {
    let token = parse_field(text, position, line)?;
    Ok(FieldMatcher::bind(token, position, seed))
}

/// Parse one field expression into its token form.
fn parse_field(text: &str, position: FieldPosition, line: usize) -> Result<FieldToken> {
    let terms: Vec<&str> = text.split(',').collect();
    if terms.len() == 1 {
        return parse_term(terms[0], position, line);
    }

    let mut parsed = Vec::with_capacity(terms.len());
    for term in terms {
        if term.is_empty() {
            return Err(TempoError::Syntax {
                line,
                token: text.to_string(),
                reason: "empty list element".to_string(),
            });
        }
        parsed.push(parse_term(term, position, line)?);
    }
    Ok(FieldToken::List(parsed))
}

/// Parse a single comma-free term of a field expression.
fn parse_term(term: &str, position: FieldPosition, line: usize) -> Result<FieldToken> {
    let (min, max) = position.bounds();

    // Peel off an optional step suffix.
    let (base, step) = match term.split_once('/') {
        Some((base, step_str)) => {
            let step = step_str.parse::<u32>().map_err(|_| TempoError::InvalidStep {
                line,
                step: step_str.to_string(),
            })?;
            if step == 0 {
                return Err(TempoError::InvalidStep {
                    line,
                    step: step_str.to_string(),
                });
            }
            (base, Some(step))
        }
        None => (term, None),
    };

    if base == "*" {
        return Ok(match step {
            None => FieldToken::Wildcard,
            Some(step) => FieldToken::SteppedRange {
                lo: min,
                hi: max,
                step,
            },
        });
    }

    if base == "H" {
        return Ok(match step {
            None => FieldToken::Hash,
            Some(step) => FieldToken::HashedStep {
                lo: min,
                hi: max,
                step,
            },
        });
    }

    if let Some(inner) = base.strip_prefix("H(").and_then(|r| r.strip_suffix(')')) {
        let (lo, hi) = parse_bounds(inner, term, position, line)?;
        return Ok(match step {
            None => FieldToken::HashRange { lo, hi },
            Some(step) => FieldToken::HashedStep { lo, hi, step },
        });
    }

    if base.contains('-') {
        let (lo, hi) = parse_bounds(base, term, position, line)?;
        return Ok(match step {
            None => FieldToken::Range { lo, hi },
            Some(step) => FieldToken::SteppedRange { lo, hi, step },
        });
    }

    let value = base.parse::<u32>().map_err(|_| TempoError::Syntax {
        line,
        token: term.to_string(),
        reason: "expected a number, '*', 'H', 'H(a-b)', or a range".to_string(),
    })?;
    if step.is_some() {
        return Err(TempoError::Syntax {
            line,
            token: term.to_string(),
            reason: "a step requires a range, '*', or 'H'".to_string(),
        });
    }
    check_domain(value, position, line)?;
    Ok(FieldToken::Literal(value))
}

/// Parse and validate an `a-b` bounds pair.
fn parse_bounds(
    text: &str,
    term: &str,
    position: FieldPosition,
    line: usize,
) -> Result<(u32, u32)> {
    let malformed = || TempoError::Syntax {
        line,
        token: term.to_string(),
        reason: "expected 'a-b' with numeric bounds".to_string(),
    };

    let (lo_str, hi_str) = text.split_once('-').ok_or_else(malformed)?;
    let lo = lo_str.parse::<u32>().map_err(|_| malformed())?;
    let hi = hi_str.parse::<u32>().map_err(|_| malformed())?;

    if lo > hi {
        return Err(TempoError::ReversedRange { line, lo, hi });
    }
    check_domain(lo, position, line)?;
    check_domain(hi, position, line)?;
    Ok((lo, hi))
}

fn check_domain(value: u32, position: FieldPosition, line: usize) -> Result<()> {
    let (min, max) = position.bounds();
    if value < min || value > max {
        return Err(TempoError::OutOfRange {
            line,
            field: position.label(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

/// Parse the parameter region that follows the five time fields.
fn parse_params(mut rest: &str, line: usize) -> Result<ParameterMap> {
    let mut params = ParameterMap::new();

    loop {
        rest = rest.trim_start_matches(is_separator);
        if rest.is_empty() {
            break;
        }

        // The name runs up to '='; hitting a separator or end of line
        // first means the token is not an assignment.
        let eq = match rest.find(|c: char| c == '=' || is_separator(c)) {
            Some(idx) if rest[idx..].starts_with('=') => idx,
            _ => {
                let token: String = rest.chars().take_while(|&c| !is_separator(c)).collect();
                return Err(TempoError::Parameter {
                    line,
                    token,
                    reason: "missing '='".to_string(),
                });
            }
        };
        let key = &rest[..eq];
        if key.is_empty() {
            let token: String = rest.chars().take_while(|&c| !is_separator(c)).collect();
            return Err(TempoError::Parameter {
                line,
                token,
                reason: "empty parameter name".to_string(),
            });
        }
        rest = &rest[eq + 1..];

        let value = if let Some(tail) = rest.strip_prefix('"') {
            match tail.find('"') {
                Some(end) => {
                    let value = &tail[..end];
                    rest = &tail[end + 1..];
                    value
                }
                None => {
                    return Err(TempoError::Parameter {
                        line,
                        token: key.to_string(),
                        reason: "unterminated quoted value".to_string(),
                    });
                }
            }
        } else {
            let end = rest.find(is_separator).unwrap_or(rest.len());
            let value = &rest[..end];
            rest = &rest[end..];
            value
        };

        // Duplicate names within one line: last occurrence wins.
        params.insert(key, value);
    }

    Ok(params)
}
