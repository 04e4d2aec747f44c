//! Structural syntax check of generated documents.
//!
//! The check covers what the renderer can get wrong: the package clause,
//! balanced delimiters and the names declared in the `type` group.

use crate::error::CodegenError;
use std::collections::HashSet;
use typesnap_core::is_identifier;

/// Validates a generated snapshot document.
///
/// # Errors
/// Returns `CodegenError::Syntax` carrying the document if the check fails.
pub fn validate_document(text: &str) -> Result<(), CodegenError> {
    check(text).map_err(|message| CodegenError::syntax(message, text))
}

fn check(text: &str) -> Result<(), String> {
    check_package_clause(text)?;
    check_delimiters(text)?;
    check_declared_names(text)
}

fn check_package_clause(text: &str) -> Result<(), String> {
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| "document is empty".to_string())?;

    match line.strip_prefix("package ") {
        Some(name) if is_identifier(name.trim()) => Ok(()),
        Some(name) => Err(format!("invalid package name '{}'", name.trim())),
        None => Err("missing package clause".to_string()),
    }
}

fn check_delimiters(text: &str) -> Result<(), String> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1;

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '`' => {
                let start = line;
                let mut closed = false;
                for c in chars.by_ref() {
                    match c {
                        '`' => {
                            closed = true;
                            break;
                        }
                        '\n' => line += 1,
                        _ => {}
                    }
                }
                if !closed {
                    return Err(format!("unterminated raw string starting on line {start}"));
                }
            }
            '(' | '[' | '{' => stack.push((c, line)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, opened)) => {
                        return Err(format!(
                            "'{c}' on line {line} does not close '{open}' from line {opened}"
                        ));
                    }
                    None => return Err(format!("unexpected '{c}' on line {line}")),
                }
            }
            _ => {}
        }
    }

    match stack.pop() {
        Some((open, opened)) => Err(format!("unclosed '{open}' from line {opened}")),
        None => Ok(()),
    }
}

fn check_declared_names(text: &str) -> Result<(), String> {
    let mut seen = HashSet::new();
    let mut in_group = false;

    for (i, line) in text.lines().enumerate() {
        if !in_group {
            in_group = line == "type (";
            continue;
        }
        if line == ")" {
            break;
        }
        // Declarations sit at exactly one tab of indentation.
        let Some(rest) = line.strip_prefix('\t') else {
            continue;
        };
        if rest.starts_with('\t') || rest.starts_with('}') || rest.is_empty() {
            continue;
        }
        let name = rest.split_whitespace().next().unwrap_or_default();
        if !is_identifier(name) {
            return Err(format!("invalid type name '{name}' on line {}", i + 1));
        }
        if !seen.insert(name) {
            return Err(format!("type '{name}' redeclared on line {}", i + 1));
        }
    }

    Ok(())
}
