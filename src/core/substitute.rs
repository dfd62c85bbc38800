//! Placeholder substitution.
//!
//! Rewrites `<NAME>` tokens in a values file, one variable at a time and in
//! list order. Every variable is attempted; failures are collected and
//! reported together once the whole list has been processed.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::core::env::EnvSource;
use crate::core::settings::TargetEnvironment;
use crate::error::{EnvError, Result, VarFailure, VarFailureReason};

/// Substitute every name in `names` into the file at `path`, in place.
///
/// Each substitution is written back before the next name is processed, so
/// later names see the result of earlier ones. Values are logged through
/// [`TargetEnvironment::mask`].
///
/// # Errors
///
/// Returns `EnvError::Substitution` listing every name that was empty,
/// unset, or could not be written. The file may then be partially
/// substituted and must not be used.
pub fn apply<E: EnvSource + ?Sized>(
    path: &Path,
    names: &[String],
    env: &E,
    environment: TargetEnvironment,
) -> Result<()> {
    let mut failures = Vec::new();

    for name in names {
        let value = match env.get(name) {
            Some(value) if !name.is_empty() && !value.is_empty() => value,
            _ => {
                failures.push(VarFailure {
                    name: name.clone(),
                    reason: VarFailureReason::Unset,
                });
                continue;
            }
        };

        info!("setting environment variable {}={}", name, environment.mask(&value));
        if let Err(e) = substitute_file(path, name, &value) {
            failures.push(VarFailure {
                name: name.clone(),
                reason: VarFailureReason::Rewrite(e.to_string()),
            });
            continue;
        }
        debug!(var = %name, "environment variable set");
    }

    if !failures.is_empty() {
        return Err(EnvError::Substitution(failures).into());
    }
    Ok(())
}

/// Replace `<name>` with `value` throughout the file, preserving line endings.
fn substitute_file(path: &Path, name: &str, value: &str) -> std::io::Result<()> {
    let contents = fs::read_to_string(path)?;
    let rewritten = substitute_str(&contents, name, value);
    if let Cow::Owned(rewritten) = rewritten {
        fs::write(path, rewritten)?;
    }
    Ok(())
}

/// Replace `<name>` with `value` in `contents`, line by line.
pub fn substitute_str<'a>(contents: &'a str, name: &str, value: &str) -> Cow<'a, str> {
    let mut out: Option<String> = None;

    for (offset, line) in line_offsets(contents) {
        match replace_token(line, name, value) {
            Cow::Owned(replaced) => {
                let buf = out.get_or_insert_with(|| contents[..offset].to_string());
                buf.push_str(&replaced);
            }
            Cow::Borrowed(line) => {
                if let Some(buf) = out.as_mut() {
                    buf.push_str(line);
                }
            }
        }
    }

    match out {
        Some(out) => Cow::Owned(out),
        None => Cow::Borrowed(contents),
    }
}

/// Lines including their terminators, paired with their byte offset.
fn line_offsets(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line))
    })
}

/// Replace whole `<name>` tokens in one line.
///
/// A token is a `<`, a run of characters containing neither `<` nor `>`,
/// and a closing `>`. Only tokens whose inner text equals `name` exactly are
/// replaced, so `<FOO>` never touches `<FOOBAR>` or `<BARFOO>`. Inserted
/// values are not rescanned.
fn replace_token<'a>(line: &'a str, name: &str, value: &str) -> Cow<'a, str> {
    let mut out = String::new();
    let mut rest = line;
    let mut replaced = false;

    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        match after.find(['<', '>']) {
            Some(close) if after.as_bytes()[close] == b'>' && &after[..close] == name => {
                out.push_str(&rest[..open]);
                out.push_str(value);
                rest = &after[close + 1..];
                replaced = true;
            }
            _ => {
                out.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }

    if !replaced {
        return Cow::Borrowed(line);
    }
    out.push_str(rest);
    Cow::Owned(out)
}
