//! Loading schedule files.
//!
//! A schedule file is a template first and YAML second. Actions inside
//! `{{ ... }}` are replaced before parsing:
//!
//! - `{{ env "NAME" }}` the variable's value, or an empty string
//! - `{{ env "NAME" "fallback" }}` the variable's value, or `fallback`
//! - `{{ must_env "NAME" }}` the variable's value; an unset variable is an error
//!
//! An empty value counts as unset for the fallback form of `env` only;
//! `must_env` accepts it.

use std::path::Path;

use anyhow::{anyhow, bail, Context};
use ebschedule_types::CreateScheduleInput;

/// Expand template actions using the process environment.
pub fn expand_env(template: &str) -> anyhow::Result<String> {
    expand_with(template, |name| std::env::var(name).ok())
}

/// Expand template actions, resolving variables through `lookup`.
pub fn expand_with<F>(template: &str, lookup: F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| anyhow!("unclosed action starting at {:?}", truncate(&rest[start..])))?;
        out.push_str(&evaluate(&after[..end], &lookup)?);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

fn truncate(s: &str) -> &str {
    match s.char_indices().nth(20) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

fn evaluate<F>(action: &str, lookup: &F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let words = split_words(action).with_context(|| format!("parse action {{{{{action}}}}}"))?;
    let Some((func, args)) = words.split_first() else {
        bail!("empty action");
    };
    match (func.as_str(), args) {
        ("env", [name]) => Ok(lookup(name).unwrap_or_default()),
        ("env", [name, fallback]) => Ok(lookup(name)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| fallback.clone())),
        ("must_env", [name]) => {
            lookup(name).ok_or_else(|| anyhow!("environment variable {name} is not defined"))
        }
        ("env" | "must_env", _) => bail!("wrong number of arguments to {func}"),
        _ => bail!("unknown function {func:?}"),
    }
}

/// Split an action into a bare function name and quoted string arguments.
fn split_words(action: &str) -> anyhow::Result<Vec<String>> {
    let mut words = Vec::new();
    let mut chars = action.trim().chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '"' => {
                chars.next();
                let mut word = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => word.push('\n'),
                            Some('t') => word.push('\t'),
                            Some(other @ ('"' | '\\')) => word.push(other),
                            Some(other) => bail!("unsupported escape \\{other}"),
                            None => bail!("unterminated string"),
                        },
                        Some(other) => word.push(other),
                        None => bail!("unterminated string"),
                    }
                }
                words.push(word);
            }
            '`' => {
                chars.next();
                let word: String = chars.by_ref().take_while(|&c| c != '`').collect();
                words.push(word);
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '"' || c == '`' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                words.push(word);
            }
        }
    }
    Ok(words)
}

/// Read, expand and parse a schedule file, filling in defaults.
pub fn prepare_input_schedule(path: &Path) -> anyhow::Result<CreateScheduleInput> {
    let template = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let text = expand_env(&template).with_context(|| format!("expand {}", path.display()))?;
    parse_schedule(&text).with_context(|| format!("load {}", path.display()))
}

/// Parse expanded schedule text.
pub fn parse_schedule(text: &str) -> anyhow::Result<CreateScheduleInput> {
    let mut schedule: CreateScheduleInput =
        serde_yaml::from_str(text).context("parse schedule YAML")?;
    schedule.apply_defaults();
    schedule.validate()?;
    Ok(schedule)
}
