// src/core/builder.rs

//! Turns a tool definition, a target and the user's raw option values into the
//! exact argument vector to execute.
//!
//! Options are walked in declared order. A tool's override table is consulted
//! first; everything else goes through the generic per-type emission. Values
//! that fail to coerce are dropped, so an option yields either a complete
//! token (or token pair) or nothing at all.

use std::fmt;
use tracing::debug;

use crate::core::catalog;
use crate::core::error::Result;
use crate::core::options::{OptionSpec, OptionType, Override, SelectedOptions, ToolDefinition};
use crate::core::target::NormalizedTarget;

/// An ordered argument vector: executable first, target (usually) last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandVector(Vec<String>);

impl CommandVector {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or_default()
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn push(&mut self, token: impl Into<String>) {
        self.0.push(token.into());
    }

    pub fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(tokens.into_iter().map(Into::into));
    }

    fn insert(&mut self, index: usize, token: impl Into<String>) {
        let index = index.min(self.0.len());
        self.0.insert(index, token.into());
    }

    /// Human-readable form for reports: tokens joined with single spaces.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

impl fmt::Display for CommandVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Builds the command line for a catalogued tool, by identifier.
pub fn build_for(tool_id: &str, target: &NormalizedTarget, selected: &SelectedOptions) -> Result<CommandVector> {
    let tool = catalog::get_tool(tool_id)?;
    Ok(build(tool, target, selected))
}

/// Builds the command line for `tool`. Pure: no I/O, no defaults injected.
pub fn build(tool: &ToolDefinition, target: &NormalizedTarget, selected: &SelectedOptions) -> CommandVector {
    let mut cmd = CommandVector::new(tool.base.iter().copied());
    let mut target_value = target.for_kind(tool.kind).to_string();
    let mut trailing: Option<String> = None;
    let mut suppressed: Vec<&str> = Vec::new();

    for opt in tool.options() {
        if suppressed.contains(&opt.flag) {
            continue;
        }

        if let Some(rule) = tool.override_for(opt.flag) {
            match rule {
                Override::BearerToken { header_flag } => {
                    if let Some(token) = selected.text(opt.flag) {
                        cmd.extend([header_flag.to_string(), format!("Authorization: Bearer {token}")]);
                    }
                }
                Override::PrefixedServer { prefix } => {
                    if let Some(server) = selected.text(opt.flag) {
                        cmd.insert(1, format!("{prefix}{server}"));
                    }
                }
                Override::ShortCircuitWhenTruthy => {
                    if selected.is_truthy(opt.flag) {
                        cmd.push(opt.flag);
                        debug!(tool = tool.id, flag = opt.flag, "Short-circuit: no target appended.");
                        return cmd;
                    }
                }
                Override::ShortCircuitWhenSet => {
                    if let Some(value) = selected.text(opt.flag) {
                        cmd.extend([opt.flag.to_string(), value]);
                        debug!(tool = tool.id, flag = opt.flag, "Short-circuit: no target appended.");
                        return cmd;
                    }
                }
                Override::TrailingServer => trailing = selected.text(opt.flag),
                Override::TargetOverride => {
                    if let Some(value) = selected.text(opt.flag) {
                        target_value = value;
                    }
                }
                Override::ServerModeSelector { suppresses } => {
                    if let Some(mode) = selected.text(opt.flag) {
                        suppressed.extend(suppresses.iter().filter(|(m, _)| *m == mode).map(|(_, f)| *f));
                    }
                }
            }
            continue;
        }

        cmd.extend(emit(opt, selected));
    }

    cmd.push(target_value);
    if let Some(server) = trailing {
        cmd.push(server);
    }
    cmd
}

/// Generic per-type emission for one option. Returns zero, one or two tokens.
fn emit(opt: &OptionSpec, selected: &SelectedOptions) -> Vec<String> {
    let flag = opt.flag;
    match opt.kind {
        OptionType::Bool => {
            if selected.is_truthy(flag) {
                vec![flag.to_string()]
            } else {
                Vec::new()
            }
        }
        OptionType::Int => match selected.integer(flag) {
            None | Some(0) => Vec::new(),
            Some(value) => {
                let value = opt.bounds.map_or(value, |b| b.clamp(value));
                vec![flag.to_string(), value.to_string()]
            }
        },
        OptionType::Str => match selected.text(flag) {
            Some(value) => vec![flag.to_string(), value],
            None => Vec::new(),
        },
        OptionType::Choice => selected.text(flag).into_iter().collect(),
        OptionType::Count => match selected.integer(flag) {
            Some(count) if count > 0 => {
                let count = opt.bounds.map_or(count, |b| b.clamp(count));
                if count > 0 { vec![stacked_flag(flag, count)] } else { Vec::new() }
            }
            _ => Vec::new(),
        },
        OptionType::StrKv => match selected.text(flag) {
            Some(value) => vec![key_value(flag, &value)],
            None => Vec::new(),
        },
        OptionType::IntKv => match selected.integer(flag) {
            None | Some(0) => Vec::new(),
            Some(value) => vec![key_value(flag, &value.to_string())],
        },
    }
}

/// `-v` with count 3 becomes `-vvv`.
fn stacked_flag(flag: &str, count: i64) -> String {
    let mut token = flag.to_string();
    if let Some(last) = flag.chars().last() {
        for _ in 1..count {
            token.push(last);
        }
    }
    token
}

fn key_value(flag: &str, value: &str) -> String {
    if flag.ends_with('=') {
        format!("{flag}{value}")
    } else {
        format!("{flag}={value}")
    }
}
