// src/core/options.rs

//! Strongly-typed option schema for the external tools, and the raw values a
//! user submits against it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};

use crate::core::error::Result;

/// Whether a tool takes the bare domain or a full URL as its final argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Domain,
    Url,
}

/// The closed set of value types an option can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    /// Bare flag, present or absent.
    Bool,
    /// `flag value`, clamped into the declared bounds.
    Int,
    /// `flag value`, trimmed.
    Str,
    /// The chosen value alone, as a positional token.
    Choice,
    /// Stacked short flag: `-v` with count 3 becomes `-vvv`.
    Count,
    /// `flag=value` in a single token.
    StrKv,
    /// `flag=value` in a single token, value parsed as an integer.
    IntKv,
}

/// Default shown to the user. Never injected into a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Str(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

impl Bounds {
    pub fn clamp(&self, value: i64) -> i64 {
        value.max(self.min).min(self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub label: &'static str,
    pub value: &'static str,
}

impl Choice {
    pub const fn new(label: &'static str, value: &'static str) -> Self {
        Self { label, value }
    }

    /// A choice whose label is its value.
    pub const fn plain(value: &'static str) -> Self {
        Self { label: value, value }
    }
}

/// One user-selectable option of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
    pub flag: &'static str,
    pub kind: OptionType,
    pub label: &'static str,
    pub default: DefaultValue,
    pub bounds: Option<Bounds>,
    pub choices: &'static [Choice],
}

impl OptionSpec {
    const fn base(flag: &'static str, kind: OptionType, label: &'static str, default: DefaultValue) -> Self {
        Self { flag, kind, label, default, bounds: None, choices: &[] }
    }

    pub const fn boolean(flag: &'static str, label: &'static str, default: bool) -> Self {
        Self::base(flag, OptionType::Bool, label, DefaultValue::Bool(default))
    }

    pub const fn int(flag: &'static str, label: &'static str, default: i64, min: i64, max: i64) -> Self {
        Self {
            bounds: Some(Bounds { min, max }),
            ..Self::base(flag, OptionType::Int, label, DefaultValue::Int(default))
        }
    }

    pub const fn text(flag: &'static str, label: &'static str) -> Self {
        Self::base(flag, OptionType::Str, label, DefaultValue::Str(""))
    }

    pub const fn choice(
        flag: &'static str,
        label: &'static str,
        choices: &'static [Choice],
        default: &'static str,
    ) -> Self {
        Self {
            choices,
            ..Self::base(flag, OptionType::Choice, label, DefaultValue::Str(default))
        }
    }

    pub const fn count(flag: &'static str, label: &'static str) -> Self {
        Self::base(flag, OptionType::Count, label, DefaultValue::Int(0))
    }

    pub const fn str_kv(flag: &'static str, label: &'static str) -> Self {
        Self::base(flag, OptionType::StrKv, label, DefaultValue::Str(""))
    }

    pub const fn int_kv(flag: &'static str, label: &'static str) -> Self {
        Self::base(flag, OptionType::IntKv, label, DefaultValue::Int(0))
    }

    pub const fn bounded(self, min: i64, max: i64) -> Self {
        Self { bounds: Some(Bounds { min, max }), ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionGroup {
    pub name: &'static str,
    pub options: &'static [OptionSpec],
}

/// Structural special cases a tool applies to one of its options, ahead of the
/// generic type dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    /// Synthetic option: a non-blank token becomes `header_flag "Authorization: Bearer <token>"`.
    BearerToken { header_flag: &'static str },
    /// The value is joined to `prefix` and inserted right after the executable.
    PrefixedServer { prefix: &'static str },
    /// A truthy value emits the flag and ends construction without a target.
    ShortCircuitWhenTruthy,
    /// A non-blank value emits `flag value` and ends construction without a target.
    ShortCircuitWhenSet,
    /// A non-blank value is appended after the target.
    TrailingServer,
    /// A non-blank value replaces the normalized target.
    TargetOverride,
    /// Synthetic selector: each `(mode, flag)` pair suppresses `flag` while `mode` is selected.
    ServerModeSelector { suppresses: &'static [(&'static str, &'static str)] },
}

/// Immutable description of one external tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: ToolKind,
    pub base: &'static [&'static str],
    pub groups: &'static [OptionGroup],
    pub overrides: &'static [(&'static str, Override)],
}

impl ToolDefinition {
    /// All options in declared order, across groups.
    pub fn options(&self) -> impl Iterator<Item = &'static OptionSpec> + '_ {
        self.groups.iter().flat_map(|g| g.options.iter())
    }

    pub fn option(&self, flag: &str) -> Option<&'static OptionSpec> {
        self.options().find(|o| o.flag == flag)
    }

    pub fn override_for(&self, flag: &str) -> Option<Override> {
        self.overrides
            .iter()
            .find(|(f, _)| *f == flag)
            .map(|(_, o)| *o)
    }
}

/// A raw value exactly as submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl RawValue {
    /// Only `true`, `1`, and the strings "true", "on", "1" count as set.
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Bool(b) => *b,
            RawValue::Int(n) => *n == 1,
            RawValue::Text(s) => matches!(s.as_str(), "true" | "on" | "1"),
        }
    }

    /// Trimmed textual form, `None` when blank, false or zero.
    pub fn text(&self) -> Option<String> {
        let text = match self {
            RawValue::Bool(true) => "true".to_string(),
            RawValue::Bool(false) | RawValue::Int(0) => return None,
            RawValue::Int(n) => n.to_string(),
            RawValue::Text(s) => s.trim().to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    /// Integer form, `None` when blank or unparsable.
    pub fn integer(&self) -> Option<i64> {
        match self {
            RawValue::Bool(b) => Some(i64::from(*b)),
            RawValue::Int(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Flag token to raw value, built fresh for every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedOptions(HashMap<String, RawValue>);

impl SelectedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, flag: &str, value: impl Into<RawValue>) -> Self {
        self.insert(flag, value);
        self
    }

    pub fn insert(&mut self, flag: &str, value: impl Into<RawValue>) {
        self.0.insert(flag.to_string(), value.into());
    }

    pub fn get(&self, flag: &str) -> Option<&RawValue> {
        self.0.get(flag)
    }

    pub fn is_truthy(&self, flag: &str) -> bool {
        self.get(flag).is_some_and(RawValue::is_truthy)
    }

    pub fn text(&self, flag: &str) -> Option<String> {
        self.get(flag).and_then(RawValue::text)
    }

    pub fn integer(&self, flag: &str) -> Option<i64> {
        self.get(flag).and_then(RawValue::integer)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses `flag=value` pairs, splitting on the first `=`. A bare flag means `true`.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut selected = Self::new();
        selected.extend_pairs(pairs);
        selected
    }

    /// Adds `flag=value` pairs on top of what is already selected.
    pub fn extend_pairs<'a>(&mut self, pairs: impl IntoIterator<Item = &'a str>) {
        for pair in pairs {
            match pair.split_once('=') {
                Some((flag, value)) => self.insert(flag, value),
                None => self.insert(pair, true),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_is_exact() {
        assert!(RawValue::from(true).is_truthy());
        assert!(RawValue::from(1_i64).is_truthy());
        assert!(RawValue::from("true").is_truthy());
        assert!(RawValue::from("on").is_truthy());
        assert!(RawValue::from("1").is_truthy());

        assert!(!RawValue::from("yes").is_truthy());
        assert!(!RawValue::from("TRUE").is_truthy());
        assert!(!RawValue::from(" true").is_truthy());
        assert!(!RawValue::from(2_i64).is_truthy());
        assert!(!RawValue::from(false).is_truthy());
    }

    #[test]
    fn text_form_drops_blank_values() {
        assert_eq!(RawValue::from("  x  ").text().as_deref(), Some("x"));
        assert_eq!(RawValue::from("   ").text(), None);
        assert_eq!(RawValue::from(0_i64).text(), None);
        assert_eq!(RawValue::from(false).text(), None);
    }

    #[test]
    fn selected_options_from_json_accepts_mixed_values() {
        let selected =
            SelectedOptions::from_json(r#"{"-F": true, "-T": 4, "-p": "80,443"}"#).unwrap();
        assert!(selected.is_truthy("-F"));
        assert_eq!(selected.integer("-T"), Some(4));
        assert_eq!(selected.text("-p").as_deref(), Some("80,443"));
        assert_eq!(selected.get("-x"), None);
    }

    #[test]
    fn selected_options_from_pairs() {
        let selected = SelectedOptions::from_pairs(["-t=MX", "+short", "@=8.8.8.8"]);
        assert_eq!(selected.text("-t").as_deref(), Some("MX"));
        assert!(selected.is_truthy("+short"));
        assert_eq!(selected.text("@").as_deref(), Some("8.8.8.8"));
    }

    #[test]
    fn pairs_override_json_selection() {
        let mut selected = SelectedOptions::from_json(r#"{"-T": 4, "-F": true}"#).unwrap();
        selected.extend_pairs(["-T=2", "-sV"]);
        assert_eq!(selected.integer("-T"), Some(2));
        assert!(selected.is_truthy("-F"));
        assert!(selected.is_truthy("-sV"));
        assert!(SelectedOptions::from_json("[1, 2]").is_err());
    }

    #[test]
    fn bounds_clamp_both_ends() {
        let bounds = Bounds { min: 1, max: 60 };
        assert_eq!(bounds.clamp(0), 1);
        assert_eq!(bounds.clamp(61), 60);
        assert_eq!(bounds.clamp(30), 30);
    }
}
