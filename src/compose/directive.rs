//! Structural parse of the include microsyntax.
//!
//! A template is split into [`Segment`]s: lines copied through untouched and
//! include directives with their optional variable block.
//!
//! ```text
//! services:
//!   # @include postgres
//!   # @vars
//!   # service_name: db
//!   # ports:
//!   # - "5432"
//!   api:
//!     image: app
//! ```
//!
//! Here `postgres` is included at indent 2 with `service_name` bound to the
//! scalar `db` and `ports` to the one-element list `["\"5432\""]`. Parsing
//! stops at `api:`, which is not a comment, and that line is kept as text.
//!
//! Nothing here knows about the target template engine; see
//! [`super::emitter`] for that stage.

use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

use crate::core::StrataError;

static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)#[ \t]*@include[ \t]+(?P<name>[A-Za-z0-9_.\-/]+)[ \t]*$")
        .expect("include pattern is valid")
});

static VARS_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*@vars\s*$").expect("vars pattern is valid"));

/// `# key: value` and `# key:` (value empty: list header)
static VAR_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#\s*(?P<key>[A-Za-z_][A-Za-z0-9_]*)\s*:(?P<value>.*)$")
        .expect("variable pattern is valid")
});

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#\s*-\s*(?P<item>.*\S)\s*$").expect("list item pattern is valid")
});

/// A bound value: one string or an ordered list of strings.
///
/// Values are verbatim text from the template; quotes stay part of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarValue {
    Scalar(String),
    List(Vec<String>),
}

/// Insertion-ordered bindings attached to one include.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableBlock {
    entries: Vec<(String, VarValue)>,
}

impl VariableBlock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key`. Rebinding a key replaces its value and keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: VarValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&VarValue> {
        self.entries.iter().find(|(existing, _)| existing == key).map(|(_, value)| value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VarValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// One `# @include <name>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// Width of the leading whitespace, in characters
    pub indent: usize,
    /// Referenced template name
    pub name: String,
    /// 1-based line of the directive in its template
    pub line_number: usize,
    /// Bindings scoped to this include; empty when there is no block
    pub vars: VariableBlock,
}

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A line copied through unchanged, including its line terminator
    Text(String),
    Include(IncludeDirective),
}

/// Intermediate representation of one template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTemplate {
    pub segments: Vec<Segment>,
}

impl ParsedTemplate {
    /// Include directives in source order
    pub fn includes(&self) -> impl Iterator<Item = &IncludeDirective> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Include(directive) => Some(directive),
            Segment::Text(_) => None,
        })
    }
}

/// Parse a variable block starting at `start` (the line after `# @vars`).
///
/// Returns the bindings and the index of the first line that is not part of
/// the block. Each line is tried as `# key: value`, then as a `# key:` list
/// header that consumes the following `# - item` lines. The block ends at
/// the first line that fits neither form.
#[must_use]
pub fn parse_variable_block(lines: &[&str], start: usize) -> (VariableBlock, usize) {
    let mut vars = VariableBlock::new();
    let mut index = start;

    while let Some(line) = lines.get(index) {
        let Some(caps) = VAR_LINE_RE.captures(line) else {
            break;
        };
        let key = caps["key"].to_string();
        let value = caps["value"].trim();
        index += 1;

        if !value.is_empty() {
            vars.insert(key, VarValue::Scalar(value.to_string()));
            continue;
        }

        let mut items = Vec::new();
        while let Some(item) = lines.get(index).and_then(|line| LIST_ITEM_RE.captures(line)) {
            items.push(item["item"].to_string());
            index += 1;
        }
        vars.insert(key, VarValue::List(items));
    }

    (vars, index)
}

/// Parse template source into segments.
///
/// `template` names the source in error messages.
///
/// # Errors
///
/// [`StrataError::InvalidDirective`] for an include name that is absolute,
/// has empty segments or uses `.` / `..`.
pub fn parse_template(content: &str, template: &str) -> Result<ParsedTemplate> {
    let raw_lines: Vec<&str> = content.split_inclusive('\n').collect();
    let lines: Vec<&str> =
        raw_lines.iter().map(|line| line.trim_end_matches(['\n', '\r'])).collect();

    let mut segments = Vec::with_capacity(lines.len());
    let mut index = 0;

    while index < lines.len() {
        let Some(caps) = INCLUDE_RE.captures(lines[index]) else {
            segments.push(Segment::Text(raw_lines[index].to_string()));
            index += 1;
            continue;
        };

        let line_number = index + 1;
        let name = caps["name"].to_string();
        validate_name(&name, template, line_number)?;
        index += 1;

        let mut vars = VariableBlock::new();
        if lines.get(index).is_some_and(|line| VARS_START_RE.is_match(line)) {
            (vars, index) = parse_variable_block(&lines, index + 1);
        }

        segments.push(Segment::Include(IncludeDirective {
            indent: caps["indent"].chars().count(),
            name,
            line_number,
            vars,
        }));
    }

    Ok(ParsedTemplate {
        segments,
    })
}

fn validate_name(name: &str, template: &str, line_number: usize) -> Result<()> {
    let normal = name.split('/').all(|part| !part.is_empty() && part != "." && part != "..");
    if !normal {
        return Err(StrataError::InvalidDirective {
            template: template.to_string(),
            line_number,
            reason: format!("'{name}' is not a relative template name"),
        }
        .into());
    }
    Ok(())
}
