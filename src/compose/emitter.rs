//! Emission of parsed templates in a concrete template engine syntax.
//!
//! [`TeraEmitter`] rewrites each include directive into Tera statements:
//!
//! ```text
//! # @include redis            {% filter reindent(width=2) %}{% include "redis.yml.tpl" %}{% endfilter %}
//! # @vars               =>    wrapped in {% for __strata_scope in [1] %} ... {% endfor %}
//! # port: "6380"              with {% set port = '"6380"' %} inside the loop
//! ```
//!
//! A `set` inside a `for` body is local to that loop frame, which gives every
//! include with bindings its own scope. Included templates read through the
//! loop frame, so the bindings are visible to the include and to anything it
//! includes in turn, and to nothing else.

use anyhow::Result;

use super::directive::{IncludeDirective, ParsedTemplate, Segment, VarValue};
use crate::constants::{REINDENT_FILTER, TEMPLATE_EXTENSION};
use crate::core::StrataError;

/// Loop variable opening a binding scope
const SCOPE_VARIABLE: &str = "__strata_scope";

/// Names Tera parses as operators or literals, or uses for loop state
const RESERVED_WORDS: &[&str] =
    &["and", "or", "not", "in", "is", "true", "false", "True", "False", "loop", "super"];

/// Turns a [`ParsedTemplate`] into source for a template engine.
pub trait Emitter {
    /// File name of a converted template inside the build workspace.
    fn file_name(&self, name: &str) -> String {
        format!("{name}{TEMPLATE_EXTENSION}")
    }

    /// Replacement text for one include directive.
    ///
    /// `template` is the including template, for error messages.
    fn emit_include(&self, directive: &IncludeDirective, template: &str) -> Result<String>;

    /// Full converted source: text segments verbatim, directives rewritten.
    fn emit(&self, parsed: &ParsedTemplate, template: &str) -> Result<String> {
        let mut output = String::new();
        for segment in &parsed.segments {
            match segment {
                Segment::Text(line) => output.push_str(line),
                Segment::Include(directive) => {
                    output.push_str(&self.emit_include(directive, template)?);
                }
            }
        }
        Ok(output)
    }
}

/// Emits Tera syntax. Pairs with the `reindent` filter registered by
/// [`crate::templating::StackRenderer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TeraEmitter;

impl TeraEmitter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Tera string literal for `value`.
    ///
    /// Tera literals have no escape sequences, so the delimiter is the first
    /// of `"`, `'` and `` ` `` that does not occur in the value.
    fn string_literal(value: &str) -> Option<String> {
        ['"', '\'', '`']
            .into_iter()
            .find(|delimiter| !value.contains(*delimiter))
            .map(|delimiter| format!("{delimiter}{value}{delimiter}"))
    }

    fn value_literal(value: &VarValue) -> Option<String> {
        match value {
            VarValue::Scalar(text) => Self::string_literal(text),
            VarValue::List(items) => {
                let literals =
                    items.iter().map(|item| Self::string_literal(item)).collect::<Option<Vec<_>>>()?;
                Some(format!("[{}]", literals.join(", ")))
            }
        }
    }

    fn check_key(key: &str) -> std::result::Result<(), String> {
        if RESERVED_WORDS.contains(&key) {
            return Err(format!("'{key}' is a reserved word and cannot be bound"));
        }
        if key.starts_with("__") {
            return Err(format!("'{key}' uses the reserved '__' prefix"));
        }
        Ok(())
    }
}

impl Emitter for TeraEmitter {
    fn emit_include(&self, directive: &IncludeDirective, template: &str) -> Result<String> {
        let invalid = |reason: String| StrataError::InvalidDirective {
            template: template.to_string(),
            line_number: directive.line_number,
            reason,
        };

        let include = format!(
            "{{% filter {REINDENT_FILTER}(width={}) %}}{{% include \"{}\" %}}{{% endfilter %}}",
            directive.indent,
            self.file_name(&directive.name)
        );
        if directive.vars.is_empty() {
            return Ok(include);
        }

        let mut output = format!("{{% for {SCOPE_VARIABLE} in [1] %}}");
        for (key, value) in directive.vars.iter() {
            Self::check_key(key).map_err(invalid)?;
            let literal = Self::value_literal(value).ok_or_else(|| {
                invalid(format!("value of '{key}' mixes all three quote characters"))
            })?;
            output.push_str(&format!("{{% set {key} = {literal} %}}"));
        }
        output.push_str(&include);
        output.push_str("{% endfor %}");
        Ok(output)
    }
}
