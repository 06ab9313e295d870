//! Custom Tera filters used by converted templates.

use std::collections::HashMap;

/// Indent every non-blank line of `content` by `width` spaces.
///
/// Non-empty output always ends with a newline, so the text that follows an
/// included block starts on its own line. Empty content stays empty.
#[must_use]
pub fn reindent(content: &str, width: usize) -> String {
    if content.is_empty() {
        return String::new();
    }

    let pad = " ".repeat(width);
    let mut output = String::with_capacity(content.len() + width * content.lines().count());
    for line in content.split_inclusive('\n') {
        if !line.trim().is_empty() {
            output.push_str(&pad);
        }
        output.push_str(line);
    }
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

/// Create the `reindent(width=N)` filter.
///
/// ```text
/// {% filter reindent(width=4) %}{% include "db.yml.tpl" %}{% endfilter %}
/// ```
pub fn create_reindent_filter() -> impl tera::Filter + 'static {
    |value: &tera::Value, args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let content = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("reindent filter expects a string"))?;
        let width = match args.get("width") {
            Some(width) => width
                .as_u64()
                .and_then(|w| usize::try_from(w).ok())
                .ok_or_else(|| tera::Error::msg("reindent filter: width must be a non-negative integer"))?,
            None => 0,
        };
        Ok(tera::Value::String(reindent(content, width)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::{Context, Tera};

    #[test]
    fn test_reindent_lines() {
        assert_eq!(reindent("a: 1\nb: 2\n", 2), "  a: 1\n  b: 2\n");
    }

    #[test]
    fn test_reindent_keeps_blank_lines_unpadded() {
        assert_eq!(reindent("a: 1\n\n  \nb: 2", 4), "    a: 1\n\n  \n    b: 2\n");
    }

    #[test]
    fn test_reindent_zero_width_adds_trailing_newline() {
        assert_eq!(reindent("a: 1", 0), "a: 1\n");
    }

    #[test]
    fn test_reindent_empty() {
        assert_eq!(reindent("", 8), "");
    }

    #[test]
    fn test_filter_in_tera() {
        let mut tera = Tera::default();
        tera.register_filter("reindent", create_reindent_filter());
        tera.add_raw_template("t", "x:\n{% filter reindent(width=2) %}y: 1\nz: 2{% endfilter %}end\n")
            .unwrap();

        let out = tera.render("t", &Context::new()).unwrap();
        assert_eq!(out, "x:\n  y: 1\n  z: 2\nend\n");
    }

    #[test]
    fn test_filter_rejects_negative_width() {
        let mut tera = Tera::default();
        tera.register_filter("reindent", create_reindent_filter());
        tera.add_raw_template("t", "{% filter reindent(width=-1) %}a{% endfilter %}").unwrap();
        assert!(tera.render("t", &Context::new()).is_err());
    }
}
