#![forbid(unsafe_code)]

//! Message template rendering
//!
//! Templates use `{{name}}` placeholders, optionally padded with spaces
//! (`{{ name }}`). Placeholders without a matching argument are left as-is.

use std::collections::BTreeMap;

/// Substitutes every `{{name}}` placeholder in `template` from `args`
pub fn render(template: &str, args: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = after[..close].trim();
        match args.get(name) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes() {
        let out = render(
            "Expected whitespace after {{type}} operator.",
            &args(&[("type", "spread")]),
        );
        assert_eq!(out, "Expected whitespace after spread operator.");
    }

    #[test]
    fn test_render_trims_placeholder_names() {
        let out = render("A space is required {{ loc }} ','.", &args(&[("loc", "after")]));
        assert_eq!(out, "A space is required after ','.");
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        assert_eq!(render("Prop `{{prop}}`", &args(&[])), "Prop `{{prop}}`");
    }

    #[test]
    fn test_render_unterminated_placeholder() {
        assert_eq!(render("oops {{name", &args(&[("name", "x")])), "oops {{name");
    }

    #[test]
    fn test_render_without_placeholders() {
        assert_eq!(render("Unnecessary semicolon.", &args(&[])), "Unnecessary semicolon.");
    }
}
