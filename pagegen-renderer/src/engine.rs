//! Placeholder substitution: [`TemplateEngine`] and the scan functions.
//!
//! A placeholder is the literal text `{name}`. Substitution is flat: there
//! are no conditionals, loops, escapes or nested templates.
//!
//! | Mode           | Algorithm                                             |
//! |----------------|-------------------------------------------------------|
//! | `Simultaneous` | one scan; each `{` is tried against every known name  |
//! | `Sequential`   | one full replace pass per attribute, in name order    |
//!
//! Both modes leave unknown placeholders verbatim and never re-scan text that
//! was just inserted by the same pass. They only disagree when attributes
//! reference each other. If one attribute's value contains another's
//! placeholder, sequential mode expands it when the inner attribute sorts
//! later and simultaneous mode never does. If two tokens overlap (`a` and
//! `a}b` in `{a}b}`), sequential mode applies whichever sorts first and
//! simultaneous mode takes the longest.

use pagegen_core::types::{AttributeMap, AttributeName, SubstitutionMode, Template};

// ---------------------------------------------------------------------------
// Scan functions
// ---------------------------------------------------------------------------

/// Replace every known `{name}` in `template` in a single left-to-right scan.
///
/// Scanning resumes right after each inserted value, so values are copied
/// through untouched even if they contain placeholder-like text. Names may
/// themselves contain `}`; when several known tokens start at the same `{`,
/// the longest one wins.
pub fn substitute(template: &str, attributes: &AttributeMap) -> String {
    let max_name = attributes.keys().map(|name| name.as_str().len()).max();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let token = max_name.and_then(|max| longest_token(after, attributes, max));
        if let Some((close, value)) = token {
            out.push_str(value);
            rest = &after[close + 1..];
            continue;
        }

        // Not a known token; keep the brace and retry from the next char so
        // `{{title}` still matches its inner `{title}`.
        out.push('{');
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Longest known name at the start of `after` that is followed by `}`.
/// Returns the offset of that `}` and the attribute's value.
fn longest_token<'a>(
    after: &str,
    attributes: &'a AttributeMap,
    max_name: usize,
) -> Option<(usize, &'a str)> {
    after
        .match_indices('}')
        .map(|(close, _)| close)
        .take_while(|&close| close <= max_name)
        .filter_map(|close| attributes.get(&after[..close]).map(|value| (close, value.as_str())))
        .last()
}

/// Apply one attribute per pass, in attribute-name order.
pub fn substitute_sequential(template: &str, attributes: &AttributeMap) -> String {
    let mut names: Vec<&AttributeName> = attributes.keys().collect();
    names.sort();

    names.into_iter().fold(template.to_owned(), |text, name| {
        // `str::replace` matches left to right without overlap and resumes
        // after each insertion.
        text.replace(&name.placeholder(), &attributes[name])
    })
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Renders one shared [`Template`] against per-entity attribute maps.
///
/// The engine holds no mutable state; share it behind an `Arc` and call
/// [`TemplateEngine::render`] from any number of workers.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    template: Template,
    mode: SubstitutionMode,
}

impl TemplateEngine {
    pub fn new(template: Template) -> Self {
        Self::with_mode(template, SubstitutionMode::default())
    }

    pub fn with_mode(template: Template, mode: SubstitutionMode) -> Self {
        TemplateEngine { template, mode }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn mode(&self) -> SubstitutionMode {
        self.mode
    }

    /// Render the template with `attributes`. An empty map returns the
    /// template unchanged.
    pub fn render(&self, attributes: &AttributeMap) -> String {
        match self.mode {
            SubstitutionMode::Simultaneous => substitute(self.template.as_str(), attributes),
            SubstitutionMode::Sequential => {
                substitute_sequential(self.template.as_str(), attributes)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AttributeMap {
        pairs
            .iter()
            .map(|(k, v)| (AttributeName::from(*k), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_renders_template_unchanged() {
        let engine = TemplateEngine::new(Template::from("<p>{a}</p>"));
        assert_eq!(engine.render(&AttributeMap::new()), "<p>{a}</p>");
    }

    #[test]
    fn value_containing_own_placeholder_is_not_rescanned() {
        let map = attrs(&[("a", "{a}{a}")]);
        assert_eq!(substitute("{a}|{a}", &map), "{a}{a}|{a}{a}");
        assert_eq!(substitute_sequential("{a}|{a}", &map), "{a}{a}|{a}{a}");
    }

    #[test]
    fn simultaneous_ignores_cross_attribute_tokens_in_values() {
        let map = attrs(&[("a", "{b}"), ("b", "B")]);
        assert_eq!(substitute("{a}-{b}", &map), "{b}-B");
    }

    #[test]
    fn overlapping_names_take_the_longest_token() {
        let map = attrs(&[("a", "S"), ("a}b", "L")]);
        assert_eq!(substitute("{a}b}|{a}", &map), "L|S");
        assert_eq!(substitute("{a}c}", &map), "Sc}");
    }

    #[test]
    fn brace_far_past_longest_name_is_not_considered() {
        let map = attrs(&[("ab", "X")]);
        assert_eq!(substitute("{a very long run of text}{ab}", &map), "{a very long run of text}X");
    }

    #[test]
    fn sequential_applies_in_name_order() {
        let map = attrs(&[("a", "{b}"), ("b", "B")]);
        assert_eq!(substitute_sequential("{a}-{b}", &map), "B-B");
    }

    #[test]
    fn modes_agree_without_cross_references() {
        let map = attrs(&[("title", "Hello"), ("body", "<p>text</p>")]);
        let template = "<h1>{title}</h1>{body}{footer}{title}";
        assert_eq!(substitute(template, &map), substitute_sequential(template, &map));
    }

    #[test]
    fn engine_reports_mode() {
        let engine = TemplateEngine::with_mode(Template::from("x"), SubstitutionMode::Sequential);
        assert_eq!(engine.mode(), SubstitutionMode::Sequential);
        assert_eq!(engine.template().as_str(), "x");
    }
}
