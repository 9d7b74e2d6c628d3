//! Declaration, rule and selector parsing.
//!
//! Only the subset of CSS that card templates use is understood: flat rule
//! blocks with simple selectors. At-rules are skipped, combinators match on
//! their rightmost compound, and pseudo-classes never match.

/// A single `property: value` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Lower-cased property name.
    pub property: String,
    /// Trimmed value with any `!important` flag removed.
    pub value: String,
}

impl Declaration {
    fn new(property: &str, value: &str) -> Self {
        Self {
            property: property.trim().to_ascii_lowercase(),
            value: value.trim().to_owned(),
        }
    }
}

/// Parse a declaration list such as an inline `style` attribute.
///
/// Empty and malformed declarations are skipped.
#[must_use]
pub fn parse_declarations(text: &str) -> Vec<Declaration> {
    text.split(';')
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            let value = value.trim();
            let value = value
                .strip_suffix("!important")
                .map_or(value, str::trim_end);
            if property.trim().is_empty() || value.is_empty() {
                return None;
            }
            Some(Declaration::new(property, value))
        })
        .collect()
}

/// Element view used for selector matching.
pub trait SelectorSubject {
    /// Lower-cased tag name.
    fn tag(&self) -> &str;
    /// Value of the `id` attribute.
    fn id(&self) -> Option<&str>;
    /// Whether the `class` attribute contains `class`.
    fn has_class(&self, class: &str) -> bool;
}

/// A simple selector: `*`, `tag`, `.class`, `#id` or a compound of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse a selector, keeping its rightmost compound.
    ///
    /// Returns `None` for selectors that can never match here (pseudo-classes,
    /// attribute selectors, empty input).
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let compound = text
            .split(|c: char| c.is_whitespace() || c == '>' || c == '+' || c == '~')
            .rfind(|part| !part.is_empty())?;

        if compound.contains([':', '[']) {
            return None;
        }

        let mut selector = Self::default();
        let mut rest = compound;

        let tag_end = rest.find(['.', '#']).unwrap_or(rest.len());
        let tag = &rest[..tag_end];
        if !tag.is_empty() && tag != "*" {
            selector.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return None;
            }
            if marker == '.' {
                selector.classes.push(name.to_owned());
            } else {
                selector.id = Some(name.to_owned());
            }
            rest = &body[end..];
        }

        Some(selector)
    }

    /// Check whether the selector matches the given element.
    #[must_use]
    pub fn matches(&self, subject: &impl SelectorSubject) -> bool {
        if let Some(tag) = &self.tag
            && tag != subject.tag()
        {
            return false;
        }
        if let Some(id) = &self.id
            && subject.id() != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|class| subject.has_class(class))
    }

    /// Whether this selector is exactly the given tag name.
    #[must_use]
    pub fn is_tag(&self, tag: &str) -> bool {
        self.id.is_none() && self.classes.is_empty() && self.tag.as_deref() == Some(tag)
    }
}

/// A rule block: selector list plus declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

impl Rule {
    /// Whether any selector in the list matches the element.
    #[must_use]
    pub fn matches(&self, subject: &impl SelectorSubject) -> bool {
        self.selectors.iter().any(|s| s.matches(subject))
    }
}

/// Parsed stylesheet in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// Parse stylesheet text.
    ///
    /// Never fails: unparseable fragments are dropped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = strip_comments(text);
        let mut rules = Vec::new();
        let mut rest = text.as_str();

        while let Some(open) = rest.find('{') {
            let prelude = rest[..open].trim();
            let Some(close) = matching_brace(&rest[open..]) else {
                break;
            };
            let body = &rest[open + 1..open + close];
            rest = &rest[open + close + 1..];

            if prelude.starts_with('@') {
                continue;
            }

            let selectors: Vec<Selector> = prelude.split(',').filter_map(Selector::parse).collect();
            if selectors.is_empty() {
                continue;
            }
            rules.push(Rule {
                selectors,
                declarations: parse_declarations(body),
            });
        }

        Self { rules }
    }

    /// Append the rules of another stylesheet.
    pub fn extend(&mut self, other: Self) {
        self.rules.extend(other.rules);
    }

    /// Declarations that apply to the element, in cascade order.
    pub fn matching<'a, S: SelectorSubject>(
        &'a self,
        subject: &'a S,
    ) -> impl Iterator<Item = &'a Declaration> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.matches(subject))
            .flat_map(|rule| rule.declarations.iter())
    }
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Offset of the brace closing the block that starts at `text[0] == '{'`.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
