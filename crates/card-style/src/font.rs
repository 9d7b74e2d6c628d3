//! Font-family normalization.

/// Normalize a `font-family` value.
///
/// Trims each family in the list, strips matching outer quotes and rejoins the
/// list with `", "`. An empty result means no family was given.
///
/// ```
/// use card_style::normalize_font_family;
///
/// assert_eq!(normalize_font_family(" 'Times New Roman' "), "Times New Roman");
/// assert_eq!(normalize_font_family("\"Roboto\",sans-serif"), "Roboto, sans-serif");
/// ```
#[must_use]
pub fn normalize_font_family(value: &str) -> String {
    value
        .split(',')
        .map(|family| unquote(family.trim()))
        .filter(|family| !family.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strip one level of matching quotes.
fn unquote(family: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = family
            .strip_prefix(quote)
            .and_then(|f| f.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    family
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_single_family() {
        assert_eq!(normalize_font_family("Arial"), "Arial");
        assert_eq!(normalize_font_family("  Courier  "), "Courier");
    }

    #[test]
    fn test_normalize_quoted_list() {
        assert_eq!(
            normalize_font_family("'Helvetica Neue', \"Arial\" ,sans-serif"),
            "Helvetica Neue, Arial, sans-serif"
        );
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_font_family(" , "), "");
    }

    #[test]
    fn test_unbalanced_quote_kept() {
        assert_eq!(normalize_font_family("'Arial"), "'Arial");
    }
}
