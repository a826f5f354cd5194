//! # Number Culture
//!
//! Locale rules for parsing numbers stored as text. Only two separators
//! matter here: the decimal separator inside a number and the list separator
//! between list items. Cultures whose decimal separator is `,` use `;` as
//! their list separator.

/// Language subtags whose cultures write decimals with a comma.
const DECIMAL_COMMA_LANGUAGES: &[&str] = &[
    "bg", "cs", "da", "de", "el", "es", "et", "fi", "fr", "hr", "hu", "id", "it", "lt", "lv",
    "nb", "nl", "nn", "no", "pl", "pt", "ro", "ru", "sk", "sl", "sr", "sv", "tr", "uk", "vi",
];

/// Decimal and list separators for a culture tag such as `en-US` or `fr-FR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberCulture {
    tag: String,
    decimal_separator: char,
    list_separator: char,
}

impl NumberCulture {
    /// The invariant culture: `.` decimals, `,` lists.
    pub fn invariant() -> Self {
        Self {
            tag: String::new(),
            decimal_separator: '.',
            list_separator: ',',
        }
    }

    /// Resolve a culture tag. Unknown languages fall back to invariant rules.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let comma = DECIMAL_COMMA_LANGUAGES.contains(&language.as_str());
        Self {
            tag: tag.to_string(),
            decimal_separator: if comma { ',' } else { '.' },
            list_separator: if comma { ';' } else { ',' },
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub fn list_separator(&self) -> char {
        self.list_separator
    }

    /// Parse a decimal number written in this culture.
    pub fn parse_decimal(&self, text: &str) -> Option<f64> {
        let text = text.trim();
        if self.decimal_separator == '.' {
            return text.parse().ok();
        }
        if text.contains('.') {
            return None;
        }
        text.replace(self.decimal_separator, ".").parse().ok()
    }
}

impl Default for NumberCulture {
    fn default() -> Self {
        Self::invariant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_uses_dot() {
        let c = NumberCulture::from_tag("en-US");
        assert_eq!(c.decimal_separator(), '.');
        assert_eq!(c.list_separator(), ',');
        assert_eq!(c.parse_decimal("47.25"), Some(47.25));
    }

    #[test]
    fn french_uses_comma() {
        let c = NumberCulture::from_tag("fr-FR");
        assert_eq!(c.list_separator(), ';');
        assert_eq!(c.parse_decimal("-1,5"), Some(-1.5));
        assert_eq!(c.parse_decimal("1.5"), None);
    }

    #[test]
    fn unknown_tag_is_invariant() {
        let c = NumberCulture::from_tag("xx");
        assert_eq!(c.decimal_separator(), '.');
        assert_eq!(c.tag(), "xx");
    }

    #[test]
    fn underscore_tags_are_accepted() {
        assert_eq!(NumberCulture::from_tag("de_DE").decimal_separator(), ',');
    }
}
