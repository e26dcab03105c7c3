use std::collections::BTreeSet;

use crate::models::{ThemeCatalog, ThemeDefinition};

/// Domain assigned when no theme matches.
pub const GENERAL_DOMAIN: &str = "General";

/// Categories whose keywords appear in `text`.
///
/// Matching is literal lowercase substring containment against the raw text,
/// not the token sequence, so compound words ("networking") still hit their
/// keyword ("network"). Themes are independent; a text may match any number
/// of categories.
pub fn match_themes(text: &str, themes: &[ThemeDefinition]) -> BTreeSet<String> {
    let text = text.to_lowercase();
    let mut matched = BTreeSet::new();

    for theme in themes {
        if theme
            .keywords
            .iter()
            .any(|keyword| text.contains(&keyword.to_lowercase()))
        {
            matched.insert(theme.category.clone());
        }
    }

    matched
}

/// Domain of the first catalog entry (in catalog order) whose category was
/// matched; `"General"` when nothing matched.
pub fn domain_for(matched: &BTreeSet<String>, catalog: &ThemeCatalog) -> String {
    catalog
        .themes
        .iter()
        .find(|theme| matched.contains(&theme.category))
        .map(|theme| theme.domain.clone())
        .unwrap_or_else(|| GENERAL_DOMAIN.to_string())
}
