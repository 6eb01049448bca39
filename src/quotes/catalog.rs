// Views over a loaded quote list: theme tabs, theme filtering, and search.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;

use super::types::{Quote, QuoteKey};

/// Pseudo-theme that selects every quote.
pub const ALL_THEMES: &str = "All";

/// Number of theme tabs shown after "All".
pub const DEFAULT_THEME_LIMIT: usize = 10;

const POPULAR_SEARCH_TERMS: [&str; 12] = [
    "motivational",
    "love",
    "success",
    "life",
    "happiness",
    "wisdom",
    "inspiration",
    "hope",
    "friendship",
    "dreams",
    "courage",
    "peace",
];

const MAX_SUGGESTIONS: usize = 6;

/// Theme tabs: "All" followed by the `limit` most frequent themes.
///
/// Themes with equal counts keep the order in which they first appear.
pub fn rank_themes(quotes: &[Quote], limit: usize) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for quote in quotes {
        let count = counts.entry(quote.theme.as_str()).or_insert(0);
        if *count == 0 {
            order.push(quote.theme.as_str());
        }
        *count += 1;
    }

    // Stable sort keeps first-appearance order among ties.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));

    std::iter::once(ALL_THEMES)
        .chain(order.into_iter().take(limit))
        .map(str::to_string)
        .collect()
}

/// Quotes for a theme tab, shuffled. `None` and "All" select every quote.
pub fn filter_by_theme<R: Rng + ?Sized>(
    quotes: &[Quote],
    theme: Option<&str>,
    rng: &mut R,
) -> Vec<Quote> {
    let mut selected: Vec<Quote> = match theme {
        None | Some(ALL_THEMES) => quotes.to_vec(),
        Some(theme) => quotes.iter().filter(|q| q.theme == theme).cloned().collect(),
    };
    selected.shuffle(rng);
    selected
}

/// Quotes whose text, author, or theme contains `query`, ignoring case.
/// A blank query matches nothing; surrounding whitespace is ignored.
pub fn search<'a>(quotes: &'a [Quote], query: &str) -> Vec<&'a Quote> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    quotes
        .iter()
        .filter(|q| {
            q.quote.to_lowercase().contains(&needle)
                || q.author.to_lowercase().contains(&needle)
                || q.theme.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Search-box suggestions drawn from the popular terms.
pub fn suggestions(query: &str) -> Vec<&'static str> {
    let needle = query.trim().to_lowercase();
    POPULAR_SEARCH_TERMS
        .iter()
        .copied()
        .filter(|term| needle.is_empty() || term.contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Index of the quote with `key` in `quotes`, if present.
pub fn position_of(quotes: &[Quote], key: &QuoteKey) -> Option<usize> {
    quotes.iter().position(|q| q.has_key(key))
}
