//! Search term handling shared by the post stores.
//!
//! Both stores use the same tokenization: lowercase alphanumeric words, no stemming.
//! A post matches when any query term equals any word of its title, content, or tags.

/// Split free text into lowercase alphanumeric terms, deduplicated in order.
pub fn search_terms(text: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let word = word.to_lowercase();
        if !terms.contains(&word) {
            terms.push(word);
        }
    }
    terms
}

/// Build a Postgres `to_tsquery('simple', ..)` argument OR-ing every term.
///
/// Terms are alphanumeric only, so the result cannot carry tsquery operators.
#[cfg_attr(not(feature = "postgres"), allow(dead_code))]
pub fn tsquery_any(text: &str) -> Option<String> {
    let terms = search_terms(text);
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" | "))
    }
}

/// In-memory equivalent of the full-text match.
pub fn matches_any<'a>(terms: &[String], fields: impl IntoIterator<Item = &'a str>) -> bool {
    if terms.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .flat_map(search_terms)
        .any(|word| terms.contains(&word))
}
