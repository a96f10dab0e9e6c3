//! Scoring and ranking of address suggestions.
//!
//! Suggestions come from several geocoders with incompatible relevance
//! scales. Rather than trusting any one of them, every candidate is scored
//! against the customer's query with the same token heuristic, then
//! deduplicated by normalized label.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Maximum number of query variations sent to providers.
pub const MAX_VARIATIONS: usize = 3;

/// Geocoding service a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// French government address database (BAN).
    Gouv,
    /// Photon (`OpenStreetMap`).
    Photon,
    /// Nominatim (`OpenStreetMap`).
    Nominatim,
}

impl SuggestionSource {
    /// Trust bonus added to every candidate from this source.
    #[must_use]
    pub const fn weight(self) -> i32 {
        match self {
            Self::Gouv => 5,
            Self::Photon => 3,
            Self::Nominatim => 1,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gouv => "gouv",
            Self::Photon => "photon",
            Self::Nominatim => "nominatim",
        }
    }
}

/// A provider result before ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Full display label.
    pub label: String,
    /// House number, if the result is a street address.
    pub house_number: Option<String>,
    /// Street name.
    pub street: Option<String>,
    /// Postal code.
    pub postcode: Option<String>,
    /// City or locality.
    pub city: Option<String>,
    /// ISO country code, upper-case.
    pub country_code: Option<String>,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Provider that returned it.
    pub source: SuggestionSource,
    /// Provider relevance in `[0, 1]`, when the provider reports one.
    pub relevance: Option<f64>,
    /// Whether it answered a word-subset variation rather than the full query.
    pub from_variation: bool,
}

/// A candidate with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    /// The candidate.
    pub candidate: Candidate,
    /// Heuristic score, higher is better.
    pub score: i32,
}

/// Lower-case, fold Latin-1 accents, turn punctuation into spaces and
/// collapse whitespace.
#[must_use]
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars().flat_map(char::to_lowercase) {
        match fold_accent(c) {
            Some(folded) => out.push_str(folded),
            None if c.is_alphanumeric() => out.push(c),
            None => out.push(' '),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

const fn fold_accent(c: char) -> Option<&'static str> {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => Some("a"),
        'æ' => Some("ae"),
        'ç' => Some("c"),
        'è' | 'é' | 'ê' | 'ë' => Some("e"),
        'ì' | 'í' | 'î' | 'ï' => Some("i"),
        'ñ' => Some("n"),
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => Some("o"),
        'œ' => Some("oe"),
        'ù' | 'ú' | 'û' | 'ü' => Some("u"),
        'ý' | 'ÿ' => Some("y"),
        'ß' => Some("ss"),
        _ => None,
    }
}

/// The full query plus word-subset variations.
///
/// Queries of three or more words also try all-but-last (customers often
/// type a trailing word the geocoders choke on, such as an apartment number)
/// and all-but-first.
#[must_use]
pub fn query_variations(query: &str) -> Vec<String> {
    let trimmed = query.split_whitespace().collect::<Vec<_>>();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut variations = vec![trimmed.join(" ")];
    if let [first_rest @ .., _last] = trimmed.as_slice()
        && trimmed.len() >= 3
    {
        variations.push(first_rest.join(" "));
    }
    if let [_first, rest @ ..] = trimmed.as_slice()
        && trimmed.len() >= 3
    {
        variations.push(rest.join(" "));
    }

    let mut seen = Vec::with_capacity(variations.len());
    variations.retain(|v| {
        let key = normalize(v);
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
    variations.truncate(MAX_VARIATIONS);
    variations
}

/// Score a candidate against the customer's query.
#[must_use]
pub fn score(query: &str, candidate: &Candidate) -> i32 {
    let query_norm = normalize(query);
    let label_norm = normalize(&candidate.label);
    let label_tokens: Vec<&str> = label_norm.split(' ').collect();

    let mut total = 0;
    for token in query_norm.split(' ').filter(|t| !t.is_empty()) {
        if label_tokens.contains(&token) {
            total += 10;
        } else if label_tokens.iter().any(|l| l.starts_with(token)) {
            total += 6;
        } else {
            total -= 4;
        }
    }

    if !query_norm.is_empty() && label_norm.starts_with(&query_norm) {
        total += 15;
    }

    if let (Some(wanted), Some(have)) = (leading_house_number(&query_norm), &candidate.house_number)
        && normalize(have) == wanted
    {
        total += 10;
    }

    total += candidate.source.weight();

    if let Some(relevance) = candidate.relevance {
        #[allow(clippy::cast_possible_truncation)] // bounded to 0..=10
        let bonus = (relevance.clamp(0.0, 1.0) * 10.0).round() as i32;
        total += bonus;
    }

    if candidate.from_variation {
        total -= 3;
    }

    total
}

/// First query token when it looks like a house number ("12", "12bis").
fn leading_house_number(query_norm: &str) -> Option<&str> {
    query_norm
        .split(' ')
        .next()
        .filter(|t| t.chars().next().is_some_and(|c| c.is_ascii_digit()))
}

/// Score, deduplicate by normalized label, sort and truncate.
///
/// Ordering is score descending, then label ascending, so equal inputs always
/// produce equal output.
#[must_use]
pub fn rank(query: &str, candidates: Vec<Candidate>, limit: usize) -> Vec<Ranked> {
    let mut best: HashMap<String, Ranked> = HashMap::with_capacity(candidates.len());

    for candidate in candidates {
        let key = normalize(&candidate.label);
        if key.is_empty() {
            continue;
        }
        let score = score(query, &candidate);
        match best.get(&key) {
            Some(existing) if existing.score >= score => {}
            _ => {
                best.insert(key, Ranked { candidate, score });
            }
        }
    }

    let mut ranked: Vec<Ranked> = best.into_values().collect();
    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.candidate.label.cmp(&b.candidate.label))
    });
    ranked.truncate(limit);
    ranked
}
