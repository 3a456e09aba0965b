//! Entity resolution: exact match, semantic match, or genuinely new.
//!
//! Resolution decides whether a newly mentioned character or location is an
//! existing catalog entity under a different name, or something new. Both
//! tiers are deliberately conservative: an ambiguous answer returns `New`,
//! because a false merge corrupts a visual identity for the rest of the
//! document, while a false split merely costs one extra generation.

use fresco_core::{Catalog, Character, Location};
use fresco_oracle::TextOracle;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::extraction::parse_json;

/// Outcome of resolving a newly mentioned entity against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<E> {
    /// The name is an exact catalog key; no oracle call was made.
    ExactMatch(E),
    /// The oracle judged this the same entity as an existing one.
    SemanticMatch(E),
    /// Genuinely new; carries the next unused id for the entity kind.
    New(u32),
}

/// The oracle's answer to a semantic-match query.
#[derive(Debug, Deserialize)]
struct SemanticVerdict {
    #[serde(default)]
    match_id: Option<u32>,
    #[serde(default)]
    reason: String,
}

/// Resolve a newly extracted character against the catalog.
///
/// Checks in strict order: exact name key, then a semantic-match oracle call
/// over an id-deduplicated candidate list, then `New`. The semantic call is
/// skipped entirely when no catalog entries carry assigned ids.
pub async fn resolve_character<O: TextOracle>(
    oracle: &O,
    catalog: &Catalog,
    candidate: &Character,
) -> Resolution<Character> {
    if let Some(existing) = catalog.characters.get(&candidate.name) {
        debug!(name = %candidate.name, id = ?existing.id, "Character found by exact name");
        return Resolution::ExactMatch(existing.clone());
    }

    let by_id = catalog.characters_by_id();
    if !by_id.is_empty() {
        let candidates_text: Vec<String> = by_id
            .values()
            .map(|c| format!("- ID {}: Name='{}', Description='{}'", c.id.unwrap_or(0), c.name, c.description))
            .collect();

        let prompt = format!(
            "I have a new character from a story and a database of existing characters.\n\
             Determine if the new character is actually the SAME person as one of the \
             existing characters, just referred to by a different name or description style.\n\n\
             New Character:\n\
             Name: \"{}\"\n\
             Description: \"{}\"\n\n\
             Existing Characters Database:\n{}\n\n\
             Task: Compare the New Character to the database.\n\
             If there is a CLEAR and UNAMBIGUOUS match (e.g. \"Main Hero\" vs \"The Hero\", \
             or similar physical description and role), return the ID of the existing character.\n\
             If it is a new character or you are unsure, return null.\n\n\
             Return ONLY a JSON object: {{\"match_id\": <int or null>, \"reason\": \"<string>\"}}",
            candidate.name,
            candidate.description,
            candidates_text.join("\n")
        );

        match semantic_verdict(oracle, &prompt).await {
            Some(verdict) => {
                if let Some(id) = verdict.match_id {
                    if let Some(existing) = by_id.get(&id) {
                        info!(
                            name = %candidate.name,
                            matched = %existing.name,
                            id,
                            reason = %verdict.reason,
                            "Character matched semantically"
                        );
                        return Resolution::SemanticMatch((*existing).clone());
                    }
                    warn!(name = %candidate.name, id, "Semantic match returned unknown id, treating as new");
                }
            }
            None => {
                warn!(name = %candidate.name, "Semantic match check failed, treating as new");
            }
        }
    }

    Resolution::New(catalog.next_character_id())
}

/// Resolve a newly extracted location against the catalog.
///
/// Same tiering as [`resolve_character`].
pub async fn resolve_location<O: TextOracle>(
    oracle: &O,
    catalog: &Catalog,
    candidate: &Location,
) -> Resolution<Location> {
    if let Some(existing) = catalog.locations.get(&candidate.name) {
        debug!(name = %candidate.name, id = ?existing.id, "Location found by exact name");
        return Resolution::ExactMatch(existing.clone());
    }

    let by_id = catalog.locations_by_id();
    if !by_id.is_empty() {
        let candidates_text: Vec<String> = by_id
            .values()
            .map(|l| format!("- ID {}: Name='{}', Description='{}'", l.id.unwrap_or(0), l.name, l.description))
            .collect();

        let prompt = format!(
            "I have a new location from a story scene and a database of existing locations.\n\
             Determine if the new location is the SAME place as one of the existing locations.\n\n\
             New Location:\n\
             Name: \"{}\"\n\
             Description: \"{}\"\n\n\
             Existing Locations Database:\n{}\n\n\
             Task: Compare the New Location to the database.\n\
             If it refers to the same place (e.g. \"Kitchen\" vs \"Old Kitchen\", or \
             \"Forest edge\" vs \"Dark Forest\" if descriptions align), return the ID.\n\
             If no match, return null.\n\n\
             Return ONLY a JSON object: {{\"match_id\": <int or null>, \"reason\": \"<string>\"}}",
            candidate.name,
            candidate.description,
            candidates_text.join("\n")
        );

        match semantic_verdict(oracle, &prompt).await {
            Some(verdict) => {
                if let Some(id) = verdict.match_id {
                    if let Some(existing) = by_id.get(&id) {
                        info!(
                            name = %candidate.name,
                            matched = %existing.name,
                            id,
                            reason = %verdict.reason,
                            "Location matched semantically"
                        );
                        return Resolution::SemanticMatch((*existing).clone());
                    }
                    warn!(name = %candidate.name, id, "Semantic match returned unknown id, treating as new");
                }
            }
            None => {
                warn!(name = %candidate.name, "Semantic match check failed, treating as new");
            }
        }
    }

    Resolution::New(catalog.next_location_id())
}

/// Run the semantic-match oracle call and parse its verdict.
///
/// Returns `None` for oracle or parse failures so callers fall through to
/// `New` instead of propagating the error.
async fn semantic_verdict<O: TextOracle>(oracle: &O, prompt: &str) -> Option<SemanticVerdict> {
    let response = match oracle.generate_text(prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Semantic match oracle call failed");
            return None;
        }
    };
    match parse_json::<SemanticVerdict>(&response) {
        Ok(verdict) => Some(verdict),
        Err(e) => {
            warn!(error = %e, "Semantic match response unparsable");
            None
        }
    }
}
