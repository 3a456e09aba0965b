//! The persisted registry of resolved entities.

use crate::{Character, Location};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registry of all resolved entities and their generated artifacts.
///
/// Both collections are keyed by *current* display name for O(1) exact
/// lookup; the entity `id` remains the true identity key for deduplication.
/// Several names may map to entries sharing one id after alias resolution.
///
/// The catalog is an owned, explicitly passed state object; persistence lives
/// in the asset cache, not here.
///
/// # Examples
///
/// ```
/// use fresco_core::{Catalog, Character};
///
/// let mut catalog = Catalog::default();
/// assert_eq!(catalog.next_character_id(), 1);
///
/// let mut kevin = Character::new("Kevin", "red scarf");
/// kevin.id = Some(1);
/// catalog.characters.insert(kevin.name.clone(), kevin);
/// assert_eq!(catalog.next_character_id(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Catalog {
    /// Characters keyed by current display name.
    #[serde(default)]
    pub characters: BTreeMap<String, Character>,
    /// Locations keyed by current display name.
    #[serde(default)]
    pub locations: BTreeMap<String, Location>,
}

impl Catalog {
    /// Next unused character id: `max(existing ids) + 1`, or 1 if none.
    pub fn next_character_id(&self) -> u32 {
        self.characters
            .values()
            .filter_map(|c| c.id)
            .max()
            .map_or(1, |id| id + 1)
    }

    /// Next unused location id: `max(existing ids) + 1`, or 1 if none.
    pub fn next_location_id(&self) -> u32 {
        self.locations
            .values()
            .filter_map(|l| l.id)
            .max()
            .map_or(1, |id| id + 1)
    }

    /// Characters deduplicated by id, for semantic-match candidate lists.
    ///
    /// Entries without an assigned id are excluded; when several names map to
    /// one id, the first in key order wins.
    pub fn characters_by_id(&self) -> BTreeMap<u32, &Character> {
        let mut unique = BTreeMap::new();
        for c in self.characters.values() {
            if let Some(id) = c.id {
                unique.entry(id).or_insert(c);
            }
        }
        unique
    }

    /// Locations deduplicated by id, for semantic-match candidate lists.
    pub fn locations_by_id(&self) -> BTreeMap<u32, &Location> {
        let mut unique = BTreeMap::new();
        for l in self.locations.values() {
            if let Some(id) = l.id {
                unique.entry(id).or_insert(l);
            }
        }
        unique
    }

    /// Look up a character by exact name, falling back to a bidirectional
    /// substring match.
    ///
    /// The substring fallback is a retrieval convenience for reference
    /// selection; resolution never uses it to decide whether to generate a
    /// new asset.
    pub fn lookup_character(&self, name: &str) -> Option<&Character> {
        if let Some(c) = self.characters.get(name) {
            return Some(c);
        }
        self.characters
            .iter()
            .find(|(key, _)| name.contains(key.as_str()) || key.contains(name))
            .map(|(_, c)| c)
    }

    /// Look up a location by exact name, falling back to a bidirectional
    /// substring match.
    pub fn lookup_location(&self, name: &str) -> Option<&Location> {
        if let Some(l) = self.locations.get(name) {
            return Some(l);
        }
        self.locations
            .iter()
            .find(|(key, _)| name.contains(key.as_str()) || key.contains(name))
            .map(|(_, l)| l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;

    fn character(name: &str, id: u32) -> Character {
        let mut c = Character::new(name, format!("{name} description"));
        c.id = Some(id);
        c
    }

    #[test]
    fn test_next_ids_start_at_one() {
        let catalog = Catalog::default();
        assert_eq!(catalog.next_character_id(), 1);
        assert_eq!(catalog.next_location_id(), 1);
    }

    #[test]
    fn test_next_id_skips_gaps() {
        let mut catalog = Catalog::default();
        catalog
            .characters
            .insert("Kevin".to_string(), character("Kevin", 7));
        assert_eq!(catalog.next_character_id(), 8);
    }

    #[test]
    fn test_characters_by_id_dedups_aliases() {
        let mut catalog = Catalog::default();
        catalog
            .characters
            .insert("Kevin".to_string(), character("Kevin", 1));
        catalog
            .characters
            .insert("the Hero".to_string(), character("the Hero", 1));
        assert_eq!(catalog.characters_by_id().len(), 1);
    }

    #[test]
    fn test_lookup_prefers_exact_match() {
        let mut catalog = Catalog::default();
        catalog
            .characters
            .insert("Ann".to_string(), character("Ann", 1));
        catalog
            .characters
            .insert("Anna".to_string(), character("Anna", 2));
        assert_eq!(catalog.lookup_character("Anna").unwrap().id, Some(2));
    }

    #[test]
    fn test_lookup_substring_fallback() {
        let mut catalog = Catalog::default();
        let mut loc = Location::new("Dark Forest", "gnarled pines");
        loc.id = Some(3);
        catalog.locations.insert(loc.name.clone(), loc);
        assert_eq!(catalog.lookup_location("Forest").unwrap().id, Some(3));
        assert!(catalog.lookup_location("Kitchen").is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut catalog = Catalog::default();
        let mut kevin = character("Kevin", 1);
        kevin.full_body_path = Some("characters/1_kevin.jpeg".to_string());
        kevin.original_name = Some("Kevin".to_string());
        catalog.characters.insert(kevin.name.clone(), kevin);
        let mut loc = Location::new("Kitchen", "tiled, warm light");
        loc.id = Some(1);
        catalog.locations.insert(loc.name.clone(), loc);

        let json = serde_json::to_string(&catalog).unwrap();
        let restored: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, catalog);
    }
}
