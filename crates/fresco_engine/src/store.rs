//! Durable catalog storage with legacy migration.
//!
//! The cache owns the persisted form of the catalog: a single unified
//! `data.json` under the output directory, shared with the illustration
//! manifest. Every save is a read-merge-write of the full document so that
//! sibling top-level fields maintained by other components survive. Load and
//! save failures are logged and swallowed; the in-memory catalog stays the
//! source of truth for the rest of the run.

use fresco_core::Catalog;
use fresco_error::{FrescoResult, StorageError, StorageErrorKind};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Unified catalog and manifest document name.
const DATA_FILE: &str = "data.json";

/// Crash-resilient registry of resolved entities and their artifacts.
///
/// Directories are created lazily before first write, never as a precondition
/// checked by callers. Artifact and catalog writes both go through a temp
/// file + rename so a crash mid-write cannot leave a truncated image or a
/// truncated `data.json` that a later run would mistake for the real thing.
#[derive(Debug, Clone)]
pub struct AssetCache {
    output_dir: PathBuf,
    data_path: PathBuf,
    /// The in-memory catalog; authoritative for the run.
    pub catalog: Catalog,
}

impl AssetCache {
    /// Open the cache for an output directory.
    ///
    /// Loads the unified catalog document when present; otherwise attempts a
    /// one-time migration from legacy per-kind files (`characters/characters.json`
    /// and `locations/locations.json`). Running again when the unified
    /// document exists is a no-op. A load failure is equivalent to an empty
    /// catalog.
    pub fn open(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        let data_path = output_dir.join(DATA_FILE);

        let mut cache = Self {
            output_dir,
            data_path,
            catalog: Catalog::default(),
        };

        if cache.data_path.exists() {
            match cache.load() {
                Ok(catalog) => {
                    info!(
                        characters = catalog.characters.len(),
                        locations = catalog.locations.len(),
                        "Loaded catalog"
                    );
                    cache.catalog = catalog;
                }
                Err(e) => {
                    error!(error = %e, path = %cache.data_path.display(), "Error loading catalog, starting empty");
                }
            }
        } else {
            cache.migrate_legacy();
        }

        cache
    }

    /// The output directory this cache persists under.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the unified catalog/manifest document.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Directory for generated character cards.
    pub fn character_dir(&self) -> PathBuf {
        self.output_dir.join("characters")
    }

    /// Directory for generated location shots.
    pub fn location_dir(&self) -> PathBuf {
        self.output_dir.join("locations")
    }

    /// Directory for the per-run style templates.
    pub fn template_dir(&self) -> PathBuf {
        self.output_dir.join("style_templates")
    }

    /// Directory for scene illustrations.
    pub fn illustration_dir(&self) -> PathBuf {
        self.output_dir.join("illustrations")
    }

    /// Load the catalog from the unified document.
    fn load(&self) -> FrescoResult<Catalog> {
        let raw = std::fs::read_to_string(&self.data_path)
            .map_err(|e| StorageError::new(StorageErrorKind::FileRead(e.to_string())))?;
        let doc: Value = serde_json::from_str(&raw)
            .map_err(|e| StorageError::new(StorageErrorKind::MalformedCatalog(e.to_string())))?;

        let mut catalog = Catalog::default();
        if let Some(characters) = doc.get("characters").and_then(Value::as_array) {
            for item in characters {
                match serde_json::from_value::<fresco_core::Character>(item.clone()) {
                    Ok(character) => {
                        catalog.characters.insert(character.name.clone(), character);
                    }
                    Err(e) => warn!(error = %e, "Skipping malformed character entry"),
                }
            }
        }
        if let Some(locations) = doc.get("locations").and_then(Value::as_array) {
            for item in locations {
                match serde_json::from_value::<fresco_core::Location>(item.clone()) {
                    Ok(location) => {
                        catalog.locations.insert(location.name.clone(), location);
                    }
                    Err(e) => warn!(error = %e, "Skipping malformed location entry"),
                }
            }
        }
        Ok(catalog)
    }

    /// One-time migration from legacy per-kind catalog files.
    ///
    /// Populates the in-memory catalog from whichever legacy files exist and
    /// immediately persists the unified document, so the migration never runs
    /// twice for the same output directory.
    fn migrate_legacy(&mut self) {
        let mut migrated = false;

        let legacy_characters = self.character_dir().join("characters.json");
        if legacy_characters.exists() {
            match read_legacy_array::<fresco_core::Character>(&legacy_characters) {
                Ok(characters) => {
                    for character in characters {
                        self.catalog
                            .characters
                            .insert(character.name.clone(), character);
                    }
                    migrated = true;
                    info!(
                        count = self.catalog.characters.len(),
                        "Migrated characters from legacy storage"
                    );
                }
                Err(e) => error!(error = %e, "Error migrating characters"),
            }
        }

        let legacy_locations = self.location_dir().join("locations.json");
        if legacy_locations.exists() {
            match read_legacy_array::<fresco_core::Location>(&legacy_locations) {
                Ok(locations) => {
                    for location in locations {
                        self.catalog.locations.insert(location.name.clone(), location);
                    }
                    migrated = true;
                    info!(
                        count = self.catalog.locations.len(),
                        "Migrated locations from legacy storage"
                    );
                }
                Err(e) => error!(error = %e, "Error migrating locations"),
            }
        }

        if migrated {
            self.save();
        }
    }

    /// Persist the full catalog into the unified document.
    ///
    /// Read-merge-write: top-level fields other than `characters` and
    /// `locations` are preserved. Failures are logged and swallowed.
    pub fn save(&self) {
        let characters: Vec<Value> = self
            .catalog
            .characters
            .values()
            .map(|c| {
                let mut c = c.clone();
                if c.original_name.is_none() {
                    c.original_name = Some(c.name.clone());
                }
                serde_json::to_value(c).unwrap_or(Value::Null)
            })
            .collect();
        let locations: Vec<Value> = self
            .catalog
            .locations
            .values()
            .map(|l| {
                let mut l = l.clone();
                if l.original_name.is_none() {
                    l.original_name = Some(l.name.clone());
                }
                serde_json::to_value(l).unwrap_or(Value::Null)
            })
            .collect();

        if let Err(e) = merge_into_document(&self.data_path, |doc| {
            doc.insert("characters".to_string(), Value::Array(characters));
            doc.insert("locations".to_string(), Value::Array(locations));
        }) {
            error!(error = %e, path = %self.data_path.display(), "Error saving catalog");
        }
    }

    /// Write artifact bytes to a path under the output directory.
    ///
    /// Creates parent directories lazily and writes through a temp file +
    /// rename.
    pub async fn write_artifact(&self, path: &Path, bytes: &[u8]) -> FrescoResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;
        tokio::fs::rename(&temp_path, path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        Ok(())
    }
}

/// Read a legacy per-kind catalog file: a bare JSON array of entities.
fn read_legacy_array<T: serde::de::DeserializeOwned>(path: &Path) -> FrescoResult<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| StorageError::new(StorageErrorKind::FileRead(e.to_string())))?;
    serde_json::from_str(&raw)
        .map_err(|e| StorageError::new(StorageErrorKind::MalformedCatalog(e.to_string())).into())
}

/// Read-merge-write a JSON document at `path`.
///
/// The document is read as a JSON object (an unreadable or non-object
/// document counts as empty), mutated by `update`, and written back pretty
/// through a temp file + rename, so a crash mid-write leaves the previous
/// document intact rather than a truncated one. Used by both the catalog
/// save and the manifest save so concurrent siblings of either never get
/// clobbered.
pub(crate) fn merge_into_document<F>(path: &Path, update: F) -> FrescoResult<()>
where
    F: FnOnce(&mut Map<String, Value>),
{
    let mut doc = match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!(path = %path.display(), "Existing document not a JSON object, replacing");
                Map::new()
            }
        },
        Err(_) => Map::new(),
    };

    update(&mut doc);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;
    }

    let pretty = serde_json::to_string_pretty(&Value::Object(doc))
        .map_err(|e| StorageError::new(StorageErrorKind::FileWrite(e.to_string())))?;
    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, pretty).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
    })?;
    std::fs::rename(&temp_path, path).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            path.display(),
            e
        )))
        .into()
    })
}
