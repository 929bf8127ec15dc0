//! File-backed schema catalog
//!
//! Schemas live under `<catalog_root>/<skill>/input_schema.json` and
//! `output_schema.json`. Loads are cached per (skill, direction) for the
//! lifetime of the store; the run model is single-threaded, so the cache
//! is a plain `RefCell`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::schema::{Direction, Schema, SkillContract};

/// Lazy-loading store over a schema catalog directory
pub struct SchemaStore {
    catalog_root: PathBuf,
    cache: RefCell<HashMap<(String, Direction), Arc<Schema>>>,
}

impl SchemaStore {
    /// Create a store over a catalog root directory
    pub fn new(catalog_root: impl Into<PathBuf>) -> Self {
        Self {
            catalog_root: catalog_root.into(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Catalog root this store reads from
    pub fn catalog_root(&self) -> &Path {
        &self.catalog_root
    }

    /// Path of the catalog file backing one schema
    pub fn schema_path(&self, skill: &str, direction: Direction) -> PathBuf {
        self.catalog_root
            .join(skill)
            .join(direction.schema_file_name())
    }

    /// Load (or fetch from cache) the schema for one skill and direction
    ///
    /// A missing catalog file is `SchemaNotFound`; a file that exists but
    /// cannot be parsed into the typed schema shape is `SchemaMalformed`.
    pub fn load(&self, skill: &str, direction: Direction) -> Result<Arc<Schema>> {
        let key = (skill.to_string(), direction);
        if let Some(cached) = self.cache.borrow().get(&key) {
            return Ok(Arc::clone(cached));
        }

        let path = self.schema_path(skill, direction);
        if !path.is_file() {
            return Err(ValidationError::schema_not_found(skill, direction));
        }

        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| ValidationError::file_error(format!("Cannot read {}: {}", shown, e)))?;
        let doc: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| ValidationError::schema_malformed(&shown, format!("invalid JSON: {}", e)))?;
        let schema = Arc::new(Schema::parse(&doc, &shown)?);

        debug!(skill, direction = %direction, path = %shown, "loaded schema");
        self.cache.borrow_mut().insert(key, Arc::clone(&schema));
        Ok(schema)
    }

    /// Load both directions for a skill as a bound contract
    pub fn load_contract(&self, skill: &str) -> Result<SkillContract> {
        let input = self.load(skill, Direction::Input)?;
        let output = self.load(skill, Direction::Output)?;
        Ok(SkillContract::new(skill, input, output))
    }
}
