//! Schema registry
//!
//! Built once (from code or a JSON schema file) and never mutated afterwards.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use super::{RecordSchema, RecordSpec, SchemaError};

/// Resolves a record type name to its field metadata
pub trait MetadataResolver {
    fn resolve(&self, record: &str) -> Option<&RecordSchema>;
}

impl<T: MetadataResolver + ?Sized> MetadataResolver for &T {
    fn resolve(&self, record: &str) -> Option<&RecordSchema> {
        (**self).resolve(record)
    }
}

impl<T: MetadataResolver + ?Sized> MetadataResolver for Arc<T> {
    fn resolve(&self, record: &str) -> Option<&RecordSchema> {
        (**self).resolve(record)
    }
}

/// On-disk schema format
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    records: Vec<RecordSpec>,
}

/// Read-only mapping from record type name to schema
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    records: HashMap<String, RecordSchema>,
}

impl SchemaRegistry {
    pub fn new(schemas: impl IntoIterator<Item = RecordSchema>) -> Result<Self, SchemaError> {
        let mut records = HashMap::new();
        for schema in schemas {
            let name = schema.name().to_string();
            if records.contains_key(&name) {
                return Err(SchemaError::DuplicateRecord(name));
            }
            records.insert(name, schema);
        }
        tracing::debug!(records = records.len(), "Schema registry built");
        Ok(Self { records })
    }

    pub fn from_specs(specs: impl IntoIterator<Item = RecordSpec>) -> Result<Self, SchemaError> {
        let schemas = specs
            .into_iter()
            .map(RecordSpec::build)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(schemas)
    }

    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile = serde_json::from_str(json)?;
        Self::from_specs(file.records)
    }

    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        tracing::debug!(path = %path.display(), "Loading schema file");
        let content = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registered schemas sorted by record name
    pub fn records(&self) -> Vec<&RecordSchema> {
        let mut records: Vec<&RecordSchema> = self.records.values().collect();
        records.sort_by(|a, b| a.name().cmp(b.name()));
        records
    }
}

impl MetadataResolver for SchemaRegistry {
    fn resolve(&self, record: &str) -> Option<&RecordSchema> {
        self.records.get(record)
    }
}
