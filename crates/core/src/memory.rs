//! In-memory catalog backed by a JSON fixture.
//!
//! Serves as object repository, library directory, and reservation provider
//! at once. Useful for the CLI and for hosts that snapshot their catalog.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::availability::{AvailabilityProvider, Reservability};
use crate::catalog::{
    CatalogObject, CollectionEntity, LibraryDirectory, LibraryNode, ObjectRepository,
    WorkCollection,
};
use crate::error::{CatalogError, Result};

/// On-disk fixture shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub objects: Vec<CatalogObject>,
    #[serde(default)]
    pub collections: Vec<CollectionRecord>,
    /// Library nodes in creation order.
    #[serde(default)]
    pub libraries: Vec<LibraryNode>,
    /// Reservability keyed by local id.
    #[serde(default)]
    pub reservable: HashMap<String, bool>,
}

/// A collection as stored in a fixture: member object ids in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub id: String,
    pub members: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    objects: HashMap<String, CatalogObject>,
    collections: Vec<CollectionRecord>,
    libraries: Vec<LibraryNode>,
    reservable: HashMap<String, bool>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: CatalogFixture) -> Result<Self> {
        let mut catalog = Self::new();
        for object in fixture.objects {
            catalog.insert_object(object);
        }
        for record in fixture.collections {
            if let Some(missing) = record.members.iter().find(|m| !catalog.objects.contains_key(*m)) {
                return Err(CatalogError::Fixture(format!(
                    "collection {} references unknown object {}",
                    record.id, missing
                )));
            }
            catalog.collections.push(record);
        }
        catalog.libraries = fixture.libraries;
        catalog.reservable = fixture.reservable;
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: CatalogFixture = serde_json::from_str(json)?;
        Self::from_fixture(fixture)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn insert_object(&mut self, object: CatalogObject) {
        self.objects.insert(object.id.clone(), object);
    }

    /// Add a collection. Member ids must refer to inserted objects.
    pub fn insert_collection(&mut self, id: impl Into<String>, members: Vec<String>) {
        self.collections.push(CollectionRecord {
            id: id.into(),
            members,
        });
    }

    /// Append a library node; later calls count as created later.
    pub fn push_library(&mut self, nid: u64, title: impl Into<String>) {
        self.libraries.push(LibraryNode {
            nid,
            title: title.into(),
        });
    }
}

impl ObjectRepository for MemoryCatalog {
    fn object(&self, id: &str) -> Result<CatalogObject> {
        self.objects
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::object_not_found(id))
    }

    fn collection(&self, object_id: &str) -> Result<WorkCollection> {
        let record = self
            .collections
            .iter()
            .find(|c| c.members.iter().any(|m| m == object_id))
            .ok_or_else(|| CatalogError::collection_not_found(object_id))?;
        let entities = record
            .members
            .iter()
            .map(|id| self.object(id).map(CollectionEntity::new))
            .collect::<Result<Vec<_>>>()?;
        Ok(WorkCollection {
            id: record.id.clone(),
            entities,
        })
    }
}

impl LibraryDirectory for MemoryCatalog {
    fn library_nodes(&self) -> Result<Vec<LibraryNode>> {
        Ok(self.libraries.clone())
    }
}

impl AvailabilityProvider for MemoryCatalog {
    fn name(&self) -> &str {
        "memory"
    }

    fn is_reservable(&self, local_ids: &[String]) -> Result<Reservability> {
        Ok(local_ids
            .iter()
            .map(|id| (id.clone(), self.reservable.get(id).copied().unwrap_or(false)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "objects": [
            {"id": "obj:1", "source_id": "1", "title": "Book"},
            {"id": "obj:2", "source_id": "2", "title": "Audio book"}
        ],
        "collections": [{"id": "obj:1", "members": ["obj:1", "obj:2"]}],
        "libraries": [{"nid": 5, "title": "A"}, {"nid": 7, "title": "B"}],
        "reservable": {"1": true}
    }"#;

    #[test]
    fn loads_fixture_and_resolves_collection_from_any_member() {
        let catalog = MemoryCatalog::from_json(FIXTURE).unwrap();
        let c = catalog.collection("obj:2").unwrap();
        assert_eq!(c.id, "obj:1");
        assert_eq!(c.local_ids(), vec!["1".to_string(), "2".to_string()]);
        assert_eq!(catalog.object("obj:2").unwrap().title.as_deref(), Some("Audio book"));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let catalog = MemoryCatalog::from_json(FIXTURE).unwrap();
        assert!(catalog.object("obj:9").unwrap_err().is_not_found());
        assert!(catalog.collection("obj:9").unwrap_err().is_not_found());
    }

    #[test]
    fn fixture_with_dangling_member_is_rejected() {
        let json = r#"{"collections": [{"id": "c", "members": ["nope"]}]}"#;
        let err = MemoryCatalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::Fixture(_)));
    }

    #[test]
    fn reservability_covers_every_requested_id() {
        let catalog = MemoryCatalog::from_json(FIXTURE).unwrap();
        let ids = vec!["1".to_string(), "2".to_string()];
        let map = catalog.is_reservable(&ids).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["1"], true);
        assert_eq!(map["2"], false);
    }

    #[test]
    fn libraries_keep_creation_order() {
        let mut catalog = MemoryCatalog::new();
        catalog.push_library(9, "Later id, created first");
        catalog.push_library(3, "Created second");
        let nodes = catalog.library_nodes().unwrap();
        assert_eq!(nodes[0].nid, 9);
        assert_eq!(nodes[1].nid, 3);
    }
}
