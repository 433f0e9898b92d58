//! Catalog data model and the repository contracts the adapter reads through.
//!
//! The catalog itself (objects, collections, library nodes) is owned by the
//! host system. This module only defines the shapes the adapter sees and the
//! traits a host implements to hand them over.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single library item record (book, film, audio book, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogObject {
    /// Catalog-wide object id (e.g. "870970-basis:29372361").
    pub id: String,
    /// Local id understood by the reservation provider.
    pub source_id: String,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub year: Option<String>,
    /// Edition statements, most relevant first.
    #[serde(default)]
    pub versions: Vec<String>,
    /// ISBNs as catalogued (may contain hyphens or spaces).
    #[serde(default)]
    pub isbns: Vec<String>,
}

/// One member of a work collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionEntity {
    pub local_id: String,
    pub object: CatalogObject,
}

impl CollectionEntity {
    pub fn new(object: CatalogObject) -> Self {
        Self {
            local_id: object.source_id.clone(),
            object,
        }
    }
}

/// Alternate editions/formats of one work, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCollection {
    pub id: String,
    pub entities: Vec<CollectionEntity>,
}

impl WorkCollection {
    pub fn local_ids(&self) -> Vec<String> {
        self.entities.iter().map(|e| e.local_id.clone()).collect()
    }
}

/// A library (branch) node that can be presented as the lending organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryNode {
    pub nid: u64,
    pub title: String,
}

/// Read access to catalog objects and their work collections.
pub trait ObjectRepository: Send + Sync {
    /// Load a single object. Fails with `NotFound` for unknown ids.
    fn object(&self, id: &str) -> Result<CatalogObject>;

    /// Load the work collection that contains the given object.
    fn collection(&self, object_id: &str) -> Result<WorkCollection>;
}

/// Source of library nodes for the lender-library fallback.
pub trait LibraryDirectory: Send + Sync {
    /// All library nodes, oldest first.
    fn library_nodes(&self) -> Result<Vec<LibraryNode>>;
}
