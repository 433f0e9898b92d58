/// Top-level error type. All fallible public API functions return this.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Provider {provider} returned error: {message}")]
    Provider { provider: String, message: String },

    #[error("Malformed catalog fixture: {0}")]
    Fixture(String),

    #[error("Malformed config {path}: {detail}")]
    Config { path: String, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub fn object_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Object,
            id: id.into(),
        }
    }

    pub fn collection_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Collection,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Fixture(e.to_string())
    }
}

/// Kind of catalog entity an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Object,
    Collection,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Object => "Catalog object",
            Self::Collection => "Work collection",
        };
        f.write_str(name)
    }
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
