//! Structured-data adapter over one catalog object.
//!
//! An `ObjectMetadataAdapter` is built per request for a single object and
//! answers the questions a schema.org renderer asks: URLs, cover image,
//! ISBN, edition, borrowability, work examples, lender library. Each getter
//! projects from the collaborators in `CatalogServices`. The cover URL and
//! the borrow flag are computed at most once per adapter and never reset.

use std::cell::OnceCell;
use std::sync::Arc;

use crate::availability::{reservable, AvailabilityProvider};
use crate::catalog::{CatalogObject, LibraryDirectory, ObjectRepository};
use crate::config::{ConfigStore, LENDER_LIBRARY_KEY};
use crate::cover::{read_dimensions, CoverCache, CoverProvider};
use crate::error::Result;
use crate::isbn;
use crate::urls::{EntityRef, UrlResolver};

/// The collaborators an adapter reads through. Built once per host and
/// shared by every adapter of a request.
#[derive(Clone)]
pub struct CatalogServices {
    pub repository: Arc<dyn ObjectRepository>,
    pub urls: Arc<dyn UrlResolver>,
    pub covers: Arc<dyn CoverCache>,
    pub cover_providers: Vec<Arc<dyn CoverProvider>>,
    pub availability: Arc<dyn AvailabilityProvider>,
    pub config: Arc<dyn ConfigStore>,
    pub libraries: Arc<dyn LibraryDirectory>,
}

pub struct ObjectMetadataAdapter<'s> {
    services: &'s CatalogServices,
    object: CatalogObject,
    image_url: OnceCell<Option<String>>,
    has_borrow_action: OnceCell<bool>,
}

impl<'s> ObjectMetadataAdapter<'s> {
    pub fn new(services: &'s CatalogServices, object: CatalogObject) -> Self {
        Self::with_borrow_action(services, object, None)
    }

    /// Build with an already known borrow flag (e.g. from a batch lookup).
    pub fn with_borrow_action(
        services: &'s CatalogServices,
        object: CatalogObject,
        has_borrow_action: Option<bool>,
    ) -> Self {
        let cell = OnceCell::new();
        if let Some(flag) = has_borrow_action {
            let _ = cell.set(flag);
        }
        Self {
            services,
            object,
            image_url: OnceCell::new(),
            has_borrow_action: cell,
        }
    }

    /// Load the object from the repository and wrap it.
    pub fn load(services: &'s CatalogServices, object_id: &str) -> Result<Self> {
        let object = services.repository.object(object_id)?;
        Ok(Self::new(services, object))
    }

    pub fn object(&self) -> &CatalogObject {
        &self.object
    }

    pub fn collection_url(&self) -> Result<String> {
        let collection = self.services.repository.collection(&self.object.id)?;
        Ok(self.services.urls.resolve(EntityRef::Collection(&collection.id)))
    }

    pub fn object_url(&self) -> String {
        self.services.urls.resolve(EntityRef::Object(&self.object.id))
    }

    /// Public URL of the cover, if one is already materialized or a
    /// provider reports one. Never starts a download.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url
            .get_or_init(|| self.lookup_image_url())
            .as_deref()
    }

    fn lookup_image_url(&self) -> Option<String> {
        let covers = &self.services.covers;
        let id = &self.object.id;

        if covers.has_negative_marker(id) {
            tracing::debug!("Cover for {} is a known negative", id);
            return None;
        }

        let path = covers.image_path(id);
        if path.is_file() {
            return Some(covers.public_url(&path));
        }

        // Every provider is asked; one positive answer is enough.
        let mut available = false;
        for provider in &self.services.cover_providers {
            let hit = provider.check_availability(&self.object);
            tracing::debug!("Cover provider {} for {}: {}", provider.name(), id, hit);
            available |= hit;
        }
        available.then(|| covers.public_url(&path))
    }

    /// Width and height of the cached cover file. File-local only.
    pub fn image_dimensions(&self) -> Option<(u32, u32)> {
        let path = self.services.covers.image_path(&self.object.id);
        read_dimensions(&path)
    }

    /// One adapter per member of the object's work collection.
    pub fn work_examples(&self) -> Result<Vec<ObjectMetadataAdapter<'s>>> {
        let services = self.services;
        self.work_examples_with(|object, flag| {
            ObjectMetadataAdapter::with_borrow_action(services, object, Some(flag))
        })
    }

    /// Like [`work_examples`](Self::work_examples), building each sibling
    /// through `factory`. Reservability is fetched for all members in a
    /// single provider call and handed to the factory.
    pub fn work_examples_with<W, F>(&self, mut factory: F) -> Result<Vec<W>>
    where
        F: FnMut(CatalogObject, bool) -> W,
    {
        let collection = self.services.repository.collection(&self.object.id)?;
        let local_ids = collection.local_ids();
        tracing::debug!(
            "Checking reservability of {} work examples of {}",
            local_ids.len(),
            self.object.id
        );
        let reservability = self.services.availability.is_reservable(&local_ids)?;

        Ok(collection
            .entities
            .into_iter()
            .map(|entity| {
                let flag = reservable(&reservability, &entity.local_id);
                factory(entity.object, flag)
            })
            .collect())
    }

    pub fn name(&self) -> Option<&str> {
        self.object.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.object.abstract_text.as_deref()
    }

    pub fn book_edition(&self) -> Option<&str> {
        self.object.versions.first().map(String::as_str)
    }

    pub fn date_published(&self) -> Option<&str> {
        self.object.year.as_deref()
    }

    /// Preferred ISBN: first ISBN-13, else first listed.
    pub fn isbn(&self) -> Option<&str> {
        isbn::select_preferred(&self.object.isbns)
    }

    pub fn has_borrow_action(&self) -> Result<bool> {
        if let Some(flag) = self.has_borrow_action.get() {
            return Ok(*flag);
        }
        let local_id = self.object.source_id.clone();
        let map = self
            .services
            .availability
            .is_reservable(std::slice::from_ref(&local_id))?;
        let flag = reservable(&map, &local_id);
        Ok(*self.has_borrow_action.get_or_init(|| flag))
    }

    /// URL of the library presented as lender.
    ///
    /// Without a configured library the first created library node is used.
    /// That guess is right for single-library sites but may pick the wrong
    /// branch elsewhere.
    pub fn lender_library_url(&self) -> Result<Option<String>> {
        let configured = match self.services.config.get(LENDER_LIBRARY_KEY) {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(nid) => Some(nid),
                Err(_) => {
                    tracing::warn!("Ignoring non-numeric {}: {:?}", LENDER_LIBRARY_KEY, value);
                    None
                }
            },
            None => None,
        };

        let nid = match configured {
            Some(nid) => nid,
            None => match self.services.libraries.library_nodes()?.first() {
                Some(node) => {
                    tracing::debug!("No lender library configured, using first library {}", node.nid);
                    node.nid
                }
                None => return Ok(None),
            },
        };

        Ok(Some(self.services.urls.resolve(EntityRef::Library(nid))))
    }
}

impl std::fmt::Debug for ObjectMetadataAdapter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectMetadataAdapter")
            .field("object", &self.object.id)
            .field("image_url", &self.image_url.get())
            .field("has_borrow_action", &self.has_borrow_action.get())
            .finish()
    }
}
