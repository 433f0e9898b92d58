//! Serializable snapshot of every adapter getter, for inspection tools.

use serde::Serialize;

use crate::adapter::ObjectMetadataAdapter;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectReport {
    pub id: String,
    pub object_url: String,
    pub collection_url: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub book_edition: Option<String>,
    pub date_published: Option<String>,
    pub isbn: Option<String>,
    pub image_url: Option<String>,
    pub image_dimensions: Option<(u32, u32)>,
    pub has_borrow_action: bool,
    pub lender_library: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub work_examples: Vec<ObjectReport>,
}

impl ObjectReport {
    /// Collect every getter. Objects outside any collection get no
    /// collection URL; other failures propagate.
    pub fn collect(adapter: &ObjectMetadataAdapter<'_>, with_examples: bool) -> Result<Self> {
        let collection_url = match adapter.collection_url() {
            Ok(url) => Some(url),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };

        let work_examples = if with_examples && collection_url.is_some() {
            adapter
                .work_examples()?
                .iter()
                .map(|example| Self::collect(example, false))
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        Ok(Self {
            id: adapter.object().id.clone(),
            object_url: adapter.object_url(),
            collection_url,
            name: adapter.name().map(String::from),
            description: adapter.description().map(String::from),
            book_edition: adapter.book_edition().map(String::from),
            date_published: adapter.date_published().map(String::from),
            isbn: adapter.isbn().map(String::from),
            image_url: adapter.image_url().map(String::from),
            image_dimensions: adapter.image_dimensions(),
            has_borrow_action: adapter.has_borrow_action()?,
            lender_library: adapter.lender_library_url()?,
            work_examples,
        })
    }
}
