//! End-to-end adapter tests against the in-memory catalog and a real cover directory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use catalog_seo_core::adapter::{CatalogServices, ObjectMetadataAdapter};
use catalog_seo_core::catalog::CatalogObject;
use catalog_seo_core::config::AppConfig;
use catalog_seo_core::cover::{CoverCache, CoverProvider, DirCoverCache};
use catalog_seo_core::memory::MemoryCatalog;
use catalog_seo_core::report::ObjectReport;
use catalog_seo_core::urls::BaseUrlResolver;
use pretty_assertions::assert_eq;

const FIXTURE: &str = r#"{
    "objects": [
        {
            "id": "42",
            "source_id": "42",
            "title": "Kongens Fald",
            "abstract": "Historisk roman",
            "year": "1901",
            "versions": [],
            "isbns": ["978-3-16-148410-0", "3161484100"]
        },
        {"id": "43", "source_id": "43", "title": "Kongens Fald (lydbog)", "year": "2010"}
    ],
    "collections": [{"id": "42", "members": ["42", "43"]}],
    "libraries": [{"nid": 5, "title": "A"}, {"nid": 7, "title": "B"}],
    "reservable": {"42": true, "43": false}
}"#;

struct Provider {
    available: bool,
    calls: AtomicUsize,
}

impl CoverProvider for Provider {
    fn name(&self) -> &str {
        "test"
    }

    fn check_availability(&self, _object: &CatalogObject) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.available
    }
}

fn services(covers: DirCoverCache, providers: Vec<Arc<dyn CoverProvider>>) -> CatalogServices {
    let catalog = Arc::new(MemoryCatalog::from_json(FIXTURE).unwrap());
    CatalogServices {
        repository: catalog.clone(),
        urls: Arc::new(BaseUrlResolver::new("https://bib.example.dk")),
        covers: Arc::new(covers),
        cover_providers: providers,
        availability: catalog.clone(),
        config: Arc::new(AppConfig::default()),
        libraries: catalog,
    }
}

#[test]
fn object_without_cover_anywhere_has_no_image() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(Provider {
        available: false,
        calls: AtomicUsize::new(0),
    });
    let services = services(
        DirCoverCache::new(dir.path(), "https://bib.example.dk/files/covers"),
        vec![provider.clone() as Arc<dyn CoverProvider>],
    );
    let adapter = ObjectMetadataAdapter::load(&services, "42").unwrap();
    assert_eq!(adapter.image_url(), None);
    assert_eq!(adapter.image_dimensions(), None);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn cached_cover_file_is_served_with_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let covers = DirCoverCache::new(dir.path(), "https://bib.example.dk/files/covers");
    let path = covers.image_path("42");
    image::RgbImage::new(20, 30).save(&path).unwrap();
    let expected_url = covers.public_url(&path);

    let provider = Arc::new(Provider {
        available: false,
        calls: AtomicUsize::new(0),
    });
    let services = services(covers, vec![provider.clone() as Arc<dyn CoverProvider>]);
    let adapter = ObjectMetadataAdapter::load(&services, "42").unwrap();
    assert_eq!(adapter.image_url(), Some(expected_url.as_str()));
    assert_eq!(adapter.image_dimensions(), Some((20, 30)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn negative_marker_hides_even_a_cached_file() {
    let dir = tempfile::tempdir().unwrap();
    let covers = DirCoverCache::new(dir.path(), "https://bib.example.dk/files/covers");
    covers.store("42", b"bytes").unwrap();
    covers.mark_negative("42").unwrap();
    let services = services(covers, Vec::new());
    let adapter = ObjectMetadataAdapter::load(&services, "42").unwrap();
    assert_eq!(adapter.image_url(), None);
}

#[test]
fn image_url_does_not_change_after_file_appears() {
    let dir = tempfile::tempdir().unwrap();
    let covers = DirCoverCache::new(dir.path(), "https://bib.example.dk/files/covers");
    let writer = covers.clone();
    let services = services(covers, Vec::new());
    let adapter = ObjectMetadataAdapter::load(&services, "42").unwrap();
    assert_eq!(adapter.image_url(), None);
    writer.store("42", b"bytes").unwrap();
    assert_eq!(adapter.image_url(), None);

    let fresh = ObjectMetadataAdapter::load(&services, "42").unwrap();
    assert!(fresh.image_url().is_some());
}

#[test]
fn isbn13_preferred_and_empty_edition_absent() {
    let dir = tempfile::tempdir().unwrap();
    let services = services(DirCoverCache::new(dir.path(), "http://localhost"), Vec::new());
    let adapter = ObjectMetadataAdapter::load(&services, "42").unwrap();
    assert_eq!(adapter.isbn(), Some("978-3-16-148410-0"));
    assert_eq!(adapter.book_edition(), None);
}

#[test]
fn lender_library_defaults_to_first_created_node() {
    let dir = tempfile::tempdir().unwrap();
    let services = services(DirCoverCache::new(dir.path(), "http://localhost"), Vec::new());
    let adapter = ObjectMetadataAdapter::load(&services, "42").unwrap();
    assert_eq!(
        adapter.lender_library_url().unwrap().as_deref(),
        Some("https://bib.example.dk/node/5")
    );
}

#[test]
fn configured_lender_library_from_app_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut services = services(DirCoverCache::new(dir.path(), "http://localhost"), Vec::new());
    let mut config = HashMap::new();
    config.insert("seo.lender_library".to_string(), "7".to_string());
    services.config = Arc::new(config);
    let adapter = ObjectMetadataAdapter::load(&services, "42").unwrap();
    assert_eq!(
        adapter.lender_library_url().unwrap().as_deref(),
        Some("https://bib.example.dk/node/7")
    );
}

#[test]
fn unknown_object_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let services = services(DirCoverCache::new(dir.path(), "http://localhost"), Vec::new());
    let err = ObjectMetadataAdapter::load(&services, "99").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn report_collects_object_and_work_examples() {
    let dir = tempfile::tempdir().unwrap();
    let services = services(
        DirCoverCache::new(dir.path(), "https://bib.example.dk/files/covers"),
        Vec::new(),
    );
    let adapter = ObjectMetadataAdapter::load(&services, "43").unwrap();
    let report = ObjectReport::collect(&adapter, true).unwrap();

    assert_eq!(report.object_url, "https://bib.example.dk/ting/object/43");
    assert_eq!(
        report.collection_url.as_deref(),
        Some("https://bib.example.dk/ting/collection/42")
    );
    assert_eq!(report.name.as_deref(), Some("Kongens Fald (lydbog)"));
    assert!(!report.has_borrow_action);
    let examples: Vec<(&str, bool)> = report
        .work_examples
        .iter()
        .map(|e| (e.id.as_str(), e.has_borrow_action))
        .collect();
    assert_eq!(examples, vec![("42", true), ("43", false)]);
    assert!(report.work_examples.iter().all(|e| e.work_examples.is_empty()));
}
