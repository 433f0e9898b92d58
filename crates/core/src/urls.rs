//! Canonical URL resolution for catalog entities.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// An entity whose canonical URL can be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef<'a> {
    Object(&'a str),
    Collection(&'a str),
    Library(u64),
}

/// Maps entities to absolute canonical URLs.
pub trait UrlResolver: Send + Sync {
    fn resolve(&self, entity: EntityRef<'_>) -> String;
}

/// Resolver that appends fixed per-kind paths to a site base URL.
#[derive(Debug, Clone)]
pub struct BaseUrlResolver {
    base: String,
}

impl BaseUrlResolver {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }
}

impl UrlResolver for BaseUrlResolver {
    fn resolve(&self, entity: EntityRef<'_>) -> String {
        match entity {
            EntityRef::Object(id) => {
                format!("{}/ting/object/{}", self.base, encode_segment(id))
            }
            EntityRef::Collection(id) => {
                format!("{}/ting/collection/{}", self.base, encode_segment(id))
            }
            EntityRef::Library(nid) => format!("{}/node/{}", self.base, nid),
        }
    }
}

fn encode_segment(s: &str) -> String {
    utf8_percent_encode(s, SEGMENT).to_string()
}
