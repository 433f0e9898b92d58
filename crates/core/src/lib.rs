pub mod adapter;
pub mod availability;
pub mod catalog;
pub mod config;
pub mod cover;
pub mod error;
pub mod isbn;
pub mod memory;
pub mod report;
pub mod urls;

pub mod prelude {
    pub use crate::adapter::{CatalogServices, ObjectMetadataAdapter};
    pub use crate::catalog::*;
    pub use crate::error::*;
}
