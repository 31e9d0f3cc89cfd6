pub mod config;
pub mod error;
pub mod types;

pub use config::OverlaySettings;
pub use error::{OverlayError, Result};
pub use types::{EntityAddress, EntityCategory, MetadataPath};
