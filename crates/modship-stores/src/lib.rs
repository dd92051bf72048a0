//! modship stores - Modrinth and CurseForge publishers
//!
//! Each publisher uploads every cell of the effective matrix to one platform,
//! translating the platform-neutral descriptors into that platform's schema.

pub mod curseforge;
pub mod error;
pub mod modrinth;
pub mod registry;
pub mod traits;
pub mod types;

pub use curseforge::CurseForgePublisher;
pub use error::{Result, StoreError};
pub use modrinth::ModrinthPublisher;
pub use registry::PublisherRegistry;
pub use traits::Publisher;
pub use types::{Platform, PublishContext, PublishReport, UploadRecord};
