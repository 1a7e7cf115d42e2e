mod error;
mod token;
mod traits;

pub mod github;
pub mod memory;

pub use error::StorageError;
pub use token::VersionToken;
pub use traits::{AssetStore, ExistingAsset, PutContents, validate_path};
