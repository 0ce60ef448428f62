pub mod fs;
pub mod traits;

pub use fs::FsBlobStore;
pub use traits::BlobStore;
