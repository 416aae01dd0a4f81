pub mod format;
pub mod storage;

pub use format::ImageFormat;
pub use storage::{ImageStorage, LocalImageStorage, StorageError};
