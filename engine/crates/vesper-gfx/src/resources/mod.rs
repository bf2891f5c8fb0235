pub mod buffer;
pub mod format;
pub mod texture;
