pub mod format;
pub mod image_io;

pub use format::{FileCompression, ImageFileType};
