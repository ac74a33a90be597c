//! Archive format implementations.

pub mod detect;
pub mod nested;
pub mod tar;
pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use detect::ArchiveKind;
pub use nested::NestedTarArchive;
pub use tar::TarGzArchive;
pub use traits::ArchiveSource;
pub use zip::ZipArchive;
