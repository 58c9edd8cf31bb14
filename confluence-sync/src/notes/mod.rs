//! Notes — markdown files with YAML front matter
//!
//! A note carries a stable `uniqueId` in its front matter; the identifier is
//! stripped again before the note body is published.

pub mod file_ops;
pub mod frontmatter;
pub mod identity;

pub use file_ops::Note;
