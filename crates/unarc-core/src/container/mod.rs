//! Container adapters: one module per archive format.
//!
//! Each adapter parses a complete in-memory archive into a `Vec` of
//! [`ArchiveEntry`](crate::entry::ArchiveEntry) in container order. All
//! format-specific classification (directory conventions, symlink
//! signaling, attribute encodings) happens here; the materializer only
//! sees the normalized entry model.

pub mod sevenz;
pub mod tar;
pub mod zip;
