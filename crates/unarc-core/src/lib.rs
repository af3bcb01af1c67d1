//! Archive extraction and inspection library.
//!
//! `unarc-core` parses archive containers (TAR, ZIP, 7z) into a normalized
//! entry model and materializes those entries as a filesystem tree:
//! directories first-class and idempotent, directory attributes deferred
//! until every descendant exists, symbolic links never receiving attribute
//! writes, and path-escaping entries rejected. Single-stream formats
//! (gzip, bzip2, xz, lzma) are handled by the codec layer.
//!
//! # Examples
//!
//! ```no_run
//! use unarc_core::DestDir;
//! use unarc_core::ExtractOptions;
//! use unarc_core::NoopSink;
//! use unarc_core::container;
//! use unarc_core::materialize;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("archive.tar")?;
//! let entries = container::tar::open(&data)?;
//! let dest = DestDir::ensure("output", true)?;
//! let summary = materialize(&entries, &dest, &ExtractOptions::default(), &mut NoopSink)?;
//! println!("extracted {} files", summary.files);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod attrs;
pub mod codec;
pub mod config;
pub mod container;
pub mod dest;
pub mod entry;
pub mod error;
pub mod materialize;
pub mod test_utils;

pub use attrs::PlatformCaps;
pub use attrs::apply_attributes;
pub use codec::Codec;
pub use config::ExtractOptions;
pub use dest::DestDir;
pub use entry::ArchiveEntry;
pub use entry::EntryAttributes;
pub use entry::EntryKind;
pub use error::ExtractError;
pub use error::Result;
pub use materialize::LEGEND;
pub use materialize::NoopSink;
pub use materialize::ProgressSink;
pub use materialize::Summary;
pub use materialize::materialize;
pub use materialize::render_listing;
pub use materialize::resolve_entry_path;
