//! Container commands: extraction and listing for ZIP, TAR, and 7z.

use std::env;
use std::fs;

use anyhow::Context;
use anyhow::Result;
use console::Term;
use unarc_core::Codec;
use unarc_core::DestDir;
use unarc_core::ExtractOptions;
use unarc_core::container;
use unarc_core::materialize;
use unarc_core::render_listing;

use crate::cli::ContainerArgs;
use crate::cli::TarArgs;
use crate::output::ConsoleSink;
use crate::output::print_summary;

/// Which container parser to run, with an optional decompression pass in
/// front of it.
#[derive(Debug, Clone, Copy)]
pub enum ContainerFormat {
    Zip,
    Tar { codec: Option<Codec> },
    SevenZ,
}

impl ContainerFormat {
    /// Resolves the `tar` subcommand's compression flags into a format.
    pub fn from_tar_args(args: &TarArgs) -> Self {
        let codec = if args.gz {
            Some(Codec::Gzip)
        } else if args.bz2 {
            Some(Codec::Bzip2)
        } else if args.xz {
            Some(Codec::Xz)
        } else {
            None
        };
        Self::Tar { codec }
    }
}

pub fn execute(args: &ContainerArgs, format: ContainerFormat, verbose: bool) -> Result<()> {
    // Destination problems surface before any parsing work happens.
    let dest = if args.info {
        None
    } else {
        let dest_path = match &args.extract {
            Some(dir) => dir.clone(),
            None => env::current_dir().context("failed to get current directory")?,
        };
        Some(DestDir::ensure(dest_path, true)?)
    };

    let raw = fs::read(&args.archive)
        .with_context(|| format!("failed to read {}", args.archive.display()))?;

    let entries = match format {
        ContainerFormat::Zip => container::zip::open(&raw)?,
        ContainerFormat::SevenZ => container::sevenz::open(&raw)?,
        ContainerFormat::Tar { codec } => {
            let data = match codec {
                Some(codec) => codec.decompress(&raw)?,
                None => raw,
            };
            container::tar::open(&data)?
        }
    };

    let Some(dest) = dest else {
        let term = Term::stdout();
        for line in render_listing(&entries) {
            let _ = term.write_line(&line);
        }
        return Ok(());
    };

    let options = ExtractOptions {
        restore_mtimes: !args.no_restore_mtime,
        verbose,
    };
    let mut sink = ConsoleSink::new();
    let summary = materialize(&entries, &dest, &options, &mut sink)?;
    if verbose {
        print_summary(&summary);
    }

    Ok(())
}
