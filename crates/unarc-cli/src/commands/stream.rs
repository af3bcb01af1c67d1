//! Single-stream decompression commands (xz, lzma, bz2, gz-d).

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use unarc_core::Codec;

use crate::cli::StreamArgs;

pub fn execute(args: &StreamArgs, codec: Codec) -> Result<()> {
    let output = match &args.output {
        Some(path) => path.clone(),
        None => default_output_path(&args.input, codec)?,
    };

    let data = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let decompressed = codec.decompress(&data)?;
    fs::write(&output, decompressed)
        .with_context(|| format!("failed to write {}", output.display()))?;

    Ok(())
}

/// Derives the output path by stripping the codec's extension from the
/// input name. An input without that extension needs an explicit OUTPUT.
fn default_output_path(input: &Path, codec: Codec) -> Result<PathBuf> {
    if input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(codec.extension()))
    {
        return Ok(input.with_extension(""));
    }
    bail!(
        "cannot deduce output path for {} (expected a .{} extension); specify OUTPUT",
        input.display(),
        codec.extension()
    )
}
