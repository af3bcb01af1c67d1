//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "unarc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print one line per processed entry
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decompress an XZ stream
    Xz(StreamArgs),
    /// Decompress a raw LZMA stream
    Lzma(StreamArgs),
    /// Decompress a BZip2 stream
    Bz2(StreamArgs),
    /// Decompress a GZip stream
    #[command(name = "gz-d")]
    GzD(StreamArgs),
    /// Extract or inspect a ZIP archive
    Zip(ContainerArgs),
    /// Extract or inspect a TAR archive, optionally compressed
    Tar(TarArgs),
    /// Extract or inspect a gzipped TAR archive
    Tgz(ContainerArgs),
    /// Extract or inspect an xz-compressed TAR archive
    Txz(ContainerArgs),
    /// Extract or inspect a bzip2-compressed TAR archive
    Tbz2(ContainerArgs),
    /// Extract or inspect a 7-Zip archive
    #[command(name = "7z")]
    SevenZ(ContainerArgs),
}

#[derive(clap::Args)]
pub struct StreamArgs {
    /// Path to the compressed file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file path (default: input path with the compression
    /// extension removed)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ContainerArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// List archive contents without extracting
    #[arg(short, long, conflicts_with = "extract")]
    pub info: bool,

    /// Extract into the given directory (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub extract: Option<PathBuf>,

    /// Do not restore archived modification times
    #[arg(long)]
    pub no_restore_mtime: bool,
}

#[derive(clap::Args)]
pub struct TarArgs {
    #[command(flatten)]
    pub container: ContainerArgs,

    /// Decompress with GZip before reading the TAR container
    #[arg(short = 'z', long = "gz", conflicts_with_all = ["bz2", "xz"])]
    pub gz: bool,

    /// Decompress with BZip2 before reading the TAR container
    #[arg(short = 'j', long = "bz2", conflicts_with = "xz")]
    pub bz2: bool,

    /// Decompress with XZ before reading the TAR container
    #[arg(short = 'x', long = "xz")]
    pub xz: bool,
}
