//! unarc - command-line archive extraction and inspection.

mod cli;
mod commands;
mod output;

use std::process;

use anyhow::Result;
use clap::Parser;
use console::Term;
use console::style;
use unarc_core::Codec;

use commands::container::ContainerFormat;

fn main() {
    let cli = cli::Cli::parse();

    if let Err(err) = run(&cli) {
        let term = Term::stderr();
        let _ = term.write_line(&format!("{} {err:#}", style("ERROR:").red().bold()));
        process::exit(1);
    }
}

fn run(cli: &cli::Cli) -> Result<()> {
    match &cli.command {
        cli::Commands::Xz(args) => commands::stream::execute(args, Codec::Xz),
        cli::Commands::Lzma(args) => commands::stream::execute(args, Codec::Lzma),
        cli::Commands::Bz2(args) => commands::stream::execute(args, Codec::Bzip2),
        cli::Commands::GzD(args) => commands::stream::execute(args, Codec::Gzip),
        cli::Commands::Zip(args) => {
            commands::container::execute(args, ContainerFormat::Zip, cli.verbose)
        }
        cli::Commands::Tar(args) => commands::container::execute(
            &args.container,
            ContainerFormat::from_tar_args(args),
            cli.verbose,
        ),
        cli::Commands::Tgz(args) => commands::container::execute(
            args,
            ContainerFormat::Tar {
                codec: Some(Codec::Gzip),
            },
            cli.verbose,
        ),
        cli::Commands::Txz(args) => commands::container::execute(
            args,
            ContainerFormat::Tar {
                codec: Some(Codec::Xz),
            },
            cli.verbose,
        ),
        cli::Commands::Tbz2(args) => commands::container::execute(
            args,
            ContainerFormat::Tar {
                codec: Some(Codec::Bzip2),
            },
            cli.verbose,
        ),
        cli::Commands::SevenZ(args) => {
            commands::container::execute(args, ContainerFormat::SevenZ, cli.verbose)
        }
    }
}
