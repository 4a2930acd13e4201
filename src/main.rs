//! CLI entry point for the photo mosaic builder

use clap::Parser;
use mosaictile::io::cli::{Cli, CommandRunner};
use mosaictile::io::logging;

fn main() -> mosaictile::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    CommandRunner::new(cli).run()
}
