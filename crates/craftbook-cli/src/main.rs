use anyhow::Result;
use clap::Parser;
use craftbook_cli::{CliArgs, logging, run};

fn main() -> Result<()> {
    logging::init_logging()?;

    let args = CliArgs::parse();
    let stdout = std::io::stdout();
    run(args, &mut stdout.lock())
}
