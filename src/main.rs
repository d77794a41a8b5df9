use clap::Parser;
use pcbpost::cli::Cli;
use pcbpost::{commands, init_logging, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;
    tracing::debug!("pcbpost {} (built {})", VERSION, BUILD_DATE);

    let output = commands::execute(&cli.command)?;
    println!("{}", output.render(cli.json)?.trim_end());

    Ok(())
}
