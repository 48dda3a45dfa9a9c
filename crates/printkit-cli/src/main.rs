use clap::Parser;
use printkit_cli::{CliArgs, run};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = CliArgs::parse();
    log::info!("Exporting {}", args.input.display());

    let written = run(&args)?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}
