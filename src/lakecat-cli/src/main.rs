use clap::Parser;
use common_error::LakecatResult;
use lakecat_cli::Cli;

fn main() -> LakecatResult<()> {
    lakecat_cli::init_logging();
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(lakecat_cli::run(cli))
}
