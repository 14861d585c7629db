use clap::Parser;
use scaffoldgen::cli::{run_cli, Cli};
use scaffoldgen::config::RuntimeEnv;
use scaffoldgen::telemetry::init_logging;

fn main() -> anyhow::Result<()> {
    let env = RuntimeEnv::from_env();
    init_logging(env.log_format)?;
    let cli = Cli::parse();
    run_cli(cli)
}
