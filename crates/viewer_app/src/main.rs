use clap::Parser;
use viewer_app::Cli;

fn main() -> anyhow::Result<()> {
    viewer_app::platform::run_app(Cli::parse())
}
