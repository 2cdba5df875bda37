use tracing_subscriber::EnvFilter;

mod command;
mod util;

fn main() -> anyhow::Result<()> {
    // stdout carries JSON output, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    command::run()
}
