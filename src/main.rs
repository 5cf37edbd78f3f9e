use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = panomark::Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = panomark::run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(directives: &str) {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
