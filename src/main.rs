use clap::Parser;
use mlocate_explorer::cli::Cli;
use mlocate_explorer::driver;
use mlocate_explorer::sink::TracingSink;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let sink = TracingSink;
    if let Err(err) = driver::run(&cli, &sink) {
        eprintln!("mlex: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
