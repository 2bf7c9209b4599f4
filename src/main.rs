use clap::Parser;
use jot::cli::commands::Cli;
use jot::cli::handlers;

fn main() {
    // Library diagnostics go to stderr; JOT_LOG=debug turns them up.
    let level = std::env::var("JOT_LOG").unwrap_or_else(|_| "warn".to_string());
    let _logger = flexi_logger::Logger::try_with_str(&level)
        .and_then(|l| l.log_to_stderr().start())
        .ok();

    let cli = Cli::parse();
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
