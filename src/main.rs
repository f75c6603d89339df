mod cli;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let args = cli::Cli::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    if let Err(e) = cli::execute(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
