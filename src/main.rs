use clap::Parser;
use jot::cli::commands::Cli;
use jot::cli::handlers;
use jot::io::config_io;

fn main() {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let config = match config_io::resolve_config(cli.config.as_deref(), &cwd) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let level = if cli.verbose { "debug" } else { config.log.level.as_str() };
    jot::logging::init(level);

    match handlers::dispatch(&cli, &config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
