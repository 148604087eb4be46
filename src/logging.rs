use env_logger::{Builder, Env};

/// Install the global logger. `RUST_LOG` wins over `level`, which comes from
/// the config file or `--verbose`. Logs go to stderr so they never mix with
/// command output.
pub fn init(level: &str) {
    let env = Env::default().default_filter_or(level);
    if let Err(e) = Builder::from_env(env).format_timestamp(None).try_init() {
        eprintln!("warning: logger already initialized: {}", e);
    }
}
