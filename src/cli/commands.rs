use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "jot",
    about = concat!("jot v", env!("CARGO_PKG_VERSION"), " - a personal task list in a plain text file"),
    version
)]
pub struct Cli {
    /// Read settings from this file instead of ./jot.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use a different data file
    #[arg(long = "data-file", value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Run this one command line and exit, e.g. `jot todo read book`.
    /// Without it, commands are read from stdin until `bye`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "LINE")]
    pub line: Vec<String>,
}

impl Cli {
    /// The one-shot command line, if words were given
    pub fn one_shot(&self) -> Option<String> {
        if self.line.is_empty() {
            None
        } else {
            Some(self.line.join(" "))
        }
    }
}
