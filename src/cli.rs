use clap::{Parser, Subcommand};

/// Job posting service
#[derive(Parser, Debug)]
#[command(name = "job-board", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Apply migrations and start the HTTP server (default)
    #[default]
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}
