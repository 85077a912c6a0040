//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "workout-timer")]
#[command(about = "An interval workout countdown timer with audio cues")]
#[command(version)]
pub struct Config {
    /// Port to bind the control panel to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Countdown minutes
    #[arg(short, long, default_value = "15")]
    pub minutes: u64,

    /// Countdown seconds, added to the minutes
    #[arg(short, long, default_value = "0")]
    pub seconds: u64,

    /// Run without audio cues
    #[arg(long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Initial countdown length; zero (or overflow) leaves the default in place
    pub fn duration_seconds(&self) -> u64 {
        self.minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(self.seconds))
            .unwrap_or(0)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
