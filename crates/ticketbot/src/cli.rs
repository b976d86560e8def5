use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ticketbot")]
#[command(author, version, about = "Telegram bot for creating support tickets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (default)
    Run {
        /// Use webhook mode instead of long polling (requires WEBHOOK_URL)
        #[arg(long)]
        webhook: bool,

        /// Only accept link descriptions while a description is expected
        #[arg(long)]
        strict: bool,
    },

    /// Print the predefined ticket subjects and exit
    Subjects,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
