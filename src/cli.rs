use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vidrelay")]
#[command(author, version, about = "Telegram bot that downloads videos as MP4 and sends them back", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Check that yt-dlp and ffmpeg are available
    Check,

    /// Download a single URL locally without Telegram
    Download {
        /// Video URL
        url: String,

        /// Directory to save the file into (default: current directory)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
