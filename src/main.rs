mod chat;
mod cli;
mod color;
mod completion;
mod config;
mod utils;
mod version;

use std::path::PathBuf;

use clap::Parser;
use cli::chat::chat_cmd;
use color::{ColorMode, RequestedColorMode};

#[derive(Parser)]
#[command(name = "chatline")]
#[command(
    about = "An interactive CLI for local chat-completion endpoints",
    version
)]
struct Cli {
    #[arg(long, default_value_t = RequestedColorMode::default())]
    color: RequestedColorMode,
    #[command(flatten)]
    chat: ChatArgs,
}

#[derive(clap::Args, Default)]
pub(crate) struct ChatArgs {
    /// Ask the model to answer in no more than N words (0 for no limit)
    #[arg(
        short = 'w',
        long = "max-words",
        value_name = "N",
        allow_hyphen_values = true,
        overrides_with = "no_limit"
    )]
    max_words: Option<String>,
    /// Remove the word limit
    #[arg(long, overrides_with = "max_words")]
    no_limit: bool,
    /// The model name sent with each request
    #[arg(short, long)]
    model: Option<String>,
    /// The role of your messages: user, assistant, system or tool
    #[arg(short, long)]
    role: Option<String>,
    /// The system prompt sent ahead of each message
    #[arg(short, long)]
    system_prompt: Option<String>,
    /// The chat completions endpoint
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
    /// Read settings from this file instead of searching for config.ini
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Send a single message, print the reply, and exit
    prompt: Option<String>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    ColorMode::from_env(cli.color).install();

    chat_cmd(&cli.chat).await;
}
