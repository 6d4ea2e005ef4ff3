use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use pointsboard::ledger::ChooseBy;

#[derive(Parser, Debug)]
#[command(name = "pointsboard")]
#[command(about = "Points leaderboard behind a chat slash command", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Server(ServerArgs),
    /// Create a topic in the configured store
    CreateTopic(CreateTopicArgs),
    /// Print a topic with its totals and activity log as JSON
    ShowTopic(ShowTopicArgs),
    /// List topics that are not hidden
    ListTopics,
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind the HTTP server to, overrides `server.bind_addr`
    #[arg(long)]
    pub address: Option<SocketAddr>,
}

#[derive(clap::Args, Debug)]
pub struct CreateTopicArgs {
    pub name: String,
    /// Leave the topic out of `list`
    #[arg(long)]
    pub hidden: bool,
    /// Refuse negative awards
    #[arg(long)]
    pub no_remove: bool,
    /// Which end of the ranking `chooseNext` picks from
    #[arg(long, default_value = "min")]
    pub choose_by: ChooseBy,
    /// Channel id allowed to award points; repeat for several
    #[arg(long = "channel")]
    pub channels: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowTopicArgs {
    pub name: String,
}
