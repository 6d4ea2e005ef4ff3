mod cli;

use clap::Parser;
use cli::{Cli, Commands, CreateTopicArgs};
use pointsboard::api;
use pointsboard::config::Config;
use pointsboard::ledger::{Ledger, NewTopic, TopicField};
use pointsboard::observability;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    observability::init_tracing(&config.telemetry);

    match cli.command {
        Commands::Server(args) => {
            if let Some(address) = args.address {
                config.server.bind_addr = address;
            }
            api::run(config).await?
        }
        Commands::CreateTopic(args) => {
            let ledger = Ledger::open(&config.storage)?;
            create_topic(&ledger, args).await?
        }
        Commands::ShowTopic(args) => {
            let ledger = Ledger::open(&config.storage)?;
            match ledger.get_topic(&args.name, &TopicField::ALL).await? {
                Some(view) => println!("{}", serde_json::to_string_pretty(&view)?),
                None => return Err(format!("topic {} not found", args.name).into()),
            }
        }
        Commands::ListTopics => {
            let ledger = Ledger::open(&config.storage)?;
            for name in ledger.list_visible_topics().await? {
                println!("{name}");
            }
        }
    }

    Ok(())
}

async fn create_topic(ledger: &Ledger, args: CreateTopicArgs) -> Result<(), AnyError> {
    let topic = NewTopic::builder()
        .name(args.name.clone())
        .list_hidden(args.hidden)
        .allow_points_remove(!args.no_remove)
        .choose_by(args.choose_by)
        .allowed_channels(args.channels.into_iter().collect())
        .build();

    ledger.create_topic(topic).await?;
    println!("created {}", args.name);
    Ok(())
}
