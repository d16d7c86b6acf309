use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod alias;
pub mod channel;
pub mod register;
pub mod serve;

use crate::client::{ApiVariant, ChannelSubscriptionClient, ParseMode};
use crate::core::ClientConfig;
use crate::core::logging::init_tracing;
use alias::AliasAction;
use channel::ChannelAction;

#[derive(Subcommand)]
enum Command {
    /// Send the registration identifier to the server
    Register {},
    /// Manage the aliases this device is subscribed to
    Alias {
        #[command(subcommand)]
        action: AliasAction,
    },
    /// Read or post channel messages
    Channel {
        #[command(subcommand)]
        action: ChannelAction,
    },
    /// Run the in-memory reference backend
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Server root, overrides KISSPUSH_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Wire variant, overrides KISSPUSH_API_VARIANT
    #[arg(long, value_enum, global = true)]
    variant: Option<ApiVariant>,

    /// Registration identifier, overrides KISSPUSH_REG_ID
    #[arg(long, global = true)]
    reg_id: Option<String>,

    /// Drop malformed responses instead of failing
    #[arg(long, action, global = true, default_value = "false")]
    lenient: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    fn config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_env()?;
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if let Some(reg_id) = &self.reg_id {
            config.registration_id = reg_id.clone();
        }
        if self.lenient {
            config.parse_mode = ParseMode::Lenient;
        }
        Ok(config)
    }
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    let Some(command) = args.command.as_ref() else {
        return Ok(());
    };

    if let Command::Serve { host, port } = command {
        return serve::run(host, *port).await;
    }

    let client = ChannelSubscriptionClient::from_config(&args.config()?)?;

    // Handle each sub command
    match command {
        Command::Register {} => register::run(&client).await?,
        Command::Alias { action } => alias::run(&client, action).await?,
        Command::Channel { action } => channel::run(&client, action).await?,
        Command::Serve { .. } => {}
    }

    Ok(())
}
