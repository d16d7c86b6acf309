use anyhow::Result;
use clap::Subcommand;

use crate::client::{ChannelSubscriptionClient, PostOptions};

#[derive(Subcommand)]
pub enum ChannelAction {
    /// Print the messages posted to a channel
    List { channel: String },
    /// Post a message to everyone subscribed to a channel
    Post {
        channel: String,
        message: String,
        /// Replace undelivered messages carrying the same key
        #[arg(long)]
        collapse_key: Option<String>,
        /// Deliver even if the device is idle
        #[arg(long, action, default_value = "false")]
        no_delay: bool,
    },
}

pub async fn run(client: &ChannelSubscriptionClient, action: &ChannelAction) -> Result<()> {
    match action {
        ChannelAction::List { channel } => {
            for message in client.list_channel(channel).await?.unwrap_or_default() {
                println!("{}", message);
            }
        }
        ChannelAction::Post {
            channel,
            message,
            collapse_key,
            no_delay,
        } => {
            let options = PostOptions {
                collapse_key: collapse_key.clone(),
                delay_while_idle: !no_delay,
            };
            if let Some(posted) = client.post_message(channel, message, &options).await? {
                println!(
                    "Message {} queued for {} clients",
                    posted.message_id, posted.clients
                );
            }
        }
    }
    Ok(())
}
