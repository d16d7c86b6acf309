use anyhow::Result;
use clap::Subcommand;

use crate::client::ChannelSubscriptionClient;

#[derive(Subcommand)]
pub enum AliasAction {
    /// Subscribe to an alias
    Add { alias: String },
    /// Unsubscribe from an alias
    Delete { alias: String },
    /// List subscribed aliases
    List {},
}

pub async fn run(client: &ChannelSubscriptionClient, action: &AliasAction) -> Result<()> {
    match action {
        AliasAction::Add { alias } => {
            client.add_alias(alias).await?;
            println!("Subscribed to {}", alias);
        }
        AliasAction::Delete { alias } => {
            client.delete_alias(alias).await?;
            println!("Unsubscribed from {}", alias);
        }
        AliasAction::List {} => {
            // Nothing to print when a lenient client dropped the response
            for alias in client.get_aliases().await?.unwrap_or_default() {
                println!("{}", alias);
            }
        }
    }
    Ok(())
}
