use anyhow::Result;

use crate::client::ChannelSubscriptionClient;

// Unlike `ChannelSubscriptionClient::register`, wait for the reply so
// the command can report it.
pub async fn run(client: &ChannelSubscriptionClient) -> Result<()> {
    let reply = client.send_registration().await?;
    println!("{}", reply.trim());
    Ok(())
}
