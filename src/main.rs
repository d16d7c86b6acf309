use anyhow::Result;
use kisspush::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
