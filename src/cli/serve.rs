use anyhow::Result;

use crate::backend;

pub async fn run(host: &str, port: u16) -> Result<()> {
    backend::serve(host, port).await
}
