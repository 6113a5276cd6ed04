use anyhow::Context;
use clap::Parser;
use wschat_server::{ChatServer, ServerArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerArgs::parse()
        .into_config()
        .context("invalid configuration")?;

    let server = ChatServer::bind(config)
        .await
        .context("failed to start server")?;
    server.run().await?;

    Ok(())
}
