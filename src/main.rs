use lotstatus::{config::Config, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let config = Config::from_env()?;
    run_server(config).await?;
    Ok(())
}
