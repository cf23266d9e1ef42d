use anyhow::Context;
use support_triage::config::ServerConfig;
use support_triage::{app, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("invalid configuration")?;
    let _log_guard = logging::init(config.log_dir.as_deref()).context("failed to set up logging")?;

    let addr = config.bind_addr();
    eprintln!("📨 Support Triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://{addr}/api");
    eprintln!("   Live feed: ws://{addr}/ws");
    if let Some(dir) = &config.log_dir {
        eprintln!("   Logs: {}", dir.display());
    }
    if !config.seed_defaults {
        eprintln!("   Seeding: disabled");
    }

    let processor = app::build(&config).await?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    app::serve(listener, processor, &config).await?;

    Ok(())
}
