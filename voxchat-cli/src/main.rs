use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod interactive_app;

use crate::interactive_app::InteractiveApp;

#[derive(Parser, Debug)]
#[command(name = "voxchat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "voxchat - terminal chat that speaks its answers")]
struct Args {
    /// Load settings from a specific file instead of ~/.voxchat/settings.toml
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Read the system prompt from this file
    #[arg(long, value_name = "PATH")]
    system_prompt: Option<PathBuf>,

    /// Print answers without synthesizing speech
    #[arg(long)]
    no_voice: bool,
}

fn main() -> Result<()> {
    setup_tracing()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = Args::parse();

    info!(
        "CLI startup: settings={:?}, system_prompt={:?}, no_voice={}",
        args.settings, args.system_prompt, args.no_voice
    );

    let mut app = InteractiveApp::new(args.settings, args.system_prompt, args.no_voice)?;
    app.run().await
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    // Logs go to a file so they never interleave with the conversation
    let home = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
    let trace_dir = home.join(".voxchat").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("voxchat.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}
