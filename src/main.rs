use anyhow::Result;
use clap::Parser;
use clawdash::{config, export};

#[derive(Parser, Debug)]
#[command(name = "clawdash")]
#[command(about = "Export Clawdbot gateway status and recent session activity for the dashboard")]
#[command(version)]
struct Args {
    /// Path to config file
    #[arg(long, short)]
    config: Option<std::path::PathBuf>,

    /// Session transcript directory
    #[arg(long)]
    sessions_dir: Option<std::path::PathBuf>,

    /// Output file
    #[arg(long, short)]
    output: Option<std::path::PathBuf>,

    /// Recency window in hours
    #[arg(long)]
    window_hours: Option<u32>,

    /// Skip querying the gateway CLI
    #[arg(long)]
    no_status: bool,
}

impl Args {
    fn apply(&self, config: &mut config::Config) {
        if let Some(dir) = &self.sessions_dir {
            config.sessions.dir = Some(dir.clone());
        }
        if let Some(path) = &self.output {
            config.output.path = path.clone();
        }
        if let Some(hours) = self.window_hours {
            config.sessions.window_hours = hours;
        }
        if self.no_status {
            config.status.enabled = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clawdash=info".parse()?),
        )
        .init();

    let mut config = config::load(args.config.as_deref())?;
    args.apply(&mut config);

    let path = export::run(&config).await?;
    println!("Dashboard data exported to {}", path.display());

    Ok(())
}
