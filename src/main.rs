mod api;
mod core;
#[cfg(test)]
mod test_support;
mod tui;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "pawchat", about = "Terminal chat for pet behavior analysis")]
struct Args {
    /// Backend base URL (overrides config file and PAWCHAT_BASE_URL)
    #[arg(short, long)]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to pawchat.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("pawchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = crate::core::config::load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {e}");
        Default::default()
    });
    let config = crate::core::config::resolve(&file_config, args.server.as_deref());

    log::info!("PawChat starting up against {}", config.base_url);

    tui::run(config)
}
