use anyhow::Result;
use clap::Parser;
use neurostream_core::config::API_BASE_URL_ENV;
use neurostream_core::metrics::{init_logging, LogTarget};
use neurostream_lib::app::App;
use neurostream_tui::Tui;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pet whose brain activity is streamed
    #[arg(short, long)]
    pet: String,

    /// Mode to run the viewer in
    #[arg(short, long, value_enum, default_value = "standard")]
    mode: Mode,

    /// Custom config file path
    #[arg(short, long, default_value = "neurostream.toml")]
    config: String,

    /// Override the API base URL (also settable via NEUROSTREAM_API_BASE_URL)
    #[arg(long)]
    api_base: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Mode {
    Standard,
    Headless,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = App::load_config(&args.config);
    let mut config = loaded.config;
    config.apply_env_overrides();
    if let Some(api_base) = args.api_base {
        config.stream.api_base_url = api_base;
    }
    config.validate()?;

    let target = match args.mode {
        Mode::Headless => LogTarget::Stderr,
        Mode::Standard => LogTarget::File,
    };
    init_logging(&config.logging, target)?;
    if let Some(warning) = loaded.warning {
        tracing::warn!("{warning}");
    }
    tracing::info!(
        pet_id = %args.pet,
        api_base = %config.stream.api_base_url,
        env_override = std::env::var(API_BASE_URL_ENV).is_ok(),
        "Starting brain stream viewer"
    );

    let mut app = App::new(config, args.pet)?;
    app.start().await?;

    match args.mode {
        Mode::Headless => app.run_headless().await?,
        Mode::Standard => {
            let mut tui = Tui::new()?;
            tui.init()?;

            let res = app.run(&mut tui).await;

            tui.exit()?;

            if let Err(e) = res {
                eprintln!("Application error: {e}");
            }
        }
    }

    Ok(())
}
