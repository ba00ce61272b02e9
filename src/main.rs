use std::path::Path;

use clap::Parser;
use qrform::config::Config;
use qrform::run_main;

use tracing_error::ErrorLayer;
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt, Layer};

fn init_logging(path: &Path) -> Result<(), std::io::Error> {
    let log_file = std::fs::File::create(path)?;
    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::EnvFilter::from_default_env());

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn main() {
    let config = Config::parse();
    if let Err(err) = init_logging(&config.log_file) {
        eprintln!("could not open {}: {err}", config.log_file.display());
        std::process::exit(1);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to start the runtime: {err}");
            std::process::exit(1);
        }
    };

    runtime.block_on(async {
        if let Err(err) = run_main(config).await {
            tracing::error!("{err}");
            eprintln!("{err}");
            std::process::exit(1);
        }
    })
}
