use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{error, info, warn};
use mapbridge::{
    MapCommand, MapOptions, MapProxy, MapTarget, MapWidget,
    centrifugo::CentrifugoPublisher,
    config::{AppConfig, Mode},
    transport,
};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    // stdout carries the widget payload
    builder.target(Target::Stderr).init();

    info!("module version: {}", env!("CARGO_PKG_VERSION"));
}

async fn run() -> Result<()> {
    initialize();

    let config = AppConfig::get();
    let input = BufReader::new(tokio::io::stdin());

    match config.mode {
        Mode::Pending => {
            let mut widget = MapWidget::with_id(&config.map_id, MapOptions::default())
                .sized(&config.widget.width, &config.widget.height);

            let replayed = replay(&mut widget, input).await?;
            info!("replayed {replayed} call(s) onto pending map {}", config.map_id);

            let payload = widget.into_payload();
            match &config.widget.output {
                Some(path) => payload.write_to(path)?,
                None => {
                    let mut stdout = tokio::io::stdout();
                    stdout
                        .write_all(payload.to_json()?.as_bytes())
                        .await
                        .context("failed to write widget payload to stdout")?;
                    stdout
                        .flush()
                        .await
                        .context("failed to flush stdout")?;
                }
            }
        }
        Mode::Live => {
            let (transport, rx) = transport::channel();
            let publisher = CentrifugoPublisher::new(config.centrifugo.clone())?;
            let worker = tokio::spawn(publisher.run(rx));

            let mut proxy = MapProxy::new(&config.map_id, transport);
            let replayed = replay(&mut proxy, input).await?;
            info!("replayed {replayed} call(s) onto live map {}", config.map_id);

            // closing the queue lets the worker finish
            drop(proxy);
            worker.await.context("publisher task failed")?;
        }
    }

    Ok(())
}

/// Apply every journal line to `map`. Blank lines and lines starting with
/// `#` are skipped; lines that do not parse are logged and skipped.
async fn replay<M, R>(map: &mut M, input: R) -> Result<usize>
where
    M: MapTarget,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut number = 0;
    let mut replayed = 0;

    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read journal line")?
    {
        number += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match serde_json::from_str::<MapCommand>(line) {
            Ok(command) => {
                command.apply(map);
                replayed += 1;
            }
            Err(e) => warn!("skipping journal line {number}: {e}"),
        }
    }

    Ok(replayed)
}
