use anyhow::Result;
use metronome::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    // 2. Load optional settings from Metronome.toml; fall back to defaults.
    let cfg: MetronomeConfig = config::Config::builder()
        .add_source(config::File::with_name("Metronome").required(false))
        .build()?
        .try_deserialize()
        .unwrap_or_default();

    // 3. A fixed-delay job that counts its own fires.
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();
    let ticker = IntervalScheduler::new(cfg.interval, move |e| {
        let counter = counter_clone.clone();
        async move {
            let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
            info!(
                "[INTERVAL] fire #{n} (delay {:?})",
                e.current_target.delay()
            );
            Ok(())
        }
    })?;

    // 4. A time-of-day job that logs whenever one of its times matches.
    let daily = RegularScheduler::new(cfg.regular, |e| async move {
        info!(
            "[REGULAR] fired; configured times: {:?}",
            e.current_target.times()
        );
        Ok(())
    })?;
    daily.on_error(|e| warn!("[REGULAR] callback failed: {}", e.error));

    ticker.start();
    daily.start();
    info!(
        "metrodev v{} running (interval {:?}, {} regular time(s)). Press Ctrl+C to stop.",
        metronome::VERSION,
        ticker.delay(),
        daily.times().len()
    );

    // 5. Run until shutdown.
    tokio::signal::ctrl_c().await?;
    ticker.stop();
    daily.stop();
    info!("metrodev stopped.");
    Ok(())
}
