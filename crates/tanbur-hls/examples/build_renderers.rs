//! Build a renderer set for a manifest URL and print what got wired.
//!
//! ```sh
//! cargo run --example build_renderers -- https://example.com/main.m3u8
//! ```

use std::{error::Error, sync::Arc};

use tanbur_hls::{
    BandwidthMeter, BuildConfig, BuildError, HlsRendererBuilder, PlaybackHost, RendererSet,
};
use tracing_subscriber::EnvFilter;
use url::Url;

struct PrintHost;

impl PlaybackHost for PrintHost {
    fn on_renderers(&self, renderers: RendererSet, meter: Arc<BandwidthMeter>) {
        for renderer in renderers.tracks() {
            println!(
                "{:>8}: single={}",
                renderer.track().as_str(),
                renderer.source().is_single()
            );
        }
        println!("bandwidth estimate: {:?}", meter.estimate_bps());
    }

    fn on_renderers_error(&self, error: BuildError) {
        eprintln!("build failed: {error}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .ok_or("usage: build_renderers <manifest-url>")?;

    let mut builder = HlsRendererBuilder::new(BuildConfig::new(Url::parse(&url)?));
    let mut events = builder.events();
    let handle = builder.build_renderers(Arc::new(PrintHost));

    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::info!(?event, "build event");
        }
    });

    handle.finished().await;
    Ok(())
}
