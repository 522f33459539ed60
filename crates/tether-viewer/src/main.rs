//! tether Viewer - Main Entry Point
//!
//! Loads a remote screen into the headless renderer, then fires each extra
//! argument as a navigation tap and prints what ends up on screen.
//!
//! ```text
//! tether-viewer http://192.168.1.164:8866/main.xml /settings.xml main.xml
//! ```

use std::time::Duration;

use anyhow::{Context, Result, bail};
use tether_engine::{Config, Engine, HeadlessRenderer, navigation};
use tether_net::ResourceLoader;
use tracing_subscriber::EnvFilter;

type ViewerEngine = Engine<ResourceLoader, HeadlessRenderer>;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Start URL from the command line, falling back to the environment
    let mut args = std::env::args().skip(1);
    let Some(start_url) = args.next().or_else(|| std::env::var("TETHER_START_URL").ok()) else {
        bail!("usage: tether-viewer <url> [target ...] (or set TETHER_START_URL)");
    };
    let targets: Vec<String> = args.collect();

    let config = load_config()?;
    tracing::info!("Starting tether viewer v{}", tether_engine::VERSION);

    let loader = ResourceLoader::with_config(config.net.clone())
        .context("Failed to set up HTTP client")?;
    let renderer = HeadlessRenderer::for_config(&config);
    let mut engine = Engine::new(config, loader, renderer);

    engine.on_screen_loaded(|screen| {
        tracing::info!("Showing {} from {}", screen.component, screen.url);
    });
    engine.begin();
    engine.load_from_url(&start_url);
    print_screen(&engine);

    if navigation::install(engine).is_err() {
        bail!("Navigation slot is busy");
    }

    for target in &targets {
        let handler = navigation::with_engine(|e: &mut ViewerEngine| {
            e.renderer().handler(&e.config().navigation_event)
        })
        .flatten()
        .context("No navigation handler registered")?;

        // Same path a tap on a bound button takes
        handler(target);
        navigation::with_engine(|e: &mut ViewerEngine| print_screen(e));
    }

    let engine = navigation::uninstall::<ViewerEngine>().context("Engine was not installed")?;
    print_cache(&engine);

    Ok(())
}

/// Engine configuration with environment overrides applied
fn load_config() -> Result<Config> {
    let mut config = Config::default();

    if let Ok(secs) = std::env::var("TETHER_TIMEOUT_SECS") {
        let secs: u64 = secs
            .trim()
            .parse()
            .with_context(|| format!("TETHER_TIMEOUT_SECS is not a number: {}", secs))?;
        config.net = config.net.with_request_timeout(Duration::from_secs(secs));
    }

    Ok(config)
}

fn print_screen(engine: &ViewerEngine) {
    match engine.active_screen() {
        Some(screen) => {
            println!("{} <- {}", screen.component, screen.url);
            if let Some(built) = engine.renderer().screen(screen.handle) {
                println!("  elements: {}", built.element_count);
                for target in &built.navigation_targets {
                    println!("  navigates to: {}", target);
                }
                for src in &built.unresolved_images {
                    println!("  missing image: {}", src);
                }
            }
        }
        None => println!("(no screen)"),
    }

    if let Some(err) = engine.last_failure() {
        println!("  last load failed: {}", err);
    }
}

fn print_cache(engine: &ViewerEngine) {
    let cache = engine.image_cache();
    println!(
        "images: {} ({} bytes), hits: {}, misses: {}, failures: {}, hit rate: {:.0}%",
        cache.len(),
        cache.memory_usage(),
        cache.hits,
        cache.misses,
        cache.failures,
        cache.hit_rate() * 100.0
    );
}
