//! tether Engine
//!
//! Loads UI screens described by markup documents on a remote server.
//! A load fetches the document and pulls in every image it references
//! exactly once. The document is rewritten so the renderer finds those
//! images by name, then it is instantiated as the single active screen.
//!
//! # Example
//! ```rust,ignore
//! use tether_engine::{Config, Engine, HeadlessRenderer, navigation};
//! use tether_net::ResourceLoader;
//!
//! let config = Config::default();
//! let loader = ResourceLoader::with_config(config.net.clone())?;
//! let mut engine = Engine::new(config, loader, HeadlessRenderer::new());
//! engine.begin();
//! engine.load_from_url("http://192.168.1.164:8866/main.xml");
//! let _ = navigation::install(engine);
//! ```

mod config;
mod engine;
mod error;
pub mod headless;
pub mod image;
pub mod navigation;
pub mod preprocess;
pub mod renderer;

pub use config::Config;
pub use engine::{Engine, LoadPhase, LoadedScreen};
pub use error::{ImageError, LoadError};
pub use headless::HeadlessRenderer;
pub use image::{ColorFormat, ImageCache, ImageDescriptor, ImageHeader, cache_key};
pub use preprocess::{ImagePass, Preprocessed, RewriteReport};
pub use renderer::{NavigationCallback, Renderer, ScreenHandle};

// Re-export sub-crates for hosts
pub use tether_markup as markup;
pub use tether_net as net;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
