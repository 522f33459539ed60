//! Screen loader
//!
//! Drives one load cycle at a time: fetch the document, bind its images,
//! register and instantiate it, then retire the previous screen. Exactly one
//! screen is live once the first load succeeds.

use tether_net::{Fetcher, resolve, server_base_url};

use crate::config::Config;
use crate::error::LoadError;
use crate::image::ImageCache;
use crate::navigation;
use crate::preprocess::{ImagePass, Preprocessed};
use crate::renderer::{Renderer, ScreenHandle};

/// Load cycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadPhase {
    Idle,
    Fetching,
    Preprocessing,
    Registering,
    Instantiating,
    Active,
    Failed,
}

impl LoadPhase {
    /// Whether the loader can stay in this phase between calls
    pub fn is_rest(self) -> bool {
        matches!(self, Self::Idle | Self::Active)
    }
}

/// The screen currently shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedScreen {
    /// Generated component name (`screen_<n>`)
    pub component: String,
    /// Document the screen was built from
    pub url: String,
    pub handle: ScreenHandle,
}

type ScreenHook = Box<dyn FnMut(&LoadedScreen)>;

/// Remote screen engine
pub struct Engine<F: Fetcher, R: Renderer> {
    config: Config,
    fetcher: F,
    renderer: R,
    /// Scheme + host + port of the first load, root for `/path` references
    server_base_url: String,
    /// Document behind the active screen, base for relative references
    current_screen_url: String,
    screen_sequence: u64,
    image_cache: ImageCache,
    active_screen: Option<LoadedScreen>,
    phase: LoadPhase,
    last_failure: Option<LoadError>,
    hooks: Vec<ScreenHook>,
}

impl<F: Fetcher, R: Renderer> Engine<F, R> {
    /// Create an engine. Nothing is fetched until the first load.
    pub fn new(config: Config, fetcher: F, renderer: R) -> Self {
        let image_cache = ImageCache::new(&config);
        Self {
            config,
            fetcher,
            renderer,
            server_base_url: String::new(),
            current_screen_url: String::new(),
            screen_sequence: 0,
            image_cache,
            active_screen: None,
            phase: LoadPhase::Idle,
            last_failure: None,
            hooks: Vec::new(),
        }
    }

    /// Register the navigation callback with the renderer.
    ///
    /// The callback carries no context; it reaches this engine only after
    /// `navigation::install`.
    pub fn begin(&mut self) {
        self.renderer.register_event_handler(
            &self.config.navigation_event,
            navigation::dispatch_navigation,
        );
        tracing::info!(
            "Navigation handler registered for '{}'",
            self.config.navigation_event
        );
    }

    /// Fetch a screen document and make it the active screen.
    ///
    /// Failures are logged and kept in `last_failure`; the previous screen
    /// stays up.
    pub fn load_from_url(&mut self, url: &str) {
        tracing::info!("Loading screen from {}", url);
        self.ensure_server_base(url);

        self.transition(LoadPhase::Fetching);
        let bytes = match self.fetcher.get_ok(url) {
            Ok(bytes) => bytes,
            Err(source) => {
                self.fail(LoadError::Transport {
                    url: url.to_string(),
                    source,
                });
                return;
            }
        };

        tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);
        self.load_markup(bytes, url);
    }

    /// Install an already-fetched document as if it came from `document_url`
    pub fn load_markup(&mut self, bytes: Vec<u8>, document_url: &str) {
        self.ensure_server_base(document_url);

        if bytes.is_empty() {
            self.fail(LoadError::EmptyDocument {
                url: document_url.to_string(),
            });
            return;
        }

        self.install_markup(bytes, document_url);
    }

    /// Resolve a navigation target against the current screen and load it
    pub fn on_navigate(&mut self, target: &str) {
        if target.is_empty() {
            tracing::warn!("Ignoring navigation with an empty target");
            return;
        }

        let url = resolve(target, &self.server_base_url, &self.current_screen_url);
        tracing::info!("Navigating to {} ({})", target, url);
        self.load_from_url(&url);
    }

    /// Run `hook` after every successful load
    pub fn on_screen_loaded(&mut self, hook: impl FnMut(&LoadedScreen) + 'static) {
        self.hooks.push(Box::new(hook));
    }

    fn ensure_server_base(&mut self, url: &str) {
        if self.server_base_url.is_empty() {
            self.server_base_url = server_base_url(url);
            tracing::info!("Server base URL: {}", self.server_base_url);
        }
    }

    fn install_markup(&mut self, bytes: Vec<u8>, document_url: &str) {
        self.transition(LoadPhase::Preprocessing);
        let processed = ImagePass {
            config: &self.config,
            server_base: &self.server_base_url,
            document_url,
            cache: &mut self.image_cache,
            fetcher: &mut self.fetcher,
            renderer: &mut self.renderer,
        }
        .run(bytes);

        match &processed {
            Preprocessed::Rewritten { report, .. } => tracing::debug!(
                "Images in {}: {} found, {} resolved, {} unresolved",
                document_url,
                report.found,
                report.resolved,
                report.unresolved
            ),
            Preprocessed::Unchanged { reason, .. } => {
                tracing::warn!("Passing {} through unprocessed: {}", document_url, reason)
            }
        }

        self.transition(LoadPhase::Registering);
        let component = format!("{}{}", self.config.component_prefix, self.screen_sequence);
        self.screen_sequence += 1;
        self.renderer.register_component(&component, processed.bytes());

        self.transition(LoadPhase::Instantiating);
        let parent = self.renderer.root();
        let Some(handle) = self.renderer.instantiate(parent, &component) else {
            self.fail(LoadError::Render {
                component,
                url: document_url.to_string(),
            });
            return;
        };

        // Old screen goes only once the new one exists
        if let Some(previous) = self.active_screen.take() {
            tracing::debug!("Destroying screen {}", previous.component);
            self.renderer.destroy(previous.handle);
        }

        self.current_screen_url = document_url.to_string();
        self.last_failure = None;
        self.transition(LoadPhase::Active);
        tracing::info!("Screen {} active ({})", component, document_url);

        let screen = LoadedScreen {
            component,
            url: document_url.to_string(),
            handle,
        };
        for hook in self.hooks.iter_mut() {
            hook(&screen);
        }
        self.active_screen = Some(screen);
    }

    fn fail(&mut self, err: LoadError) {
        tracing::error!("{}", err);
        self.transition(LoadPhase::Failed);
        self.last_failure = Some(err);

        let rest = if self.active_screen.is_some() {
            LoadPhase::Active
        } else {
            LoadPhase::Idle
        };
        self.transition(rest);
    }

    fn transition(&mut self, next: LoadPhase) {
        tracing::debug!("Load phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn server_base_url(&self) -> &str {
        &self.server_base_url
    }

    pub fn current_screen_url(&self) -> &str {
        &self.current_screen_url
    }

    pub fn active_screen(&self) -> Option<&LoadedScreen> {
        self.active_screen.as_ref()
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn image_cache(&self) -> &ImageCache {
        &self.image_cache
    }

    /// Failure of the most recent load, cleared by the next success
    pub fn last_failure(&self) -> Option<&LoadError> {
        self.last_failure.as_ref()
    }

    /// Number of component names handed out so far
    pub fn screen_sequence(&self) -> u64 {
        self.screen_sequence
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn fetcher_mut(&mut self) -> &mut F {
        &mut self.fetcher
    }
}

impl<F: Fetcher, R: Renderer> Drop for Engine<F, R> {
    fn drop(&mut self) {
        if let Some(screen) = self.active_screen.take() {
            tracing::debug!("Shutting down, destroying screen {}", screen.component);
            self.renderer.destroy(screen.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessRenderer;
    use std::collections::HashMap;
    use tether_net::{NetError, Response};

    #[derive(Default)]
    struct MapFetcher {
        files: HashMap<String, Vec<u8>>,
    }

    impl Fetcher for MapFetcher {
        fn fetch(&mut self, url: &str) -> Result<Response, NetError> {
            match self.files.get(url) {
                Some(body) => Ok(Response::new(200, body.clone())),
                None => Ok(Response::new(404, Vec::new())),
            }
        }
    }

    fn engine(files: &[(&str, &str)]) -> Engine<MapFetcher, HeadlessRenderer> {
        let mut fetcher = MapFetcher::default();
        for (url, body) in files {
            fetcher.files.insert(url.to_string(), body.as_bytes().to_vec());
        }
        Engine::new(Config::default(), fetcher, HeadlessRenderer::new())
    }

    #[test]
    fn test_initial_state() {
        let engine = engine(&[]);
        assert_eq!(engine.phase(), LoadPhase::Idle);
        assert!(engine.active_screen().is_none());
        assert_eq!(engine.server_base_url(), "");
        assert_eq!(engine.screen_sequence(), 0);
    }

    #[test]
    fn test_server_base_set_once() {
        let mut engine = engine(&[("http://h:8866/a.xml", "<a/>"), ("http://o:1/b.xml", "<b/>")]);

        engine.load_from_url("http://h:8866/a.xml");
        engine.load_from_url("http://o:1/b.xml");

        assert_eq!(engine.server_base_url(), "http://h:8866");
        assert_eq!(engine.current_screen_url(), "http://o:1/b.xml");
    }

    #[test]
    fn test_server_base_set_even_when_first_load_fails() {
        let mut engine = engine(&[]);
        engine.load_from_url("http://h:8866/missing.xml");

        assert_eq!(engine.server_base_url(), "http://h:8866");
        assert_eq!(engine.current_screen_url(), "");
        assert_eq!(engine.phase(), LoadPhase::Idle);
    }

    #[test]
    fn test_empty_document_is_failure() {
        let mut engine = engine(&[("http://h/empty.xml", "")]);
        engine.load_from_url("http://h/empty.xml");

        assert_eq!(
            engine.last_failure(),
            Some(&LoadError::EmptyDocument {
                url: "http://h/empty.xml".into()
            })
        );
        assert_eq!(engine.screen_sequence(), 0);
    }

    #[test]
    fn test_load_markup_without_fetch() {
        let mut engine = engine(&[]);
        engine.load_markup(b"<component/>".to_vec(), "http://h:8866/start.xml");

        let screen = engine.active_screen().unwrap();
        assert_eq!(screen.component, "screen_0");
        assert_eq!(engine.current_screen_url(), "http://h:8866/start.xml");
        assert_eq!(engine.server_base_url(), "http://h:8866");
    }

    #[test]
    fn test_empty_navigation_target_ignored() {
        let mut engine = engine(&[("http://h/a.xml", "<a/>")]);
        engine.load_from_url("http://h/a.xml");
        engine.on_navigate("");

        assert_eq!(engine.screen_sequence(), 1);
        assert!(engine.last_failure().is_none());
    }

    #[test]
    fn test_rest_phases() {
        assert!(LoadPhase::Idle.is_rest());
        assert!(LoadPhase::Active.is_rest());
        assert!(!LoadPhase::Failed.is_rest());
        assert!(!LoadPhase::Fetching.is_rest());
    }

    #[test]
    fn test_begin_registers_handler() {
        let mut engine = engine(&[]);
        engine.begin();
        assert!(engine.renderer().handler("load_screen").is_some());
    }
}
