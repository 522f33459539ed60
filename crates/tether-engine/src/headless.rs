//! Headless renderer
//!
//! In-memory `Renderer` that keeps registered components, images and
//! handlers, and "instantiates" a screen by parsing its markup. Used by the
//! viewer binary and by tests; nothing is drawn.

use std::collections::{HashMap, HashSet};

use tether_markup::MarkupTree;

use crate::image::ImageDescriptor;
use crate::renderer::{NavigationCallback, Renderer, ScreenHandle};

/// Element binding a widget event to a callback
const EVENT_ELEMENT: &str = "event_cb";

/// What the headless renderer knows about a live screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessScreen {
    pub component: String,
    pub parent: ScreenHandle,
    pub element_count: usize,
    /// `user_data` of every navigation binding, in document order
    pub navigation_targets: Vec<String>,
    /// Image sources that name no registered image
    pub unresolved_images: Vec<String>,
}

/// Registered image as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub data_size: usize,
}

/// Renderer without a display
#[derive(Debug)]
pub struct HeadlessRenderer {
    components: HashMap<String, Vec<u8>>,
    screens: HashMap<ScreenHandle, HeadlessScreen>,
    images: HashMap<String, ImageInfo>,
    handlers: HashMap<String, NavigationCallback>,
    destroyed: Vec<ScreenHandle>,
    next_handle: u64,
    image_tag: String,
    image_src_attr: String,
    navigation_event: String,
}

impl HeadlessRenderer {
    /// Root screen every instantiated component hangs under
    pub const ROOT: ScreenHandle = ScreenHandle(0);

    pub fn new() -> Self {
        Self {
            components: HashMap::new(),
            screens: HashMap::new(),
            images: HashMap::new(),
            handlers: HashMap::new(),
            destroyed: Vec::new(),
            next_handle: 1,
            image_tag: "lv_image".into(),
            image_src_attr: "src".into(),
            navigation_event: "load_screen".into(),
        }
    }

    /// Use the markup names of an engine configuration
    pub fn for_config(config: &crate::Config) -> Self {
        Self {
            image_tag: config.image_tag.clone(),
            image_src_attr: config.image_src_attr.clone(),
            navigation_event: config.navigation_event.clone(),
            ..Self::new()
        }
    }

    /// Registered markup of a component
    pub fn component(&self, name: &str) -> Option<&[u8]> {
        self.components.get(name).map(Vec::as_slice)
    }

    /// Names of all registered components, sorted
    pub fn component_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// A live screen
    pub fn screen(&self, handle: ScreenHandle) -> Option<&HeadlessScreen> {
        self.screens.get(&handle)
    }

    /// Number of live screens
    pub fn live_screens(&self) -> usize {
        self.screens.len()
    }

    /// Handles destroyed so far, in order
    pub fn destroyed(&self) -> &[ScreenHandle] {
        &self.destroyed
    }

    /// Check whether an image name is registered
    pub fn has_image(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    /// Registered image info
    pub fn image(&self, name: &str) -> Option<&ImageInfo> {
        self.images.get(name)
    }

    /// Number of registered images
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Callback bound to an event name
    pub fn handler(&self, event: &str) -> Option<NavigationCallback> {
        self.handlers.get(event).copied()
    }

    fn build_screen(&self, parent: ScreenHandle, name: &str, tree: &MarkupTree) -> HeadlessScreen {
        let mut navigation_targets = Vec::new();
        let mut unresolved_images = Vec::new();
        let mut seen = HashSet::new();

        for id in tree.elements() {
            let Some(elem) = tree.element(id) else {
                continue;
            };

            let navigates = elem.attr("callback") == Some(self.navigation_event.as_str());
            if elem.name == EVENT_ELEMENT && navigates {
                if let Some(target) = elem.attr("user_data") {
                    navigation_targets.push(target.to_string());
                }
            } else if elem.name == self.image_tag {
                if let Some(src) = elem.attr(&self.image_src_attr) {
                    if !self.images.contains_key(src) && seen.insert(src.to_string()) {
                        unresolved_images.push(src.to_string());
                    }
                }
            }
        }

        HeadlessScreen {
            component: name.to_string(),
            parent,
            element_count: tree.elements().count(),
            navigation_targets,
            unresolved_images,
        }
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HeadlessRenderer {
    fn register_component(&mut self, name: &str, markup: &[u8]) {
        tracing::debug!("Registering component {} ({} bytes)", name, markup.len());
        self.components.insert(name.to_string(), markup.to_vec());
    }

    fn root(&self) -> ScreenHandle {
        Self::ROOT
    }

    fn instantiate(&mut self, parent: ScreenHandle, name: &str) -> Option<ScreenHandle> {
        let Some(markup) = self.components.get(name) else {
            tracing::warn!("Unknown component: {}", name);
            return None;
        };

        let tree = match MarkupTree::parse(markup) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::warn!("Component {} cannot be built: {}", name, err);
                return None;
            }
        };

        let screen = self.build_screen(parent, name, &tree);
        for src in &screen.unresolved_images {
            tracing::warn!("Image {} not found for {}", src, name);
        }

        let handle = ScreenHandle(self.next_handle);
        self.next_handle += 1;
        self.screens.insert(handle, screen);
        Some(handle)
    }

    fn destroy(&mut self, handle: ScreenHandle) {
        if self.screens.remove(&handle).is_some() {
            self.destroyed.push(handle);
        } else {
            tracing::warn!("Destroy of unknown screen {:?}", handle);
        }
    }

    fn register_image(&mut self, name: &str, image: &ImageDescriptor) {
        self.images.insert(
            name.to_string(),
            ImageInfo {
                width: image.width(),
                height: image.height(),
                data_size: image.data_size(),
            },
        );
    }

    fn register_event_handler(&mut self, event: &str, handler: NavigationCallback) {
        self.handlers.insert(event.to_string(), handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ColorFormat;

    const SCREEN: &[u8] = br#"<component><view>
        <lv_image src="img_1"/>
        <lv_image src="logo.png"/>
        <lv_button>
            <event_cb callback="load_screen" trigger="clicked" user_data="/settings.xml"/>
        </lv_button>
        <lv_button><event_cb callback="other" user_data="ignored"/></lv_button>
    </view></component>"#;

    #[test]
    fn test_instantiate_collects_bindings() {
        let mut renderer = HeadlessRenderer::new();
        let desc =
            ImageDescriptor::new("http://h/a.png", vec![1, 2, 3], 320, 240, ColorFormat::RawAlpha);
        renderer.register_image("img_1", &desc);
        renderer.register_component("screen_0", SCREEN);

        let handle = renderer.instantiate(renderer.root(), "screen_0").unwrap();
        let screen = renderer.screen(handle).unwrap();

        assert_eq!(screen.navigation_targets, vec!["/settings.xml".to_string()]);
        assert_eq!(screen.unresolved_images, vec!["logo.png".to_string()]);
        assert_eq!(screen.parent, HeadlessRenderer::ROOT);
        assert_eq!(renderer.image("img_1").unwrap().data_size, 3);
    }

    #[test]
    fn test_instantiate_failures() {
        let mut renderer = HeadlessRenderer::new();
        assert!(renderer.instantiate(HeadlessRenderer::ROOT, "missing").is_none());

        renderer.register_component("broken", b"<component><view></component>");
        assert!(renderer.instantiate(HeadlessRenderer::ROOT, "broken").is_none());
        assert_eq!(renderer.live_screens(), 0);
    }

    #[test]
    fn test_destroy_tracks_handles() {
        let mut renderer = HeadlessRenderer::new();
        renderer.register_component("a", b"<a/>");

        let first = renderer.instantiate(HeadlessRenderer::ROOT, "a").unwrap();
        let second = renderer.instantiate(HeadlessRenderer::ROOT, "a").unwrap();
        assert_ne!(first, second);

        renderer.destroy(first);
        renderer.destroy(first);
        assert_eq!(renderer.destroyed(), &[first]);
        assert_eq!(renderer.live_screens(), 1);
    }

    #[test]
    fn test_handler_registration() {
        fn noop(_: &str) {}

        let mut renderer = HeadlessRenderer::new();
        renderer.register_event_handler("load_screen", noop);
        assert!(renderer.handler("load_screen").is_some());
        assert!(renderer.handler("other").is_none());
    }
}
