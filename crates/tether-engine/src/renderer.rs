//! Renderer boundary
//!
//! The engine never draws. It hands processed markup to a renderer, asks it
//! to build or tear down screens, and announces images by name. The renderer
//! owns the widget graph behind every `ScreenHandle`.

use crate::image::ImageDescriptor;

/// Opaque handle to a renderer-owned UI tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenHandle(pub u64);

/// Navigation callback as the renderer invokes it. There is no context
/// parameter, so it reaches the engine through `navigation::install`.
pub type NavigationCallback = fn(&str);

/// UI renderer/compositor
pub trait Renderer {
    /// Register markup under a component name
    fn register_component(&mut self, name: &str, markup: &[u8]);

    /// Parent that new screens are created under
    fn root(&self) -> ScreenHandle;

    /// Instantiate a registered component; `None` when construction fails
    fn instantiate(&mut self, parent: ScreenHandle, name: &str) -> Option<ScreenHandle>;

    /// Destroy an instantiated screen and everything under it
    fn destroy(&mut self, handle: ScreenHandle);

    /// Make an image resolvable by name. The descriptor stays owned by the
    /// engine's cache; renderers copy what they need.
    fn register_image(&mut self, name: &str, image: &ImageDescriptor);

    /// Bind a callback to an event name usable from markup
    fn register_event_handler(&mut self, event: &str, handler: NavigationCallback);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn register_component(&mut self, name: &str, markup: &[u8]) {
        (**self).register_component(name, markup)
    }

    fn root(&self) -> ScreenHandle {
        (**self).root()
    }

    fn instantiate(&mut self, parent: ScreenHandle, name: &str) -> Option<ScreenHandle> {
        (**self).instantiate(parent, name)
    }

    fn destroy(&mut self, handle: ScreenHandle) {
        (**self).destroy(handle)
    }

    fn register_image(&mut self, name: &str, image: &ImageDescriptor) {
        (**self).register_image(name, image)
    }

    fn register_event_handler(&mut self, event: &str, handler: NavigationCallback) {
        (**self).register_event_handler(event, handler)
    }
}
