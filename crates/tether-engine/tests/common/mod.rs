//! Shared test doubles: a scripted transport and a renderer that outlives
//! the engine owning it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tether_engine::image::ImageDescriptor;
use tether_engine::net::{Fetcher, NetError, Response, is_absolute};
use tether_engine::{HeadlessRenderer, NavigationCallback, Renderer, ScreenHandle};

pub const HOST: &str = "http://h:8866";

/// In-memory server; unknown URLs answer 404. Like the real loader it
/// refuses anything that is not an http(s) URL.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: HashMap<String, Result<Response, NetError>>,
    pub requests: Vec<String>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, url: &str, body: &str) -> Self {
        self.routes
            .insert(url.to_string(), Ok(Response::new(200, body.as_bytes().to_vec())));
        self
    }

    pub fn serve_bytes(mut self, url: &str, body: &[u8]) -> Self {
        self.routes.insert(url.to_string(), Ok(Response::new(200, body.to_vec())));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.routes.insert(url.to_string(), Ok(Response::new(status, Vec::new())));
        self
    }

    pub fn fail(mut self, url: &str, err: NetError) -> Self {
        self.routes.insert(url.to_string(), Err(err));
        self
    }

    /// Requests issued for `url`
    pub fn count(&self, url: &str) -> usize {
        self.requests.iter().filter(|r| *r == url).count()
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(&mut self, url: &str) -> Result<Response, NetError> {
        self.requests.push(url.to_string());
        if !is_absolute(url) {
            return Err(NetError::InvalidUrl(url.to_string()));
        }
        match self.routes.get(url) {
            Some(result) => result.clone(),
            None => Ok(Response::new(404, Vec::new())),
        }
    }
}

/// Headless renderer the test keeps a handle to after the engine is gone
#[derive(Clone, Default)]
pub struct SharedRenderer(pub Rc<RefCell<HeadlessRenderer>>);

impl Renderer for SharedRenderer {
    fn register_component(&mut self, name: &str, markup: &[u8]) {
        self.0.borrow_mut().register_component(name, markup)
    }

    fn root(&self) -> ScreenHandle {
        self.0.borrow().root()
    }

    fn instantiate(&mut self, parent: ScreenHandle, name: &str) -> Option<ScreenHandle> {
        self.0.borrow_mut().instantiate(parent, name)
    }

    fn destroy(&mut self, handle: ScreenHandle) {
        self.0.borrow_mut().destroy(handle)
    }

    fn register_image(&mut self, name: &str, image: &ImageDescriptor) {
        self.0.borrow_mut().register_image(name, image)
    }

    fn register_event_handler(&mut self, event: &str, handler: NavigationCallback) {
        self.0.borrow_mut().register_event_handler(event, handler)
    }
}

pub fn url(path: &str) -> String {
    format!("{}{}", HOST, path)
}

/// Screen with one image and one navigation button
pub fn screen_with(image_src: &str, target: &str) -> String {
    format!(
        r#"<component>
    <view width="320" height="240">
        <lv_image src="{}" align="center"/>
        <lv_button>
            <lv_label text="Next"/>
            <event_cb callback="load_screen" trigger="clicked" user_data="{}"/>
        </lv_button>
    </view>
</component>"#,
        image_src, target
    )
}
