//! Engine Configuration

use tether_net::NetConfig;

use crate::image::ColorFormat;

/// Engine configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix of generated component names (`screen_0`, `screen_1`, ...)
    pub component_prefix: String,

    /// Prefix of generated image cache keys
    pub image_key_prefix: String,

    /// Tag of the image element in screen markup
    pub image_tag: String,

    /// Attribute holding the image reference
    pub image_src_attr: String,

    /// Event name the renderer fires for navigation actions
    pub navigation_event: String,

    /// Width declared for downloaded images (headers are not decoded)
    pub placeholder_width: u32,

    /// Height declared for downloaded images
    pub placeholder_height: u32,

    /// Pixel format declared for downloaded images
    pub placeholder_format: ColorFormat,

    /// Transport settings
    pub net: NetConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            component_prefix: "screen_".into(),
            image_key_prefix: "img_".into(),
            image_tag: "lv_image".into(),
            image_src_attr: "src".into(),
            navigation_event: "load_screen".into(),
            placeholder_width: 320,
            placeholder_height: 240,
            placeholder_format: ColorFormat::RawAlpha,
            net: NetConfig::default(),
        }
    }
}

impl Config {
    pub fn with_component_prefix(mut self, prefix: &str) -> Self {
        self.component_prefix = prefix.to_string();
        self
    }

    pub fn with_image_key_prefix(mut self, prefix: &str) -> Self {
        self.image_key_prefix = prefix.to_string();
        self
    }

    pub fn with_image_element(mut self, tag: &str, src_attr: &str) -> Self {
        self.image_tag = tag.to_string();
        self.image_src_attr = src_attr.to_string();
        self
    }

    pub fn with_navigation_event(mut self, event: &str) -> Self {
        self.navigation_event = event.to_string();
        self
    }

    pub fn with_placeholder_size(mut self, width: u32, height: u32) -> Self {
        self.placeholder_width = width;
        self.placeholder_height = height;
        self
    }

    pub fn with_net(mut self, net: NetConfig) -> Self {
        self.net = net;
        self
    }
}
