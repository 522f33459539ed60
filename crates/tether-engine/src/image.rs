//! Image descriptors and their cache
//!
//! Every downloaded image lives in exactly one `ImageDescriptor`, owned by
//! the `ImageCache` for the rest of the engine's life. Entries are never
//! evicted: a screen revisited later reuses its images without a download.
//! Memory grows with the number of distinct image URLs seen.

use std::collections::HashMap;

use tether_net::Fetcher;

use crate::config::Config;
use crate::error::ImageError;
use crate::renderer::Renderer;

/// Magic byte identifying an image header
pub const IMAGE_HEADER_MAGIC: u8 = 0x19;

/// Declared pixel format of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    /// Encoded bytes (PNG/JPEG) with alpha, decoded by the renderer
    RawAlpha,
    /// Encoded bytes without alpha
    Raw,
    Rgb565,
    Rgb888,
    Argb8888,
}

/// Image header as announced to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub magic: u8,
    pub format: ColorFormat,
    pub flags: u16,
    pub width: u32,
    pub height: u32,
    /// Bytes per row; 0 lets the renderer compute it
    pub stride: u32,
}

/// Downloaded image bytes plus declared dimensions
#[derive(Debug)]
pub struct ImageDescriptor {
    header: ImageHeader,
    source_url: String,
    data: Box<[u8]>,
}

impl ImageDescriptor {
    /// Wrap downloaded bytes. Width and height are declared, not decoded.
    pub fn new(
        source_url: &str,
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: ColorFormat,
    ) -> Self {
        Self {
            header: ImageHeader {
                magic: IMAGE_HEADER_MAGIC,
                format,
                flags: 0,
                width,
                height,
                stride: 0,
            },
            source_url: source_url.to_string(),
            data: data.into_boxed_slice(),
        }
    }

    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    /// URL the bytes were fetched from
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    pub fn width(&self) -> u32 {
        self.header.width
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }
}

/// Cache key for a resolved image URL: prefix plus hex of a 32-bit string
/// hash (`h = h * 33 + byte`). Same URL, same key, for the whole run.
pub fn cache_key(prefix: &str, url: &str) -> String {
    let hash = url
        .bytes()
        .fold(0u32, |h, b| (h << 5).wrapping_add(h).wrapping_add(b as u32));
    format!("{}{:x}", prefix, hash)
}

/// Cache of image descriptors keyed by `cache_key`
pub struct ImageCache {
    entries: HashMap<String, ImageDescriptor>,
    key_prefix: String,
    width: u32,
    height: u32,
    format: ColorFormat,
    /// Current memory usage
    memory: usize,
    /// Statistics
    pub hits: u64,
    pub misses: u64,
    pub fetches: u64,
    pub failures: u64,
}

impl ImageCache {
    /// Create an empty cache using the configured key prefix and placeholder header
    pub fn new(config: &Config) -> Self {
        Self {
            entries: HashMap::new(),
            key_prefix: config.image_key_prefix.clone(),
            width: config.placeholder_width,
            height: config.placeholder_height,
            format: config.placeholder_format,
            memory: 0,
            hits: 0,
            misses: 0,
            fetches: 0,
            failures: 0,
        }
    }

    /// Key for an already-cached URL, or download it, store it, announce it
    /// to the renderer and return its new key.
    ///
    /// A URL is fetched at most once per cache lifetime. Failed downloads are
    /// not stored, so a later screen may try again.
    pub fn get_or_fetch<F, R>(
        &mut self,
        url: &str,
        fetcher: &mut F,
        renderer: &mut R,
    ) -> Result<String, ImageError>
    where
        F: Fetcher + ?Sized,
        R: Renderer + ?Sized,
    {
        let key = cache_key(&self.key_prefix, url);

        if let Some(existing) = self.entries.get(&key) {
            if existing.source_url() == url {
                self.hits += 1;
                tracing::debug!("Image cache hit: {} as {}", url, key);
                return Ok(key);
            }
            self.failures += 1;
            return Err(ImageError::KeyCollision {
                key,
                existing: existing.source_url().to_string(),
                requested: url.to_string(),
            });
        }

        self.misses += 1;
        self.fetches += 1;

        let data = fetcher.get_ok(url).map_err(|source| {
            self.failures += 1;
            ImageError::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        if data.is_empty() {
            self.failures += 1;
            return Err(ImageError::Empty {
                url: url.to_string(),
            });
        }

        let descriptor = ImageDescriptor::new(url, data, self.width, self.height, self.format);
        tracing::debug!(
            "Image descriptor created: {} bytes, {}x{}, format {:?}",
            descriptor.data_size(),
            descriptor.width(),
            descriptor.height(),
            descriptor.header().format
        );

        renderer.register_image(&key, &descriptor);
        self.memory += descriptor.data_size();
        self.entries.insert(key.clone(), descriptor);

        tracing::info!("Stored image {} as {}", url, key);
        Ok(key)
    }

    /// Look up a descriptor by key
    pub fn get(&self, key: &str) -> Option<&ImageDescriptor> {
        self.entries.get(key)
    }

    /// Check whether a key is cached
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Key this cache would use for a URL
    pub fn key_for(&self, url: &str) -> String {
        cache_key(&self.key_prefix, url)
    }

    /// Number of cached images
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes held by all descriptors
    pub fn memory_usage(&self) -> usize {
        self.memory
    }

    /// Hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl Drop for ImageCache {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(
                "Released {} image descriptors ({} bytes)",
                self.entries.len(),
                self.memory
            );
        }
    }
}
