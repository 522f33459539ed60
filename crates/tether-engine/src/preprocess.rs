//! Image preprocessing pass
//!
//! Walks a fetched screen document and binds every image element to a
//! cached descriptor: the `src` reference is resolved, the image is fetched
//! once through the cache, and the attribute is rewritten to the cache key.
//! A document that does not parse is handed back untouched.

use tether_markup::{MarkupTree, NodeId, ParseError};
use tether_net::{Fetcher, resolve};

use crate::config::Config;
use crate::image::ImageCache;
use crate::renderer::Renderer;

/// Per-document image counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// Image elements carrying a source attribute
    pub found: usize,
    /// Rewritten to a cache key
    pub resolved: usize,
    /// Left with their original reference
    pub unresolved: usize,
}

/// Outcome of the pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preprocessed {
    /// Parsed, image references rewritten where possible, re-serialized
    Rewritten { bytes: Vec<u8>, report: RewriteReport },
    /// Could not parse; these are the original bytes
    Unchanged { bytes: Vec<u8>, reason: ParseError },
}

impl Preprocessed {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Rewritten { bytes, .. } | Self::Unchanged { bytes, .. } => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Rewritten { bytes, .. } | Self::Unchanged { bytes, .. } => bytes,
        }
    }

    pub fn is_rewritten(&self) -> bool {
        matches!(self, Self::Rewritten { .. })
    }
}

/// One run of the pass over one document
pub struct ImagePass<'a, F: ?Sized, R: ?Sized> {
    pub config: &'a Config,
    pub server_base: &'a str,
    /// URL of the document being processed, base for relative `src`
    pub document_url: &'a str,
    pub cache: &'a mut ImageCache,
    pub fetcher: &'a mut F,
    pub renderer: &'a mut R,
}

impl<F, R> ImagePass<'_, F, R>
where
    F: Fetcher + ?Sized,
    R: Renderer + ?Sized,
{
    /// Run the pass. The tree lives only for the duration of this call.
    pub fn run(self, bytes: Vec<u8>) -> Preprocessed {
        tracing::debug!("Preprocessing {} for images", self.document_url);

        let mut tree = match MarkupTree::parse(&bytes) {
            Ok(tree) => tree,
            Err(reason) => {
                tracing::warn!("Markup parsing failed for {}: {}", self.document_url, reason);
                return Preprocessed::Unchanged { bytes, reason };
            }
        };

        // Collected first: the tree is mutated while walking the list
        let images: Vec<NodeId> = tree.elements_named(&self.config.image_tag).collect();
        let mut report = RewriteReport::default();

        for id in images {
            let Some(src) = tree.attr(id, &self.config.image_src_attr).map(str::to_string) else {
                continue;
            };
            report.found += 1;

            let url = resolve(&src, self.server_base, self.document_url);
            tracing::debug!("Found image source: {} -> {}", src, url);

            match self.cache.get_or_fetch(&url, &mut *self.fetcher, &mut *self.renderer) {
                Ok(key) => {
                    tree.set_attr(id, &self.config.image_src_attr, key);
                    report.resolved += 1;
                }
                Err(err) => {
                    tracing::warn!("Image left unresolved: {}", err);
                    report.unresolved += 1;
                }
            }
        }

        Preprocessed::Rewritten {
            bytes: tree.serialize(),
            report,
        }
    }
}
