//! Engine errors
//!
//! None of these reach the caller of a load; they are logged and the most
//! recent one is kept on the engine.

use tether_net::NetError;

/// Why a screen load was abandoned
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to load {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: NetError,
    },

    #[error("Empty document from {url}")]
    EmptyDocument { url: String },

    #[error("Failed to create screen {component} from {url}")]
    Render { component: String, url: String },
}

/// Why a single image was left unresolved
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("Failed to download image {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: NetError,
    },

    #[error("Empty image body from {url}")]
    Empty { url: String },

    #[error("Cache key {key} already holds {existing}, cannot store {requested}")]
    KeyCollision {
        key: String,
        existing: String,
        requested: String,
    },
}
