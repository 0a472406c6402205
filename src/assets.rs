//! Asset loading and the per-editor asset cache.
//!
//! Loading is asynchronous: the renderer asks an [`AssetSource`] for a source
//! the first time it meets it, and completions are drained later on the same
//! thread (see [`crate::engine::Editor::tick`]). Once a source has resolved,
//! every later lookup is answered synchronously from the cache.
//!
//! The cache is never evicted. That is fine for hand-built scenes; a scene
//! with thousands of distinct sources would want an LRU here.

#[cfg(test)]
#[path = "assets_test.rs"]
pub(crate) mod assets_test;

use std::collections::HashMap;

/// A decoded asset and its intrinsic size.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAsset<I> {
    pub width: f64,
    pub height: f64,
    pub image: I,
}

/// An asset that could not be fetched or decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load asset {src}: {reason}")]
pub struct AssetError {
    pub src: String,
    pub reason: String,
}

/// A finished load, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetEvent<I> {
    pub src: String,
    pub result: Result<DecodedAsset<I>, AssetError>,
}

/// Asynchronous asset loader supplied by the host.
pub trait AssetSource {
    type Image;

    /// Start loading `src`. Called at most once per source by the cache.
    fn request(&mut self, src: &str);

    /// Loads that finished since the last drain.
    fn drain_completed(&mut self) -> Vec<AssetEvent<Self::Image>>;
}

/// Where a source stands in the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetState<I> {
    Pending,
    Ready(DecodedAsset<I>),
    Failed(AssetError),
}

/// Source identifier → load state.
#[derive(Debug)]
pub struct AssetCache<I> {
    entries: HashMap<String, AssetState<I>>,
}

impl<I> AssetCache<I> {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Look up `src`, asking `source` to load it on first sight.
    ///
    /// Returns the decoded asset only once it is ready; pending and failed
    /// sources both return `None`.
    pub fn resolve<A>(&mut self, src: &str, source: &mut A) -> Option<&DecodedAsset<I>>
    where
        A: AssetSource<Image = I>,
    {
        if !self.entries.contains_key(src) {
            tracing::debug!(%src, "requesting asset");
            source.request(src);
            self.entries.insert(src.to_owned(), AssetState::Pending);
            return None;
        }
        match self.entries.get(src) {
            Some(AssetState::Ready(asset)) => Some(asset),
            _ => None,
        }
    }

    /// Record a finished load. Returns the intrinsic size on success.
    pub fn complete(&mut self, event: AssetEvent<I>) -> Option<(f64, f64)> {
        let AssetEvent { src, result } = event;
        match result {
            Ok(asset) => {
                let size = (asset.width, asset.height);
                tracing::debug!(%src, width = size.0, height = size.1, "asset ready");
                self.entries.insert(src, AssetState::Ready(asset));
                Some(size)
            }
            Err(err) => {
                tracing::warn!(%src, error = %err, "asset failed to load; elements using it are skipped");
                self.entries.insert(src, AssetState::Failed(err));
                None
            }
        }
    }

    #[must_use]
    pub fn state(&self, src: &str) -> Option<&AssetState<I>> {
        self.entries.get(src)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<I> Default for AssetCache<I> {
    fn default() -> Self {
        Self::new()
    }
}
