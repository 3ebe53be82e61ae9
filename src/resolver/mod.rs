//! URI resolution (spec §4.8, component C8).
//!
//! A small handler registry keyed by registration order: the first
//! handler whose `accepts` returns true for a URI wins; no handler
//! accepting it is `UriNotSupported`. Two handlers are built in —
//! `asset` and `assetver` — matching the two protocols `Uri` strings
//! carry in this registry.

mod asset_handler;
mod asset_ver_handler;
mod json;

use crate::error::{PipelineError, Result};
use crate::store::Store;
use crate::uri::Uri;
use serde_json::Value;
use std::collections::HashMap;

/// A protocol-specific resolution strategy, dispatched on by [`Resolver`].
pub trait UriHandler: Send + Sync {
    /// Whether this handler owns `uri`'s protocol.
    fn accepts(&self, uri: &Uri) -> bool;

    /// Resolves `uri` to its target's data, honoring `locked_versions`
    /// (environment lock overrides keyed by the URI's own string form).
    fn fetch(&self, store: &Store, uri: &Uri, locked_versions: &HashMap<String, String>) -> Result<Value>;

    /// Whether `uri` can resolve to different targets depending on
    /// environment locks.
    fn is_dynamic(&self, store: &Store, uri: &Uri) -> Result<bool>;
}

/// The ordered handler registry.
pub struct Resolver {
    handlers: Vec<Box<dyn UriHandler>>,
}

impl Resolver {
    /// Builds a resolver with the two built-in handlers registered in
    /// spec order (`asset`, then `assetver`).
    pub fn new() -> Resolver {
        Resolver {
            handlers: vec![
                Box::new(asset_handler::AssetHandler),
                Box::new(asset_ver_handler::AssetVerHandler),
            ],
        }
    }

    /// Registers an additional handler, tried after all previously
    /// registered ones.
    pub fn register(&mut self, handler: Box<dyn UriHandler>) {
        self.handlers.push(handler);
    }

    fn dispatch(&self, uri: &Uri) -> Result<&dyn UriHandler> {
        self.handlers
            .iter()
            .find(|h| h.accepts(uri))
            .map(|h| h.as_ref())
            .ok_or_else(|| PipelineError::UriNotSupported(uri.to_string()))
    }

    /// Resolves `uri` against `store`.
    pub fn resolve(&self, store: &Store, uri: &Uri, locked_versions: &HashMap<String, String>) -> Result<Value> {
        self.dispatch(uri)?.fetch(store, uri, locked_versions)
    }

    /// Whether `uri` is dynamic under this resolver's handlers.
    pub fn is_dynamic(&self, store: &Store, uri: &Uri) -> Result<bool> {
        self.dispatch(uri)?.is_dynamic(store, uri)
    }
}

impl Default for Resolver {
    fn default() -> Resolver {
        Resolver::new()
    }
}
