//! The `asset:` protocol handler.

use super::json::{asset_to_json, lookup_attribute};
use super::UriHandler;
use crate::error::Result;
use crate::store::Store;
use crate::uri::Uri;
use serde_json::Value;
use std::collections::HashMap;

/// Resolves `asset:<asset_path_id>[?attribute]` URIs. Never dynamic: an
/// asset's identity doesn't depend on any lock state.
pub struct AssetHandler;

impl UriHandler for AssetHandler {
    fn accepts(&self, uri: &Uri) -> bool {
        uri.protocol() == "asset"
    }

    fn fetch(&self, store: &Store, uri: &Uri, _locked_versions: &HashMap<String, String>) -> Result<Value> {
        let asset = store.get_asset_data(&uri.path())?;
        let value = asset_to_json(&asset);
        Ok(match uri.query() {
            Some(attribute) => lookup_attribute(&value, attribute),
            None => value,
        })
    }

    fn is_dynamic(&self, _store: &Store, _uri: &Uri) -> Result<bool> {
        Ok(false)
    }
}
