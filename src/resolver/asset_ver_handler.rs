//! The `assetver:` protocol handler.

use super::json::{asset_version_to_json, lookup_attribute};
use super::UriHandler;
use crate::error::{PipelineError, Result};
use crate::store::Store;
use crate::uri::Uri;
use serde_json::Value;
use std::collections::HashMap;

/// Resolves `assetver:<version_path_id>[?attribute]` or
/// `assetver:<asset_path_id>[?attribute]` URIs.
///
/// When `uri.path` names a concrete version, that version is returned
/// directly. Otherwise `uri.path` is treated as an asset path and
/// resolves to that asset's default version — the latest published one,
/// or the one named by an `LBATTR_locked_asset_versions` override keyed
/// on the URI's own string form.
pub struct AssetVerHandler;

impl AssetVerHandler {
    fn is_concrete_version_path(&self, store: &Store, path: &str) -> Result<bool> {
        match store.get_asset_version_data_from_path_id(path) {
            Ok(_) => Ok(true),
            Err(PipelineError::NotFound(_)) => Ok(false),
            Err(other) => Err(other),
        }
    }
}

impl UriHandler for AssetVerHandler {
    fn accepts(&self, uri: &Uri) -> bool {
        uri.protocol() == "assetver"
    }

    fn fetch(&self, store: &Store, uri: &Uri, locked_versions: &HashMap<String, String>) -> Result<Value> {
        let path = uri.path();

        let version = if self.is_concrete_version_path(store, &path)? {
            store.get_asset_version_data_from_path_id(&path)?
        } else if let Some(locked) = locked_versions.get(&uri.to_string()) {
            // Lock override: propagate NotFound rather than falling back
            // to latest if the locked version has since disappeared.
            store.get_asset_version_data_from_path_id(locked)?
        } else {
            store.get_asset_version_data(&path, None)?
        };

        let value = asset_version_to_json(&version);
        Ok(match uri.query() {
            Some(attribute) => lookup_attribute(&value, attribute),
            None => value,
        })
    }

    fn is_dynamic(&self, store: &Store, uri: &Uri) -> Result<bool> {
        Ok(!self.is_concrete_version_path(store, &uri.path())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::test_store;
    use crate::store::types::{AssetRecord, NewAssetVersion};

    fn asset_with_two_versions(store: &Store) {
        store
            .create_new_asset(
                "generic",
                AssetRecord {
                    path_id: "Foo".to_string(),
                    name: "Foo".to_string(),
                    description: String::new(),
                    type_name: String::new(),
                },
            )
            .unwrap();
        store
            .publish_new_asset_version("Foo", NewAssetVersion::default(), &[])
            .unwrap();
        store
            .publish_new_asset_version("Foo", NewAssetVersion::default(), &[])
            .unwrap();
    }

    #[test]
    fn concrete_version_path_is_not_dynamic() {
        let (_dir, store) = test_store();
        asset_with_two_versions(&store);
        let uri = Uri::parse("assetver:Foo/1").unwrap();
        assert!(!AssetVerHandler.is_dynamic(&store, &uri).unwrap());
        let value = AssetVerHandler.fetch(&store, &uri, &HashMap::new()).unwrap();
        assert_eq!(value["path_id"], "Foo/1");
    }

    #[test]
    fn asset_path_without_lock_resolves_to_latest() {
        let (_dir, store) = test_store();
        asset_with_two_versions(&store);
        let uri = Uri::parse("assetver:Foo").unwrap();
        assert!(AssetVerHandler.is_dynamic(&store, &uri).unwrap());
        let value = AssetVerHandler.fetch(&store, &uri, &HashMap::new()).unwrap();
        assert_eq!(value["path_id"], "Foo/2");
    }

    #[test]
    fn lock_override_pins_to_the_mapped_version() {
        let (_dir, store) = test_store();
        asset_with_two_versions(&store);
        let uri = Uri::parse("assetver:Foo").unwrap();
        let mut locks = HashMap::new();
        locks.insert("assetver:Foo".to_string(), "Foo/1".to_string());
        let value = AssetVerHandler.fetch(&store, &uri, &locks).unwrap();
        assert_eq!(value["path_id"], "Foo/1");
        assert!(AssetVerHandler.is_dynamic(&store, &uri).unwrap());
    }

    #[test]
    fn a_missing_locked_version_is_an_error_not_a_fallback() {
        let (_dir, store) = test_store();
        asset_with_two_versions(&store);
        let uri = Uri::parse("assetver:Foo").unwrap();
        let mut locks = HashMap::new();
        locks.insert("assetver:Foo".to_string(), "Foo/99".to_string());
        assert!(AssetVerHandler.fetch(&store, &uri, &locks).is_err());
    }
}
