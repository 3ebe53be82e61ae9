//! The asset-type factory registry (spec §4.9, component C9).
//!
//! The original system dispatches `type_name` to a hierarchy of
//! polymorphic asset/version subtypes (cache assets, render assets,
//! compose assets, ...); those subtypes are graphics-tool plug-ins and
//! out of scope here (spec §1). What's left, and worth keeping, is the
//! dispatch mechanism itself: a `type_name -> factory` map that
//! `get_asset` consults, with an unknown type reported as `NotFound`
//! rather than silently treated as generic.

use crate::error::{PipelineError, Result};
use crate::registry::Asset;
use crate::store::types::AssetRecord;
use crate::store::Store;
use std::collections::HashMap;
use std::sync::Arc;

/// A factory producing an [`Asset`] handle for a given `type_name`.
pub type AssetFactory = Arc<dyn Fn(Store, String) -> Asset + Send + Sync>;

/// Maps `type_name` to the factory that builds handles for it.
pub struct AssetTypeRegistry {
    factories: HashMap<String, AssetFactory>,
}

impl AssetTypeRegistry {
    /// Builds a registry with only the `"generic"` type registered,
    /// producing a plain [`Asset`] handle.
    pub fn new() -> AssetTypeRegistry {
        let mut registry = AssetTypeRegistry {
            factories: HashMap::new(),
        };
        registry.register("generic", |store, path_id| Asset::new(store, path_id));
        registry
    }

    /// Registers (or replaces) the factory for `type_name`.
    pub fn register(&mut self, type_name: &str, factory: impl Fn(Store, String) -> Asset + Send + Sync + 'static) {
        self.factories.insert(type_name.to_string(), Arc::new(factory));
    }

    /// Creates a new asset of `type_name` and returns its typed handle.
    pub fn create_asset(&self, store: &Store, type_name: &str, asset_data: AssetRecord) -> Result<Asset> {
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| PipelineError::NotFound(format!("asset type {type_name}")))?;
        let created = store.create_new_asset(type_name, asset_data)?;
        Ok(factory(store.clone(), created.path_id))
    }

    /// Looks up an existing asset and dispatches to its registered type's
    /// factory. `NotFound` if the type was never registered.
    pub fn get_asset(&self, store: &Store, path_id: &str) -> Result<Asset> {
        let type_name = store.get_asset_type_name(path_id)?;
        let factory = self
            .factories
            .get(&type_name)
            .ok_or_else(|| PipelineError::NotFound(format!("asset type {type_name}")))?;
        Ok(factory(store.clone(), path_id.to_string()))
    }
}

impl Default for AssetTypeRegistry {
    fn default() -> AssetTypeRegistry {
        AssetTypeRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::test_store;

    #[test]
    fn generic_type_is_registered_by_default() {
        let (_dir, store) = test_store();
        let registry = AssetTypeRegistry::new();
        let asset = registry
            .create_asset(
                &store,
                "generic",
                AssetRecord {
                    path_id: "Foo".to_string(),
                    name: "Foo".to_string(),
                    description: String::new(),
                    type_name: String::new(),
                },
            )
            .unwrap();
        assert_eq!(asset.path_id(), "Foo");
        assert_eq!(registry.get_asset(&store, "Foo").unwrap().path_id(), "Foo");
    }

    #[test]
    fn unknown_type_is_not_found() {
        let (_dir, store) = test_store();
        let registry = AssetTypeRegistry::new();
        let err = registry.create_asset(
            &store,
            "render_asset",
            AssetRecord {
                path_id: "Foo".to_string(),
                name: "Foo".to_string(),
                description: String::new(),
                type_name: String::new(),
            },
        );
        assert!(err.is_err());
    }

    #[test]
    fn custom_factory_is_dispatched_on_lookup() {
        let (_dir, store) = test_store();
        let mut registry = AssetTypeRegistry::new();
        registry.register("cache_asset", |store, path_id| Asset::new(store, path_id));
        store
            .create_new_asset(
                "cache_asset",
                AssetRecord {
                    path_id: "Bar".to_string(),
                    name: "Bar".to_string(),
                    description: String::new(),
                    type_name: String::new(),
                },
            )
            .unwrap();
        assert!(registry.get_asset(&store, "Bar").is_ok());
    }
}
