//! Template-triggered version cascades (spec §3 `AssetTemplate`, component C7).
//!
//! Publishing a version of a "trigger" asset can cause every asset
//! template that watches it to publish a new version of its own asset.
//! Each firing re-reads the template fresh (a sibling trigger earlier in
//! the same cascade may have already updated its lock mapping), updates
//! the mapping with this trigger's `asset_path_id -> version_path_id`
//! pair, persists it, and then dependency-wires the produced version to
//! the union of the template's fixed (pre-resolved) version dependencies
//! and every version currently named in the updated lock mapping — not
//! just the trigger that just fired. Each produced version is itself
//! pushed onto the worklist, so a template can in turn trigger further
//! templates.
//!
//! The worklist is not deduplicated: if two trigger paths converge on the
//! same downstream template (a diamond), that template fires once per
//! path and the downstream asset ends up with two new versions. Spec
//! leaves this as an explicit open design question; this crate resolves
//! it in favor of the simpler worklist over a seen-set, matching the
//! original implementation's behavior.

use crate::error::Result;
use crate::store::types::{AssetVersionRecord, NewAssetVersion};
use crate::store::Store;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Runs every template cascade triggered (directly or transitively) by
/// `trigger`, returning the versions produced in trigger order.
pub fn cascade_from(store: &Store, trigger: AssetVersionRecord) -> Result<Vec<AssetVersionRecord>> {
    debug!(trigger = %trigger.path_id, "starting template cascade");
    let mut produced = Vec::new();
    let mut worklist = VecDeque::new();
    worklist.push_back(trigger);

    while let Some(version) = worklist.pop_front() {
        let stubs = store.get_asset_templates_triggered_by(&version.asset_path_id)?;
        for stub in stubs {
            let mut template = store.get_asset_template(&stub.asset_path_id)?;
            template
                .data_producer_task_attrs
                .version_lock_mapping
                .insert(version.asset_path_id.clone(), version.path_id.clone());
            store.update_asset_template_data(
                &template.asset_path_id,
                template.data_producer_task_attrs.clone(),
            )?;

            let fixed_dependencies = store.get_template_fixed_dependencies(&template.asset_path_id)?;
            let mut dependency_path_ids = fixed_dependencies;
            for locked_path_id in template.data_producer_task_attrs.version_lock_mapping.values() {
                if !dependency_path_ids.contains(locked_path_id) {
                    dependency_path_ids.push(locked_path_id.clone());
                }
            }

            let new_version = store.publish_new_asset_version(
                &template.asset_path_id,
                NewAssetVersion {
                    path_id: None,
                    version_id: None,
                    data_producer_task_attrs: template.data_producer_task_attrs,
                },
                &dependency_path_ids,
            )?;
            info!(
                template = %template.asset_path_id,
                produced = %new_version.path_id,
                fired_by = %version.path_id,
                "template fired"
            );
            worklist.push_back(new_version.clone());
            produced.push(new_version);
        }
    }

    Ok(produced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::test_store;
    use crate::store::types::AssetRecord;
    use crate::task_params::GenerationTaskParameters;

    fn asset(store: &Store, name: &str) {
        store
            .create_new_asset(
                "generic",
                AssetRecord {
                    path_id: name.to_string(),
                    name: name.to_string(),
                    description: String::new(),
                    type_name: String::new(),
                },
            )
            .unwrap();
    }

    #[test]
    fn publishing_a_trigger_cascades_into_its_template() {
        let (_dir, store) = test_store();
        asset(&store, "Plate");
        asset(&store, "Render");
        store
            .create_asset_template(
                "Render",
                GenerationTaskParameters::default(),
                &["Plate".to_string()],
                &[],
            )
            .unwrap();

        let plate_v1 = store
            .publish_new_asset_version("Plate", NewAssetVersion::default(), &[])
            .unwrap();
        let produced = cascade_from(&store, plate_v1.clone()).unwrap();

        assert_eq!(produced.len(), 1);
        assert_eq!(produced[0].asset_path_id, "Render");
        assert_eq!(
            produced[0]
                .data_producer_task_attrs
                .version_lock_mapping
                .get("Plate"),
            Some(&plate_v1.path_id)
        );
        assert_eq!(
            store.get_version_dependencies(&produced[0].path_id).unwrap(),
            vec![plate_v1.path_id]
        );
    }

    #[test]
    fn fixed_dependencies_are_unioned_with_the_full_lock_mapping() {
        let (_dir, store) = test_store();
        asset(&store, "Plate");
        asset(&store, "Lut");
        asset(&store, "Render");
        let lut_v1 = store
            .publish_new_asset_version("Lut", NewAssetVersion::default(), &[])
            .unwrap();
        store
            .create_asset_template(
                "Render",
                GenerationTaskParameters::default(),
                &["Plate".to_string()],
                &[lut_v1.path_id.clone()],
            )
            .unwrap();

        let plate_v1 = store
            .publish_new_asset_version("Plate", NewAssetVersion::default(), &[])
            .unwrap();
        let produced = cascade_from(&store, plate_v1.clone()).unwrap();

        let mut deps = store.get_version_dependencies(&produced[0].path_id).unwrap();
        deps.sort();
        let mut expected = vec![lut_v1.path_id, plate_v1.path_id];
        expected.sort();
        assert_eq!(deps, expected);
    }

    #[test]
    fn a_sibling_trigger_accumulates_into_the_same_templates_lock_mapping() {
        let (_dir, store) = test_store();
        asset(&store, "Left");
        asset(&store, "Right");
        asset(&store, "Merge");
        store
            .create_asset_template(
                "Merge",
                GenerationTaskParameters::default(),
                &["Left".to_string(), "Right".to_string()],
                &[],
            )
            .unwrap();

        let left_v1 = store
            .publish_new_asset_version("Left", NewAssetVersion::default(), &[])
            .unwrap();
        let produced_left = cascade_from(&store, left_v1.clone()).unwrap();
        assert_eq!(
            store.get_version_dependencies(&produced_left[0].path_id).unwrap(),
            vec![left_v1.path_id.clone()]
        );

        let right_v1 = store
            .publish_new_asset_version("Right", NewAssetVersion::default(), &[])
            .unwrap();
        let produced_right = cascade_from(&store, right_v1.clone()).unwrap();

        let mut deps = store.get_version_dependencies(&produced_right[0].path_id).unwrap();
        deps.sort();
        let mut expected = vec![left_v1.path_id, right_v1.path_id];
        expected.sort();
        assert_eq!(deps, expected);
    }

    #[test]
    fn cascades_chain_through_multiple_templates() {
        let (_dir, store) = test_store();
        asset(&store, "Plate");
        asset(&store, "Comp");
        asset(&store, "Review");
        store
            .create_asset_template(
                "Comp",
                GenerationTaskParameters::default(),
                &["Plate".to_string()],
                &[],
            )
            .unwrap();
        store
            .create_asset_template(
                "Review",
                GenerationTaskParameters::default(),
                &["Comp".to_string()],
                &[],
            )
            .unwrap();

        let plate_v1 = store
            .publish_new_asset_version("Plate", NewAssetVersion::default(), &[])
            .unwrap();
        let produced = cascade_from(&store, plate_v1).unwrap();

        assert_eq!(produced.len(), 2);
        assert_eq!(produced[0].asset_path_id, "Comp");
        assert_eq!(produced[1].asset_path_id, "Review");
    }

    #[test]
    fn diamond_triggers_are_not_deduplicated() {
        let (_dir, store) = test_store();
        asset(&store, "Left");
        asset(&store, "Right");
        asset(&store, "Merge");
        store
            .create_asset_template(
                "Merge",
                GenerationTaskParameters::default(),
                &["Left".to_string(), "Right".to_string()],
                &[],
            )
            .unwrap();

        let left_v1 = store
            .publish_new_asset_version("Left", NewAssetVersion::default(), &[])
            .unwrap();
        let right_v1 = store
            .publish_new_asset_version("Right", NewAssetVersion::default(), &[])
            .unwrap();

        let mut produced = cascade_from(&store, left_v1).unwrap();
        produced.extend(cascade_from(&store, right_v1).unwrap());

        let merge_versions: Vec<_> = produced.iter().filter(|v| v.asset_path_id == "Merge").collect();
        assert_eq!(merge_versions.len(), 2);
    }
}
