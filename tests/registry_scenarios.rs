//! End-to-end scenarios against the public `Registry` façade.

use pipeline_registry::registry::Registry;
use pipeline_registry::scheduler::InProcessScheduler;
use pipeline_registry::store::types::AssetRecord;
use pipeline_registry::store::Store;
use pipeline_registry::version::VersionId;
use std::collections::HashMap;

fn registry() -> (tempfile::TempDir, Registry) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("registry.db")).unwrap();
    (dir, Registry::new(store))
}

fn make_asset(registry: &Registry, name: &str) -> pipeline_registry::Asset {
    registry
        .create_asset(
            "generic",
            AssetRecord {
                path_id: name.to_string(),
                name: name.to_string(),
                description: String::new(),
                type_name: String::new(),
            },
        )
        .unwrap()
}

#[test]
fn s1_publish_and_allocate() {
    let (_dir, registry) = registry();
    let foo = make_asset(&registry, "Foo");

    let first = &registry
        .publish_new_asset_version("Foo", None, Default::default(), &[])
        .unwrap()[0];
    assert_eq!(first.data().unwrap().version_id, VersionId(1, -1, -1));
    assert_eq!(first.path_id(), "Foo/1");

    let second = &registry
        .publish_new_asset_version("Foo", None, Default::default(), &[])
        .unwrap()[0];
    assert_eq!(second.data().unwrap().version_id, VersionId(2, -1, -1));
    let _ = foo;
}

#[test]
fn s2_explicit_precision() {
    let (_dir, registry) = registry();
    make_asset(&registry, "Foo");

    let v3 = &registry
        .publish_new_asset_version("Foo", Some(VersionId(3, -1, -1)), Default::default(), &[])
        .unwrap()[0];
    assert_eq!(v3.data().unwrap().version_id.denormalize(), pipeline_registry::version::VersionSpec::Scalar(3));

    let v31 = &registry
        .publish_new_asset_version("Foo", Some(VersionId(3, 1, -1)), Default::default(), &[])
        .unwrap()[0];
    assert_eq!(v31.data().unwrap().version_id.denormalize(), pipeline_registry::version::VersionSpec::Pair(3, 1));

    let v312 = &registry
        .publish_new_asset_version("Foo", Some(VersionId(3, 1, 2)), Default::default(), &[])
        .unwrap()[0];
    assert_eq!(
        v312.data().unwrap().version_id.denormalize(),
        pipeline_registry::version::VersionSpec::Triple(3, 1, 2)
    );
}

#[test]
fn s3_dedup_compute() {
    let (_dir, registry) = registry();
    make_asset(&registry, "Foo");
    let version = &registry
        .publish_new_asset_version("Foo", None, Default::default(), &[])
        .unwrap()[0];

    let scheduler = InProcessScheduler::new();
    scheduler.add_task_completion_callback_receiver(std::sync::Arc::new(registry.store().clone()));
    let fut1 = version.schedule_data_calculation_if_needed(scheduler.as_ref()).unwrap();
    let fut2 = version.schedule_data_calculation_if_needed(scheduler.as_ref()).unwrap();
    assert_eq!(scheduler.dispatched_job(version.path_id()), scheduler.dispatched_job(version.path_id()));
    assert!(!fut1.is_result_ready());
    assert!(!fut2.is_result_ready());

    let event_id = scheduler.dispatched_job(version.path_id()).unwrap();
    scheduler.complete_job(&event_id, serde_json::json!({"done": true})).unwrap();
    assert!(version.data().unwrap().data.is_some());
}

#[test]
fn s4_template_cascade() {
    let (_dir, registry) = registry();
    make_asset(&registry, "A");
    make_asset(&registry, "B");
    registry
        .store()
        .create_asset_template("B", Default::default(), &["A".to_string()], &[])
        .unwrap();

    let produced = registry
        .publish_new_asset_version("A", Some(VersionId(5, -1, -1)), Default::default(), &[])
        .unwrap();

    assert_eq!(produced.len(), 2);
    let a5 = &produced[0];
    let cascaded_b = &produced[1];
    assert_eq!(cascaded_b.dependencies().unwrap(), vec![a5.path_id().to_string()]);
    assert_eq!(
        cascaded_b.data().unwrap().data_producer_task_attrs.version_lock_mapping.get("A"),
        Some(&a5.path_id().to_string())
    );
}

#[test]
fn s5_uri_resolution_with_lock() {
    let (_dir, registry) = registry();
    make_asset(&registry, "Foo");
    registry.publish_new_asset_version("Foo", None, Default::default(), &[]).unwrap();
    registry.publish_new_asset_version("Foo", None, Default::default(), &[]).unwrap();

    let mut locks = HashMap::new();
    locks.insert("assetver:Foo".to_string(), "Foo/1".to_string());
    let locked = registry.resolve("assetver:Foo", &locks).unwrap();
    assert_eq!(locked["path_id"], "Foo/1");
    assert!(registry.is_dynamic("assetver:Foo").unwrap());

    let unlocked = registry.resolve("assetver:Foo", &HashMap::new()).unwrap();
    assert_eq!(unlocked["path_id"], "Foo/2");
}

#[test]
fn s6_leaf_detection() {
    let (_dir, registry) = registry();
    for name in ["X", "Y", "Z"] {
        make_asset(&registry, name);
    }
    let z1 = &registry.publish_new_asset_version("Z", None, Default::default(), &[]).unwrap()[0];
    let y1 = &registry
        .publish_new_asset_version("Y", None, Default::default(), &[z1.path_id().to_string()])
        .unwrap()[0];
    let x1 = &registry
        .publish_new_asset_version("X", None, Default::default(), &[y1.path_id().to_string()])
        .unwrap()[0];

    let leaves = registry.store().get_leaf_asset_version_pathids().unwrap();
    assert_eq!(leaves, vec![x1.path_id().to_string()]);
}
