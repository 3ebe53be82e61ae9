//! A minimal end-to-end walkthrough: publish a plate, wire a template that
//! renders off it, publish a new plate, and watch the cascade + compute
//! dedup both fire.

use pipeline_registry::registry::Registry;
use pipeline_registry::scheduler::InProcessScheduler;
use pipeline_registry::store::types::AssetRecord;
use pipeline_registry::store::Store;
use pipeline_registry::task_params::GenerationTaskParameters;

fn main() -> pipeline_registry::error::Result<()> {
    pipeline_registry::logging::init_logging("info").ok();

    let dir = tempfile::tempdir().expect("tempdir");
    let store = Store::open(dir.path().join("demo.db"))?;
    let registry = Registry::new(store);

    registry.create_asset(
        "generic",
        AssetRecord {
            path_id: "Plate".to_string(),
            name: "Plate".to_string(),
            description: "raw camera plate".to_string(),
            type_name: String::new(),
        },
    )?;
    registry.create_asset(
        "generic",
        AssetRecord {
            path_id: "Render".to_string(),
            name: "Render".to_string(),
            description: "composited render".to_string(),
            type_name: String::new(),
        },
    )?;
    registry.store().create_asset_template(
        "Render",
        GenerationTaskParameters::default(),
        &["Plate".to_string()],
        &[],
    )?;

    let produced = registry.publish_new_asset_version("Plate", None, GenerationTaskParameters::default(), &[])?;
    println!("publish cascaded into {} version(s):", produced.len());
    for version in &produced {
        println!("  {}", version.path_id());
    }

    let scheduler = InProcessScheduler::new();
    scheduler.add_task_completion_callback_receiver(std::sync::Arc::new(registry.store().clone()));
    let render = &produced[1];
    let fut = render.schedule_data_calculation_if_needed(scheduler.as_ref())?;
    let event_id = scheduler.dispatched_job(render.path_id()).expect("job was dispatched");
    scheduler.complete_job(&event_id, serde_json::json!({"frames": 42}))?;
    println!("render data available: {}", fut.is_result_ready());

    Ok(())
}
