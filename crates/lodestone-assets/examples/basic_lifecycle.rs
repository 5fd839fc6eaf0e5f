//! Basic asset unit walkthrough.
//!
//! This example shows:
//! - Creating a registry and registering the built-in processors
//! - Hydrating units from a source's metadata record
//! - Synchronous load/unload
//! - Draining registry events
//! - Persisting unit identity back into a record

use lodestone_assets::prelude::*;
use lodestone_assets::units::{SHADER_KIND, SYSTEM_CURSOR_KIND, ShaderUnit, register_builtin_processors};
use lodestone_assets::{ASSET_UNITS_KEY, AUID_KEY, NAME_KEY};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    lodestone_core::logging::init();

    // No scheduler configured: lifecycle transitions run synchronously.
    let registry = AssetUnitRegistry::new();
    register_builtin_processors(&registry);

    // Write a shader file into a temp directory and describe its units.
    let temp_dir = tempfile::tempdir()?;
    let shader_path = temp_dir.path().join("glow.mzshader");
    std::fs::write(&shader_path, "void main() { /* glow */ }")?;

    let mut meta = DataRecord::new("meta");
    {
        let units = meta.ensure_child(ASSET_UNITS_KEY);
        let mut shader = DataRecord::new(SHADER_KIND);
        shader.set(NAME_KEY, "glow");
        shader.set(AUID_KEY, 7u32);
        units.add_child(shader);

        // A cursor record for a file this source does not actually
        // contain bytes for; its load will fail gracefully later.
        units.add_child(DataRecord::new(SYSTEM_CURSOR_KIND));
    }
    println!("metadata: {}", serde_json::to_string_pretty(&meta)?);

    let source = AssetSource::disk(&shader_path);
    let registered = registry.create_units_for_source(&source, &meta);
    println!("registered {} units", registered);

    // Look the shader up by name, then by id, and load it.
    let unit = registry.get_by_name("glow").expect("unit registered");
    println!("state before load: {:?}", unit.loading_state());
    unit.load();
    println!("state after load:  {:?}", unit.loading_state());

    let shader = registry
        .get_as::<ShaderUnit>(unit.id().expect("id assigned"))
        .and_then(|u| u.shader())
        .expect("payload resident");
    println!("shader '{}': {} bytes of source", shader.label, shader.source_text.len());

    // Events accumulated since startup.
    for event in registry.drain_events() {
        println!("event: {:?}", event);
    }

    // Persist the unit's identity back into a record.
    let mut persisted = DataRecord::new(SHADER_KIND);
    unit.core().write_record(&mut persisted);
    println!("persisted: {}", serde_json::to_string(&persisted)?);

    unit.unload();
    println!("state after unload: {:?}", unit.loading_state());

    Ok(())
}
