//! Frame-deferred loading.
//!
//! With a scheduler attached, `load()`/`unload()` return immediately and
//! the transitions land a few ticks later, the way a frame loop would
//! drive them.

use lodestone_assets::prelude::*;
use lodestone_assets::units::{SHADER_KIND, register_builtin_processors};
use lodestone_assets::ASSET_UNITS_KEY;

fn main() {
    lodestone_core::logging::init();

    let scheduler = FrameScheduler::new();
    let registry = AssetUnitRegistry::with_config(RegistryConfig {
        auto_generate_ids: true,
        scheduler: Some(scheduler.clone()),
    });
    register_builtin_processors(&registry);

    let source = AssetSource::bytes("pulse.mzshader", b"void main() { /* pulse */ }".to_vec());
    let mut meta = DataRecord::new("meta");
    meta.ensure_child(ASSET_UNITS_KEY)
        .add_child(DataRecord::new(SHADER_KIND));
    registry.create_units_for_source(&source, &meta);

    let unit = registry.get_by_name("pulse.mzshader").expect("registered");

    unit.load();
    println!("frame {}: requested load, state {:?}", scheduler.frame(), unit.loading_state());

    while unit.loading_state().is_loading() {
        scheduler.tick();
        println!("frame {}: state {:?}", scheduler.frame(), unit.loading_state());
    }

    unit.unload();
    println!("frame {}: requested unload, state {:?}", scheduler.frame(), unit.loading_state());

    while unit.loading_state().is_unloading() {
        scheduler.tick();
        println!("frame {}: state {:?}", scheduler.frame(), unit.loading_state());
    }
}
