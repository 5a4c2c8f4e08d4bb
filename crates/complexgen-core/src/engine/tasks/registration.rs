use crate::engine::registry::EntityRegistry;
use crate::engine::state::Universe;
use tracing::{info, instrument};

#[instrument(skip_all, name = "registration_task")]
pub fn run(universe: &Universe) -> EntityRegistry {
    let mut registry = EntityRegistry::new();
    for complex in universe.iter() {
        registry.insert(complex.clone());
    }
    info!(species = registry.len(), "Registered species.");
    registry
}
