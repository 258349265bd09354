//! Cleanup system: purges every entity marked PendingRemoval.

use hecs::{Entity, World};

use rebellion_core::enums::Lifecycle;

/// Despawn all PendingRemoval entities.
/// Uses a pre-allocated buffer to avoid per-frame allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, lifecycle) in world.query_mut::<&Lifecycle>() {
        if *lifecycle == Lifecycle::PendingRemoval {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
