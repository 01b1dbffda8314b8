//! Transition update system.
//!
//! Advances the [`Transition`] resource by the frame delta and runs its
//! callback once the screen is fully covered. The callback receives the
//! whole world, so it may reset a stage or request a scene change through
//! [`NextScene`](crate::resources::scene::NextScene); the scene manager
//! applies such a request after this system returns.
use bevy_ecs::prelude::*;

use crate::resources::transition::Transition;
use crate::resources::worldtime::WorldTime;

/// Advance the transition and run its callback at full cover.
///
/// Returns `true` when a callback ran this frame.
pub fn update_transition(world: &mut World) -> bool {
    let dt = world
        .get_resource::<WorldTime>()
        .map(|t| t.delta)
        .unwrap_or(0.0);
    let callback = {
        let Some(mut transition) = world.get_resource_mut::<Transition>() else {
            return false;
        };
        transition.update(dt)
    };
    match callback {
        Some(callback) => {
            callback(world);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::transition::FadeDirection;
    use crate::systems::time::update_world_time;

    #[derive(Resource, Default)]
    struct Hits(u32);

    fn hit(world: &mut World) {
        world.resource_mut::<Hits>().0 += 1;
    }

    #[test]
    fn callback_runs_with_world_access() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(Hits::default());
        let mut transition = Transition::new();
        transition.activate(FadeDirection::Cover, 0.5, Some(hit));
        world.insert_resource(transition);

        let mut fired = 0;
        for _ in 0..10 {
            update_world_time(&mut world, 0.25);
            if update_transition(&mut world) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert_eq!(world.resource::<Hits>().0, 1);
        assert!(!world.resource::<Transition>().is_active());
    }

    #[test]
    fn missing_resource_is_a_no_op() {
        let mut world = World::new();
        assert!(!update_transition(&mut world));
    }
}
