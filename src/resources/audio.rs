//! Audio intent mailbox.
//!
//! The core never plays sound itself. Scenes and menus write [`AudioCmd`]s
//! into the ECS `Messages<AudioCmd>` mailbox registered by [`setup_audio`];
//! the frontend takes them out once per frame with [`drain_audio`].

use crate::events::audio::AudioCmd;
use bevy_ecs::prelude::*;

/// Register the `Messages<AudioCmd>` mailbox.
pub fn setup_audio(world: &mut World) {
    world.insert_resource(Messages::<AudioCmd>::default());
}

/// Queue an audio command. Dropped when no mailbox is registered.
pub fn send_audio(world: &mut World, cmd: AudioCmd) {
    if let Some(mut msgs) = world.get_resource_mut::<Messages<AudioCmd>>() {
        msgs.write(cmd);
    }
}

/// Queue a sound effect by id.
pub fn play_fx(world: &mut World, id: &str) {
    send_audio(world, AudioCmd::PlayFx { id: id.to_string() });
}

/// Take every queued command, oldest first.
pub fn drain_audio(world: &mut World) -> Vec<AudioCmd> {
    world
        .get_resource_mut::<Messages<AudioCmd>>()
        .map(|mut msgs| msgs.drain().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_commands_drain_in_order() {
        let mut world = World::new();
        setup_audio(&mut world);
        play_fx(&mut world, "select");
        send_audio(&mut world, AudioCmd::SetSfx(false));
        assert_eq!(
            drain_audio(&mut world),
            vec![
                AudioCmd::PlayFx {
                    id: "select".into()
                },
                AudioCmd::SetSfx(false)
            ]
        );
        assert!(drain_audio(&mut world).is_empty());
    }

    #[test]
    fn without_mailbox_commands_are_dropped() {
        let mut world = World::new();
        play_fx(&mut world, "confirm");
        assert!(drain_audio(&mut world).is_empty());
    }
}
