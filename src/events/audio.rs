use bevy_ecs::message::Message;

/// Audio intents raised by scenes and menus, drained by the frontend.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum AudioCmd {
    PlayFx { id: String },
    /// Sound effects switched on or off from the Settings menu.
    SetSfx(bool),
    /// Music switched on or off from the Settings menu.
    SetMusic(bool),
}
