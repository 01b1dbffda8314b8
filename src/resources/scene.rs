//! Scene identity and scene change requests.
//!
//! Scenes are a closed set ([`SceneId`]). A scene change is requested by
//! writing [`NextScene`]; the
//! [`SceneManager`](crate::scenes::SceneManager) applies it between
//! updates, never from inside the code that requested it. This is what lets
//! a transition callback ask for a swap at the fade midpoint without the
//! swap running re-entrantly.

use bevy_ecs::prelude::Resource;

use crate::resources::stage::ClearQuality;

/// Every scene the application knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    Title,
    StageMenu,
    Game,
}

impl SceneId {
    pub const ALL: [SceneId; 3] = [SceneId::Title, SceneId::StageMenu, SceneId::Game];

    pub fn name(self) -> &'static str {
        match self {
            SceneId::Title => "title",
            SceneId::StageMenu => "stagemenu",
            SceneId::Game => "game",
        }
    }

    /// Resolve a scene by name. Only used where names come from outside,
    /// such as the command line.
    pub fn from_name(name: &str) -> Option<SceneId> {
        SceneId::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Outcome of a finished stage, handed back to the stage menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageResult {
    /// Stage number, starting at 1.
    pub stage: usize,
    pub quality: ClearQuality,
    /// Go straight on to the next stage.
    pub advance: bool,
}

/// Payload passed to the incoming scene's `on_change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneParam {
    #[default]
    None,
    /// Stage number to load, starting at 1.
    Stage(usize),
    Result(StageResult),
}

/// Representation of a requested scene change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NextScenes {
    #[default]
    Unchanged,
    Pending(SceneId, SceneParam),
}

/// Intent to change the active scene.
#[derive(Resource, Debug, Clone, Default)]
pub struct NextScene {
    next: NextScenes,
}

impl NextScene {
    /// Create a new value initialized to [`NextScenes::Unchanged`].
    pub fn new() -> Self {
        NextScene::default()
    }

    /// Get the current request.
    pub fn get(&self) -> &NextScenes {
        &self.next
    }

    pub fn is_pending(&self) -> bool {
        self.next != NextScenes::Unchanged
    }

    /// Request a change to `scene`. A later request in the same frame
    /// replaces an earlier one.
    pub fn set(&mut self, scene: SceneId, param: SceneParam) {
        self.next = NextScenes::Pending(scene, param);
    }

    /// Take the pending request, leaving [`NextScenes::Unchanged`].
    pub fn take(&mut self) -> Option<(SceneId, SceneParam)> {
        match std::mem::take(&mut self.next) {
            NextScenes::Pending(scene, param) => Some((scene, param)),
            NextScenes::Unchanged => None,
        }
    }

    /// Reset to [`NextScenes::Unchanged`].
    pub fn reset(&mut self) {
        self.next = NextScenes::Unchanged;
    }
}

/// Stage currently selected or being played, starting at 1.
///
/// Menu and transition callbacks are plain function pointers; they read the
/// stage they act on from here.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSelection {
    pub index: usize,
}

impl Default for StageSelection {
    fn default() -> Self {
        StageSelection { index: 1 }
    }
}
