//! Screen transition resource.
//!
//! A [`Transition`] is a timed fade that gates scene changes. While it is
//! active the owning scene must not advance its simulation.
//!
//! ```text
//! Inactive --activate(Cover)--> FadingOut --full cover--> FadingIn --> Inactive
//!                                           (callback)
//! Inactive --activate(Uncover)--------------------------> FadingIn --> Inactive
//!                                           (callback on first update)
//! ```
//!
//! Only one transition runs at a time: [`Transition::activate`] while active
//! is dropped. The callback is returned by [`Transition::update`] instead of
//! being called, so it runs after the resource borrow is released (see
//! [`crate::systems::transition::update_transition`]).

use bevy_ecs::prelude::{Resource, World};
use log::debug;

/// Work deferred to the moment the screen is fully covered.
pub type TransitionCallback = fn(&mut World);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransitionState {
    #[default]
    Inactive,
    /// The screen is being covered.
    FadingOut,
    /// The screen is being uncovered.
    FadingIn,
}

/// Where an activated transition starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FadeDirection {
    /// Cover the screen, run the callback, uncover.
    Cover,
    /// Start fully covered, run the callback, uncover.
    Uncover,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Transition {
    state: TransitionState,
    progress: f32,
    duration: f32,
    callback: Option<TransitionCallback>,
}

impl Transition {
    pub fn new() -> Self {
        Transition::default()
    }

    /// Start a transition. Returns `false`, changing nothing, when one is
    /// already running.
    pub fn activate(
        &mut self,
        direction: FadeDirection,
        duration: f32,
        callback: Option<TransitionCallback>,
    ) -> bool {
        if self.is_active() {
            debug!("Transition already active, request dropped");
            return false;
        }
        self.state = match direction {
            FadeDirection::Cover => TransitionState::FadingOut,
            FadeDirection::Uncover => TransitionState::FadingIn,
        };
        self.progress = 0.0;
        self.duration = duration;
        self.callback = callback;
        debug!("Transition {:?} started, {}s per phase", direction, duration);
        true
    }

    pub fn is_active(&self) -> bool {
        self.state != TransitionState::Inactive
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn has_pending_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// How much of the screen is covered, `0.0..=1.0`.
    pub fn fade_alpha(&self) -> f32 {
        match self.state {
            TransitionState::Inactive => 0.0,
            TransitionState::FadingOut => self.progress,
            TransitionState::FadingIn => 1.0 - self.progress,
        }
    }

    /// Advance by `dt` seconds. Returns the callback on the update the
    /// screen is fully covered; it is handed out exactly once.
    pub fn update(&mut self, dt: f32) -> Option<TransitionCallback> {
        let step = if self.duration > 0.0 {
            dt / self.duration
        } else {
            1.0
        };
        match self.state {
            TransitionState::Inactive => None,
            TransitionState::FadingOut => {
                self.progress = (self.progress + step).clamp(0.0, 1.0);
                if self.progress >= 1.0 {
                    self.state = TransitionState::FadingIn;
                    self.progress = 0.0;
                    debug!("Transition reached full cover");
                    return self.callback.take();
                }
                None
            }
            TransitionState::FadingIn => {
                // Uncover transitions start covered; their callback fires first.
                if let Some(callback) = self.callback.take() {
                    return Some(callback);
                }
                self.progress = (self.progress + step).clamp(0.0, 1.0);
                if self.progress >= 1.0 {
                    self.state = TransitionState::Inactive;
                    self.progress = 0.0;
                    debug!("Transition finished");
                }
                None
            }
        }
    }
}
