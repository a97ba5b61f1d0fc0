//! Demo scene: a player that gets hit and respawns, and a crowd that waves
//! when the user swipes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tickbus_events::{Entity, Event, ListenerError, Listeners};
use tickbus_input::{KEY_DOWN, KEY_UP, KeyCode, SLIDE, Slide, TOUCHED};
use tracing::info;

use crate::script::HIT_KEY;

/// The player took a hit. Target: the player.
pub const PLAYER_HIT: Event = Event(1);
/// The player is back after [`RESPAWN_DELAY`]. Target: the player.
pub const PLAYER_RESPAWN: Event = Event(2);
/// A crowd member waves. Target: the crowd member; body: the [`Slide`].
pub const WAVE: Event = Event(3);

/// The player entity.
pub const PLAYER: Entity = Entity::from_raw(1);
/// Entities that wave on a swipe.
pub const CROWD: [Entity; 3] = [
    Entity::from_raw(10),
    Entity::from_raw(11),
    Entity::from_raw(12),
];

/// Seconds between a hit and the respawn.
pub const RESPAWN_DELAY: f32 = 0.5;
/// Minimum horizontal travel for a slide to count as a swipe.
pub const SWIPE_MIN_DISTANCE: f32 = 100.0;

/// Diagnostic names for the input and scene events.
pub const NAMES: [(Event, &str); 7] = [
    (KEY_DOWN, "key_down"),
    (KEY_UP, "key_up"),
    (TOUCHED, "touched"),
    (SLIDE, "slide"),
    (PLAYER_HIT, "player_hit"),
    (PLAYER_RESPAWN, "player_respawn"),
    (WAVE, "wave"),
];

/// What the scene observed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Hits taken by the player.
    pub hits: u32,
    /// Completed respawns.
    pub respawns: u32,
    /// Pointer presses seen.
    pub touches: u32,
    /// Crowd members that waved, in delivery order.
    pub waves: Vec<Entity>,
}

/// Scene state shared by the scene's listeners.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    stats: Arc<Mutex<SceneStats>>,
}

impl Scene {
    /// Fresh scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current counters.
    #[must_use]
    pub fn stats(&self) -> SceneStats {
        self.lock().clone()
    }

    /// The scene's listeners, ready for [`tickbus_events::EventBus::registers`].
    #[must_use]
    pub fn listeners(&self) -> Listeners {
        let hits = self.clone();
        let respawns = self.clone();
        let touches = self.clone();
        let waves = self.clone();

        Listeners::new()
            .on_events(&[KEY_DOWN], |_, payload, emitter| {
                if payload.body_as::<KeyCode>() == Some(&KeyCode(HIT_KEY)) {
                    emitter.emit_to(PLAYER_HIT, PLAYER);
                }
                Ok(())
            })
            .on_events(&[PLAYER_HIT], move |_, payload, emitter| {
                let Some(target) = payload.target() else {
                    return Err(ListenerError::rejected("hit without a target"));
                };
                hits.lock().hits += 1;
                emitter.emit_later_to(RESPAWN_DELAY, PLAYER_RESPAWN, target);
                Ok(())
            })
            .on_events(&[PLAYER_RESPAWN], move |_, payload, _| {
                respawns.lock().respawns += 1;
                info!(entity = ?payload.target(), "player respawned");
                Ok(())
            })
            .on_events(&[TOUCHED], move |_, _, _| {
                touches.lock().touches += 1;
                Ok(())
            })
            .on_events(&[SLIDE], |_, payload, emitter| {
                let Some(slide) = payload.body_as::<Slide>().copied() else {
                    return Err(ListenerError::rejected("slide without a body"));
                };
                if slide.delta().x.abs() >= SWIPE_MIN_DISTANCE {
                    let wave = emitter.acquire().with_value(slide);
                    emitter.broadcast(WAVE, &CROWD, wave);
                }
                Ok(())
            })
            .on_events(&[WAVE], move |_, payload, _| {
                if let Some(target) = payload.target() {
                    waves.lock().waves.push(target);
                }
                Ok(())
            })
    }

    fn lock(&self) -> MutexGuard<'_, SceneStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
