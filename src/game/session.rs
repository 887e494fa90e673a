//! One player's gallery session and the registry of live sessions

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::util::time::unix_millis;

use super::controller::{FireOutcome, GameController, GameEvent};
use super::feedback::FeedbackTimer;
use super::physics::{CapsuleScene, Ray};

/// A running gallery: the controller plus its presentation-side helpers.
/// Owned by exactly one connection task.
pub struct GallerySession {
    id: Uuid,
    controller: GameController,
    feedback: FeedbackTimer,
    scene: CapsuleScene,
}

impl GallerySession {
    pub fn new(id: Uuid, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let controller = GameController::new(&mut rng);
        let mut scene = CapsuleScene::new();
        scene.sync(controller.renderables());

        Self {
            id,
            controller,
            feedback: FeedbackTimer::new(),
            scene,
        }
    }

    /// Fire along `ray`, flash any feedback text and mirror the new round
    /// into the scene
    pub fn fire(&mut self, ray: &Ray, now: Instant) -> FireOutcome {
        let outcome = self.controller.fire(&self.scene, ray);

        for event in &outcome.events {
            if let Some(text) = event.message() {
                self.feedback.show(text, now);
            }
            match event {
                GameEvent::RoundRefreshed {
                    targets,
                    pool_remaining,
                } => {
                    info!(
                        session_id = %self.id,
                        targets,
                        pool_remaining,
                        "Next round drawn"
                    );
                }
                GameEvent::GameOver => {
                    info!(
                        session_id = %self.id,
                        shots_fired = self.controller.shots_fired(),
                        real_hits = self.controller.real_hits(),
                        "Game over"
                    );
                }
                _ => {}
            }
        }

        self.scene.sync(self.controller.renderables());
        outcome
    }

    /// Drop the feedback message if it has run its course
    pub fn expire_feedback(&mut self, now: Instant) -> bool {
        self.feedback.tick(now)
    }

    pub fn feedback_deadline(&self) -> Option<Instant> {
        self.feedback.deadline()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    pub fn feedback(&self) -> &FeedbackTimer {
        &self.feedback
    }

    pub fn scene(&self) -> &CapsuleScene {
        &self.scene
    }
}

/// Bookkeeping for a live session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: Uuid,
    pub seed: u64,
    pub started_at: u64,
}

impl SessionInfo {
    pub fn new(id: Uuid, seed: u64) -> Self {
        Self {
            id,
            seed,
            started_at: unix_millis(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Session limit of {0} reached")]
    Full(usize),

    #[error("Session {0} already registered")]
    Duplicate(Uuid),
}

impl RegistryError {
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::Full(_) => "server_full",
            RegistryError::Duplicate(_) => "duplicate_session",
        }
    }
}

/// Registry of all live sessions
pub struct SessionRegistry {
    sessions: DashMap<Uuid, SessionInfo>,
    active: AtomicUsize,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            active: AtomicUsize::new(0),
            max_sessions,
        }
    }

    /// Claim a slot for `info`. The slot is reserved before the insert, so
    /// concurrent upgrades never push the count past `max_sessions`.
    pub fn register(&self, info: SessionInfo) -> Result<(), RegistryError> {
        self.active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_sessions).then_some(n + 1)
            })
            .map_err(|_| RegistryError::Full(self.max_sessions))?;

        match self.sessions.entry(info.id) {
            Entry::Occupied(_) => {
                self.active.fetch_sub(1, Ordering::AcqRel);
                Err(RegistryError::Duplicate(info.id))
            }
            Entry::Vacant(slot) => {
                slot.insert(info);
                Ok(())
            }
        }
    }

    pub fn remove(&self, id: &Uuid) -> Option<SessionInfo> {
        let (_, info) = self.sessions.remove(id)?;
        self.active.fetch_sub(1, Ordering::AcqRel);
        Some(info)
    }

    pub fn active_sessions(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }
}
