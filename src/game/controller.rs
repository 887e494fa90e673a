//! Ammo, rounds and game-over: the gallery state machine

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::physics::{Ray, Vec3};
use super::pool::{TargetPool, ROUND_SIZE};
use super::resolver::{Candidate, HitResolver, Intersector, RenderHandle};
use super::round::RoundState;
use super::target::{generate_roster, Target, TargetId, TargetKind};

/// Rounds in the magazine at session start
pub const STARTING_AMMO: u32 = 6;

pub const SUCCESS_TEXT: &str = "wagmi";
pub const WASTED_AMMO_TEXT: &str = "goodluck wasting ammo!";
pub const GAME_OVER_TEXT: &str = "Game Over";

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Magazine loaded and first round drawn, nothing fired yet
    Ready,
    /// At least one shot taken, game still running
    RoundActive,
    /// Fired on an empty magazine; terminal
    GameOver,
}

/// What a fire action amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotResult {
    Miss,
    Fake,
    Real,
    GameOver,
}

/// Outcome events for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A real target was found
    Success,
    /// A decoy was shot
    WastedAmmo,
    /// Fired with nothing left in the magazine
    GameOver,
    /// A new round replaced the visible targets
    RoundRefreshed { targets: usize, pool_remaining: usize },
}

impl GameEvent {
    /// Text to flash on screen, if this event has any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            GameEvent::Success => Some(SUCCESS_TEXT),
            GameEvent::WastedAmmo => Some(WASTED_AMMO_TEXT),
            GameEvent::GameOver => Some(GAME_OVER_TEXT),
            GameEvent::RoundRefreshed { .. } => None,
        }
    }
}

/// Result of a single `fire` call
#[derive(Debug, Clone, PartialEq)]
pub struct FireOutcome {
    /// Whether the shot consumed ammo
    pub accepted: bool,
    pub result: ShotResult,
    pub target: Option<TargetId>,
    pub events: Vec<GameEvent>,
}

impl FireOutcome {
    fn game_over() -> Self {
        Self {
            accepted: false,
            result: ShotResult::GameOver,
            target: None,
            events: vec![GameEvent::GameOver],
        }
    }
}

/// Read-only view of a visible target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleTarget {
    pub id: TargetId,
    pub handle: RenderHandle,
    pub position: Vec3,
    pub facing: f32,
    pub alive: bool,
}

/// The single long-lived game object of a session. All mutation goes
/// through `fire`.
#[derive(Debug)]
pub struct GameController {
    pool: TargetPool,
    round: RoundState,
    ammo_remaining: u32,
    ended: bool,
    phase: GamePhase,
    /// Renderer handle -> target for the current round
    handles: HashMap<RenderHandle, TargetId>,
    handle_by_target: HashMap<TargetId, RenderHandle>,
    next_handle: u64,
    shots_fired: u32,
    real_hits: u32,
}

impl GameController {
    /// Start a session with a freshly shuffled roster
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_roster(generate_roster(rng))
    }

    /// Start a session from a prepared roster, in draw order
    pub fn with_roster(roster: Vec<Target>) -> Self {
        let mut controller = Self {
            pool: TargetPool::new(roster),
            round: RoundState::new(),
            ammo_remaining: STARTING_AMMO,
            ended: false,
            phase: GamePhase::Ready,
            handles: HashMap::new(),
            handle_by_target: HashMap::new(),
            next_handle: 1,
            shots_fired: 0,
            real_hits: 0,
        };
        controller.next_round();
        controller
    }

    /// Handle one trigger pull
    pub fn fire<I: Intersector + ?Sized>(&mut self, intersector: &I, ray: &Ray) -> FireOutcome {
        if self.ended {
            return FireOutcome::game_over();
        }

        if self.ammo_remaining == 0 {
            self.ended = true;
            self.phase = GamePhase::GameOver;
            debug!(shots_fired = self.shots_fired, "Fired on empty magazine, game over");
            return FireOutcome::game_over();
        }

        self.ammo_remaining -= 1;
        self.shots_fired += 1;
        self.phase = GamePhase::RoundActive;

        let candidates = self.candidates();
        let Some(hit) = HitResolver::resolve(intersector, ray, &candidates) else {
            debug!(ammo = self.ammo_remaining, "Shot missed");
            return FireOutcome {
                accepted: true,
                result: ShotResult::Miss,
                target: None,
                events: Vec::new(),
            };
        };

        self.round.mark_hit(hit.target_id);

        match hit.kind {
            TargetKind::Fake => {
                debug!(target_id = %hit.target_id, ammo = self.ammo_remaining, "Decoy hit");
                FireOutcome {
                    accepted: true,
                    result: ShotResult::Fake,
                    target: Some(hit.target_id),
                    events: vec![GameEvent::WastedAmmo],
                }
            }
            TargetKind::Real => {
                self.real_hits += 1;
                let targets = self.next_round();
                debug!(
                    target_id = %hit.target_id,
                    ammo = self.ammo_remaining,
                    next_round = targets,
                    pool_remaining = self.pool.len(),
                    "Real target hit"
                );
                FireOutcome {
                    accepted: true,
                    result: ShotResult::Real,
                    target: Some(hit.target_id),
                    events: vec![
                        GameEvent::Success,
                        GameEvent::RoundRefreshed {
                            targets,
                            pool_remaining: self.pool.len(),
                        },
                    ],
                }
            }
        }
    }

    /// Draw the next round and hand out fresh renderer handles
    fn next_round(&mut self) -> usize {
        let drawn = self.pool.draw(ROUND_SIZE);
        self.handles.clear();
        self.handle_by_target.clear();
        for target in &drawn {
            let handle = RenderHandle(self.next_handle);
            self.next_handle += 1;
            self.handles.insert(handle, target.id);
            self.handle_by_target.insert(target.id, handle);
        }
        self.round.activate(drawn);
        self.round.len()
    }

    /// Alive targets of the round, in round order
    fn candidates(&self) -> Vec<Candidate> {
        self.round
            .alive_targets()
            .filter_map(|t| {
                self.handle_by_target.get(&t.id).map(|handle| Candidate {
                    handle: *handle,
                    target_id: t.id,
                    kind: t.kind(),
                })
            })
            .collect()
    }

    pub fn ammo_remaining(&self) -> u32 {
        self.ammo_remaining
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn pool_remaining(&self) -> usize {
        self.pool.len()
    }

    pub fn pool_drawn(&self) -> usize {
        self.pool.drawn()
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    pub fn real_hits(&self) -> u32 {
        self.real_hits
    }

    /// Target behind a renderer handle of the current round
    pub fn target_for_handle(&self, handle: RenderHandle) -> Option<&Target> {
        self.handles
            .get(&handle)
            .and_then(|id| self.round.get(*id))
    }

    pub fn handle_for_target(&self, id: TargetId) -> Option<RenderHandle> {
        self.handle_by_target.get(&id).copied()
    }

    /// Snapshot of the visible round
    pub fn visible_targets(&self) -> Vec<VisibleTarget> {
        self.round
            .targets()
            .iter()
            .filter_map(|t| {
                self.handle_for_target(t.id).map(|handle| VisibleTarget {
                    id: t.id,
                    handle,
                    position: t.position,
                    facing: t.facing,
                    alive: t.alive,
                })
            })
            .collect()
    }

    /// Renderables that can still be hit
    pub fn renderables(&self) -> Vec<(RenderHandle, Vec3)> {
        self.visible_targets()
            .into_iter()
            .filter(|t| t.alive)
            .map(|t| (t.handle, t.position))
            .collect()
    }
}
