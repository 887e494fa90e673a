//! Gallery targets and session roster generation

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fmt;

use super::physics::Vec3;

/// Targets per session
pub const ROSTER_SIZE: usize = 48;
/// Real targets per session (the rest are decoys)
pub const REAL_TARGETS: usize = 16;

/// Placement bounds for freshly generated targets
pub const SPAWN_X_RANGE: (f32, f32) = (-5.0, -1.0);
pub const SPAWN_Z_RANGE: (f32, f32) = (-3.0, 3.0);
pub const SPAWN_HEIGHT: f32 = 0.5;

/// Stable identity of a target within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub u32);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target-{}", self.0)
    }
}

/// Whether a target is the genuine goal or a decoy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Real,
    Fake,
}

/// A single gallery target
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub is_real: bool,
    pub position: Vec3,
    /// Rotation around the vertical axis in radians
    pub facing: f32,
    pub alive: bool,
}

impl Target {
    pub fn new(id: TargetId, is_real: bool, position: Vec3, facing: f32) -> Self {
        Self {
            id,
            is_real,
            position,
            facing,
            alive: true,
        }
    }

    pub fn kind(&self) -> TargetKind {
        if self.is_real {
            TargetKind::Real
        } else {
            TargetKind::Fake
        }
    }
}

/// Build the full session roster: 16 real and 32 fake targets at random
/// spots in the gallery, shuffled once. Ids follow the shuffled order so
/// they carry nothing about which targets are real.
pub fn generate_roster<R: Rng + ?Sized>(rng: &mut R) -> Vec<Target> {
    let mut roster: Vec<Target> = (0..ROSTER_SIZE)
        .map(|i| {
            let position = Vec3::new(
                rng.gen_range(SPAWN_X_RANGE.0..=SPAWN_X_RANGE.1),
                SPAWN_HEIGHT,
                rng.gen_range(SPAWN_Z_RANGE.0..=SPAWN_Z_RANGE.1),
            );
            let facing = rng.gen_range(0.0..TAU);
            Target::new(TargetId(0), i < REAL_TARGETS, position, facing)
        })
        .collect();

    roster.shuffle(rng);
    for (i, target) in roster.iter_mut().enumerate() {
        target.id = TargetId(i as u32);
    }
    roster
}
