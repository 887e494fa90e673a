//! Shot classification against the visible round

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::physics::Ray;
use super::target::{TargetId, TargetKind};

/// Opaque renderer-side identity of a target's mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderHandle(pub u64);

/// Intersection capability supplied by whatever draws the scene.
///
/// Returns every candidate the ray passes through with its distance, nearest first.
pub trait Intersector {
    fn intersect(&self, ray: &Ray, candidates: &[RenderHandle]) -> Vec<(RenderHandle, f32)>;
}

/// A target struck by a shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub target_id: TargetId,
    pub kind: TargetKind,
    pub distance: f32,
}

/// An alive target offered to the resolver
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub handle: RenderHandle,
    pub target_id: TargetId,
    pub kind: TargetKind,
}

/// Picks the struck target, if any. Knows nothing about rounds or ammo.
pub struct HitResolver;

impl HitResolver {
    pub fn resolve<I: Intersector + ?Sized>(
        intersector: &I,
        ray: &Ray,
        candidates: &[Candidate],
    ) -> Option<Hit> {
        if candidates.is_empty() {
            return None;
        }

        let by_handle: HashMap<RenderHandle, &Candidate> =
            candidates.iter().map(|c| (c.handle, c)).collect();
        let handles: Vec<RenderHandle> = candidates.iter().map(|c| c.handle).collect();

        // Renderer order breaks ties; only a strictly closer hit replaces the current pick
        let mut best: Option<(RenderHandle, f32)> = None;
        for (handle, distance) in intersector.intersect(ray, &handles) {
            if !by_handle.contains_key(&handle) || !distance.is_finite() {
                continue;
            }
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((handle, distance)),
            }
        }

        best.and_then(|(handle, distance)| {
            by_handle.get(&handle).map(|c| Hit {
                target_id: c.target_id,
                kind: c.kind,
                distance,
            })
        })
    }
}
