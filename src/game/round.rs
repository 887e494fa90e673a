//! The currently visible round of targets

use super::target::{Target, TargetId};
use super::pool::ROUND_SIZE;

/// Visible targets with their live/hit flag. Struck targets stay in the
/// round but become inert.
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    targets: Vec<Target>,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the visible set; every target starts alive
    pub fn activate(&mut self, targets: Vec<Target>) {
        debug_assert!(targets.len() <= ROUND_SIZE);
        self.targets = targets;
        for target in &mut self.targets {
            target.alive = true;
        }
    }

    /// Mark a target as struck. Returns true only when the flag actually flipped;
    /// unknown or already inert targets are left alone.
    pub fn mark_hit(&mut self, id: TargetId) -> bool {
        match self.targets.iter_mut().find(|t| t.id == id) {
            Some(target) if target.alive => {
                target.alive = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn alive_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| t.alive)
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }
}
