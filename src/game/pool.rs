//! Reservoir of not-yet-drawn targets

use std::collections::VecDeque;

use super::target::Target;

/// Targets drawn into a fresh round
pub const ROUND_SIZE: usize = 3;

/// Ordered pool of targets waiting to be shown. Only ever shrinks.
#[derive(Debug, Clone)]
pub struct TargetPool {
    remaining: VecDeque<Target>,
    drawn: usize,
}

impl TargetPool {
    pub fn new(roster: Vec<Target>) -> Self {
        Self {
            remaining: roster.into(),
            drawn: 0,
        }
    }

    /// Take up to `n` targets from the front of the pool.
    /// An empty result means the pool is exhausted.
    pub fn draw(&mut self, n: usize) -> Vec<Target> {
        let count = n.min(self.remaining.len());
        self.drawn += count;
        self.remaining.drain(..count).collect()
    }

    /// Targets still waiting in the pool
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Targets handed out so far
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::target::{generate_roster, TargetId, ROSTER_SIZE};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pool() -> (TargetPool, Vec<TargetId>) {
        let roster = generate_roster(&mut ChaCha8Rng::seed_from_u64(3));
        let order = roster.iter().map(|t| t.id).collect();
        (TargetPool::new(roster), order)
    }

    #[test]
    fn draw_takes_from_the_front_in_order() {
        let (mut pool, order) = pool();
        let first: Vec<TargetId> = pool.draw(ROUND_SIZE).iter().map(|t| t.id).collect();
        let second: Vec<TargetId> = pool.draw(ROUND_SIZE).iter().map(|t| t.id).collect();
        assert_eq!(first, order[0..3]);
        assert_eq!(second, order[3..6]);
    }

    #[test]
    fn size_is_conserved_across_draws() {
        let (mut pool, _) = pool();
        while !pool.is_empty() {
            pool.draw(ROUND_SIZE);
            assert_eq!(pool.len() + pool.drawn(), ROSTER_SIZE);
        }
        assert_eq!(pool.drawn(), ROSTER_SIZE);
    }

    #[test]
    fn short_and_empty_draws_are_not_errors() {
        let (mut pool, _) = pool();
        pool.draw(ROSTER_SIZE - 2);
        assert_eq!(pool.draw(ROUND_SIZE).len(), 2);
        assert!(pool.draw(ROUND_SIZE).is_empty());
        assert!(pool.draw(ROUND_SIZE).is_empty());
        assert_eq!(pool.drawn(), ROSTER_SIZE);
    }
}
