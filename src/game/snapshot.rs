//! Snapshot building for network transmission

use chrono::Utc;
use std::time::Instant;

use crate::ws::protocol::{FeedbackSnapshot, GameSnapshot, HudInfo, ServerMsg, TargetSnapshot};

use super::controller::{GameController, STARTING_AMMO};
use super::feedback::FeedbackTimer;
use super::session::GallerySession;

pub const HUD_BANNER: &str = "Click to shoot • Find the real enemy";
pub const CAMERA_POSITION: [f32; 3] = [-7.6, 0.7, 0.0];
pub const CAMERA_FOV: f32 = 75.0;

/// Builds client-facing views of a session
pub struct SnapshotBuilder;

impl SnapshotBuilder {
    /// Presentation constants sent once in the welcome message
    pub fn hud() -> HudInfo {
        HudInfo {
            banner: HUD_BANNER.to_string(),
            camera_position: CAMERA_POSITION,
            fov: CAMERA_FOV,
            starting_ammo: STARTING_AMMO,
        }
    }

    /// Build a snapshot message
    pub fn build(session: &GallerySession, now: Instant) -> ServerMsg {
        ServerMsg::Snapshot(Self::snapshot(session.controller(), session.feedback(), now))
    }

    pub fn snapshot(
        controller: &GameController,
        feedback: &FeedbackTimer,
        now: Instant,
    ) -> GameSnapshot {
        let targets = controller
            .visible_targets()
            .into_iter()
            .map(|t| TargetSnapshot {
                id: t.id,
                handle: t.handle,
                position: t.position.into(),
                facing: t.facing,
                alive: t.alive,
            })
            .collect();

        GameSnapshot {
            ammo_remaining: controller.ammo_remaining(),
            ammo_label: ammo_label(controller.ammo_remaining()),
            ended: controller.ended(),
            phase: controller.phase(),
            pool_remaining: controller.pool_remaining(),
            targets,
            feedback: Self::feedback(feedback, now),
        }
    }

    /// Live feedback message with its expiry mapped onto wall-clock time
    fn feedback(feedback: &FeedbackTimer, now: Instant) -> Option<FeedbackSnapshot> {
        feedback.current(now).map(|message| {
            let remaining =
                chrono::Duration::from_std(message.expires_at.saturating_duration_since(now))
                    .unwrap_or_else(|_| chrono::Duration::zero());
            FeedbackSnapshot {
                text: message.text.clone(),
                expires_at: Utc::now() + remaining,
            }
        })
    }
}

/// There is no reserve magazine, so the second number is always zero
pub fn ammo_label(ammo: u32) -> String {
    format!("{} / 0", ammo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::controller::GamePhase;
    use crate::game::feedback::FEEDBACK_DURATION;
    use crate::game::physics::{Ray, Vec3};
    use crate::game::target::ROSTER_SIZE;
    use uuid::Uuid;

    fn upward() -> Ray {
        Ray::new(Vec3::new(-7.6, 0.7, 0.0), Vec3::new(0.0, 1.0, 0.0)).expect("valid ray")
    }

    #[test]
    fn opening_snapshot_matches_fresh_session() {
        let session = GallerySession::new(Uuid::new_v4(), 21);
        let snapshot =
            SnapshotBuilder::snapshot(session.controller(), session.feedback(), Instant::now());

        assert_eq!(snapshot.ammo_remaining, STARTING_AMMO);
        assert_eq!(snapshot.ammo_label, "6 / 0");
        assert!(!snapshot.ended);
        assert_eq!(snapshot.phase, GamePhase::Ready);
        assert_eq!(snapshot.pool_remaining, ROSTER_SIZE - 3);
        assert_eq!(snapshot.targets.len(), 3);
        assert!(snapshot.targets.iter().all(|t| t.alive));
        assert!(snapshot.feedback.is_none());
    }

    #[test]
    fn feedback_appears_until_expiry() {
        let mut session = GallerySession::new(Uuid::new_v4(), 21);
        let now = Instant::now();
        for _ in 0..=STARTING_AMMO {
            session.fire(&upward(), now);
        }

        let snapshot = SnapshotBuilder::snapshot(session.controller(), session.feedback(), now);
        assert!(snapshot.ended);
        assert_eq!(snapshot.ammo_label, "0 / 0");
        let feedback = snapshot.feedback.expect("game over message");
        assert_eq!(feedback.text, "Game Over");
        assert!(feedback.expires_at > Utc::now());

        let later = SnapshotBuilder::snapshot(
            session.controller(),
            session.feedback(),
            now + FEEDBACK_DURATION,
        );
        assert!(later.feedback.is_none());
    }

    #[test]
    fn hud_carries_presentation_constants() {
        let hud = SnapshotBuilder::hud();
        assert_eq!(hud.banner, HUD_BANNER);
        assert_eq!(hud.camera_position, [-7.6, 0.7, 0.0]);
        assert_eq!(hud.starting_ammo, 6);
    }
}
