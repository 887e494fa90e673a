//! WebSocket protocol message definitions
//! These are the wire types between the browser client and the gallery server

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{GamePhase, RegistryError, RenderHandle, ShotResult, TargetId};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Trigger pulled. The ray goes from the camera through the crosshair.
    Fire {
        /// Client sequence number, echoed in the shot result
        seq: u32,
        /// Camera position in world space
        origin: [f32; 3],
        /// Camera forward vector (need not be normalized)
        direction: [f32; 3],
    },

    /// Ping for latency measurement
    Ping {
        /// Client timestamp
        t: u64,
    },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// First message on a new connection
    Welcome {
        session_id: Uuid,
        server_time: u64,
        hud: HudInfo,
    },

    /// Full game state for the HUD and scene
    Snapshot(GameSnapshot),

    /// Outcome of a fire message
    ShotResult {
        seq: u32,
        accepted: bool,
        result: ShotResult,
        target_id: Option<TargetId>,
    },

    /// The feedback message has expired
    FeedbackCleared,

    /// Error message
    Error {
        code: String,
        message: String,
    },

    /// Pong response
    Pong {
        /// Echo back client timestamp
        t: u64,
    },
}

/// Static presentation settings for the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HudInfo {
    /// Instruction banner shown in the corner
    pub banner: String,
    /// Initial camera position
    pub camera_position: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    pub starting_ammo: u32,
}

/// Game state as the client sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub ammo_remaining: u32,
    /// Ammo counter as displayed, e.g. "5 / 0"
    pub ammo_label: String,
    pub ended: bool,
    pub phase: GamePhase,
    pub pool_remaining: usize,
    pub targets: Vec<TargetSnapshot>,
    pub feedback: Option<FeedbackSnapshot>,
}

/// A visible target. Inert targets are kept so the client can hide them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    pub id: TargetId,
    pub handle: RenderHandle,
    pub position: [f32; 3],
    /// Rotation around the vertical axis in radians
    pub facing: f32,
    pub alive: bool,
}

/// Message currently flashed on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSnapshot {
    pub text: String,
    pub expires_at: DateTime<Utc>,
}

/// Malformed client frames
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Invalid message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Ray must have a finite origin and a non-zero direction")]
    InvalidRay,
}

impl ProtocolError {
    pub fn code(&self) -> &'static str {
        match self {
            ProtocolError::Malformed(_) => "malformed_message",
            ProtocolError::InvalidRay => "invalid_ray",
        }
    }
}

impl From<ProtocolError> for ServerMsg {
    fn from(err: ProtocolError) -> Self {
        ServerMsg::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<RegistryError> for ServerMsg {
    fn from(err: RegistryError) -> Self {
        ServerMsg::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}
