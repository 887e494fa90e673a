//! Gallery simulation modules

pub mod controller;
pub mod feedback;
pub mod physics;
pub mod pool;
pub mod resolver;
pub mod round;
pub mod session;
pub mod snapshot;
pub mod target;

pub use controller::{FireOutcome, GameController, GameEvent, GamePhase, ShotResult, VisibleTarget};
pub use feedback::{FeedbackMessage, FeedbackTimer};
pub use physics::{CapsuleScene, Ray, Vec3};
pub use pool::TargetPool;
pub use resolver::{Hit, HitResolver, Intersector, RenderHandle};
pub use round::RoundState;
pub use session::{GallerySession, RegistryError, SessionInfo, SessionRegistry};
pub use snapshot::SnapshotBuilder;
pub use target::{Target, TargetId, TargetKind};
