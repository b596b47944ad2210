pub mod action;
pub mod board;
pub mod codec;
pub mod controller;
pub mod error;
pub mod game;
pub mod order;
pub mod particles;
pub mod piece;
pub mod rules;
pub mod scheduler;
pub mod session;
pub mod shape;
pub mod snapshot;
pub mod topology;

pub use action::CoreAction;
pub use board::{Board, ImageInfo};
pub use codec::{decode, encode};
pub use controller::{DragPhase, DragState, InteractionController, Release};
pub use error::{ConfigError, SnapshotError};
pub use order::PaintOrder;
pub use particles::{BurstKind, Particle, ParticleSystem, MAX_PARTICLES};
pub use piece::{Piece, PieceId, PieceIdError};
pub use rules::{BoardConfig, PlayRules, ShapeSettings};
pub use scheduler::{Deadline, FrameScheduler, FrameState};
pub use session::{Hooks, Session, SoundEvent};
pub use shape::{Outline, PathCommand, Rect};
pub use snapshot::{ImportReport, PieceRecord, SavedPuzzle, SAVED_PUZZLE_VERSION};
pub use topology::{CellEdges, EdgeKind, Topology};
