//! Platform-agnostic core - shared between the browser build, the CLI and the preview

pub mod chat;
pub mod config;
pub mod field;
pub mod frame;
pub mod gemini;
pub mod geometry;
pub mod markup;
pub mod rng;
pub mod surface;

pub use chat::{ChatBackend, ChatError, ChatRole, ChatState, ScriptedResponder};
pub use config::{ChatConfig, ConfigError, SiteConfig};
pub use field::{Field, FrameStats, Node, Packet};
pub use frame::{CancellationToken, FrameSupervisor, FrameVerdict};
pub use geometry::{Point, Viewport};
pub use markup::{MarkupRenderer, PlainTextRenderer};
pub use rng::{entropy_rng, RandomSource};
pub use surface::{DrawSurface, RecordingSurface, Rgba, SurfaceError};
