//! Color Wheel Card Engine
//!
//! Platform-agnostic engine for a pointer-driven circular color-selection
//! card: textual color codecs, RGB/HSV conversion, wheel geometry, the drag
//! state machine, and the entity read/write path. Rendering lives in the
//! `colorwheel-widgets` crate.

pub mod binding;
pub mod card;
pub mod codec;
pub mod color;
pub mod commit;
pub mod config;
pub mod drag;
pub mod geometry;

pub use binding::{BindingError, BindingResult, BoxFuture, EntityBinding, MemoryBinding, ServiceCall};
pub use card::{ColorWheelCard, RenderModel, ValueState};
pub use codec::{ColorFormat, FormatSetting, ParseColorError};
pub use color::{Hsv, Rgb};
pub use commit::{CommitOutcome, PendingCommit};
pub use config::{CardConfig, ConfigError};
pub use drag::{DragController, DragSession, DragState};
pub use geometry::{WheelConfig, WheelGeometry};
