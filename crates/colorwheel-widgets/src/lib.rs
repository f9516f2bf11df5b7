//! egui rendering for the color wheel card.
//!
//! One widget: [`ColorWheel`], which paints a card's render model and
//! translates egui pointer interactions into card events. It contains no
//! color math of its own.

pub mod wheel;

pub use wheel::{to_color32, ColorWheel, ColorWheelResponse};
