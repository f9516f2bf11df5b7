//! The color wheel card: configuration, external value state, drag flow,
//! and the pure render description.

use crate::binding::EntityBinding;
use crate::codec::{ColorFormat, FormatSetting};
use crate::color::{Hsv, Rgb};
use crate::commit::PendingCommit;
use crate::config::{CardConfig, ConfigError};
use crate::drag::{DragController, DragSession};
use crate::geometry::WheelGeometry;
use kurbo::Vec2;
use std::sync::Arc;

const DEFAULT_TITLE: &str = "Color Wheel";

/// What the last external read produced.
#[derive(Debug, Clone)]
pub enum ValueState {
    /// The entity is absent or unknown to the host.
    EntityUnavailable,
    /// The raw value could not be decoded as a color.
    Unparseable { raw: String },
    /// A decoded color, with the format detected from the raw value.
    Loaded {
        raw: String,
        detected: Option<ColorFormat>,
        color: Rgb,
        hsv: Hsv,
    },
}

/// Pure description of one rendered frame of the card.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderModel {
    /// Display-only error state; the wheel is not interactive.
    Error { title: String, message: String },
    Wheel {
        title: String,
        /// Diameter of the gradient disc.
        diameter: f64,
        /// White border between the gradient and its rim.
        padding: f64,
        /// Thickness of the outer swatch ring.
        ring_thickness: f64,
        /// Marker offset from the wheel center.
        marker_offset: Vec2,
        /// Color of the marker and the outer swatch ring.
        marker_color: Rgb,
        /// The value line under the wheel: the raw external value, or the
        /// formatted preview while a selection is showing.
        value_text: String,
    },
}

/// One color wheel card bound to one entity.
///
/// The two inputs are explicit: configuration enters at construction and
/// the external value enters via [`ColorWheelCard::refresh`]; both feed the
/// pure [`ColorWheelCard::render_model`]. All color math is consolidated
/// here through one [`WheelGeometry`]; the renderer contains none.
pub struct ColorWheelCard<B: EntityBinding> {
    config: CardConfig,
    geometry: WheelGeometry,
    binding: Arc<B>,
    value: ValueState,
    drag: DragController,
    /// Selection retained after release so a failed or still-pending commit
    /// keeps showing the previewed color until the next external read.
    selection: Option<DragSession>,
}

impl<B: EntityBinding> ColorWheelCard<B> {
    /// Create a card, rejecting a configuration without an entity.
    pub fn new(config: CardConfig, binding: Arc<B>) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "color-wheel-card {} bound to {}",
            env!("CARGO_PKG_VERSION"),
            config.entity
        );
        let geometry = WheelGeometry::new(config.wheel());
        let mut card = Self {
            config,
            geometry,
            binding,
            value: ValueState::EntityUnavailable,
            drag: DragController::new(),
            selection: None,
        };
        card.refresh();
        Ok(card)
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }

    pub fn value_state(&self) -> &ValueState {
        &self.value
    }

    pub fn title(&self) -> &str {
        self.config.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Whether pointer events currently do anything. Error states have no
    /// prior color to preview from, so the wheel goes inert.
    pub fn is_interactive(&self) -> bool {
        matches!(self.value, ValueState::Loaded { .. })
    }

    /// Re-read the entity's current value through the binding.
    ///
    /// A valid read clears any prior error state. An active drag keeps
    /// ruling the preview until release; a retained post-release selection
    /// is replaced by the read, whatever it observes.
    pub fn refresh(&mut self) {
        self.value = match self.binding.entity_value(&self.config.entity) {
            None => ValueState::EntityUnavailable,
            Some(raw) => decode_value(raw, self.config.format),
        };
        if !self.drag.is_dragging() {
            self.selection = None;
        }
    }

    /// The concrete output encoding for the next commit: the configured
    /// format, with `auto` resolving against the currently loaded value.
    pub fn output_format(&self) -> ColorFormat {
        let loaded = match &self.value {
            ValueState::Loaded { detected, .. } => *detected,
            _ => None,
        };
        self.config.format.resolve(loaded)
    }

    /// Begin a drag. Offsets are pointer positions relative to the wheel
    /// center, in screen coordinates.
    pub fn pointer_pressed(&mut self, offset: Vec2) {
        if !self.is_interactive() {
            return;
        }
        self.drag.press(&self.geometry, offset);
    }

    /// Update the preview during a drag. No external write.
    pub fn pointer_moved(&mut self, offset: Vec2) {
        self.drag.motion(&self.geometry, offset);
    }

    /// End the drag and produce the single pending write for the host to
    /// drive. Returns `None` when no drag was active.
    pub fn pointer_released(&mut self, offset: Vec2) -> Option<PendingCommit> {
        let session = self.drag.release(&self.geometry, offset)?;
        let value = self.output_format().encode(session.color);
        self.selection = Some(session);
        Some(PendingCommit {
            entity_id: self.config.entity.clone(),
            value,
        })
    }

    /// Abandon any active drag without writing. Called when the card is
    /// removed from the host.
    pub fn teardown(&mut self) {
        self.drag.cancel();
    }

    /// The pure state-to-render-description function.
    pub fn render_model(&self) -> RenderModel {
        let title = self.title().to_string();
        match &self.value {
            ValueState::EntityUnavailable => RenderModel::Error {
                title,
                message: "Entity not found or not specified".to_string(),
            },
            ValueState::Unparseable { raw } => RenderModel::Error {
                title,
                message: format!("Unable to parse color: {raw}"),
            },
            ValueState::Loaded { raw, color, hsv, .. } => {
                let config = self.geometry.config();
                // Preview precedence: an active drag, then a retained
                // post-release selection, then the loaded value verbatim.
                let preview = self.drag.session().copied().or(self.selection);
                let (marker_offset, marker_color, value_text) = match preview {
                    Some(session) => (
                        self.geometry.marker_position(&session.hsv),
                        session.color,
                        self.output_format().encode(session.color),
                    ),
                    None => (self.geometry.marker_position(hsv), *color, raw.clone()),
                };
                RenderModel::Wheel {
                    title,
                    diameter: config.diameter(),
                    padding: config.padding,
                    ring_thickness: config.ring_thickness,
                    marker_offset,
                    marker_color,
                    value_text,
                }
            }
        }
    }
}

fn decode_value(raw: String, format: FormatSetting) -> ValueState {
    let detected = ColorFormat::detect(&raw);
    let Some(concrete) = format.as_concrete().or(detected) else {
        return ValueState::Unparseable { raw };
    };
    match concrete.decode(&raw) {
        Ok(color) => ValueState::Loaded {
            hsv: color.to_hsv(),
            color,
            detected,
            raw,
        },
        Err(_) => ValueState::Unparseable { raw },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{block_on, MemoryBinding};
    use crate::commit::CommitOutcome;
    use serde_json::json;

    const ENTITY: &str = "input_text.accent_color";

    fn card_with(value: &str) -> (ColorWheelCard<MemoryBinding>, Arc<MemoryBinding>) {
        let binding = Arc::new(MemoryBinding::new());
        binding.set_entity(ENTITY, value);
        let config = CardConfig::from_json(json!({"entity": ENTITY})).unwrap();
        let card = ColorWheelCard::new(config, binding.clone()).unwrap();
        (card, binding)
    }

    #[test]
    fn test_missing_entity_rejected_at_construction() {
        let binding = Arc::new(MemoryBinding::new());
        let result = ColorWheelCard::new(CardConfig::stub(), binding);
        assert!(matches!(result, Err(ConfigError::MissingEntity)));
    }

    #[test]
    fn test_unknown_entity_renders_error() {
        let binding = Arc::new(MemoryBinding::new());
        let config = CardConfig::from_json(json!({"entity": ENTITY})).unwrap();
        let card = ColorWheelCard::new(config, binding).unwrap();

        assert!(!card.is_interactive());
        assert!(matches!(
            card.render_model(),
            RenderModel::Error { message, .. }
                if message == "Entity not found or not specified"
        ));
    }

    #[test]
    fn test_malformed_value_yields_error_and_no_writes() {
        let (mut card, binding) = card_with("not-a-color");
        assert!(matches!(card.value_state(), ValueState::Unparseable { .. }));
        assert!(matches!(
            card.render_model(),
            RenderModel::Error { message, .. }
                if message == "Unable to parse color: not-a-color"
        ));

        // Pointer events are ignored in error states.
        card.pointer_pressed(Vec2::new(10.0, 10.0));
        assert!(card.pointer_released(Vec2::new(10.0, 10.0)).is_none());
        assert!(binding.calls().is_empty());

        // The next valid read clears the error.
        binding.set_entity(ENTITY, "#336699");
        card.refresh();
        assert!(card.is_interactive());
    }

    #[test]
    fn test_loaded_marker_matches_decoded_color() {
        let (card, _) = card_with("rgb(255, 0, 0)");
        let ValueState::Loaded { hsv, .. } = card.value_state().clone() else {
            panic!("expected loaded state");
        };

        let RenderModel::Wheel { marker_offset, marker_color, value_text, .. } =
            card.render_model()
        else {
            panic!("expected wheel model");
        };
        assert_eq!(marker_color, Rgb::new(255, 0, 0));
        // The raw value is shown verbatim while no preview is active.
        assert_eq!(value_text, "rgb(255, 0, 0)");
        let expected = card.geometry().marker_position(&hsv);
        assert!((marker_offset.x - expected.x).abs() < 1e-9);
        assert!((marker_offset.y - expected.y).abs() < 1e-9);
    }

    #[test]
    fn test_drag_commits_once_from_final_position() {
        let (mut card, binding) = card_with("#FF0000");
        let p1 = Vec2::new(0.0, -100.0);
        let p2 = Vec2::new(60.0, 0.0);
        let p3 = Vec2::new(0.0, 80.0);

        card.pointer_pressed(p1);
        card.pointer_moved(p2);
        card.pointer_moved(p3);
        let commit = card.pointer_released(p3).unwrap();

        let expected_color = card.geometry().point_to_color(p3).0.to_rgb();
        assert_eq!(commit.entity_id, ENTITY);
        assert_eq!(commit.value, ColorFormat::Hex.encode(expected_color));

        let outcome = block_on(commit.execute(binding.clone()));
        assert_eq!(outcome, CommitOutcome::Primary);
        assert_eq!(binding.calls().len(), 1);
    }

    #[test]
    fn test_click_only_commits_once() {
        let (mut card, binding) = card_with("#FF0000");
        let p1 = Vec2::new(30.0, -40.0);

        card.pointer_pressed(p1);
        let commit = card.pointer_released(p1).unwrap();

        let expected_color = card.geometry().point_to_color(p1).0.to_rgb();
        assert_eq!(commit.value, ColorFormat::Hex.encode(expected_color));

        block_on(commit.execute(binding.clone()));
        assert_eq!(binding.calls().len(), 1);
    }

    #[test]
    fn test_auto_format_follows_loaded_value() {
        let (mut card, _) = card_with("[255, 0, 0]");
        assert_eq!(card.output_format(), ColorFormat::Array);

        card.pointer_pressed(Vec2::new(0.0, -100.0));
        let commit = card.pointer_released(Vec2::new(0.0, -145.0)).unwrap();
        assert_eq!(commit.value, "[255, 0, 0]");
    }

    #[test]
    fn test_explicit_format_overrides_loaded_value() {
        let binding = Arc::new(MemoryBinding::new());
        binding.set_entity(ENTITY, "#FF0000");
        let config =
            CardConfig::from_json(json!({"entity": ENTITY, "format": "rgb"})).unwrap();
        let mut card = ColorWheelCard::new(config, binding).unwrap();

        card.pointer_pressed(Vec2::new(0.0, -145.0));
        let commit = card.pointer_released(Vec2::new(0.0, -145.0)).unwrap();
        assert_eq!(commit.value, "rgb(255, 0, 0)");
    }

    #[test]
    fn test_preview_during_drag_uses_output_format() {
        let (mut card, _) = card_with("#FF0000");
        card.pointer_pressed(Vec2::new(0.0, -145.0));
        card.pointer_moved(Vec2::new(145.0, 0.0));

        let RenderModel::Wheel { value_text, marker_color, .. } = card.render_model() else {
            panic!("expected wheel model");
        };
        let expected = card.geometry().point_to_color(Vec2::new(145.0, 0.0)).0.to_rgb();
        assert_eq!(marker_color, expected);
        assert_eq!(value_text, ColorFormat::Hex.encode(expected));
    }

    #[test]
    fn test_failed_commit_leaves_preview_showing() {
        let (mut card, binding) = card_with("#FF0000");
        binding.fail_service("input_text", "set_value");
        binding.fail_service("homeassistant", "update_entity");

        let rim = Vec2::new(0.0, 145.0);
        card.pointer_pressed(rim);
        let commit = card.pointer_released(rim).unwrap();
        let attempted = card.geometry().point_to_color(rim).0.to_rgb();

        let outcome = block_on(commit.execute(binding.clone()));
        assert_eq!(outcome, CommitOutcome::Failed);
        assert_eq!(binding.calls().len(), 2);

        // No rollback: the model still shows the attempted color.
        let RenderModel::Wheel { marker_color, .. } = card.render_model() else {
            panic!("expected wheel model");
        };
        assert_eq!(marker_color, attempted);

        // The next external read replaces it with host truth.
        card.refresh();
        let RenderModel::Wheel { marker_color, .. } = card.render_model() else {
            panic!("expected wheel model");
        };
        assert_eq!(marker_color, Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_refresh_during_drag_keeps_preview() {
        let (mut card, binding) = card_with("#FF0000");
        let p = Vec2::new(145.0, 0.0);
        card.pointer_pressed(p);

        binding.set_entity(ENTITY, "#00FF00");
        card.refresh();

        let RenderModel::Wheel { marker_color, .. } = card.render_model() else {
            panic!("expected wheel model");
        };
        assert_eq!(marker_color, card.geometry().point_to_color(p).0.to_rgb());
    }

    #[test]
    fn test_teardown_discards_drag_without_write() {
        let (mut card, binding) = card_with("#FF0000");
        card.pointer_pressed(Vec2::new(10.0, 10.0));
        card.pointer_moved(Vec2::new(20.0, 20.0));
        card.teardown();

        assert!(card.pointer_released(Vec2::new(20.0, 20.0)).is_none());
        assert!(binding.calls().is_empty());
    }

    #[test]
    fn test_value_channel_not_preserved_through_edits() {
        // A dim loaded color places the marker by its hue/saturation, but
        // any pointer-derived color is fully bright.
        let (mut card, _) = card_with("#400000");
        let ValueState::Loaded { hsv, .. } = card.value_state().clone() else {
            panic!("expected loaded state");
        };
        assert!(hsv.v < 0.5);

        let offset = card.geometry().marker_position(&hsv);
        card.pointer_pressed(offset);
        let commit = card.pointer_released(offset).unwrap();
        assert_eq!(commit.value, "#FF0000");
    }
}
