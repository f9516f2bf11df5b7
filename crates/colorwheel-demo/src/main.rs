//! Minimal native host stand-in: one card over an in-memory binding.

use colorwheel_core::{CardConfig, ColorWheelCard, MemoryBinding};
use colorwheel_widgets::ColorWheel;
use eframe::egui;
use std::sync::Arc;

const ENTITY: &str = "input_text.accent_color";

fn main() -> eframe::Result {
    env_logger::init();
    log::info!("Starting color wheel demo");

    let binding = Arc::new(MemoryBinding::new());
    binding.set_entity(ENTITY, "#3B82F6");

    let config = CardConfig::from_json(serde_json::json!({
        "entity": ENTITY,
        "title": "Accent Color",
        "format": "auto",
    }))
    .expect("demo config is valid");
    let card = ColorWheelCard::new(config, binding.clone()).expect("demo config is valid");

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Color Wheel",
        options,
        Box::new(|_cc| Ok(Box::new(DemoApp { card, binding }))),
    )
}

struct DemoApp {
    card: ColorWheelCard<MemoryBinding>,
    binding: Arc<MemoryBinding>,
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // The host pushes state each frame; the card decides what changed.
        self.card.refresh();

        egui::CentralPanel::default().show(ctx, |ui| {
            let output = ColorWheel::new(&mut self.card).show(ui);
            if let Some(commit) = output.commit {
                // Memory binding futures resolve immediately; a real host
                // would drive this fire-and-forget.
                let value = commit.value.clone();
                let outcome = pollster::block_on(commit.execute(self.binding.clone()));
                log::info!("committed {value}: {outcome:?}");
            }
        });
    }
}
