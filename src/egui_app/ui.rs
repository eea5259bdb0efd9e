//! egui renderer for the player surface.

use std::time::Instant;

use eframe::egui::{self, Color32, Frame, RichText, Ui};

use crate::egui_app::controller::{POSITION_POLL_INTERVAL, PlayerController, PlayerMessage};

/// Minimum viewport size for the control surface.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::Vec2::new(420.0, 300.0);

const PLAY_FILL: Color32 = Color32::from_rgb(46, 139, 87);
const STOP_FILL: Color32 = Color32::from_rgb(150, 64, 58);

/// Renders the egui UI using the shared controller state.
pub struct PlayerApp {
    controller: PlayerController,
    visuals_set: bool,
    last_position_poll: Option<Instant>,
}

impl PlayerApp {
    /// Create the app, loading persisted configuration.
    pub fn new() -> Result<Self, String> {
        let mut controller = PlayerController::new();
        controller
            .load_configuration()
            .map_err(|err| format!("Failed to load config: {err}"))?;
        Ok(Self {
            controller,
            visuals_set: false,
            last_position_poll: None,
        })
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = Color32::from_rgb(12, 12, 12);
        visuals.panel_fill = Color32::from_rgb(16, 16, 16);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    /// Fixed-interval position poll, running only while playback is active.
    fn poll_position(&mut self, ctx: &egui::Context) {
        if !self.controller.is_playing() {
            self.last_position_poll = None;
            return;
        }
        let now = Instant::now();
        let due = self
            .last_position_poll
            .is_none_or(|last| now.duration_since(last) >= POSITION_POLL_INTERVAL);
        if due {
            self.controller.dispatch(PlayerMessage::TimerTick);
            self.last_position_poll = Some(now);
        }
        ctx.request_repaint_after(POSITION_POLL_INTERVAL);
    }

    fn render_header(&mut self, ui: &mut Ui) {
        let title = self
            .controller
            .ui
            .loaded_file
            .clone()
            .unwrap_or_else(|| "No file loaded".into());
        ui.label(RichText::new(title).color(Color32::WHITE).size(16.0));
        ui.add_space(8.0);
    }

    fn render_transport_buttons(&mut self, ui: &mut Ui) {
        let controls = self.controller.ui.controls;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(controls.open, egui::Button::new("Open File"))
                .clicked()
            {
                self.controller.dispatch(PlayerMessage::OpenRequested);
            }
            if ui
                .add_enabled(
                    controls.play,
                    egui::Button::new(RichText::new("Play").color(Color32::WHITE)).fill(PLAY_FILL),
                )
                .clicked()
            {
                self.controller.dispatch(PlayerMessage::PlayRequested);
            }
            if ui
                .add_enabled(controls.pause, egui::Button::new("Pause"))
                .clicked()
            {
                self.controller.dispatch(PlayerMessage::PauseRequested);
            }
            if ui
                .add_enabled(
                    controls.stop,
                    egui::Button::new(RichText::new("Stop").color(Color32::WHITE)).fill(STOP_FILL),
                )
                .clicked()
            {
                self.controller.dispatch(PlayerMessage::StopRequested);
            }
        });
    }

    fn render_position_slider(&mut self, ui: &mut Ui) {
        let duration = self.controller.ui.position.duration;
        let mut value = self.controller.ui.position.value;
        let enabled = self.controller.ui.loaded_file.is_some() && duration > 0.0;
        let slider = egui::Slider::new(&mut value, 0.0..=duration.max(f64::EPSILON))
            .text("Time")
            .custom_formatter(|seconds, _| format_timestamp(seconds));
        let response = ui.add_enabled(enabled, slider);
        // Display updates while dragging must not fight the user's hand.
        self.controller.ui.position.dragging = response.dragged();
        if response.changed() {
            self.controller
                .dispatch(PlayerMessage::PositionDragged(value));
        }
    }

    fn render_volume_slider(&mut self, ui: &mut Ui) {
        let mut travel = volume_to_slider(self.controller.ui.volume);
        let slider = egui::Slider::new(&mut travel, 0.0..=1.0)
            .text("Level")
            .custom_formatter(|travel, _| format!("{:.2}", travel * travel))
            .custom_parser(|text| {
                text.parse::<f64>()
                    .ok()
                    .map(|volume| volume.clamp(0.0, 1.0).sqrt())
            });
        if ui.add(slider).changed() {
            self.controller
                .dispatch(PlayerMessage::VolumeChanged(slider_to_volume(travel)));
        }
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::new().fill(Color32::from_rgb(0, 0, 0)))
            .show(ctx, |ui| {
                let status = self.controller.ui.status.clone();
                ui.horizontal(|ui| {
                    ui.add_space(6.0);
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(badge_rect.center(), 6.0, status.badge_color);
                    ui.add_space(4.0);
                    ui.label(RichText::new(&status.badge_label).color(Color32::WHITE));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(Color32::WHITE));
                });
            });
    }
}

impl eframe::App for PlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.tick();
        self.poll_position(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            self.render_header(ui);
            self.render_transport_buttons(ui);
            ui.add_space(16.0);
            self.render_position_slider(ui);
            ui.add_space(8.0);
            self.render_volume_slider(ui);
        });
    }
}

/// Render seconds as `m:ss` for the position slider readout.
fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Perceptual volume curve: the lower half of the slider travel covers the
/// quiet quarter of the range, so fine control sits where hearing is most
/// sensitive.
fn slider_to_volume(travel: f32) -> f32 {
    travel * travel
}

fn volume_to_slider(volume: f32) -> f32 {
    volume.max(0.0).sqrt()
}
