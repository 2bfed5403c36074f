//! Floating parameter panel.
//!
//! Sliders and color buttons edit [`GalaxyParams`] in place. Regeneration
//! is expensive at high counts, so edits are only *committed* once they are
//! finished: a slider drag commits when the pointer is released, a value
//! typed into a slider's number box commits on Enter or when the box loses
//! focus.

use std::path::PathBuf;

use crate::params::{
    GalaxyParams, ParamRange, BRANCHES_RANGE, COUNT_RANGE, RADIUS_RANGE, RANDOMNESS_POW_RANGE,
    SIZE_RANGE, SPIN_RANGE,
};

/// Turns a stream of per-frame "something changed" flags into "change
/// finished" events.
#[derive(Debug, Default, Clone)]
pub struct CommitTracker {
    pending: bool,
}

impl CommitTracker {
    /// Feed one frame. Returns `true` on the frame an edit is finished.
    pub fn observe(&mut self, changed: bool, pointer_down: bool) -> bool {
        self.pending |= changed;
        if self.pending && !pointer_down {
            self.pending = false;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Numbers shown in the panel footer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelStats {
    pub points: usize,
    pub fps: f32,
}

/// What the panel asks the viewer to do this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelOutput {
    /// Build a new galaxy from the current parameters.
    pub regenerate: bool,
    /// Write the current parameters to the preset path.
    pub save: bool,
}

pub struct Panel {
    tracker: CommitTracker,
    preset_path: Option<PathBuf>,
    status: Option<String>,
}

impl Panel {
    pub fn new(preset_path: Option<PathBuf>) -> Self {
        Self {
            tracker: CommitTracker::default(),
            preset_path,
            status: None,
        }
    }

    pub fn preset_path(&self) -> Option<&PathBuf> {
        self.preset_path.as_ref()
    }

    /// One-line message shown under the buttons (e.g. save results).
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Draw the panel and report what happened.
    pub fn show(&mut self, ctx: &egui::Context, params: &mut GalaxyParams, stats: PanelStats) -> PanelOutput {
        let mut output = PanelOutput::default();
        let mut changed = false;

        egui::Window::new("Galaxy")
            .default_width(400.0)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("galaxy_params")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        changed |= slider(ui, "count", &mut params.count, COUNT_RANGE);
                        changed |= slider(ui, "size", &mut params.size, SIZE_RANGE);
                        changed |= slider(ui, "radius", &mut params.radius, RADIUS_RANGE);
                        changed |= slider(ui, "branches", &mut params.branches, BRANCHES_RANGE);
                        changed |= slider(ui, "spin", &mut params.spin, SPIN_RANGE);
                        changed |= slider(ui, "randomness pow", &mut params.randomness_pow, RANDOMNESS_POW_RANGE);

                        ui.label("inside color");
                        changed |= ui.color_edit_button_srgb(&mut params.inside_color.0).changed();
                        ui.end_row();

                        ui.label("outside color");
                        changed |= ui.color_edit_button_srgb(&mut params.outside_color.0).changed();
                        ui.end_row();
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Regenerate").clicked() {
                        output.regenerate = true;
                    }
                    if ui.button("Reset").clicked() {
                        *params = GalaxyParams::default();
                        output.regenerate = true;
                    }
                    if self.preset_path.is_some() && ui.button("Save preset").clicked() {
                        output.save = true;
                    }
                });

                ui.label(format!("{} points, {:.0} fps", stats.points, stats.fps));
                if let Some(status) = &self.status {
                    ui.weak(status);
                }
            });

        let pointer_down = ctx.input(|i| i.pointer.any_down());
        if self.tracker.observe(changed, pointer_down) {
            output.regenerate = true;
        }
        output
    }
}

fn slider<T: egui::emath::Numeric>(ui: &mut egui::Ui, label: &str, value: &mut T, range: ParamRange<T>) -> bool {
    ui.label(label);
    let changed = ui
        .add(
            egui::Slider::new(value, range.range())
                .step_by(range.step.to_f64())
                // Typed text lands once, on Enter or focus loss.
                .update_while_editing(false),
        )
        .changed();
    ui.end_row();
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_commits_once_on_release() {
        let mut tracker = CommitTracker::default();
        // Pointer down, value changing over three frames.
        assert!(!tracker.observe(true, true));
        assert!(!tracker.observe(true, true));
        assert!(!tracker.observe(false, true));
        assert!(tracker.is_pending());
        // Released.
        assert!(tracker.observe(false, false));
        assert!(!tracker.observe(false, false));
    }

    #[test]
    fn test_finished_keyboard_edit_commits_in_same_frame() {
        let mut tracker = CommitTracker::default();
        assert!(tracker.observe(true, false));
        assert!(!tracker.is_pending());
    }

    #[test]
    fn test_no_commit_without_change() {
        let mut tracker = CommitTracker::default();
        assert!(!tracker.observe(false, true));
        assert!(!tracker.observe(false, false));
    }

    #[test]
    fn test_idle_panel_changes_nothing() {
        let ctx = egui::Context::default();
        let mut panel = Panel::new(None);
        let mut params = GalaxyParams::default();
        let stats = PanelStats { points: 10_000, fps: 60.0 };

        for _ in 0..3 {
            let mut output = PanelOutput::default();
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                output = panel.show(ctx, &mut params, stats);
            });
            assert_eq!(output, PanelOutput::default());
        }
        assert_eq!(params, GalaxyParams::default());
    }

    fn key(key: egui::Key) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    /// Run one headless frame with `events` and return what the panel asked for.
    fn frame(ctx: &egui::Context, panel: &mut Panel, params: &mut GalaxyParams, events: Vec<egui::Event>) -> PanelOutput {
        let raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1280.0, 720.0))),
            events,
            ..Default::default()
        };
        let stats = PanelStats { points: 10_000, fps: 60.0 };
        let mut output = PanelOutput::default();
        let _ = ctx.run(raw_input, |ctx| {
            output = panel.show(ctx, params, stats);
        });
        output
    }

    #[test]
    fn test_typed_value_commits_once_on_enter() {
        let mut edited_a_field = false;

        // Walk the keyboard focus over the panel's widgets. Wherever it lands
        // on a number box, typing must not regenerate until Enter.
        for tabs in 1..=12 {
            let ctx = egui::Context::default();
            let mut panel = Panel::new(None);
            let mut params = GalaxyParams::default();

            frame(&ctx, &mut panel, &mut params, Vec::new());
            for _ in 0..tabs {
                frame(&ctx, &mut panel, &mut params, vec![key(egui::Key::Tab)]);
            }

            for digit in ["2", "5", "0", "0", "0"] {
                let output = frame(&ctx, &mut panel, &mut params, vec![egui::Event::Text(digit.into())]);
                assert!(!output.regenerate, "typing {digit:?} after {tabs} tabs regenerated");
            }

            let typed_into = params.clone();
            let mut regenerations = 0;
            for events in [vec![key(egui::Key::Enter)], Vec::new(), Vec::new()] {
                if frame(&ctx, &mut panel, &mut params, events).regenerate {
                    regenerations += 1;
                }
            }

            if params != GalaxyParams::default() && typed_into == GalaxyParams::default() {
                edited_a_field = true;
                assert_eq!(regenerations, 1, "edit after {tabs} tabs regenerated {regenerations} times");
            }
        }

        assert!(edited_a_field, "keyboard focus never reached a number box");
    }
}
