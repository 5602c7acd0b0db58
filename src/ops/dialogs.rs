// ============================================================================
// TOOL DIALOG SYSTEM - modal dialogs for Adjust, Filters, and Effects
// ============================================================================
//
// At most one dialog is open at a time. Each dialog owns its parameters and
// returns a DialogResult from show() every frame; the app applies the edit
// on Ok.
// ============================================================================

use eframe::egui;
use egui::{Color32, Pos2, Rect, Rounding, Sense, Vec2};

use super::effects::EffectKind;
use super::filters::FilterKind;

/// At most one modal dialog is open at a time.
#[derive(Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Adjust(AdjustDialog),
    Filters(FiltersDialog),
    Effects(EffectsDialog),
    ConfirmReset,
}

impl ActiveDialog {
    pub fn is_none(&self) -> bool {
        matches!(self, ActiveDialog::None)
    }
}

/// Result returned by each dialog's `show()` method every frame.
pub enum DialogResult<T> {
    /// Dialog is still open, no action needed this frame.
    Open,
    /// User confirmed - contains the final values.
    Ok(T),
    /// User clicked Cancel.
    Cancel,
}

// ============================================================================
// SHARED DIALOG STYLING HELPERS
// ============================================================================

/// Colors extracted from the current egui visuals for dialog rendering.
pub(crate) struct DialogColors {
    pub accent: Color32,
    pub accent_faint: Color32,
    pub text_muted: Color32,
}

impl DialogColors {
    pub(crate) fn from_ctx(ctx: &egui::Context) -> Self {
        let v = ctx.style().visuals.clone();
        let accent = v.selection.stroke.color;
        let accent_faint = if v.dark_mode {
            Color32::from_rgba_unmultiplied(accent.r(), accent.g(), accent.b(), 35)
        } else {
            Color32::from_rgba_unmultiplied(accent.r(), accent.g(), accent.b(), 25)
        };
        let text_muted = if v.dark_mode {
            Color32::from_gray(160)
        } else {
            v.weak_text_color()
        };
        Self {
            accent,
            accent_faint,
            text_muted,
        }
    }
}

/// Paint the accent header bar with icon + title.
pub(crate) fn paint_dialog_header(
    ui: &mut egui::Ui,
    colors: &DialogColors,
    icon: &str,
    title: &str,
) {
    let available_width = ui.available_width();
    let header_height = 32.0;
    let (rect, _) =
        ui.allocate_exact_size(Vec2::new(available_width, header_height), Sense::hover());

    let painter = ui.painter();
    painter.rect_filled(rect, Rounding::ZERO, colors.accent_faint);
    painter.rect_filled(
        Rect::from_min_size(rect.min, Vec2::new(3.0, header_height)),
        Rounding::ZERO,
        colors.accent,
    );
    painter.text(
        Pos2::new(rect.min.x + 12.0, rect.center().y),
        egui::Align2::LEFT_CENTER,
        format!("{} {}", icon, title),
        egui::FontId::proportional(14.0),
        colors.accent,
    );
}

/// Styled section label.
pub(crate) fn section_label(ui: &mut egui::Ui, colors: &DialogColors, text: &str) {
    ui.add_space(6.0);
    ui.label(
        egui::RichText::new(text)
            .size(11.0)
            .color(colors.text_muted)
            .strong(),
    );
    ui.add_space(2.0);
}

/// OK / Cancel footer. Returns (ok, cancel).
fn dialog_footer(ui: &mut egui::Ui, ok_label: &str) -> (bool, bool) {
    let mut ok = false;
    let mut cancel = false;
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button(ok_label).clicked() {
            ok = true;
        }
        if ui.button("Cancel").clicked() {
            cancel = true;
        }
    });
    (ok, cancel)
}

// ============================================================================
// ADJUST DIALOG - brightness / contrast / saturation sliders
// ============================================================================

pub struct AdjustDialog {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for AdjustDialog {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

impl AdjustDialog {
    /// Adjustment factors are sliders from half to double strength; 1.0 is
    /// identity.
    pub fn show(&mut self, ctx: &egui::Context) -> DialogResult<(f32, f32, f32)> {
        let mut result = DialogResult::Open;
        let colors = DialogColors::from_ctx(ctx);

        egui::Window::new("dialog_adjust")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .default_pos(egui::pos2(ctx.screen_rect().center().x - 160.0, 80.0))
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                paint_dialog_header(ui, &colors, "☀", "Adjust Image");
                ui.add_space(4.0);

                section_label(ui, &colors, "ADJUSTMENTS");
                egui::Grid::new("adjust_params")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Brightness");
                        ui.add(egui::Slider::new(&mut self.brightness, 0.5..=2.0).max_decimals(2));
                        ui.end_row();

                        ui.label("Contrast");
                        ui.add(egui::Slider::new(&mut self.contrast, 0.5..=2.0).max_decimals(2));
                        ui.end_row();

                        ui.label("Saturation");
                        ui.add(egui::Slider::new(&mut self.saturation, 0.5..=2.0).max_decimals(2));
                        ui.end_row();
                    });

                ui.add_space(4.0);
                if ui.small_button("Reset values").clicked() {
                    *self = Self::default();
                }

                let (ok, cancel) = dialog_footer(ui, "Apply");
                if ok {
                    result = DialogResult::Ok((self.brightness, self.contrast, self.saturation));
                }
                if cancel {
                    result = DialogResult::Cancel;
                }
            });
        result
    }
}

// ============================================================================
// FILTERS DIALOG - one-click filter list
// ============================================================================

#[derive(Default)]
pub struct FiltersDialog;

impl FiltersDialog {
    pub fn show(&mut self, ctx: &egui::Context) -> DialogResult<FilterKind> {
        let mut result = DialogResult::Open;
        let colors = DialogColors::from_ctx(ctx);

        egui::Window::new("dialog_filters")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .default_pos(egui::pos2(ctx.screen_rect().center().x - 110.0, 80.0))
            .show(ctx, |ui| {
                ui.set_min_width(220.0);
                paint_dialog_header(ui, &colors, "🎨", "Filters");
                ui.add_space(8.0);

                for &kind in FilterKind::all() {
                    if ui
                        .add_sized([ui.available_width(), 28.0], egui::Button::new(kind.label()))
                        .clicked()
                    {
                        result = DialogResult::Ok(kind);
                    }
                    ui.add_space(2.0);
                }

                ui.add_space(6.0);
                if ui.button("Cancel").clicked() {
                    result = DialogResult::Cancel;
                }
            });
        result
    }
}

// ============================================================================
// EFFECTS DIALOG - one-click effect list
// ============================================================================

#[derive(Default)]
pub struct EffectsDialog;

impl EffectsDialog {
    pub fn show(&mut self, ctx: &egui::Context) -> DialogResult<EffectKind> {
        let mut result = DialogResult::Open;
        let colors = DialogColors::from_ctx(ctx);

        egui::Window::new("dialog_effects")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .default_pos(egui::pos2(ctx.screen_rect().center().x - 110.0, 80.0))
            .show(ctx, |ui| {
                ui.set_min_width(220.0);
                paint_dialog_header(ui, &colors, "✨", "Effects");
                ui.add_space(8.0);

                for &kind in EffectKind::all() {
                    if ui
                        .add_sized([ui.available_width(), 28.0], egui::Button::new(kind.label()))
                        .clicked()
                    {
                        result = DialogResult::Ok(kind);
                    }
                    ui.add_space(2.0);
                }

                ui.add_space(6.0);
                if ui.button("Cancel").clicked() {
                    result = DialogResult::Cancel;
                }
            });
        result
    }
}

// ============================================================================
// RESET CONFIRMATION
// ============================================================================

/// Simple confirm box shown before Reset throws away the edit history.
pub fn show_confirm_reset(ctx: &egui::Context) -> DialogResult<()> {
    let mut result = DialogResult::Open;
    let colors = DialogColors::from_ctx(ctx);

    egui::Window::new("dialog_confirm_reset")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .default_pos(egui::pos2(ctx.screen_rect().center().x - 140.0, 120.0))
        .show(ctx, |ui| {
            ui.set_min_width(280.0);
            paint_dialog_header(ui, &colors, "↺", "Reset Image");
            ui.add_space(8.0);
            ui.label("Discard all edits and restore the original image?");
            ui.weak("The undo history will be cleared.");

            let (ok, cancel) = dialog_footer(ui, "Reset");
            if ok {
                result = DialogResult::Ok(());
            }
            if cancel {
                result = DialogResult::Cancel;
            }
        });
    result
}
