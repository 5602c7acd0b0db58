use eframe::egui;
use std::path::PathBuf;

use crate::canvas::{CanvasView, CropSelection};
use crate::components::history::HistoryPanel;
use crate::components::toolbar::{EditTool, ToolBar};
use crate::editor::EditorState;
use crate::io::FileHandler;
use crate::ops::dialogs::{
    ActiveDialog, AdjustDialog, DialogResult, EffectsDialog, FiltersDialog, show_confirm_reset,
};
use crate::ops::effects::EffectKind;
use crate::ops::filters::FilterKind;
use crate::ops::{adjustments, transform};
use crate::settings::{AppSettings, ThemeMode};

/// How long transient status messages stay visible, in seconds.
const STATUS_SECS: f64 = 4.0;

struct StatusMessage {
    text: String,
    expires_at: f64,
}

/// Deferred outcome of the dialog shown this frame; applied after the dialog
/// borrow ends.
enum DialogAction {
    None,
    Close,
    ApplyAdjust(f32, f32, f32),
    ApplyFilter(FilterKind),
    ApplyEffect(EffectKind),
    DoReset,
}

pub struct EdinityApp {
    editor: Option<EditorState>,

    // UI components
    canvas: CanvasView,
    toolbar: ToolBar,
    history_panel: HistoryPanel,

    file_handler: FileHandler,
    settings: AppSettings,

    // Modal dialog system (at most one open at a time)
    active_dialog: ActiveDialog,

    /// True while the Crop tool is armed and canvas drags select a region.
    crop_active: bool,
    show_history: bool,
    status: Option<StatusMessage>,

    /// Image path from the command line, opened on the first update() frame.
    pending_startup_file: Option<PathBuf>,
    first_frame: bool,
}

impl EdinityApp {
    pub fn new(cc: &eframe::CreationContext<'_>, startup_file: Option<PathBuf>) -> Self {
        let settings = AppSettings::load();
        apply_theme(&cc.egui_ctx, settings.theme_mode);
        log_info!("Application started");

        Self {
            editor: None,
            canvas: CanvasView::default(),
            toolbar: ToolBar,
            history_panel: HistoryPanel::default(),
            file_handler: FileHandler::new(),
            settings,
            active_dialog: ActiveDialog::None,
            crop_active: false,
            show_history: false,
            status: None,
            pending_startup_file: startup_file,
            first_frame: true,
        }
    }

    // ------------------------------------------------------------------
    //  File handling
    // ------------------------------------------------------------------

    fn open_image_dialog(&mut self, now: f64) {
        if let Some((image, path)) = self.file_handler.open_image() {
            log_info!(
                "Opened {} ({}x{})",
                path.display(),
                image.width(),
                image.height()
            );
            self.install_image(image, Some(path), now);
        }
    }

    fn open_path(&mut self, path: PathBuf, now: f64) {
        match crate::io::load_image_path(&path) {
            Ok(image) => {
                log_info!(
                    "Opened {} ({}x{})",
                    path.display(),
                    image.width(),
                    image.height()
                );
                self.file_handler.current_path = Some(path.clone());
                self.file_handler.last_format = crate::io::SaveFormat::from_path(&path);
                self.install_image(image, Some(path), now);
            }
            Err(e) => {
                log_err!("{}", e);
                self.set_status(now, e);
            }
        }
    }

    fn install_image(&mut self, image: image::RgbaImage, path: Option<PathBuf>, now: f64) {
        let mut editor = EditorState::new(image, path);
        editor.history.set_limits(
            self.settings.max_history_snapshots,
            self.settings.history_memory_bytes(),
        );
        self.editor = Some(editor);
        self.canvas.invalidate();
        self.crop_active = false;
        self.active_dialog = ActiveDialog::None;
        self.set_status(now, "Image loaded");
    }

    fn do_save(&mut self, now: f64) {
        let Some(editor) = &self.editor else {
            return;
        };
        if self.file_handler.has_current_path() {
            match self.file_handler.quick_save(editor.current()) {
                Ok(path) => {
                    log_info!("Saved {}", path.display());
                    self.set_status(now, format!("Saved {}", path.display()));
                }
                Err(e) => {
                    log_err!("Save failed: {}", e);
                    self.set_status(now, format!("Save failed: {}", e));
                }
            }
        } else {
            self.do_save_as(now);
        }
    }

    fn do_save_as(&mut self, now: f64) {
        let Some(editor) = &self.editor else {
            return;
        };
        let quality = self.settings.jpeg_quality;
        match self.file_handler.save_image_as(editor.current(), quality) {
            Some(Ok(path)) => {
                log_info!("Saved {}", path.display());
                self.set_status(now, format!("Saved {}", path.display()));
            }
            Some(Err(e)) => {
                log_err!("Save failed: {}", e);
                self.set_status(now, format!("Save failed: {}", e));
            }
            None => {} // dialog dismissed
        }
    }

    // ------------------------------------------------------------------
    //  Edit operations
    // ------------------------------------------------------------------

    fn do_undo(&mut self, now: f64) {
        let Some(editor) = &mut self.editor else {
            return;
        };
        match editor.undo() {
            Some(desc) => self.set_status(now, format!("Undid {}", desc)),
            None => self.set_status(now, "Nothing to undo"),
        }
    }

    fn do_redo(&mut self, now: f64) {
        let Some(editor) = &mut self.editor else {
            return;
        };
        match editor.redo() {
            Some(desc) => self.set_status(now, format!("Redid {}", desc)),
            None => self.set_status(now, "Nothing to redo"),
        }
    }

    fn request_reset(&mut self, now: f64) {
        let Some(editor) = &self.editor else {
            return;
        };
        if self.settings.confirm_on_reset && editor.history.can_undo() {
            self.active_dialog = ActiveDialog::ConfirmReset;
        } else {
            self.do_reset(now);
        }
    }

    fn do_reset(&mut self, now: f64) {
        if let Some(editor) = &mut self.editor {
            editor.reset();
            log_info!("Image reset to original");
            self.set_status(now, "Image reset to original");
        }
    }

    fn apply_adjustments(&mut self, now: f64, brightness: f32, contrast: f32, saturation: f32) {
        if let Some(editor) = &mut self.editor {
            // Adjustments always recompute from the original, so re-opening
            // the dialog never compounds earlier tweaks.
            let out = adjustments::enhance(editor.original(), brightness, contrast, saturation);
            editor.commit("Adjust", out);
            log_info!(
                "Adjust applied (brightness {:.2}, contrast {:.2}, saturation {:.2})",
                brightness,
                contrast,
                saturation
            );
            self.set_status(now, "Adjustments applied");
        }
    }

    fn apply_filter(&mut self, now: f64, kind: FilterKind) {
        if let Some(editor) = &mut self.editor {
            let out = kind.apply(editor.current());
            editor.commit(kind.label(), out);
            log_info!("Filter applied: {}", kind.label());
            self.set_status(now, format!("{} filter applied", kind.label()));
        }
    }

    fn apply_effect(&mut self, now: f64, kind: EffectKind) {
        if let Some(editor) = &mut self.editor {
            let out = kind.apply(editor.current());
            editor.commit(kind.label(), out);
            log_info!("Effect applied: {}", kind.label());
            self.set_status(now, format!("{} effect applied", kind.label()));
        }
    }

    fn apply_crop(&mut self, now: f64, selection: CropSelection) {
        let Some(editor) = &mut self.editor else {
            return;
        };
        let (w, h) = editor.dimensions();
        match transform::crop_rect_from_corners(
            w,
            h,
            selection.ax,
            selection.ay,
            selection.bx,
            selection.by,
        ) {
            Some(rect) => {
                let out = transform::crop(editor.current(), rect);
                editor.commit("Crop", out);
                self.crop_active = false;
                log_info!(
                    "Cropped to {}x{} at ({}, {})",
                    rect.width,
                    rect.height,
                    rect.x,
                    rect.y
                );
                self.set_status(now, format!("Cropped to {}x{}", rect.width, rect.height));
            }
            None => {
                self.set_status(now, "Crop selection is outside the image");
            }
        }
    }

    fn handle_tool(&mut self, now: f64, tool: EditTool) {
        if self.editor.is_none() {
            return;
        }
        match tool {
            EditTool::Crop => {
                self.crop_active = !self.crop_active;
                if self.crop_active {
                    self.set_status(now, "Drag on the image to select the area to keep");
                } else {
                    self.canvas.cancel_crop_drag();
                }
            }
            EditTool::Adjust => {
                self.crop_active = false;
                self.active_dialog = ActiveDialog::Adjust(AdjustDialog::default());
            }
            EditTool::Filters => {
                self.crop_active = false;
                self.active_dialog = ActiveDialog::Filters(FiltersDialog);
            }
            EditTool::Effects => {
                self.crop_active = false;
                self.active_dialog = ActiveDialog::Effects(EffectsDialog);
            }
            EditTool::Reset => {
                self.crop_active = false;
                self.request_reset(now);
            }
        }
    }

    // ------------------------------------------------------------------
    //  Helpers
    // ------------------------------------------------------------------

    fn set_status(&mut self, now: f64, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            expires_at: now + STATUS_SECS,
        });
    }

    fn window_title(&self) -> String {
        match self.editor.as_ref().and_then(|e| e.display_name()) {
            Some(name) => format!("EdiNity - {}", name),
            None => "EdiNity".to_string(),
        }
    }
}

fn apply_theme(ctx: &egui::Context, mode: ThemeMode) {
    match mode {
        ThemeMode::Light => ctx.set_visuals(egui::Visuals::light()),
        ThemeMode::Dark => ctx.set_visuals(egui::Visuals::dark()),
    }
}

impl eframe::App for EdinityApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));

        // Open the file passed on the command line once the UI is up.
        if self.first_frame {
            self.first_frame = false;
            if let Some(path) = self.pending_startup_file.take() {
                self.open_path(path, now);
            }
        }

        // Expire the transient status message.
        if self.status.as_ref().is_some_and(|s| s.expires_at <= now) {
            self.status = None;
        }

        // --- Keyboard shortcuts (suppressed while a dialog is open) -------
        if self.active_dialog.is_none() {
            let (undo_key, redo_key, open_key, save_key) = ctx.input(|i| {
                (
                    i.modifiers.command && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                    (i.modifiers.command && i.key_pressed(egui::Key::Y))
                        || (i.modifiers.command
                            && i.modifiers.shift
                            && i.key_pressed(egui::Key::Z)),
                    i.modifiers.command && i.key_pressed(egui::Key::O),
                    i.modifiers.command && i.key_pressed(egui::Key::S),
                )
            });
            if undo_key {
                self.do_undo(now);
            }
            if redo_key {
                self.do_redo(now);
            }
            if open_key {
                self.open_image_dialog(now);
            }
            if save_key {
                self.do_save(now);
            }
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            if !self.active_dialog.is_none() {
                self.active_dialog = ActiveDialog::None;
            } else if self.crop_active {
                self.crop_active = false;
                self.canvas.cancel_crop_drag();
            }
        }

        // --- Top button row -----------------------------------------------
        let has_image = self.editor.is_some();
        let can_undo = self.editor.as_ref().is_some_and(|e| e.history.can_undo());
        let can_redo = self.editor.as_ref().is_some_and(|e| e.history.can_redo());
        let undo_hint = self
            .editor
            .as_ref()
            .and_then(|e| e.history.undo_description())
            .map(|d| format!("Undo {}", d))
            .unwrap_or_else(|| "Undo".to_string());
        let redo_hint = self
            .editor
            .as_ref()
            .and_then(|e| e.history.redo_description())
            .map(|d| format!("Redo {}", d))
            .unwrap_or_else(|| "Redo".to_string());

        let mut open_clicked = false;
        let mut save_clicked = false;
        let mut save_as_clicked = false;
        let mut undo_clicked = false;
        let mut redo_clicked = false;
        let mut theme_clicked = false;

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("EdiNity");
                ui.separator();
                open_clicked = ui.button("Open").on_hover_text("Ctrl+O").clicked();
                save_clicked = ui
                    .add_enabled(has_image, egui::Button::new("Save"))
                    .on_hover_text("Ctrl+S")
                    .clicked();
                save_as_clicked = ui
                    .add_enabled(has_image, egui::Button::new("Save As"))
                    .clicked();

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_icon = match self.settings.theme_mode {
                        ThemeMode::Light => "🌙",
                        ThemeMode::Dark => "☀",
                    };
                    theme_clicked = ui
                        .button(theme_icon)
                        .on_hover_text("Toggle light/dark theme")
                        .clicked();
                    if ui
                        .selectable_label(self.show_history, "History")
                        .clicked()
                    {
                        self.show_history = !self.show_history;
                    }
                    ui.separator();
                    redo_clicked = ui
                        .add_enabled(can_redo, egui::Button::new("Redo ↪"))
                        .on_hover_text(redo_hint.as_str())
                        .clicked();
                    undo_clicked = ui
                        .add_enabled(can_undo, egui::Button::new("↩ Undo"))
                        .on_hover_text(undo_hint.as_str())
                        .clicked();
                });
            });
            ui.add_space(4.0);
        });

        if open_clicked {
            self.open_image_dialog(now);
        }
        if save_clicked {
            self.do_save(now);
        }
        if save_as_clicked {
            self.do_save_as(now);
        }
        if undo_clicked {
            self.do_undo(now);
        }
        if redo_clicked {
            self.do_redo(now);
        }
        if theme_clicked {
            self.settings.theme_mode = match self.settings.theme_mode {
                ThemeMode::Light => ThemeMode::Dark,
                ThemeMode::Dark => ThemeMode::Light,
            };
            apply_theme(ctx, self.settings.theme_mode);
            self.settings.save();
        }

        // --- Status bar (bottommost strip) --------------------------------
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(editor) = &self.editor {
                    let (w, h) = editor.dimensions();
                    ui.label(format!("{}x{}", w, h));
                    ui.separator();
                    ui.label(format!("{:.0}%", self.canvas.last_scale * 100.0));
                    ui.separator();
                    ui.label(format!(
                        "Undo: {} | Redo: {}",
                        editor.history.undo_count(),
                        editor.history.redo_count()
                    ));
                } else {
                    ui.weak("No image");
                }
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(&status.text);
                }
            });
        });

        // --- Tool strip (above the status bar) ----------------------------
        let mut tool_clicked = None;
        egui::TopBottomPanel::bottom("toolbar").show(ctx, |ui| {
            ui.add_space(6.0);
            tool_clicked = self.toolbar.show(ui, self.crop_active, has_image);
            ui.add_space(6.0);
        });
        if let Some(tool) = tool_clicked {
            self.handle_tool(now, tool);
        }

        // --- Canvas -------------------------------------------------------
        let mut crop_selection = None;
        let mut open_from_empty = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(editor) = self.editor.as_ref() {
                crop_selection = self.canvas.show(ui, editor, self.crop_active);
            } else {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.35);
                    ui.heading("No image loaded");
                    ui.weak("Open an image to start editing");
                    ui.add_space(8.0);
                    open_from_empty = ui.button("Open Image").clicked();
                });
            }
        });
        if open_from_empty {
            self.open_image_dialog(now);
        }
        if let Some(selection) = crop_selection {
            self.apply_crop(now, selection);
        }

        // --- History panel ------------------------------------------------
        if self.show_history {
            let mut open = self.show_history;
            if let Some(editor) = &self.editor {
                egui::Window::new("History")
                    .open(&mut open)
                    .default_width(200.0)
                    .show(ctx, |ui| {
                        self.history_panel.show(ui, &editor.history);
                    });
            } else {
                egui::Window::new("History").open(&mut open).show(ctx, |ui| {
                    ui.weak("No image loaded");
                });
            }
            self.show_history = open;
        }

        // --- Modal dialog -------------------------------------------------
        let mut action = DialogAction::None;
        match &mut self.active_dialog {
            ActiveDialog::None => {}
            ActiveDialog::Adjust(dialog) => match dialog.show(ctx) {
                DialogResult::Ok((b, c, s)) => action = DialogAction::ApplyAdjust(b, c, s),
                DialogResult::Cancel => action = DialogAction::Close,
                DialogResult::Open => {}
            },
            ActiveDialog::Filters(dialog) => match dialog.show(ctx) {
                DialogResult::Ok(kind) => action = DialogAction::ApplyFilter(kind),
                DialogResult::Cancel => action = DialogAction::Close,
                DialogResult::Open => {}
            },
            ActiveDialog::Effects(dialog) => match dialog.show(ctx) {
                DialogResult::Ok(kind) => action = DialogAction::ApplyEffect(kind),
                DialogResult::Cancel => action = DialogAction::Close,
                DialogResult::Open => {}
            },
            ActiveDialog::ConfirmReset => match show_confirm_reset(ctx) {
                DialogResult::Ok(()) => action = DialogAction::DoReset,
                DialogResult::Cancel => action = DialogAction::Close,
                DialogResult::Open => {}
            },
        }
        match action {
            DialogAction::None => {}
            DialogAction::Close => self.active_dialog = ActiveDialog::None,
            DialogAction::ApplyAdjust(b, c, s) => {
                self.apply_adjustments(now, b, c, s);
                self.active_dialog = ActiveDialog::None;
            }
            DialogAction::ApplyFilter(kind) => {
                self.apply_filter(now, kind);
                self.active_dialog = ActiveDialog::None;
            }
            DialogAction::ApplyEffect(kind) => {
                self.apply_effect(now, kind);
                self.active_dialog = ActiveDialog::None;
            }
            DialogAction::DoReset => {
                self.do_reset(now);
                self.active_dialog = ActiveDialog::None;
            }
        }
    }
}
