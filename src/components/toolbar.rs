use eframe::egui;

/// The editing tools, in toolbar order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditTool {
    Crop,
    Adjust,
    Filters,
    Effects,
    Reset,
}

impl EditTool {
    pub fn label(&self) -> &'static str {
        match self {
            EditTool::Crop => "Crop",
            EditTool::Adjust => "Adjust",
            EditTool::Filters => "Filters",
            EditTool::Effects => "Effects",
            EditTool::Reset => "Reset",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            EditTool::Crop => "✂",
            EditTool::Adjust => "🎚",
            EditTool::Filters => "🎨",
            EditTool::Effects => "✨",
            EditTool::Reset => "↺",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            EditTool::Crop => "Drag on the image to select the area to keep",
            EditTool::Adjust => "Brightness, contrast and saturation",
            EditTool::Filters => "Black & White, Sepia, Vintage",
            EditTool::Effects => "Blur, Sharpen, Vignette",
            EditTool::Reset => "Restore the original image",
        }
    }

    pub fn all() -> &'static [EditTool] {
        &[
            EditTool::Crop,
            EditTool::Adjust,
            EditTool::Filters,
            EditTool::Effects,
            EditTool::Reset,
        ]
    }
}

/// The bottom tool strip. Returns the tool clicked this frame, if any.
#[derive(Default)]
pub struct ToolBar;

impl ToolBar {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        crop_active: bool,
        enabled: bool,
    ) -> Option<EditTool> {
        let mut clicked = None;

        ui.horizontal(|ui| {
            ui.add_space(8.0);
            for &tool in EditTool::all() {
                let selected = tool == EditTool::Crop && crop_active;
                let text = format!("{} {}", tool.icon(), tool.label());
                let response = ui.add_enabled(
                    enabled,
                    egui::SelectableLabel::new(selected, egui::RichText::new(text).size(14.0)),
                );
                if response.on_hover_text(tool.hint()).clicked() {
                    clicked = Some(tool);
                }
                ui.add_space(12.0);
            }
        });

        clicked
    }
}
