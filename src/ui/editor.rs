//! egui editor for the spectre allow list

use egui::color_picker::{color_edit_button_srgba, Alpha};
use egui::{Key, Slider, TextEdit, Ui};

use crate::core::config::{
    OverlaySettings, DRAW_DISTANCE_RANGE, HIGHLIGHT_RADIUS_RANGE, HIGHLIGHT_SEGMENTS_RANGE,
    HIGHLIGHT_Z_OFFSET_RANGE, MAX_RECENT_CORPSES_RANGE, NAME_CACHE_CAPACITY_RANGE,
    SCAN_INTERVAL_MS_RANGE, TEXT_Z_OFFSET_RANGE,
};
use crate::core::types::MetadataPath;
use crate::render::colors::{self, Color};
use crate::tracking::shared::TrackingState;
use crate::ui::list::SpectreList;
use crate::ui::state::{EditorAction, EditorState};

/// Key bound to the editor window, if the configured name is a valid egui key
pub fn editor_hotkey(settings: &OverlaySettings) -> Option<Key> {
    Key::from_name(settings.editor_hotkey.trim())
}

/// Allow-list editor window
#[derive(Debug, Default)]
pub struct SpectreEditor {
    state: EditorState,
}

impl SpectreEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    /// Toggle the window when the configured hotkey was pressed this frame
    pub fn handle_hotkey(&self, ctx: &egui::Context, settings: &mut OverlaySettings) -> bool {
        let Some(key) = editor_hotkey(settings) else {
            return false;
        };
        if ctx.input(|input| input.key_pressed(key)) {
            settings.show_editor = !settings.show_editor;
            true
        } else {
            false
        }
    }

    /// Draw the editor window if it is open. Returns true if the allow list changed.
    pub fn show(&mut self, ctx: &egui::Context, settings: &mut OverlaySettings, tracking: &TrackingState) -> bool {
        if !settings.show_editor {
            return false;
        }
        let mut open = true;
        let mut changed = false;
        egui::Window::new("Spectre Bodies")
            .open(&mut open)
            .default_width(420.0)
            .show(ctx, |ui| {
                changed = self.ui(ui, settings, tracking);
            });
        if !open {
            settings.show_editor = false;
        }
        changed
    }

    /// Editor body: allow list with colors, add field, recent sightings
    pub fn ui(&mut self, ui: &mut Ui, settings: &mut OverlaySettings, tracking: &TrackingState) -> bool {
        let title = colors::EDITOR_TITLE.to_egui();
        let mut pending: Option<EditorAction> = None;

        ui.colored_label(title, "Spectre Body List Editor");
        let list = SpectreList::from_source(&settings.spectre_list_source);
        egui::ScrollArea::vertical()
            .id_source("spectre_list")
            .max_height(240.0)
            .show(ui, |ui| {
                for entry in list.entries() {
                    ui.horizontal(|row| {
                        let id = MetadataPath::from(entry.as_str());
                        let color = settings.spectre_color_mut(&id);
                        let mut edit = color.to_egui();
                        if color_edit_button_srgba(row, &mut edit, Alpha::OnlyBlend).changed() {
                            *color = Color::from_egui(edit);
                        }
                        row.label(entry.as_str());
                        if row.button("Delete").clicked() {
                            pending = Some(EditorAction::Delete(entry.clone()));
                        }
                    });
                }
            });

        ui.separator();
        let mut submit = false;
        ui.horizontal(|row| {
            let response = row.add(
                TextEdit::singleline(&mut self.state.new_entry)
                    .hint_text("Metadata/Path/To/Spectre")
                    .desired_width(300.0),
            );
            let entered = response.lost_focus() && row.input(|input| input.key_pressed(Key::Enter));
            if row.button("Add").clicked() || entered {
                submit = true;
            }
        });
        if submit {
            pending = Some(EditorAction::AddTyped);
        }

        ui.add_space(8.0);
        ui.separator();
        ui.colored_label(title, "Recently Seen Corpses");
        let recent = tracking.recent_sightings();
        if recent.is_empty() {
            ui.weak("No unknown corpses seen in this area yet");
        }
        for id in recent {
            ui.horizontal(|row| {
                if row.button("+").clicked() {
                    pending = Some(EditorAction::Promote(id.clone()));
                }
                row.label(id.as_str());
            });
        }

        match pending {
            Some(action) => self.state.apply(action, settings, tracking),
            None => false,
        }
    }
}

fn color_row(ui: &mut Ui, label: &str, color: &mut Color) -> bool {
    ui.horizontal(|row| {
        let mut edit = color.to_egui();
        let changed = color_edit_button_srgba(row, &mut edit, Alpha::OnlyBlend).changed();
        if changed {
            *color = Color::from_egui(edit);
        }
        row.label(label);
        changed
    })
    .inner
}

/// Inline settings panel with the list editor embedded below it
pub fn draw_settings_panel(
    ui: &mut Ui,
    settings: &mut OverlaySettings,
    editor: &mut SpectreEditor,
    tracking: &TrackingState,
) -> bool {
    ui.checkbox(&mut settings.enabled, "Enable");
    ui.checkbox(&mut settings.show_all_corpses, "Show All Nearby Corpses");
    ui.checkbox(&mut settings.use_render_names, "Use Render Names");
    ui.add(Slider::new(&mut settings.max_recent_corpses, MAX_RECENT_CORPSES_RANGE).text("Recent List Size"))
        .on_hover_text("Number of corpses to remember in the 'Recently Seen' list.");
    ui.add(Slider::new(&mut settings.name_cache_capacity, NAME_CACHE_CAPACITY_RANGE).text("Name Cache Size"));
    ui.add(Slider::new(&mut settings.scan_interval_ms, SCAN_INTERVAL_MS_RANGE).text("Scan Interval (ms)"));

    ui.separator();
    ui.checkbox(&mut settings.highlight_corpse, "Highlight Corpse");
    color_row(ui, "Highlight Color", &mut settings.highlight_color);
    ui.add(Slider::new(&mut settings.highlight_radius, HIGHLIGHT_RADIUS_RANGE).text("Highlight Radius"));
    ui.add(Slider::new(&mut settings.highlight_segments, HIGHLIGHT_SEGMENTS_RANGE).text("Highlight Segments"));
    ui.add(Slider::new(&mut settings.highlight_z_offset, HIGHLIGHT_Z_OFFSET_RANGE).text("Highlight Z-Offset"));

    ui.separator();
    color_row(ui, "Text Color", &mut settings.text_color);
    color_row(ui, "Background Color", &mut settings.background_color);
    ui.add(Slider::new(&mut settings.text_z_offset, TEXT_Z_OFFSET_RANGE).text("Text Z-Offset"));
    ui.add(Slider::new(&mut settings.draw_distance, DRAW_DISTANCE_RANGE).text("Draw Distance"));

    ui.horizontal(|row| {
        row.label("Editor Hotkey");
        row.add(TextEdit::singleline(&mut settings.editor_hotkey).desired_width(60.0));
    });

    ui.separator();
    let changed = editor.ui(ui, settings, tracking);
    tracking.sync_settings(settings);
    changed
}
