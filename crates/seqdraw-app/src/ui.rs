//! UI components using egui.

use egui::{Align, Align2, Context, Vec2};
use seqdraw_core::dialogs::{Notice, NoticeLevel, Prompt};
use seqdraw_core::diagram::LineStyle;
use seqdraw_core::theme::ThemePreference;
use seqdraw_core::workspace::{DocumentId, Workspace};
use seqdraw_render::ExportFormat;
use seqdraw_widgets::{
    Segmented, TextButton, ToggleButton, list_row, menu_item, menu_separator, panel_frame,
    section_label, separator, toolbar_frame,
};

use crate::shortcuts::{Command, ShortcutRegistry};

/// Width of the right-hand control panel.
pub const SIDE_PANEL_WIDTH: f32 = 300.0;

const STYLE_OPTIONS: &[(LineStyle, &str)] = &[(LineStyle::Solid, "Solid"), (LineStyle::Dashed, "Dashed")];

const FORMAT_OPTIONS: &[(ExportFormat, &str)] = &[(ExportFormat::Png, "PNG"), (ExportFormat::Jpeg, "JPEG")];

const THEME_OPTIONS: &[(ThemePreference, &str)] = &[
    (ThemePreference::System, "System"),
    (ThemePreference::Light, "Light"),
    (ThemePreference::Dark, "Dark"),
];

/// Per-frame snapshot of the active document for the panels.
#[derive(Debug, Clone, Default)]
pub struct EditorProps {
    /// Open documents with their tab titles, `*` marking modified ones.
    pub tabs: Vec<(DocumentId, String)>,
    pub active_tab: usize,
    /// Interaction list rows.
    pub rows: Vec<String>,
    pub selected_row: Option<usize>,
    /// Row the list should scroll into view this frame.
    pub scroll_to: Option<usize>,
    pub creation_mode: bool,
    pub new_interaction_style: LineStyle,
    /// Style of the selected interaction; `None` disables the control.
    pub selected_style: Option<LineStyle>,
    pub prompt: Option<Prompt>,
    /// Oldest queued notice.
    pub notice: Option<Notice>,
    pub theme: ThemePreference,
}

impl EditorProps {
    /// Snapshot the workspace. Consumes the active list's scroll request.
    pub fn from_workspace(workspace: &mut Workspace, theme: ThemePreference) -> Self {
        let tabs = workspace
            .documents()
            .iter()
            .map(|doc| (doc.id, doc.display_title()))
            .collect();
        let active_tab = workspace.active_index();
        let session = workspace.session_mut();
        let scroll_to = session.list_mut().take_scroll_request();
        Self {
            tabs,
            active_tab,
            rows: session.list().rows().to_vec(),
            selected_row: session.selected_interaction(),
            scroll_to,
            creation_mode: session.creation_mode(),
            new_interaction_style: session.new_interaction_style(),
            selected_style: session.style_control(),
            prompt: session.pending_prompt().cloned(),
            notice: session.notices().next().cloned(),
            theme,
        }
    }

    /// A prompt or notice is waiting for the user.
    pub fn is_modal(&self) -> bool {
        self.prompt.is_some() || self.notice.is_some()
    }
}

/// UI state that lives across frames.
pub struct UiState {
    /// Whether the file menu dropdown is open.
    pub menu_open: bool,
    /// Whether the export options dialog is open.
    pub export_dialog_open: bool,
    pub export_format: ExportFormat,
    /// Key out the canvas background on PNG export.
    pub export_transparent: bool,
    /// Whether the keyboard shortcuts window is open.
    pub shortcuts_open: bool,
    /// Text being typed into the pending prompt.
    pub prompt_text: String,
    /// The prompt `prompt_text` belongs to.
    prompt_for: Option<Prompt>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            menu_open: false,
            export_dialog_open: false,
            export_format: ExportFormat::Png,
            export_transparent: true,
            shortcuts_open: false,
            prompt_text: String::new(),
            prompt_for: None,
        }
    }
}

impl UiState {
    /// Reset the text field when a different prompt becomes pending.
    fn sync_prompt(&mut self, prompt: Option<&Prompt>) {
        if self.prompt_for.as_ref() != prompt {
            self.prompt_text = prompt.map(|p| p.initial().to_string()).unwrap_or_default();
            self.prompt_for = prompt.cloned();
        }
    }
}

/// Actions that can be triggered by UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    NewDocument,
    OpenDocument,
    SaveDocument,
    SaveDocumentAs,
    CloseDocument,
    SwitchDocument(usize),
    NextDocument,
    /// Ask for an actor name.
    AddActor,
    SetCreationMode(bool),
    SetNewInteractionStyle(LineStyle),
    /// Row clicked in the interaction list.
    SelectRow(Option<usize>),
    /// Row double-clicked in the interaction list.
    EditRow(usize),
    MoveUp,
    MoveDown,
    EditLabel,
    DeleteSelected,
    SetSelectedStyle(LineStyle),
    ShowExportDialog,
    /// Pick a path and export the canvas.
    Export { format: ExportFormat, transparent: bool },
    SetTheme(ThemePreference),
    SubmitPrompt(String),
    CancelPrompt,
    DismissNotice,
    /// Abort the gesture in progress.
    Cancel,
    ShowShortcuts,
}

impl From<Command> for UiAction {
    fn from(command: Command) -> Self {
        match command {
            Command::NewDocument => UiAction::NewDocument,
            Command::OpenDocument => UiAction::OpenDocument,
            Command::SaveDocument => UiAction::SaveDocument,
            Command::SaveDocumentAs => UiAction::SaveDocumentAs,
            Command::Export => UiAction::ShowExportDialog,
            Command::AddActor => UiAction::AddActor,
            Command::DeleteSelected => UiAction::DeleteSelected,
            Command::MoveUp => UiAction::MoveUp,
            Command::MoveDown => UiAction::MoveDown,
            Command::EditLabel => UiAction::EditLabel,
            Command::Cancel => UiAction::Cancel,
            Command::NextDocument => UiAction::NextDocument,
            Command::CloseDocument => UiAction::CloseDocument,
            Command::ShowShortcuts => UiAction::ShowShortcuts,
        }
    }
}

/// Render all UI and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, props: &EditorProps) -> Option<UiAction> {
    ui_state.sync_prompt(props.prompt.as_ref());

    let top_action = render_top_bar(ctx, ui_state, props);
    let menu_action = render_file_menu(ctx, ui_state);
    let side_action = render_side_panel(ctx, props);
    let export_action = render_export_dialog(ctx, ui_state);
    render_shortcuts_window(ctx, ui_state);

    // Notices queue behind the prompt that raised them.
    let modal_action = match &props.prompt {
        Some(prompt) => render_prompt(ctx, ui_state, prompt),
        None => props.notice.as_ref().and_then(|notice| render_notice(ctx, notice)),
    };

    modal_action
        .or(top_action)
        .or(menu_action)
        .or(side_action)
        .or(export_action)
}

/// File button and document tabs.
fn render_top_bar(ctx: &Context, ui_state: &mut UiState, props: &EditorProps) -> Option<UiAction> {
    let mut action = None;
    egui::TopBottomPanel::top("top_bar")
        .frame(toolbar_frame(ctx))
        .show(ctx, |ui| {
            ui.add_enabled_ui(!props.is_modal(), |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(4.0, 0.0);
                    if ToggleButton::new("File", ui_state.menu_open).show(ui) {
                        ui_state.menu_open = !ui_state.menu_open;
                    }
                    seqdraw_widgets::vertical_separator(ui);

                    for (i, (id, title)) in props.tabs.iter().enumerate() {
                        // Tab widget state follows the document, not its position.
                        let clicked = ui
                            .push_id(id, |ui| {
                                ToggleButton::new(title, i == props.active_tab).min_width(90.0).show(ui)
                            })
                            .inner;
                        if clicked && i != props.active_tab {
                            action = Some(UiAction::SwitchDocument(i));
                        }
                    }
                    if ToggleButton::new("+", false).tooltip("New document").show(ui) {
                        action = Some(UiAction::NewDocument);
                    }
                });
            });
        });
    action
}

fn render_file_menu(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    if !ui_state.menu_open {
        return None;
    }
    let mut action = None;
    egui::Area::new(egui::Id::new("file_menu_dropdown"))
        .anchor(Align2::LEFT_TOP, Vec2::new(8.0, 40.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame(ctx).show(ui, |ui| {
                ui.set_width(200.0);
                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(0.0, 2.0);
                    let items = [
                        ("New", Command::NewDocument),
                        ("Open...", Command::OpenDocument),
                        ("Save", Command::SaveDocument),
                        ("Save As...", Command::SaveDocumentAs),
                    ];
                    for (label, command) in items {
                        if menu_item(ui, label, &ShortcutRegistry::label(command)) {
                            action = Some(command.into());
                        }
                    }
                    menu_separator(ui);
                    if menu_item(ui, "Export...", &ShortcutRegistry::label(Command::Export)) {
                        action = Some(UiAction::ShowExportDialog);
                    }
                    menu_separator(ui);
                    if menu_item(ui, "Close", &ShortcutRegistry::label(Command::CloseDocument)) {
                        action = Some(UiAction::CloseDocument);
                    }
                    if menu_item(ui, "Keyboard Shortcuts", &ShortcutRegistry::label(Command::ShowShortcuts)) {
                        action = Some(UiAction::ShowShortcuts);
                    }
                });
            });
        });
    if action.is_some() {
        ui_state.menu_open = false;
    }
    action
}

fn render_side_panel(ctx: &Context, props: &EditorProps) -> Option<UiAction> {
    let mut action = None;
    egui::SidePanel::right("controls")
        .exact_width(SIDE_PANEL_WIDTH)
        .resizable(false)
        .frame(panel_frame(ctx))
        .show(ctx, |ui| {
            ui.add_enabled_ui(!props.is_modal(), |ui| {
                ui.spacing_mut().item_spacing = Vec2::new(4.0, 6.0);

                if TextButton::new("Add Actor")
                    .shortcut(&ShortcutRegistry::label(Command::AddActor))
                    .show(ui)
                {
                    action = Some(UiAction::AddActor);
                }

                section_label(ui, "Theme");
                if let Some(theme) = Segmented::new(THEME_OPTIONS, Some(props.theme)).show(ui) {
                    action = Some(UiAction::SetTheme(theme));
                }

                separator(ui);
                section_label(ui, "New interaction");
                if ToggleButton::new("New Interaction (drag)", props.creation_mode)
                    .tooltip("Dragging from an actor always draws an interaction")
                    .show(ui)
                {
                    action = Some(UiAction::SetCreationMode(!props.creation_mode));
                }
                if let Some(style) = Segmented::new(STYLE_OPTIONS, Some(props.new_interaction_style)).show(ui) {
                    action = Some(UiAction::SetNewInteractionStyle(style));
                }

                separator(ui);
                section_label(ui, "Interactions");
                if let Some(list_action) = render_interaction_list(ui, props) {
                    action = Some(list_action);
                }

                let has_selection = props.selected_row.is_some();
                ui.horizontal(|ui| {
                    for (label, command) in [
                        ("Up", UiAction::MoveUp),
                        ("Down", UiAction::MoveDown),
                        ("Edit", UiAction::EditLabel),
                        ("Delete", UiAction::DeleteSelected),
                    ] {
                        if ui.add_enabled(has_selection, egui::Button::new(label)).clicked() {
                            action = Some(command);
                        }
                    }
                });
                if let Some(style) = Segmented::new(STYLE_OPTIONS, props.selected_style)
                    .enabled(props.selected_style.is_some())
                    .show(ui)
                {
                    action = Some(UiAction::SetSelectedStyle(style));
                }

                separator(ui);
                if TextButton::new("Export")
                    .shortcut(&ShortcutRegistry::label(Command::Export))
                    .show(ui)
                {
                    action = Some(UiAction::ShowExportDialog);
                }
            });
        });
    action
}

fn render_interaction_list(ui: &mut egui::Ui, props: &EditorProps) -> Option<UiAction> {
    let mut action = None;
    egui::ScrollArea::vertical()
        .id_salt("interaction_list")
        .max_height(280.0)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing = Vec2::new(0.0, 1.0);
            if props.rows.is_empty() {
                ui.weak("No interactions yet");
            }
            for (i, row) in props.rows.iter().enumerate() {
                let response = list_row(ui, row, props.selected_row == Some(i));
                if props.scroll_to == Some(i) {
                    response.scroll_to_me(Some(Align::Center));
                }
                if response.double_clicked() {
                    action = Some(UiAction::EditRow(i));
                } else if response.clicked() {
                    action = Some(UiAction::SelectRow(Some(i)));
                }
            }
        });
    action
}

fn modal_window(title: &str) -> egui::Window<'_> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
}

fn render_prompt(ctx: &Context, ui_state: &mut UiState, prompt: &Prompt) -> Option<UiAction> {
    let mut action = None;
    modal_window(prompt.title())
        .id(egui::Id::new("prompt"))
        .show(ctx, |ui| {
            ui.label(prompt.message());
            let response = ui.text_edit_singleline(&mut ui_state.prompt_text);
            if !response.has_focus() && !response.lost_focus() {
                response.request_focus();
            }
            let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let escaped = ui.input(|i| i.key_pressed(egui::Key::Escape));

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() || entered {
                    action = Some(UiAction::SubmitPrompt(ui_state.prompt_text.clone()));
                }
                if ui.button("Cancel").clicked() || escaped {
                    action = Some(UiAction::CancelPrompt);
                }
            });
        });
    action
}

fn render_notice(ctx: &Context, notice: &Notice) -> Option<UiAction> {
    let mut action = None;
    modal_window(&notice.title)
        .id(egui::Id::new("notice"))
        .show(ctx, |ui| {
            match notice.level {
                NoticeLevel::Error => ui.colored_label(ui.visuals().error_fg_color, &notice.message),
                NoticeLevel::Info => ui.label(&notice.message),
            };
            ui.add_space(6.0);
            let confirmed = ui.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape));
            if ui.button("OK").clicked() || confirmed {
                action = Some(UiAction::DismissNotice);
            }
        });
    action
}

fn render_export_dialog(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    if !ui_state.export_dialog_open {
        return None;
    }
    let mut action = None;
    let mut open = true;
    modal_window("Export options")
        .open(&mut open)
        .show(ctx, |ui| {
            section_label(ui, "Format");
            if let Some(format) = Segmented::new(FORMAT_OPTIONS, Some(ui_state.export_format)).show(ui) {
                ui_state.export_format = format;
            }
            ui.add_enabled(
                ui_state.export_format.supports_transparency(),
                egui::Checkbox::new(&mut ui_state.export_transparent, "Transparent background (PNG)"),
            );
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("Choose file & Export").clicked() {
                    action = Some(UiAction::Export {
                        format: ui_state.export_format,
                        transparent: ui_state.export_transparent
                            && ui_state.export_format.supports_transparency(),
                    });
                }
                if ui.button("Cancel").clicked() {
                    ui_state.export_dialog_open = false;
                }
            });
        });
    if !open || action.is_some() {
        ui_state.export_dialog_open = false;
    }
    action
}

fn render_shortcuts_window(ctx: &Context, ui_state: &mut UiState) {
    if !ui_state.shortcuts_open {
        return;
    }
    egui::Window::new("Keyboard Shortcuts")
        .collapsible(false)
        .resizable(false)
        .open(&mut ui_state.shortcuts_open)
        .show(ctx, |ui| {
            egui::Grid::new("shortcuts_grid").striped(true).show(ui, |ui| {
                for shortcut in ShortcutRegistry::all() {
                    ui.monospace(shortcut.format());
                    ui.label(shortcut.description);
                    ui.end_row();
                }
                ui.monospace("Shift+Drag");
                ui.label("Move an actor");
                ui.end_row();
                ui.monospace("Double-click");
                ui.label("Edit interaction label");
                ui.end_row();
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqdraw_core::diagram::Diagram;
    use std::path::PathBuf;

    fn workspace_with_interaction() -> Workspace {
        let mut diagram = Diagram::new();
        diagram.add_actor("Alice").unwrap();
        diagram.add_actor("Bob").unwrap();
        diagram.add_interaction(1, 2, "hello", LineStyle::Dashed).unwrap();
        let mut workspace = Workspace::new();
        workspace.open_document(diagram, PathBuf::from("/tmp/seq.json"));
        workspace
    }

    #[test]
    fn test_props_snapshot() {
        let mut workspace = workspace_with_interaction();
        let _ = workspace.session_mut().select_interaction(0);

        let props = EditorProps::from_workspace(&mut workspace, ThemePreference::Dark);
        let titles: Vec<&str> = props.tabs.iter().map(|(_, title)| title.as_str()).collect();
        assert_eq!(titles, ["seq.json"]);
        assert_eq!(props.tabs[0].0, workspace.active().id);
        assert_eq!(props.rows, vec!["1. Alice -> Bob [dashed]: hello".to_string()]);
        assert_eq!(props.selected_row, Some(0));
        assert_eq!(props.selected_style, Some(LineStyle::Dashed));
        assert_eq!(props.scroll_to, Some(0));
        assert!(!props.is_modal());

        // The scroll request is consumed by the first snapshot.
        let again = EditorProps::from_workspace(&mut workspace, ThemePreference::Dark);
        assert_eq!(again.scroll_to, None);
    }

    #[test]
    fn test_props_modal_while_prompt_pending() {
        let mut workspace = Workspace::new();
        let _ = workspace.session_mut().request_add_actor();
        let props = EditorProps::from_workspace(&mut workspace, ThemePreference::System);
        assert_eq!(props.prompt, Some(Prompt::ActorName));
        assert!(props.is_modal());
    }

    #[test]
    fn test_prompt_text_resets_per_prompt() {
        let mut state = UiState::default();
        let edit = Prompt::EditLabel {
            index: 0,
            initial: "hello".to_string(),
        };
        state.sync_prompt(Some(&edit));
        assert_eq!(state.prompt_text, "hello");

        state.prompt_text.push_str(" world");
        state.sync_prompt(Some(&edit));
        assert_eq!(state.prompt_text, "hello world");

        state.sync_prompt(Some(&Prompt::ActorName));
        assert_eq!(state.prompt_text, "");
        state.sync_prompt(None);
        assert_eq!(state.prompt_text, "");
    }

    #[test]
    fn test_commands_map_to_actions() {
        assert_eq!(UiAction::from(Command::Export), UiAction::ShowExportDialog);
        assert_eq!(UiAction::from(Command::MoveDown), UiAction::MoveDown);
        assert_eq!(UiAction::from(Command::Cancel), UiAction::Cancel);
    }
}
