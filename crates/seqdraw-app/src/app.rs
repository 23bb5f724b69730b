//! Core application state and lifecycle.

use kurbo::{Point, Size, Vec2};
use peniko::Color;
use seqdraw_core::dialogs::{Notice, PromptResponse};
use seqdraw_core::diagram::MoveDirection;
use seqdraw_core::input::{InputState, Modifiers, MouseButton, PointerEvent};
use seqdraw_core::layout::DEFAULT_CANVAS_SIZE;
use seqdraw_core::preferences::{Preferences, PreferencesStore};
use seqdraw_core::session::Update;
use seqdraw_core::storage::{read_diagram, write_diagram};
use seqdraw_core::theme::{Palette, Slot, ThemeKind};
use seqdraw_core::workspace::Workspace;
use seqdraw_render::{
    ExportFormat, ExportOptions, RasterImage, RenderContext, RenderResult, Renderer, RendererError, VelloRenderer,
    export_raster,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions, Scene};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{Theme, Window, WindowId};

use crate::shortcuts::ShortcutRegistry;
use crate::ui::{EditorProps, SIDE_PANEL_WIDTH, UiAction, UiState, render_ui};

#[cfg(feature = "native")]
mod file_ops {
    use seqdraw_render::ExportFormat;
    use std::path::PathBuf;

    /// Ask for a diagram to open.
    pub fn pick_open_path() -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Open Diagram")
            .add_filter("SeqDraw Diagram", &["json"])
            .pick_file()
    }

    /// Ask where to save a diagram.
    pub fn pick_save_path(name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Save Diagram")
            .set_file_name(format!("{}.json", name))
            .add_filter("SeqDraw Diagram", &["json"])
            .save_file()
    }

    /// Ask where to write an exported image.
    pub fn pick_export_path(name: &str, format: ExportFormat) -> Option<PathBuf> {
        let dialog = rfd::FileDialog::new()
            .set_title("Export Image")
            .set_file_name(format!("{}.{}", name, format.extension()));
        let dialog = match format {
            ExportFormat::Png => dialog.add_filter("PNG", &["png"]),
            ExportFormat::Jpeg => dialog.add_filter("JPEG", &["jpg", "jpeg"]),
        };
        dialog.save_file()
    }
}

#[cfg(not(feature = "native"))]
mod file_ops {
    use seqdraw_render::ExportFormat;
    use std::path::PathBuf;

    pub fn pick_open_path() -> Option<PathBuf> {
        log::warn!("File dialogs need the native feature");
        None
    }

    pub fn pick_save_path(_name: &str) -> Option<PathBuf> {
        log::warn!("File dialogs need the native feature");
        None
    }

    pub fn pick_export_path(_name: &str, _format: ExportFormat) -> Option<PathBuf> {
        log::warn!("File dialogs need the native feature");
        None
    }
}

/// Render a Vello scene offscreen and read the pixels back (blocking).
fn render_scene_to_raster(
    device: &vello::wgpu::Device,
    queue: &vello::wgpu::Queue,
    vello_renderer: &mut vello::Renderer,
    scene: &Scene,
    size: Size,
    base_color: Color,
) -> RenderResult<RasterImage> {
    let width = size.width as u32;
    let height = size.height as u32;
    if width == 0 || height == 0 {
        return Ok(RasterImage::new(Vec::new(), width, height));
    }

    let texture = device.create_texture(&vello::wgpu::TextureDescriptor {
        label: Some("export texture"),
        size: vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: vello::wgpu::TextureDimension::D2,
        format: vello::wgpu::TextureFormat::Rgba8Unorm,
        usage: vello::wgpu::TextureUsages::STORAGE_BINDING
            | vello::wgpu::TextureUsages::COPY_SRC
            | vello::wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let texture_view = texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

    let params = RenderParams {
        base_color,
        width,
        height,
        antialiasing_method: AaConfig::Area,
    };
    vello_renderer
        .render_to_texture(device, queue, scene, &texture_view, &params)
        .map_err(|e| RendererError::RenderFailed(format!("{:?}", e)))?;

    // Rows of a texture copy must be 256-byte aligned.
    let bytes_per_row = (width * 4).next_multiple_of(256);
    let readback_buffer = device.create_buffer(&vello::wgpu::BufferDescriptor {
        label: Some("export readback buffer"),
        size: u64::from(bytes_per_row) * u64::from(height),
        usage: vello::wgpu::BufferUsages::COPY_DST | vello::wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
        label: Some("export copy encoder"),
    });
    encoder.copy_texture_to_buffer(
        vello::wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: vello::wgpu::Origin3d::ZERO,
            aspect: vello::wgpu::TextureAspect::All,
        },
        vello::wgpu::TexelCopyBufferInfo {
            buffer: &readback_buffer,
            layout: vello::wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let buffer_slice = readback_buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    buffer_slice.map_async(vello::wgpu::MapMode::Read, move |result| {
        tx.send(result).ok();
    });
    let _ = device.poll(vello::wgpu::PollType::wait_indefinitely());

    match rx.recv() {
        Ok(Ok(())) => {}
        _ => return Err(RendererError::RenderFailed("Failed to map readback buffer".to_string())),
    }

    let data = buffer_slice.get_mapped_range();
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for row in 0..height {
        let row_start = (row * bytes_per_row) as usize;
        rgba.extend_from_slice(&data[row_start..row_start + (width * 4) as usize]);
    }
    drop(data);
    readback_buffer.unmap();

    Ok(RasterImage::new(rgba, width, height))
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Canvas size used until the first frame has been laid out.
    pub canvas_size: Size,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "SeqDraw".to_string(),
            width: (DEFAULT_CANVAS_SIZE.width + f64::from(SIDE_PANEL_WIDTH)) as u32 + 40,
            height: DEFAULT_CANVAS_SIZE.height as u32 + 60,
            canvas_size: DEFAULT_CANVAS_SIZE,
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    diagram_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion.
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    workspace: Workspace,
    input: InputState,
    modifiers: ModifiersState,
    /// Last cursor position in logical window coordinates.
    cursor: Point,
    /// Where the canvas sits in the window, in logical pixels.
    canvas_rect: egui::Rect,

    // Theme and preferences
    preferences: Preferences,
    preferences_store: Option<PreferencesStore>,
    system_theme: Option<ThemeKind>,
    palette: Palette,

    /// Export requested by the UI, run once the GPU is at hand.
    pending_export: Option<(ExportFormat, bool)>,
}

impl AppState {
    /// Window position to canvas coordinates.
    fn canvas_point(&self, window_point: Point) -> Point {
        to_canvas(window_point, self.canvas_rect)
    }

    fn is_over_canvas(&self, window_point: Point) -> bool {
        self.canvas_rect
            .contains(egui::pos2(window_point.x as f32, window_point.y as f32))
    }

    /// Feed a pointer event through input normalization into the session.
    fn dispatch_pointer(&mut self, event: PointerEvent) {
        let session = self.workspace.session_mut();
        let events = self.input.handle_pointer_event(event);
        if events.is_empty() {
            return;
        }
        let mut update = Update::NONE;
        for canvas_event in events {
            update |= session.handle_canvas_event(canvas_event);
        }
        // A release may raise a prompt or notice without touching the canvas.
        if !update.is_none() || session.is_modal() || session.notices().next().is_some() {
            self.window.request_redraw();
        }
    }

    /// Bring a freshly activated session in line with app-wide settings.
    fn configure_active_session(&mut self) {
        let style = self.preferences.new_interaction_style;
        let size = Size::new(
            f64::from(self.canvas_rect.width()),
            f64::from(self.canvas_rect.height()),
        );
        let session = self.workspace.session_mut();
        session.set_new_interaction_style(style);
        let _ = session.set_canvas_size(size);
    }

    /// Abandon any drag before the active document changes.
    fn leave_active_document(&mut self) {
        let _ = self.workspace.session_mut().cancel_gesture();
        self.input.reset();
    }

    fn handle_action(&mut self, action: UiAction) {
        log::debug!("UI action: {:?}", action);
        let update = match action {
            UiAction::NewDocument => {
                self.leave_active_document();
                self.workspace.new_document();
                self.configure_active_session();
                Update::ALL
            }
            UiAction::OpenDocument => {
                self.open_document();
                Update::ALL
            }
            UiAction::SaveDocument => {
                self.save_document(false);
                Update::REDRAW
            }
            UiAction::SaveDocumentAs => {
                self.save_document(true);
                Update::REDRAW
            }
            UiAction::CloseDocument => {
                self.leave_active_document();
                self.workspace.close_active();
                self.configure_active_session();
                Update::ALL
            }
            UiAction::SwitchDocument(index) => {
                self.leave_active_document();
                if self.workspace.switch_to(index) {
                    self.configure_active_session();
                }
                Update::ALL
            }
            UiAction::NextDocument => {
                self.leave_active_document();
                self.workspace.next_document();
                self.configure_active_session();
                Update::ALL
            }
            UiAction::AddActor => self.workspace.session_mut().request_add_actor(),
            UiAction::SetCreationMode(on) => {
                self.workspace.session_mut().set_creation_mode(on) | Update::REDRAW
            }
            UiAction::SetNewInteractionStyle(style) => {
                self.workspace.session_mut().set_new_interaction_style(style);
                self.preferences.new_interaction_style = style;
                self.save_preferences();
                Update::REDRAW
            }
            UiAction::SelectRow(row) => self.workspace.session_mut().on_list_selection(row),
            UiAction::EditRow(index) => {
                let session = self.workspace.session_mut();
                session.on_list_selection(Some(index)) | session.edit_label(index)
            }
            UiAction::MoveUp => self.workspace.session_mut().move_selected(MoveDirection::Up),
            UiAction::MoveDown => self.workspace.session_mut().move_selected(MoveDirection::Down),
            UiAction::EditLabel => self.workspace.session_mut().edit_selected_label(),
            UiAction::DeleteSelected => self.workspace.session_mut().delete_selected(),
            UiAction::SetSelectedStyle(style) => self.workspace.session_mut().set_selected_style(style),
            UiAction::ShowExportDialog => {
                self.ui_state.export_dialog_open = true;
                Update::REDRAW
            }
            UiAction::Export { format, transparent } => {
                self.pending_export = Some((format, transparent));
                Update::REDRAW
            }
            UiAction::SetTheme(theme) => {
                self.preferences.theme = theme;
                self.save_preferences();
                self.apply_theme();
                Update::REDRAW
            }
            UiAction::SubmitPrompt(text) => self
                .workspace
                .session_mut()
                .resolve_prompt(PromptResponse::Submitted(text)),
            UiAction::CancelPrompt => self.workspace.session_mut().resolve_prompt(PromptResponse::Cancelled),
            UiAction::DismissNotice => {
                let _ = self.workspace.session_mut().pop_notice();
                Update::REDRAW
            }
            UiAction::Cancel => self.workspace.session_mut().cancel_gesture(),
            UiAction::ShowShortcuts => {
                self.ui_state.shortcuts_open = !self.ui_state.shortcuts_open;
                Update::REDRAW
            }
        };
        if !update.is_none() {
            self.window.request_redraw();
        }
    }

    /// File name of the active document without extension, for dialogs.
    fn document_stem(&self) -> String {
        let title = self.workspace.active().title();
        Path::new(&title)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or(title)
    }

    fn open_document(&mut self) {
        let Some(path) = file_ops::pick_open_path() else {
            return;
        };
        match read_diagram(&path) {
            Ok(diagram) => {
                log::info!("Opened {}", path.display());
                self.leave_active_document();
                self.workspace.open_document(diagram, path);
                self.configure_active_session();
            }
            Err(e) => {
                log::error!("Failed to open {}: {}", path.display(), e);
                self.workspace
                    .session_mut()
                    .notify(Notice::error("Open Failed", e.to_string()));
            }
        }
    }

    fn save_document(&mut self, save_as: bool) {
        let known_path = self.workspace.active().path.clone().filter(|_| !save_as);
        let Some(path) = known_path.or_else(|| file_ops::pick_save_path(&self.document_stem())) else {
            return;
        };
        match write_diagram(&path, self.workspace.session().diagram()) {
            Ok(()) => {
                log::info!("Saved {}", path.display());
                self.workspace.mark_active_saved(path);
            }
            Err(e) => {
                log::error!("Failed to save {}: {}", path.display(), e);
                self.workspace
                    .session_mut()
                    .notify(Notice::error("Save Failed", e.to_string()));
            }
        }
    }

    /// Ask for a path and write the active diagram as an image.
    fn export_document(
        &mut self,
        device: &vello::wgpu::Device,
        queue: &vello::wgpu::Queue,
        format: ExportFormat,
        transparent: bool,
    ) {
        let Some(path) = file_ops::pick_export_path(&self.document_stem(), format) else {
            return;
        };
        let path = with_default_extension(path, format);
        let notice = match self.export_to(device, queue, &path, transparent) {
            Ok(()) => Notice::info("Export", format!("Exported to {}", path.display())),
            Err(message) => {
                log::error!("Export to {} failed: {}", path.display(), message);
                Notice::error("Export error", message)
            }
        };
        self.workspace.session_mut().notify(notice);
    }

    fn export_to(
        &mut self,
        device: &vello::wgpu::Device,
        queue: &vello::wgpu::Queue,
        path: &Path,
        transparent: bool,
    ) -> Result<(), String> {
        let format = ExportFormat::from_path(path).map_err(|e| e.to_string())?;
        let background = self.palette.get(Slot::CanvasBackground);
        let ctx = RenderContext::new(self.workspace.session()).with_palette(self.palette);
        let (scene, size) = self.diagram_renderer.build_export_scene(&ctx, 1.0);
        let image = render_scene_to_raster(device, queue, &mut self.vello_renderer, &scene, size, background.into())
            .map_err(|e| e.to_string())?;
        let options = ExportOptions {
            format,
            transparent,
            background,
        };
        export_raster(&image, path, &options).map_err(|e| e.to_string())
    }

    fn save_preferences(&self) {
        let Some(store) = &self.preferences_store else {
            return;
        };
        if let Err(e) = store.save(&self.preferences) {
            log::warn!("Failed to save preferences: {}", e);
        }
    }

    /// Resolve the theme preference and restyle canvas and panels.
    fn apply_theme(&mut self) {
        let kind = self.preferences.theme.resolve(self.system_theme);
        self.palette = Palette::for_kind(kind);
        self.egui_ctx.set_visuals(match kind {
            ThemeKind::Light => egui::Visuals::light(),
            ThemeKind::Dark => egui::Visuals::dark(),
        });
        log::info!("Using {:?} theme", kind);
        self.window.request_redraw();
    }

    fn handle_key(&mut self, key: &Key) {
        if self.workspace.session().is_modal() {
            return;
        }
        let Some(name) = key_name(key) else {
            return;
        };
        let ctrl = self.modifiers.control_key() || self.modifiers.super_key();
        if let Some(command) =
            ShortcutRegistry::lookup(&name, ctrl, self.modifiers.shift_key(), self.modifiers.alt_key())
        {
            self.handle_action(command.into());
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = match EventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                log::error!("Failed to create event loop: {}", e);
                return;
            }
        };
        let mut app = App::new();
        if let Err(e) = event_loop.run_app(&mut app) {
            log::error!("Event loop error: {}", e);
        }
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) -> RenderResult<()> {
        let render_cx = self
            .render_cx
            .as_ref()
            .ok_or_else(|| RendererError::InitFailed("Render context missing".to_string()))?;
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(format!("{:?}", e)))?;

        // Vello renders to Rgba8Unorm; the surface may be Bgra8Unorm.
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let preferences_store = match PreferencesStore::default_location() {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("Preferences will not be saved: {}", e);
                None
            }
        };
        let preferences = preferences_store
            .as_ref()
            .map(PreferencesStore::load)
            .unwrap_or_default();
        let system_theme = window.theme().map(theme_kind);

        log::info!("SeqDraw initialized - {}x{}", surface.config.width, surface.config.height);

        let canvas_size = self.config.canvas_size;
        let mut state = AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            diagram_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::default(),
            workspace: Workspace::new(),
            input: InputState::new(),
            modifiers: ModifiersState::empty(),
            cursor: Point::ZERO,
            canvas_rect: egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(canvas_size.width as f32, canvas_size.height as f32),
            ),
            preferences,
            preferences_store,
            system_theme,
            palette: Palette::LIGHT,
            pending_export: None,
        };
        state.configure_active_session();
        state.apply_theme();
        self.state = Some(state);

        window.request_redraw();
        Ok(())
    }

    /// Lay out the UI, apply its actions, then paint canvas and panels.
    fn redraw(&mut self) {
        let (Some(state), Some(render_cx)) = (self.state.as_mut(), self.render_cx.as_ref()) else {
            return;
        };
        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        // Run egui and get any action
        let props = EditorProps::from_workspace(&mut state.workspace, state.preferences.theme);
        let egui_input = state.egui_state.take_egui_input(&state.window);
        let mut action = None;
        let mut canvas_rect = state.canvas_rect;
        let egui_output = state.egui_ctx.run(egui_input, |ctx| {
            action = render_ui(ctx, &mut state.ui_state, &props);
            canvas_rect = ctx.available_rect();
        });

        if canvas_rect != state.canvas_rect {
            state.canvas_rect = canvas_rect;
            let size = Size::new(f64::from(canvas_rect.width()), f64::from(canvas_rect.height()));
            let _ = state.workspace.session_mut().set_canvas_size(size);
        }
        let mut repaint = egui_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .is_some_and(|viewport| viewport.repaint_delay.is_zero());
        if let Some(action) = action {
            state.handle_action(action);
            repaint = true;
        }
        if let Some((format, transparent)) = state.pending_export.take() {
            state.export_document(device, queue, format, transparent);
            repaint = true;
        }

        state
            .egui_state
            .handle_platform_output(&state.window, egui_output.platform_output);
        let egui_primitives = state
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        // Build Vello scene
        let render_ctx = RenderContext::new(state.workspace.session())
            .with_palette(state.palette)
            .with_scale_factor(state.window.scale_factor())
            .with_origin(Vec2::new(f64::from(canvas_rect.min.x), f64::from(canvas_rect.min.y)));
        let hits = state.diagram_renderer.build_scene(&render_ctx);
        let base_color: Color = state.palette.get(Slot::AppBackground).into();
        state.workspace.session_mut().install_hit_index(hits);
        let scene = state.diagram_renderer.take_scene();

        let surface_texture = match state.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let width = state.surface.config.width;
        let height = state.surface.config.height;
        let params = RenderParams {
            base_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute shaders need a StorageBinding Rgba8Unorm target,
        // which is then blitted to the surface.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view = render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state
            .vello_renderer
            .render_to_texture(device, queue, &scene, &render_texture_view, &params)
        {
            log::error!("Failed to render: {:?}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
            state
                .texture_blitter
                .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            state.egui_renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("egui encoder"),
            });
            state.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            // egui-wgpu wants a 'static render pass.
            let mut render_pass = render_pass.forget_lifetime();
            state
                .egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);
            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            state.egui_renderer.free_texture(id);
        }
        surface_texture.present();

        if repaint {
            state.window.request_redraw();
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            .with_min_inner_size(LogicalSize::new(640, 480));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self.render_cx.get_or_insert_with(vello::util::RenderContext::new);
        let surface = match pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        )) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {:?}", e);
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.finish_init(window, surface) {
            log::error!("{}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if matches!(event, WindowEvent::RedrawRequested) {
            self.redraw();
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }
        let egui_wants_pointer = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();
        let egui_wants_keyboard = state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::ThemeChanged(theme) => {
                state.system_theme = Some(theme_kind(theme));
                state.apply_theme();
            }

            WindowEvent::Focused(false) => {
                if !state.workspace.session_mut().cancel_gesture().is_none() {
                    state.window.request_redraw();
                }
                state.input.reset();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(state.window.scale_factor());
                state.cursor = Point::new(logical.x, logical.y);
                // A drag that started on the canvas keeps going over the panels.
                if egui_wants_pointer && !state.input.is_button_pressed(MouseButton::Left) {
                    return;
                }
                let position = state.canvas_point(state.cursor);
                state.dispatch_pointer(PointerEvent::Move { position });
            }

            WindowEvent::MouseInput { state: btn_state, button, .. } => {
                let Some(button) = mouse_button(button) else {
                    return;
                };
                let position = state.canvas_point(state.cursor);
                match btn_state {
                    ElementState::Pressed => {
                        if egui_wants_pointer || !state.is_over_canvas(state.cursor) {
                            return;
                        }
                        state.dispatch_pointer(PointerEvent::Down { position, button });
                    }
                    ElementState::Released => {
                        state.dispatch_pointer(PointerEvent::Up { position, button });
                    }
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                let mods = modifiers.state();
                state.modifiers = mods;
                state.input.set_modifiers(Modifiers {
                    shift: mods.shift_key(),
                    ctrl: mods.control_key(),
                    alt: mods.alt_key(),
                    meta: mods.super_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || egui_wants_keyboard {
                    return;
                }
                state.handle_key(&event.logical_key);
            }

            _ => {}
        }
    }
}

fn theme_kind(theme: Theme) -> ThemeKind {
    match theme {
        Theme::Light => ThemeKind::Light,
        Theme::Dark => ThemeKind::Dark,
    }
}

fn mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Window coordinates to canvas coordinates.
fn to_canvas(window_point: Point, canvas_rect: egui::Rect) -> Point {
    Point::new(
        window_point.x - f64::from(canvas_rect.min.x),
        window_point.y - f64::from(canvas_rect.min.y),
    )
}

/// Name of a key as used by the shortcut registry.
fn key_name(key: &Key) -> Option<String> {
    let name = match key {
        Key::Character(c) => return Some(c.to_uppercase()),
        Key::Named(NamedKey::Delete) => "Delete",
        Key::Named(NamedKey::Backspace) => "Backspace",
        Key::Named(NamedKey::ArrowUp) => "Up",
        Key::Named(NamedKey::ArrowDown) => "Down",
        Key::Named(NamedKey::Escape) => "Escape",
        Key::Named(NamedKey::Tab) => "Tab",
        Key::Named(NamedKey::F1) => "F1",
        Key::Named(NamedKey::F2) => "F2",
        _ => return None,
    };
    Some(name.to_string())
}

/// Append the format's extension when the user typed a bare name.
fn with_default_extension(path: PathBuf, format: ExportFormat) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::Command;

    #[test]
    fn test_key_names() {
        assert_eq!(key_name(&Key::Character("a".into())), Some("A".to_string()));
        assert_eq!(key_name(&Key::Named(NamedKey::ArrowUp)), Some("Up".to_string()));
        assert_eq!(key_name(&Key::Named(NamedKey::F2)), Some("F2".to_string()));
        assert_eq!(key_name(&Key::Named(NamedKey::Enter)), None);
    }

    #[test]
    fn test_key_names_resolve_to_commands() {
        let name = key_name(&Key::Named(NamedKey::ArrowDown)).unwrap();
        assert_eq!(ShortcutRegistry::lookup(&name, false, false, true), Some(Command::MoveDown));
        let name = key_name(&Key::Character("w".into())).unwrap();
        assert_eq!(ShortcutRegistry::lookup(&name, true, false, false), Some(Command::CloseDocument));
    }

    #[test]
    fn test_canvas_coordinates_are_relative_to_canvas_rect() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 36.0), egui::vec2(800.0, 600.0));
        assert_eq!(to_canvas(Point::new(120.0, 96.0), rect), Point::new(120.0, 60.0));
    }

    #[test]
    fn test_default_extension() {
        assert_eq!(
            with_default_extension(PathBuf::from("/tmp/out"), ExportFormat::Jpeg),
            PathBuf::from("/tmp/out.jpg")
        );
        assert_eq!(
            with_default_extension(PathBuf::from("/tmp/out.png"), ExportFormat::Jpeg),
            PathBuf::from("/tmp/out.png")
        );
    }

    #[test]
    fn test_default_config_fits_canvas_and_panel() {
        let config = AppConfig::default();
        assert!(f64::from(config.width) > DEFAULT_CANVAS_SIZE.width + f64::from(SIDE_PANEL_WIDTH));
        assert_eq!(config.canvas_size, DEFAULT_CANVAS_SIZE);
    }
}
