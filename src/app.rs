// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The application owns the single [`LayoutSession`] and passes it into the
//! core for every operation. Loading and exporting run on a worker thread;
//! only the finished result comes back to the UI thread.

use crate::ui::{canvas, properties, toolbar};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use textoverlay::config::ElementDefaults;
use textoverlay::io::{fonts::FontResolver, media, serialization};
use textoverlay::render::{pdf, raster};
use textoverlay::{BackgroundImage, DragController, LayoutSession, Settings};

/// Current editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    AddText,
}

/// Result of a worker thread task.
enum TaskOutcome {
    Background(textoverlay::Result<BackgroundImage>),
    Project(PathBuf, textoverlay::Result<LayoutSession>),
    Exported(PathBuf, textoverlay::Result<()>),
}

/// Main application state.
pub struct OverlayApp {
    current_tool: Tool,
    settings: Settings,
    fonts: FontResolver,

    /// The editing session
    session: LayoutSession,

    /// Drag anchor between pointer events
    drag: DragController,

    /// Values used for newly placed text boxes
    draft: ElementDefaults,

    /// Background texture for display
    background_texture: Option<egui::TextureHandle>,

    /// Texture must be rebuilt from the session background
    texture_dirty: bool,

    /// Receiver for the running worker task
    task: Option<Receiver<TaskOutcome>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Last outcome shown in the status line
    status: String,
}

impl OverlayApp {
    /// Create a new application instance.
    pub fn new(settings: Settings) -> Self {
        Self {
            current_tool: Tool::Select,
            fonts: FontResolver::new(&settings.fonts),
            draft: settings.defaults.clone(),
            settings,
            session: LayoutSession::new(),
            drag: DragController::new(),
            background_texture: None,
            texture_dirty: false,
            task: None,
            loading_message: None,
            status: String::new(),
        }
    }

    fn is_busy(&self) -> bool {
        self.task.is_some()
    }

    /// Run `work` on a worker thread. Only one task runs at a time; a request
    /// made while busy is refused so no finished result is ever dropped.
    fn spawn_task<F>(&mut self, message: &str, work: F) -> bool
    where
        F: FnOnce() -> TaskOutcome + Send + 'static,
    {
        if self.is_busy() {
            log::warn!("Ignoring \"{}\" while another task is running", message);
            self.status = "Busy: wait for the current task to finish".to_string();
            return false;
        }

        let (sender, receiver) = channel();
        self.task = Some(receiver);
        self.loading_message = Some(message.to_string());

        std::thread::spawn(move || {
            if sender.send(work()).is_err() {
                log::warn!("Task finished after its receiver was dropped");
            }
        });
        true
    }

    /// Collect the worker result, if it has arrived.
    ///
    /// A worker that died without answering ends the task with an error.
    fn poll_task(&mut self) {
        let Some(receiver) = &self.task else {
            return;
        };
        let outcome = match receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => None,
        };

        let message = self.loading_message.take();
        self.task = None;
        match outcome {
            Some(outcome) => self.handle_task_outcome(outcome),
            None => {
                let what = message.unwrap_or_else(|| "Task".to_string());
                log::error!("{} stopped without a result", what);
                self.status = format!("Error: {} stopped without a result", what.trim_end_matches('.'));
            }
        }
    }

    /// Load an image or PDF as the new background (asynchronously).
    fn open_background(&mut self, path: PathBuf) {
        let settings = self.settings.clone();
        self.spawn_task("Loading background...", move || {
            let rasterizer = media::default_rasterizer();
            TaskOutcome::Background(media::load_background(&path, &settings, rasterizer.as_ref()))
        });
    }

    /// Replace the session with a saved project (asynchronously).
    fn open_project(&mut self, path: PathBuf) {
        let settings = self.settings.clone();
        self.spawn_task("Loading project...", move || {
            let rasterizer = media::default_rasterizer();
            let result = serialization::open_project(&path, &settings, rasterizer.as_ref());
            TaskOutcome::Project(path, result)
        });
    }

    fn save_project(&mut self, path: PathBuf) {
        match serialization::save_project(&self.session, &path) {
            Ok(()) => self.report_ok(format!("Saved project {}", path.display())),
            Err(e) => self.report_err(e),
        }
    }

    fn export_png(&mut self, path: PathBuf) {
        let session = self.session.clone();
        let fonts = self.fonts.clone();
        self.spawn_task("Exporting PNG...", move || {
            let result = raster::export_png(&session, &fonts, &path);
            TaskOutcome::Exported(path, result)
        });
    }

    fn export_pdf(&mut self, path: PathBuf) {
        let session = self.session.clone();
        let page = self.settings.page;
        self.spawn_task("Exporting PDF...", move || {
            let result = pdf::export_pdf(&session, page, &path);
            TaskOutcome::Exported(path, result)
        });
    }

    /// Exports need a background; refuse before asking for a file name.
    fn can_export(&mut self) -> bool {
        if self.session.background().is_none() {
            self.report_err(textoverlay::OverlayError::NoBackground);
            return false;
        }
        true
    }

    fn place_element(&mut self, x: f64, y: f64) {
        let draft = &self.draft;
        let id = self
            .session
            .add_element(x, y, draft.width, draft.height, draft.text.clone(), draft.font_size)
            .id;
        let index = self.session.len() - 1;
        self.session.set_selected(index);
        self.current_tool = Tool::Select;
        self.status = format!("Added text box #{}", id);
    }

    fn delete_selected(&mut self) {
        if let Some(removed) = self.session.remove_selected() {
            self.drag.end_drag();
            self.status = format!("Deleted text box #{}", removed.id);
        }
    }

    fn report_ok(&mut self, message: String) {
        log::info!("{}", message);
        self.status = message;
    }

    fn report_err(&mut self, error: textoverlay::OverlayError) {
        log::error!("{}", error);
        self.status = format!("Error: {}", error);
    }

    fn handle_task_outcome(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Background(Ok(background)) => {
                let message = format!("Loaded background {}", background.source_path().display());
                self.session.set_background(background);
                self.texture_dirty = true;
                self.report_ok(message);
            }
            TaskOutcome::Project(path, Ok(session)) => {
                self.session = session;
                self.drag.end_drag();
                self.texture_dirty = true;
                let message = match self.session.background() {
                    Some(_) => format!("Opened project {}", path.display()),
                    None => format!("Opened project {} (background unavailable)", path.display()),
                };
                self.report_ok(message);
            }
            TaskOutcome::Exported(path, Ok(())) => {
                self.report_ok(format!("Exported {}", path.display()));
            }
            TaskOutcome::Background(Err(e))
            | TaskOutcome::Project(_, Err(e))
            | TaskOutcome::Exported(_, Err(e)) => self.report_err(e),
        }
    }

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        self.texture_dirty = false;
        self.background_texture = self.session.background().map(|bg| {
            let size = [bg.width() as usize, bg.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, bg.pixels().as_raw());
            ctx.load_texture("background", color_image, egui::TextureOptions::LINEAR)
        });
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                let idle = !self.is_busy();
                if ui.add_enabled(idle, egui::Button::new("Open Background...")).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images and PDF", &["png", "jpg", "jpeg", "pdf"])
                        .pick_file()
                    {
                        self.open_background(path);
                    }
                    ui.close_menu();
                }
                if ui.add_enabled(idle, egui::Button::new("Open Project...")).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Projects", &["json", "yaml", "yml"])
                        .pick_file()
                    {
                        self.open_project(path);
                    }
                    ui.close_menu();
                }
                if ui.add_enabled(idle, egui::Button::new("Save Project...")).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("JSON", &["json"])
                        .add_filter("YAML", &["yaml", "yml"])
                        .set_file_name("project.json")
                        .save_file()
                    {
                        self.save_project(path);
                    }
                    ui.close_menu();
                }
                ui.separator();
                if ui.add_enabled(idle, egui::Button::new("Export PNG...")).clicked() {
                    if self.can_export() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("PNG", &["png"])
                            .set_file_name("output.png")
                            .save_file()
                        {
                            self.export_png(path);
                        }
                    }
                    ui.close_menu();
                }
                if ui.add_enabled(idle, egui::Button::new("Export PDF...")).clicked() {
                    if self.can_export() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("PDF", &["pdf"])
                            .set_file_name("output.pdf")
                            .save_file()
                        {
                            self.export_pdf(path);
                        }
                    }
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                let idle = !self.is_busy();
                let has_selection = idle && self.session.selected_element().is_some();
                if ui.add_enabled(has_selection, egui::Button::new("Delete Selected")).clicked() {
                    self.delete_selected();
                    ui.close_menu();
                }
                let has_elements = idle && !self.session.is_empty();
                if ui.add_enabled(has_elements, egui::Button::new("Clear All")).clicked() {
                    self.session.clear_all();
                    self.drag.end_drag();
                    self.status = "Cleared all text boxes".to_string();
                    ui.close_menu();
                }
            });
        });
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed worker task
        self.poll_task();

        if self.texture_dirty {
            self.refresh_texture(ctx);
        }

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ui, ctx);
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar::show(ui, &mut self.current_tool);
        });

        let properties_action = egui::SidePanel::right("properties")
            .default_width(260.0)
            .show(ctx, |ui| properties::show(ui, &mut self.draft, &mut self.session))
            .inner;

        match properties_action {
            properties::PropertiesAction::SelectElement(index) => {
                self.session.set_selected(index);
            }
            properties::PropertiesAction::DeleteSelected => self.delete_selected(),
            properties::PropertiesAction::None => {}
        }

        // Keyboard shortcuts, unless a text field is being edited
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
                self.delete_selected();
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.drag.end_drag();
                self.session.clear_selection();
            }
        }

        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    canvas::CanvasAction::None
                } else {
                    canvas::show(
                        ui,
                        &self.session,
                        self.current_tool,
                        &self.background_texture,
                        &self.status,
                    )
                }
            })
            .inner;

        match canvas_action {
            canvas::CanvasAction::Pointer(event) => {
                self.drag.handle_pointer(&mut self.session, event);
            }
            canvas::CanvasAction::PlaceElement(x, y) => self.place_element(x, y),
            canvas::CanvasAction::None => {}
        }
    }
}
