//! Showroom application - owns the scene and drives one frame per update

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Error, anyhow};
use eframe::{App, Frame, egui};
use glam::Vec3;
use tracing::{error, info};

use engine_core::ecs::EngineWorld;
use engine_core::scene::SceneLayout;
use engine_core::store::{SelectionStore, SubscriptionId};
use engine_core::systems::CameraSystem;
use engine_editor::ViewportEditor;
use engine_render::{AssetLoader, LoadState, RenderConfig, Renderer, build_world};

use crate::config::{DisplayConfig, ViewerConfig};

/// Shared slot for an error that should end the process after the window closes.
pub type FatalError = Rc<RefCell<Option<Error>>>;

pub struct ShowroomApp {
    renderer: Renderer,
    selection: SelectionStore,
    layout: SceneLayout,
    world: Option<EngineWorld>,
    loader: Option<AssetLoader>,
    viewport: ViewportEditor,
    display: DisplayConfig,
    fatal: FatalError,
    _repaint_on_select: SubscriptionId,
}

impl ShowroomApp {
    pub fn new(ctx: &egui::Context, config: &ViewerConfig, fatal: FatalError) -> Self {
        let camera = CameraSystem::new(
            Vec3::from_array(config.camera.position),
            config.camera.fov_degrees,
        );
        let mut selection = SelectionStore::new();
        let repaint_ctx = ctx.clone();
        let repaint_on_select = selection.subscribe(move |change| {
            info!(
                previous = ?change.previous.current,
                current = ?change.current.current,
                mode = %change.current.mode,
                "selection changed"
            );
            repaint_ctx.request_repaint();
        });

        let mut app = Self {
            renderer: Renderer::new(RenderConfig::default(), camera),
            selection,
            layout: SceneLayout::showroom(),
            world: None,
            loader: None,
            viewport: ViewportEditor::new(),
            display: config.display.clone(),
            fatal,
            _repaint_on_select: repaint_on_select,
        };

        let loader_ctx = ctx.clone();
        let spawned = AssetLoader::spawn(config.asset_path.clone(), move || {
            loader_ctx.request_repaint();
        });
        match spawned {
            Ok(loader) => app.loader = Some(loader),
            Err(err) => app.fail(ctx, anyhow!(err).context("starting asset loader")),
        }
        app
    }

    fn fail(&mut self, ctx: &egui::Context, err: Error) {
        error!("{err:#}");
        self.fatal.borrow_mut().get_or_insert(err);
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn poll_loader(&mut self, ctx: &egui::Context) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        match loader.poll() {
            None | Some(LoadState::Loading) => {}
            Some(LoadState::Ready(bundle)) => {
                self.loader = None;
                match build_world(&bundle, &self.layout) {
                    Ok(world) => {
                        self.world = Some(world);
                        self.renderer.set_assets(bundle);
                    }
                    Err(err) => self.fail(ctx, anyhow!(err).context("composing scene")),
                }
            }
            Some(LoadState::Failed(err)) => {
                self.loader = None;
                self.fail(ctx, anyhow!(err).context("loading asset bundle"));
            }
        }
    }

    /// Keeps the UI scale inside the configured pixel ratio range.
    fn apply_ui_scale(&self, ctx: &egui::Context) {
        let native = ctx.native_pixels_per_point().unwrap_or(1.0);
        let zoom = self.display.zoom_factor(native);
        if (ctx.zoom_factor() - zoom).abs() > f32::EPSILON {
            ctx.set_zoom_factor(zoom);
        }
    }
}

impl App for ShowroomApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        ctx.set_visuals(egui::Visuals::light());
        self.apply_ui_scale(ctx);
        self.poll_loader(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                self.viewport.show(
                    ui,
                    &mut self.renderer,
                    self.world.as_mut(),
                    &self.layout,
                    &mut self.selection,
                );
            });
    }
}
