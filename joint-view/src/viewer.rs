//! Interactive joint-rope viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Rig`] plus the
//! configuration used to rebuild it, and implements [`eframe::App`] to
//! drive the rig from the pointer and draw it every frame.

use eframe::App;
use glam::Vec2;
use joint_core::{
    builder,
    config::{ChainConfig, FollowConfig, JointConfig, RandomTreeConfig},
    error::ConfigError,
    joint::Joint,
    point::Point2D,
    rig::Rig,
    smoother::AnchorSmoother,
    types::{JointId, Rgba},
};
use log::{error, info, warn};

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(102, 51, 204);
const LINK_COLOR: Rgba = [0.6, 0.52, 0.5, 0.4];

/// What a primary click/drag on the canvas does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    /// Dragging moves the anchor target.
    Drag,
    /// Clicking attaches a new joint to the nearest existing one.
    Grow,
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The core: a [`Rig`] (joint tree, anchor id, smoother).
/// - The configs used to rebuild the rig and to grow new joints.
/// - UI state (pan/zoom, active tool, pointer target, timing).
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input, updating `target`.
/// 2. Call [`Viewer::step_once`] with the frame's `dt`.
/// 3. Render the tree by walking [`Rig::traverse`].
///
/// ### Fields
/// - `rig` - The joint tree being driven.
/// - `chain_cfg` - Parameters for [`builder::tapered_chain`] on reset.
/// - `random_cfg` - Parameters for [`builder::random_tree`] on randomize.
/// - `follow_cfg` - How the anchor follows the pointer.
/// - `joint_cfg` - Parameters of joints added with [`Tool::Grow`].
///
/// - `rng` - Random number generator used for random trees.
///
/// - `tool` - Active canvas tool.
/// - `zoom` - Zoom factor for world-to-screen coordinate mapping.
/// - `pan` - Screen-space pan offset in pixels.
/// - `target` - World-space position the anchor is moving toward.
///
/// - `last_dt` - Time delta of the last tick (for display only).
/// - `last_grown` - Joint added by the last [`Tool::Grow`] click (highlighted).
pub struct Viewer {
    rig: Rig,
    chain_cfg: ChainConfig,
    random_cfg: RandomTreeConfig,
    follow_cfg: FollowConfig,
    joint_cfg: JointConfig,

    rng: rand::rngs::ThreadRng,

    tool: Tool,
    zoom: f32,
    pan: egui::Vec2,
    target: Point2D,

    last_dt: f32,
    last_grown: Option<JointId>,
}

impl Viewer {
    /// Creates a viewer showing the default tapered chain at the origin.
    ///
    /// ### Errors
    /// Propagates a [`ConfigError`] if the default chain cannot be built.
    pub fn new() -> Result<Self, ConfigError> {
        let chain_cfg = ChainConfig::default();
        let follow_cfg = FollowConfig::default();
        let (tree, root) = builder::tapered_chain(Point2D::ZERO, &chain_cfg)?;
        let rig = Rig::new(tree, root, AnchorSmoother::try_from(&follow_cfg)?)?;

        Ok(Self {
            target: rig.anchor(),
            rig,
            chain_cfg,
            random_cfg: RandomTreeConfig::default(),
            follow_cfg,
            joint_cfg: JointConfig::default(),
            rng: rand::rng(),
            tool: Tool::Drag,
            zoom: 0.8,
            pan: egui::vec2(0.0, 0.0),
            last_dt: 0.0,
            last_grown: None,
        })
    }

    /// Rebuilds the tapered chain from `chain_cfg` at the current anchor.
    ///
    /// On error the current rig is kept.
    fn reset(&mut self) -> Result<(), ConfigError> {
        let (tree, root) = builder::tapered_chain(self.target, &self.chain_cfg)?;
        self.rig.reset_to(tree, root)?;
        self.last_grown = None;
        info!("reset to a chain of {} joints", self.rig.tree().len());
        Ok(())
    }

    /// Replaces the rig with a random tree built from `random_cfg`.
    fn randomize(&mut self) -> Result<(), ConfigError> {
        let (tree, root) = builder::random_tree(self.target, &self.random_cfg, &mut self.rng)?;
        self.rig.reset_to(tree, root)?;
        self.last_grown = None;
        info!("randomized: {} joints", self.rig.tree().len());
        Ok(())
    }

    /// Attaches a joint built from `joint_cfg` at `pos` to the joint
    /// nearest to `pos`. The next tick pulls it into its parent's annulus.
    fn grow_at(&mut self, pos: Point2D) -> Result<JointId, ConfigError> {
        let joint = Joint::from_config(pos, &self.joint_cfg)?;
        let parent = self
            .rig
            .tree()
            .find_nearest_joint(pos)
            .map_or(self.rig.root(), |(id, _)| id);
        let id = self.rig.tree_mut().add_child(parent, joint)?;
        self.last_grown = Some(id);
        Ok(id)
    }

    /// Advances the rig by one tick of `dt` seconds toward `target`.
    fn step_once(&mut self, dt: f32) {
        self.last_dt = dt;
        if let Err(err) = self.rig.tick(self.target, dt) {
            error!("tick failed: {err}");
        }
    }

    /// Installs the smoother described by `follow_cfg`; an invalid config
    /// is reported and the current smoother kept.
    fn apply_follow_cfg(&mut self) {
        match AnchorSmoother::try_from(&self.follow_cfg) {
            Ok(smoother) => self.rig.set_smoother(smoother),
            Err(err) => warn!("{err}"),
        }
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`. The y-axis is flipped so that
    /// positive y goes up in world space.
    fn world_to_screen(&self, p: Point2D, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to floating
    /// point rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Point2D {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y).into()
    }

    /// Logs and drops a failed config action.
    fn report(result: Result<(), ConfigError>) {
        if let Err(err) = result {
            warn!("{err}");
        }
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed))
                .changed()
        })
        .inner
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed))
                .changed()
        })
        .inner
    }

    /// Builds the top panel UI (tools, reset, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tool, Tool::Drag, "✋ Drag");
                ui.selectable_value(&mut self.tool, Tool::Grow, "✚ Grow");

                ui.separator();

                if ui.button("Reset").clicked() {
                    Self::report(self.reset());
                }

                if ui.button("Randomize").clicked() {
                    Self::report(self.randomize());
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=5.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (dt, joint count, anchor, constraint error).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt = {:.3} s", self.last_dt));
                ui.separator();
                ui.label(format!("joints = {}", self.rig.tree().len()));
                let a = self.rig.anchor();
                ui.label(format!("anchor = ({:.1}, {:.1})", a.x, a.y));
                ui.label(format!(
                    "max violation = {:.4}",
                    self.rig.tree().max_violation(self.rig.root())
                ));
            });
        });
    }

    /// Builds the right-hand configuration panel.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Follow");
                let mut follow_changed =
                    ui.checkbox(&mut self.follow_cfg.smooth, "smooth").changed();
                follow_changed |= Self::labeled_drag_f32(
                    ui,
                    "speed:",
                    &mut self.follow_cfg.speed,
                    0.1..=60.0,
                    0.1,
                );
                if follow_changed {
                    self.apply_follow_cfg();
                }

                ui.separator();
                ui.label("Chain");
                Self::labeled_drag_usize(
                    ui,
                    "segments:",
                    &mut self.chain_cfg.segments,
                    0..=200,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "root_radius:",
                    &mut self.chain_cfg.root_radius,
                    1.0..=200.0,
                    0.5,
                );
                Self::labeled_drag_f32(
                    ui,
                    "radius_step:",
                    &mut self.chain_cfg.radius_step,
                    0.0..=20.0,
                    0.1,
                );
                Self::labeled_drag_f32(
                    ui,
                    "stretch_limit:",
                    &mut self.chain_cfg.stretch_limit,
                    1.0..=3.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "retract_limit:",
                    &mut self.chain_cfg.retract_limit,
                    0.01..=1.0,
                    0.01,
                );
                if ui.button("Rebuild chain").clicked() {
                    Self::report(self.reset());
                }

                ui.separator();
                ui.label("Random tree");
                Self::labeled_drag_usize(ui, "joints:", &mut self.random_cfg.joints, 1..=500, 1.0);
                Self::labeled_drag_usize(
                    ui,
                    "max_children:",
                    &mut self.random_cfg.max_children,
                    1..=8,
                    1.0,
                );

                ui.separator();
                ui.label("Grow tool joint");
                Self::labeled_drag_f32(ui, "radius:", &mut self.joint_cfg.radius, 1.0..=200.0, 0.5);
                Self::labeled_drag_f32(
                    ui,
                    "stretch_limit:",
                    &mut self.joint_cfg.stretch_limit,
                    1.0..=3.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "retract_limit:",
                    &mut self.joint_cfg.retract_limit,
                    0.01..=1.0,
                    0.01,
                );

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.chain_cfg = ChainConfig::default();
                    self.random_cfg = RandomTreeConfig::default();
                    self.follow_cfg = FollowConfig::default();
                    self.joint_cfg = JointConfig::default();
                    self.apply_follow_cfg();
                }
            });
    }

    /// Draws every joint reachable from the anchor: links first, then the
    /// constraint ring and the anchor dot of each joint.
    fn draw_rig(&self, painter: &egui::Painter, rect: egui::Rect) {
        let link_stroke = egui::Stroke::new(3.0, to_color32(LINK_COLOR));
        for (a, b) in self.rig.tree().links(self.rig.root()) {
            painter.line_segment(
                [self.world_to_screen(a, rect), self.world_to_screen(b, rect)],
                link_stroke,
            );
        }

        for (id, joint) in self.rig.traverse() {
            let p = self.world_to_screen(joint.pos(), rect);
            let r = (joint.radius() * self.zoom).max(2.0);
            let width = (r / 11.0).max(1.0);

            let ring = if self.last_grown == Some(id) {
                egui::Color32::YELLOW
            } else {
                to_color32(joint.color())
            };
            painter.circle_stroke(p, r, egui::Stroke::new(width, ring));
            painter.circle(
                p,
                (r / 4.0).max(1.5),
                egui::Color32::WHITE,
                egui::Stroke::new(width, egui::Color32::from_black_alpha(230)),
            );
        }
    }

    /// Builds the central panel where the rig is driven and drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(BACKGROUND))
            .show(ctx, |ui| {
                let response =
                    ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                // Pan with the secondary button.
                if response.dragged_by(egui::PointerButton::Secondary) {
                    self.pan += response.drag_delta();
                }

                let pointer_world = response
                    .interact_pointer_pos()
                    .map(|p| self.screen_to_world(p, rect));

                match self.tool {
                    Tool::Drag => {
                        if response.dragged_by(egui::PointerButton::Primary)
                            && let Some(p) = pointer_world
                        {
                            self.target = p;
                        }
                    }
                    Tool::Grow => {
                        if response.clicked()
                            && let Some(p) = pointer_world
                        {
                            Self::report(self.grow_at(p).map(|_| ()));
                        }
                    }
                }

                let dt = ctx.input(|i| i.stable_dt);
                self.step_once(dt);

                self.draw_rig(&painter, rect);

                if self.rig.anchor() != self.target {
                    ctx.request_repaint();
                }
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

/// Converts a core RGBA color into an egui color.
fn to_color32(c: Rgba) -> egui::Color32 {
    egui::Rgba::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]).into()
}
