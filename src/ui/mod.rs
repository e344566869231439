//! Render/event loop: the video window.
//!
//! Each repaint reads at most one frame from the camera, presents it, applies
//! pending device-selection commands, and handles at most one recognized key
//! (ESC quit, `f` fullscreen toggle, `s` snapshot). The app owns the camera
//! handle, so hot-swaps drained from the control channel can never race a
//! read.

mod state;

pub use state::{MonitorEvent, MonitorState};

use crossbeam_channel::Receiver;
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions, ViewportCommand};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::capture::{VideoFrame, VideoSource};
use crate::pipeline::{CancelToken, ControlCommand, Session};
use crate::screenshot;

pub const WINDOW_TITLE: &str = "reCam - Video Output";

pub struct MonitorApp {
    state: MonitorState,
    source: VideoSource,
    /// Shared with the launcher, which tears the session down instead if the
    /// window loop fails before this app's exit hook runs.
    session: Arc<Mutex<Option<Session>>>,
    cancel: CancelToken,
    control_rx: Receiver<ControlCommand>,
    texture: Option<TextureHandle>,
    last_frame: Option<VideoFrame>,
    screenshots_dir: PathBuf,
}

impl MonitorApp {
    pub fn new(
        source: VideoSource,
        session: Arc<Mutex<Option<Session>>>,
        cancel: CancelToken,
        control_rx: Receiver<ControlCommand>,
        screenshots_dir: PathBuf,
    ) -> Self {
        Self {
            state: MonitorState::Idle,
            source,
            session,
            cancel,
            control_rx,
            texture: None,
            last_frame: None,
            screenshots_dir,
        }
    }

    /// Apply device-selection commands. Runs between frame reads, which is
    /// what makes a camera swap safe: the reader is quiesced by construction.
    fn drain_control(&mut self) {
        while let Ok(command) = self.control_rx.try_recv() {
            match command {
                ControlCommand::SwitchCamera(index) => {
                    info!(index, "switching camera");
                    if let Err(e) = self.source.switch_to(index) {
                        error!("camera switch failed: {e}");
                    }
                }
            }
        }
    }

    fn present_frame(&mut self, ctx: &egui::Context) {
        // No frame is a normal transient; keep showing the previous texture.
        if let Some(frame) = self.source.read_frame() {
            let size = [frame.width as usize, frame.height as usize];
            let image = ColorImage::from_rgb(size, &frame.data);
            match &mut self.texture {
                Some(texture) => texture.set(image, TextureOptions::LINEAR),
                None => {
                    self.texture = Some(ctx.load_texture("camera-frame", image, TextureOptions::LINEAR))
                }
            }
            self.last_frame = Some(frame);
        }
    }

    fn handle_key(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.quit(ctx);
        } else if ctx.input(|i| i.key_pressed(egui::Key::F)) {
            self.state = self.state.apply(MonitorEvent::ToggleFullscreen);
            ctx.send_viewport_cmd(ViewportCommand::Fullscreen(self.state.is_fullscreen()));
            debug!(state = self.state.as_str(), "fullscreen toggled");
        } else if ctx.input(|i| i.key_pressed(egui::Key::S)) {
            self.save_screenshot();
        }
    }

    fn save_screenshot(&self) {
        let Some(frame) = &self.last_frame else {
            warn!("no frame captured yet, skipping screenshot");
            return;
        };
        match screenshot::save_frame(&self.screenshots_dir, frame) {
            Ok(path) => info!(path = %path.display(), "screenshot saved"),
            Err(e) => error!("screenshot failed: {e:#}"),
        }
    }

    fn quit(&mut self, ctx: &egui::Context) {
        if self.state.is_stopped() {
            return;
        }
        self.state = self.state.apply(MonitorEvent::Quit);
        self.cancel.cancel();
        ctx.send_viewport_cmd(ViewportCommand::Close);
        info!("quit requested");
    }
}

impl eframe::App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state == MonitorState::Idle {
            self.state = self.state.apply(MonitorEvent::Launch);
            info!("video window opened");
        }
        if self.state.is_stopped() {
            return;
        }
        if self.cancel.is_cancelled() {
            // a worker aborted the session; run the normal quit path
            self.quit(ctx);
            return;
        }

        self.drain_control();
        self.present_frame(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                if let Some(texture) = &self.texture {
                    ui.centered_and_justified(|ui| {
                        ui.add(egui::Image::new(texture).shrink_to_fit());
                    });
                }
            });

        self.handle_key(ctx);
        // keep pulling camera frames even while no input arrives
        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Reached on ESC and on window close alike. Teardown order: cancel,
        // join the audio workers (their streams close on exit), release the
        // camera; eframe tears the window down after this returns.
        self.cancel.cancel();
        self.state = self.state.apply(MonitorEvent::Quit);
        if let Some(session) = self.session.lock().take() {
            session.shutdown();
        }
        self.source.close();
        info!("teardown complete");
    }
}
