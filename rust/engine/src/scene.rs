// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene controller: camera, surface, current head group and reveal
//!
//! The controller exclusively owns the single renderable group. Starting a
//! reconstruction disposes the previous group before the new one is built,
//! so at no point do two groups coexist.

use crate::animator::{RevealAnimator, RevealPhase};
use crate::camera::{OrbitCamera, OrbitControls};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::surface::RenderSurface;
use neuroface_core::{AppState, Landmark};
use neuroface_geometry::{build_head_group, placeholder_group, RenderableGroup};
use std::time::Instant;

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// Construction progress while a reveal is running or just finished
    pub progress: Option<u8>,
    /// The reveal finished on this frame
    pub completed: bool,
    /// Group rotation about the vertical axis after this frame
    pub rotation_y: f64,
    /// A frame was presented
    pub rendered: bool,
}

/// Owns everything needed to present the head and drives it per frame
pub struct SceneController<S: RenderSurface> {
    config: EngineConfig,
    camera: OrbitCamera,
    controls: OrbitControls,
    surface: S,
    group: Option<RenderableGroup>,
    animator: RevealAnimator,
    on_complete: Option<Box<dyn FnMut()>>,
    next_group_id: u64,
    viewport: (u32, u32),
    torn_down: bool,
}

fn aspect_of(width: u32, height: u32) -> f64 {
    width as f64 / height.max(1) as f64
}

impl<S: RenderSurface> SceneController<S> {
    /// Set up the camera for the viewport and show the placeholder sphere
    pub fn new(mut surface: S, width: u32, height: u32, config: EngineConfig) -> Result<Self> {
        let mut camera = OrbitCamera::new(aspect_of(width, height));
        camera.frame_for_width(width);
        surface.resize(width, height);

        let placeholder = placeholder_group()?.with_id(1);
        tracing::debug!(width, height, "Scene initialized with placeholder");

        Ok(Self {
            config,
            camera,
            controls: OrbitControls::new(),
            surface,
            group: Some(placeholder),
            animator: RevealAnimator::new(config.reveal_duration),
            on_complete: None,
            next_group_id: 2,
            viewport: (width, height),
            torn_down: false,
        })
    }

    /// Register the callback fired once per finished reveal
    pub fn set_completion_handler(&mut self, handler: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(handler));
    }

    /// Replace the current group with one built from `landmarks` and start
    /// revealing it at `now`.
    ///
    /// An empty landmark set is rejected before anything is disposed.
    pub fn begin_reconstruction(&mut self, landmarks: &[Landmark], now: Instant) -> Result<()> {
        if self.torn_down {
            tracing::debug!("Ignoring reconstruction after teardown");
            return Ok(());
        }
        if landmarks.is_empty() {
            return Err(EngineError::EmptyLandmarkSet);
        }
        // Reject bad input before the current group is released
        if let Some((index, l)) = landmarks.iter().enumerate().find(|(_, l)| !l.is_finite()) {
            let err = neuroface_core::Error::NonFiniteLandmark {
                index,
                x: l.x,
                y: l.y,
                z: l.z,
            };
            return Err(EngineError::Geometry(err.into()));
        }

        self.animator.cancel();
        if let Some(previous) = self.group.take() {
            previous.dispose();
        }

        let id = self.next_group_id;
        self.next_group_id += 1;
        let mut group = build_head_group(landmarks, &self.config.head)?.with_id(id);
        self.animator.begin(&mut group, now);
        self.group = Some(group);
        Ok(())
    }

    /// Advance one display frame: orbit damping, idle rotation, reveal, draw
    pub fn frame(&mut self, now: Instant, state: AppState) -> FrameReport {
        if self.torn_down {
            return FrameReport::default();
        }

        let spin = match state {
            AppState::Idle => self.config.idle_rotation,
            AppState::Complete => self.config.complete_rotation,
            _ => 0.0,
        };
        self.controls.update(&mut self.camera);

        let mut report = FrameReport::default();
        if let Some(group) = self.group.as_mut() {
            group.rotation_y += spin;
            report.rotation_y = group.rotation_y;

            if let Some(tick) = self.animator.tick(group, now) {
                report.progress = Some(tick.progress);
                report.completed = tick.completed;
            }
        }

        if report.completed {
            if let Some(handler) = self.on_complete.as_mut() {
                handler();
            }
        }

        self.surface.render(&self.camera, self.group.as_ref());
        report.rendered = true;
        report
    }

    /// Track a new viewport size
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.torn_down {
            return;
        }
        self.viewport = (width, height);
        self.camera.set_aspect(aspect_of(width, height));
        self.camera.frame_for_width(width);
        self.surface.resize(width, height);
    }

    /// Orbit the camera for a pointer drag in pixels
    pub fn drag(&mut self, dx: f64, dy: f64) {
        if self.torn_down {
            return;
        }
        self.controls.drag(dx, dy, self.viewport.1 as f64);
    }

    /// Release the surface and geometry. Later calls are no-ops.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.animator.cancel();
        self.controls.stop();
        if let Some(group) = self.group.take() {
            group.dispose();
        }
        self.on_complete = None;
        self.surface.release();
        tracing::debug!("Scene torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn group(&self) -> Option<&RenderableGroup> {
        self.group.as_ref()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn reveal_phase(&self) -> RevealPhase {
        self.animator.phase()
    }

    pub fn progress(&self) -> u8 {
        self.animator.progress()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl<S: RenderSurface> Drop for SceneController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
