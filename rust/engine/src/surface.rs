// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render surface abstraction
//!
//! The scene controller talks to whatever presents frames through
//! [`RenderSurface`]. [`HeadlessSurface`] records what it was asked to draw
//! and is used by the CLI and tests.

use crate::camera::OrbitCamera;
use neuroface_geometry::RenderableGroup;

/// Something frames can be presented to
pub trait RenderSurface {
    /// Resize the drawing buffer in physical pixels
    fn resize(&mut self, width: u32, height: u32);

    /// Draw `group` as seen from `camera`; `None` clears the frame
    fn render(&mut self, camera: &OrbitCamera, group: Option<&RenderableGroup>);

    /// Free GPU or window resources. Called at most once.
    fn release(&mut self);
}

/// Statistics of the last frame a [`HeadlessSurface`] rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub sub_meshes: usize,
    pub elements: usize,
}

/// Surface that renders nothing and counts what it was given
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    frames: u64,
    last_frame: FrameStats,
    released: bool,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl RenderSurface for HeadlessSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn render(&mut self, _camera: &OrbitCamera, group: Option<&RenderableGroup>) {
        self.frames += 1;
        self.last_frame = group.map_or(FrameStats::default(), |g| FrameStats {
            sub_meshes: g.sub_meshes().iter().filter(|s| s.visible).count(),
            elements: g.drawn_elements(),
        });
    }

    fn release(&mut self) {
        self.released = true;
    }
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height)
    }

    fn render(&mut self, camera: &OrbitCamera, group: Option<&RenderableGroup>) {
        (**self).render(camera, group)
    }

    fn release(&mut self) {
        (**self).release()
    }
}
