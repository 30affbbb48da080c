// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Perspective camera with damped orbit controls
//!
//! The camera orbits a target point in spherical coordinates. Drag input is
//! accumulated as angular velocity and bled off a little every frame, so the
//! view keeps gliding after the pointer is released.

use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Viewports narrower than this use the compact framing
pub const COMPACT_BREAKPOINT_PX: u32 = 768;

/// Keeps the camera off the poles where the up vector degenerates
const PITCH_LIMIT: f64 = FRAC_PI_2 - 1e-6;

/// Perspective camera orbiting a target point
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal angle in radians, 0 looking down -Z from +Z
    yaw: f64,
    /// Vertical angle in radians, positive above the target
    pitch: f64,
    /// Distance from target point
    distance: f64,
    /// Point the camera orbits around
    target: Point3<f64>,
    /// Aspect ratio (width/height) for projection
    aspect: f64,
    /// Vertical field of view in degrees
    fov_degrees: f64,
    /// Near clipping plane
    near: f64,
    /// Far clipping plane
    far: f64,
}

impl OrbitCamera {
    /// Camera at (0, 0, 5) looking at the origin
    pub fn new(aspect: f64) -> Self {
        let mut camera = Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 5.0,
            target: Point3::origin(),
            aspect: 1.0,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        };
        camera.set_aspect(aspect);
        camera
    }

    /// Place the camera at `position` looking at `target`
    pub fn look_from(&mut self, position: Point3<f64>, target: Point3<f64>) {
        let offset = position - target;
        let distance = offset.norm();
        self.target = target;
        if distance <= f64::EPSILON {
            return;
        }
        self.distance = distance;
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / distance).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Framing for the viewport width: compact screens look slightly up at a
    /// raised target from further back
    pub fn frame_for_width(&mut self, width_px: u32) {
        if width_px < COMPACT_BREAKPOINT_PX {
            self.look_from(Point3::new(0.0, -0.4, 5.5), Point3::new(0.0, 0.3, 0.0));
        } else {
            self.look_from(Point3::new(0.0, 0.0, 5.0), Point3::origin());
        }
    }

    /// Camera position from spherical coordinates
    pub fn eye_position(&self) -> Point3<f64> {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vector3::new(x, y, z)
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Isometry3::look_at_rh(&self.eye_position(), &self.target, &Vector3::y()).to_homogeneous()
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        Perspective3::new(self.aspect, self.fov_degrees.to_radians(), self.near, self.far).to_homogeneous()
    }

    /// Update aspect ratio on resize; non-finite or non-positive ratios are
    /// ignored
    pub fn set_aspect(&mut self, aspect: f64) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn fov_degrees(&self) -> f64 {
        self.fov_degrees
    }

    pub fn near(&self) -> f64 {
        self.near
    }

    pub fn far(&self) -> f64 {
        self.far
    }

    pub fn target(&self) -> Point3<f64> {
        self.target
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Pointer-driven orbit with inertia
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enable_damping: bool,
    /// Fraction of the pending rotation applied (and removed) per update
    pub damping_factor: f64,
    pub rotate_speed: f64,
    pub enable_pan: bool,
    yaw_delta: f64,
    pitch_delta: f64,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            enable_pan: false,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
        }
    }

    /// Queue a rotation for a pointer drag of `(dx, dy)` pixels.
    ///
    /// A drag across the full viewport height turns the camera once around.
    pub fn drag(&mut self, dx: f64, dy: f64, viewport_height: f64) {
        if viewport_height.is_nan() || viewport_height <= 0.0 {
            return;
        }
        self.yaw_delta -= TAU * dx / viewport_height * self.rotate_speed;
        self.pitch_delta += TAU * dy / viewport_height * self.rotate_speed;
    }

    /// Move the orbit target; ignored while panning is disabled
    pub fn pan(&mut self, camera: &mut OrbitCamera, offset: Vector3<f64>) {
        if self.enable_pan {
            camera.target += offset;
        }
    }

    /// Apply pending rotation to `camera`. Returns true if it moved.
    pub fn update(&mut self, camera: &mut OrbitCamera) -> bool {
        let factor = if self.enable_damping { self.damping_factor } else { 1.0 };
        let yaw_step = self.yaw_delta * factor;
        let pitch_step = self.pitch_delta * factor;

        camera.yaw += yaw_step;
        camera.pitch = (camera.pitch + pitch_step).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        if self.enable_damping {
            self.yaw_delta *= 1.0 - self.damping_factor;
            self.pitch_delta *= 1.0 - self.damping_factor;
        } else {
            self.yaw_delta = 0.0;
            self.pitch_delta = 0.0;
        }

        yaw_step.abs() > 1e-9 || pitch_step.abs() > 1e-9
    }

    /// Drop any queued rotation
    pub fn stop(&mut self) {
        self.yaw_delta = 0.0;
        self.pitch_delta = 0.0;
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}
