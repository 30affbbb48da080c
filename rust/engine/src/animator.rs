// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Progressive reveal of a freshly built head group.
//!
//! Every sub-mesh starts with an empty draw range and grows toward its full
//! element count along a cubic ease-out curve. The animator is driven by the
//! caller's clock: it never reads the time itself.

use neuroface_geometry::{DrawRangeTarget, RenderableGroup};
use std::time::{Duration, Instant};

/// Cubic ease-out: fast start, gentle landing
#[inline]
pub fn ease_out_cubic(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Animator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    Revealing { started: Instant },
    Complete,
}

/// Outcome of one animation tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTick {
    /// Construction progress in `[0, 100]`
    pub progress: u8,
    /// Eased reveal fraction applied to the draw ranges
    pub eased: f64,
    /// Set on the single tick that finishes the reveal
    pub completed: bool,
}

/// Drives draw ranges of a group from empty to full
#[derive(Debug, Clone)]
pub struct RevealAnimator {
    duration: Duration,
    phase: RevealPhase,
    progress: u8,
}

impl RevealAnimator {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            phase: RevealPhase::Idle,
            progress: 0,
        }
    }

    #[inline]
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Last reported progress
    #[inline]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    #[inline]
    pub fn is_revealing(&self) -> bool {
        matches!(self.phase, RevealPhase::Revealing { .. })
    }

    /// Hide every sub-mesh and start revealing at `now`.
    ///
    /// Restarting supersedes any reveal already in flight.
    pub fn begin(&mut self, group: &mut RenderableGroup, now: Instant) {
        for sub_mesh in group.sub_meshes_mut() {
            sub_mesh.set_draw_range(0, 0);
            sub_mesh.visible = true;
        }
        self.phase = RevealPhase::Revealing { started: now };
        self.progress = 0;
        tracing::debug!(
            group = group.id(),
            elements = group.total_elements(),
            duration_ms = self.duration.as_millis() as u64,
            "Reveal started"
        );
    }

    /// Advance the reveal to `now`.
    ///
    /// Returns `None` unless a reveal is in progress, so ticks after
    /// completion leave the group untouched.
    pub fn tick(&mut self, group: &mut RenderableGroup, now: Instant) -> Option<RevealTick> {
        let RevealPhase::Revealing { started } = self.phase else {
            return None;
        };

        let elapsed = now.saturating_duration_since(started);
        let p = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        let eased = ease_out_cubic(p);

        for sub_mesh in group.sub_meshes_mut() {
            let total = sub_mesh.element_count();
            let count = ((total as f64 * eased).floor() as usize).min(total);
            sub_mesh.set_draw_range(0, count);
        }

        // Progress never moves backward even if the clock does
        self.progress = self.progress.max((eased * 100.0).floor() as u8);
        let completed = p >= 1.0;
        if completed {
            self.phase = RevealPhase::Complete;
            tracing::info!(group = group.id(), "Reveal complete");
        }

        Some(RevealTick {
            progress: self.progress,
            eased,
            completed,
        })
    }

    /// Abandon any reveal without touching geometry
    pub fn cancel(&mut self) {
        self.phase = RevealPhase::Idle;
        self.progress = 0;
    }
}

impl Default for RevealAnimator {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_REVEAL_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use neuroface_geometry::placeholder_group;

    #[test]
    fn test_ease_out_cubic() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_relative_eq!(ease_out_cubic(0.5), 0.875);
        assert_eq!(ease_out_cubic(2.0), 1.0);
    }

    #[test]
    fn test_begin_hides_everything() {
        let mut group = placeholder_group().unwrap();
        let mut animator = RevealAnimator::default();
        animator.begin(&mut group, Instant::now());
        assert_eq!(group.drawn_elements(), 0);
        assert!(animator.is_revealing());
    }

    #[test]
    fn test_halfway_tick() {
        let mut group = placeholder_group().unwrap();
        let total = group.total_elements();
        let mut animator = RevealAnimator::new(Duration::from_millis(1000));
        let start = Instant::now();
        animator.begin(&mut group, start);

        let tick = animator.tick(&mut group, start + Duration::from_millis(500)).unwrap();
        assert_eq!(tick.progress, 87);
        assert!(!tick.completed);
        assert_eq!(group.drawn_elements(), (total as f64 * 0.875).floor() as usize);
    }

    #[test]
    fn test_completion_reported_once() {
        let mut group = placeholder_group().unwrap();
        let mut animator = RevealAnimator::new(Duration::from_millis(100));
        let start = Instant::now();
        animator.begin(&mut group, start);

        let done = animator.tick(&mut group, start + Duration::from_millis(150)).unwrap();
        assert!(done.completed);
        assert_eq!(done.progress, 100);
        assert_eq!(group.drawn_elements(), group.total_elements());

        assert!(animator.tick(&mut group, start + Duration::from_millis(200)).is_none());
        assert_eq!(animator.phase(), RevealPhase::Complete);
    }

    #[test]
    fn test_tick_without_begin() {
        let mut group = placeholder_group().unwrap();
        let mut animator = RevealAnimator::default();
        assert!(animator.tick(&mut group, Instant::now()).is_none());
        assert_eq!(group.drawn_elements(), group.total_elements());
    }
}
