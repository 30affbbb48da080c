// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconstruction session: drives the application state machine around
//! detection, analysis and the scene.
//!
//! ```text
//! LANDING --enter--> IDLE --image--> ANALYZING --landmarks--> GENERATING --reveal done--> COMPLETE
//!                     ^                  |                                                    |
//!                     +---- no face -----+                                                    |
//!                     +------------------------------- reset -------------------------------+
//! ```

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::pipeline::{EncodedImage, LandmarkDetector, MetricAnalyzer};
use crate::scene::{FrameReport, SceneController};
use crate::surface::RenderSurface;
use neuroface_core::{AppState, FaceMetrics};
use std::time::Instant;

/// Result of a successfully started reconstruction
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionStarted {
    /// Detector's description of the scan
    pub description: String,
    pub landmark_count: usize,
    /// Analyzer metrics, or the fallback set if analysis failed
    pub metrics: FaceMetrics,
    /// Whether `metrics` came from the analyzer
    pub metrics_analyzed: bool,
}

/// Owns the detector, analyzer and scene for one viewer
pub struct Session<D, A, S: RenderSurface> {
    state: AppState,
    detector: D,
    analyzer: A,
    scene: SceneController<S>,
    reset_detector: bool,
    last_metrics: Option<FaceMetrics>,
}

impl<D, A, S> Session<D, A, S>
where
    D: LandmarkDetector,
    A: MetricAnalyzer,
    S: RenderSurface,
{
    pub fn new(detector: D, analyzer: A, scene: SceneController<S>, config: &EngineConfig) -> Self {
        Self {
            state: AppState::Landing,
            detector,
            analyzer,
            scene,
            reset_detector: config.reset_detector_between_images,
            last_metrics: None,
        }
    }

    #[inline]
    pub fn state(&self) -> AppState {
        self.state
    }

    /// Leave the landing screen
    pub fn enter(&mut self) {
        if self.state == AppState::Landing {
            self.transition(AppState::Idle);
        }
    }

    /// Detect, analyze and start reconstructing the face in `image`.
    ///
    /// Detection and analysis run concurrently. A failed detection returns
    /// the session to IDLE without touching the scene; a failed analysis
    /// falls back to default metrics.
    pub async fn process_image(&mut self, image: &EncodedImage) -> Result<ReconstructionStarted> {
        if !self.state.accepts_upload() {
            return Err(EngineError::Busy(self.state));
        }
        self.transition(AppState::Analyzing);

        if self.reset_detector {
            self.detector.reset();
        }

        let (detected, analyzed) = futures::join!(
            self.detector.detect(image),
            self.analyzer.analyze(image)
        );

        let analysis = match detected {
            Ok(analysis) if !analysis.landmarks.is_empty() => analysis,
            Ok(_) => return Err(self.fail_detection("detector returned no landmarks")),
            Err(e) => return Err(self.fail_detection(&e.to_string())),
        };

        let (metrics, metrics_analyzed) = match analyzed {
            Ok(metrics) => (metrics, true),
            Err(e) => {
                tracing::warn!(error = %e, "Facial analysis failed, using default metrics");
                (FaceMetrics::fallback(), false)
            }
        };

        self.transition(AppState::Generating);
        if let Err(e) = self.scene.begin_reconstruction(&analysis.landmarks, Instant::now()) {
            tracing::error!(error = %e, "Reconstruction failed to start");
            self.transition(AppState::Idle);
            return Err(e);
        }

        tracing::info!(
            landmarks = analysis.landmarks.len(),
            description = %analysis.description,
            metrics_analyzed,
            "Reconstruction started"
        );
        self.last_metrics = Some(metrics.clone());
        Ok(ReconstructionStarted {
            description: analysis.description,
            landmark_count: analysis.landmarks.len(),
            metrics,
            metrics_analyzed,
        })
    }

    fn fail_detection(&mut self, reason: &str) -> EngineError {
        tracing::warn!(reason, "Face scan failed");
        self.transition(AppState::Idle);
        EngineError::detection_failure(reason)
    }

    /// Drive one display frame; finishing the reveal moves to COMPLETE
    pub fn frame(&mut self, now: Instant) -> FrameReport {
        let report = self.scene.frame(now, self.state);
        if report.completed {
            self.on_generation_complete();
        }
        report
    }

    /// Mark the running reconstruction as finished
    pub fn on_generation_complete(&mut self) {
        if self.state == AppState::Generating {
            self.transition(AppState::Complete);
        }
    }

    /// Return to IDLE for a new scan, keeping the current model on screen
    pub fn reset(&mut self) {
        if self.state != AppState::Landing {
            self.transition(AppState::Idle);
        }
    }

    fn transition(&mut self, next: AppState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "State transition");
            self.state = next;
        }
    }

    /// Metrics of the last started reconstruction
    pub fn last_metrics(&self) -> Option<&FaceMetrics> {
        self.last_metrics.as_ref()
    }

    pub fn scene(&self) -> &SceneController<S> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneController<S> {
        &mut self.scene
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }
}
