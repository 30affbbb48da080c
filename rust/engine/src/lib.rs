// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! NeuroFace Engine
//!
//! Turns a photo into a progressively revealed 3D head. The [`Session`]
//! state machine hands an image to a [`LandmarkDetector`] and a
//! [`MetricAnalyzer`], then asks the [`SceneController`] to rebuild its head
//! group and reveal it frame by frame through a [`RenderSurface`].
//!
//! Everything runs on one thread: the host calls [`Session::frame`] once per
//! display refresh and awaits [`Session::process_image`] from its own
//! executor.

pub mod animator;
pub mod camera;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod scene;
pub mod session;
pub mod summary;
pub mod surface;

pub use animator::{ease_out_cubic, RevealAnimator, RevealPhase, RevealTick};
pub use camera::{OrbitCamera, OrbitControls};
pub use config::EngineConfig;
pub use error::{EngineError, Result, RETRY_PROMPT};
pub use pipeline::{EncodedImage, LandmarkDetector, MetricAnalyzer, ServiceError, StaticAnalyzer, StaticDetector};
pub use scene::{FrameReport, SceneController};
pub use session::{ReconstructionStarted, Session};
pub use summary::GroupSummary;
pub use surface::{FrameStats, HeadlessSurface, RenderSurface};
