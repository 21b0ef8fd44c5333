//! Gaze-aware video window geometry for multi-party video conferencing.
//!
//! Each participant's head orientation, estimated from face landmarks,
//! drives the size, position and border of their video window. Six
//! experimental conditions decide which of these signals are shown.
//!
//! The per-frame pipeline:
//! 1. Orientation estimation from normalized landmarks
//! 2. Raw width, height and border alpha from the displacement magnitude
//! 3. Moving-average smoothing per participant
//! 4. Condition policy selecting the visible geometry
//!
//! # Examples
//!
//! ```
//! use gaze_window::{
//!     condition::Condition,
//!     geometry::{FrameSignals, GeometryEngine},
//!     layout::ScreenSize,
//!     orientation::{Landmark, OrientationEstimator},
//!     pipeline::GazeWindowPipeline,
//! };
//!
//! let engine = GeometryEngine::with_defaults(1, ScreenSize::new(1280.0, 720.0));
//! let mut pipeline = GazeWindowPipeline::new(OrientationEstimator::default(), engine);
//!
//! let landmarks = vec![Landmark::new(0.48, 0.5), Landmark::new(0.5, 0.5), Landmark::new(0.52, 0.5)];
//! let signals = FrameSignals::new(Condition::SizeChange, 0);
//!
//! let geometry = pipeline.process_frame(&landmarks, &signals).expect("face in frame");
//! assert_eq!(geometry.width, 1280.0);
//! ```

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Vector and averaging helpers
pub mod utils;

/// Head orientation from face landmarks
pub mod orientation;

/// Signal filtering for window geometry smoothing
pub mod filters;

/// Experimental conditions
pub mod condition;

/// Gallery layout bounds
pub mod layout;

/// Orientation to window geometry mapping
pub mod geometry;

/// Window record exchanged with remote participants
pub mod window_state;

/// Compass direction of the head orientation angle
pub mod direction;

/// Head direction measurement log
pub mod measurement;

/// Remote participant registry
pub mod participants;

/// Per-participant frame pipeline
pub mod pipeline;

/// Configuration management
pub mod config;

/// Frame replay application
pub mod app;

pub use error::{Error, Result};
