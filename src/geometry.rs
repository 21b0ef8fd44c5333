//! Head orientation to window geometry.
//!
//! Per frame the engine:
//! 1. turns the displacement magnitude into raw width, height and border alpha,
//! 2. smooths them through the participant's [`GeometrySmoother`],
//! 3. derives the discrete size, gaze status and position offsets,
//! 4. picks the visible values according to the active [`Condition`].

use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::{
    condition::Condition,
    constants::{
        BORDER_ALPHA_MAX, BORDER_ALPHA_MIN, BORDER_ALPHA_MIN_THRESHOLD, DEFAULT_LEFT_DIFF, DEFAULT_TOP_DIFF,
        DISPLACEMENT_RATE_SCALE, DISTANCE_RATE_MOVE, GAZE_MARGIN_RATE,
    },
    filters::{GeometrySmoother, SmoothedSignals},
    layout::{LayoutBounds, ScreenSize},
    orientation::HeadOrientation,
    window_state::{BorderColor, GazeStatus, WindowGeometry},
};

/// Tuning of the orientation to geometry mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryParams {
    /// Magnification of the displacement for position offsets
    pub distance_rate_move: f64,
    /// Displacement norm scale; below `1 / rate_scale` the window stays at MAX
    pub rate_scale: f64,
    pub border_alpha_min: f64,
    pub border_alpha_max: f64,
    /// Border alpha below this snaps to `border_alpha_min`
    pub border_alpha_threshold: f64,
    /// Fraction of the MIN..MAX span used for discrete sizing and gaze status
    pub gaze_margin: f64,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            distance_rate_move: DISTANCE_RATE_MOVE,
            rate_scale: DISPLACEMENT_RATE_SCALE,
            border_alpha_min: BORDER_ALPHA_MIN,
            border_alpha_max: BORDER_ALPHA_MAX,
            border_alpha_threshold: BORDER_ALPHA_MIN_THRESHOLD,
            gaze_margin: GAZE_MARGIN_RATE,
        }
    }
}

/// Externally supplied per-frame inputs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameSignals {
    pub condition: Condition,
    /// Border alpha driven by the speaker's voice
    pub border_alpha_voice: f64,
    pub is_speaking: bool,
    pub transcript: String,
    pub remote_count: usize,
}

impl FrameSignals {
    #[must_use]
    pub fn new(condition: Condition, remote_count: usize) -> Self {
        Self {
            condition,
            remote_count,
            ..Self::default()
        }
    }

    /// Attach speech state; the transcript is only kept while speaking
    #[must_use]
    pub fn with_speech(mut self, is_speaking: bool, transcript: &str) -> Self {
        self.is_speaking = is_speaking;
        self.transcript = if is_speaking { transcript.to_string() } else { String::new() };
        self
    }

    #[must_use]
    pub const fn with_voice_alpha(mut self, border_alpha_voice: f64) -> Self {
        self.border_alpha_voice = border_alpha_voice;
        self
    }
}

/// Unsmoothed values for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSignals {
    pub width: f64,
    pub height: f64,
    pub border_alpha: f64,
}

/// Scale factor in `(0, 1]` shrinking the window as the head turns away
#[must_use]
pub fn size_rate(magnitude: f64, rate_scale: f64) -> f64 {
    let scaled = magnitude * rate_scale;
    if scaled <= 1.0 {
        1.0
    } else {
        1.0 / scaled
    }
}

/// Raw width, height and border alpha with their floors applied
#[must_use]
pub fn raw_signals(magnitude: f64, bounds: &LayoutBounds, params: &GeometryParams) -> RawSignals {
    let rate = size_rate(magnitude, params.rate_scale);

    let width = (bounds.width_max * rate).max(bounds.width_min);
    let height = (bounds.height_max * rate).max(bounds.height_min);
    let mut border_alpha = params.border_alpha_max * rate;
    if border_alpha < params.border_alpha_threshold {
        border_alpha = params.border_alpha_min;
    }

    RawSignals {
        width,
        height,
        border_alpha,
    }
}

/// MAX above the top margin of the span, MIN otherwise
#[must_use]
pub fn discrete_size(value: f64, max: f64, min: f64, margin: f64) -> f64 {
    if value > max - (max - min) * margin {
        max
    } else {
        min
    }
}

/// Gaze status from the unsmoothed width.
///
/// Both checks run in order and the later one wins; with `margin < 0.5`
/// they cannot both hold.
#[must_use]
pub fn classify_gaze(width: f64, bounds: &LayoutBounds, margin: f64) -> GazeStatus {
    let span = bounds.width_span();
    let mut status = GazeStatus::Neutral;
    if width > bounds.width_max - span * margin {
        status = GazeStatus::MutualGaze;
    }
    if width < bounds.width_min + span * margin {
        status = GazeStatus::GazeAversion;
    }
    status
}

/// `(top_diff, left_diff)` offsets of the window from the screen centre
#[must_use]
pub fn position_offsets(orientation: &HeadOrientation, distance_rate_move: f64) -> (f64, f64) {
    let distance = distance_rate_move * orientation.magnitude();
    (
        distance * orientation.angle_rad.sin(),
        distance * (orientation.angle_rad - PI).cos(),
    )
}

/// Source of the visible window size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSource {
    Default,
    Smoothed,
    Discrete,
}

/// Source of the visible border alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaSource {
    Voice,
    Smoothed,
}

/// What a condition shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub size: SizeSource,
    pub moves: bool,
    pub alpha: AlphaSource,
}

/// Display policy for each condition
#[must_use]
pub const fn policy(condition: Condition) -> Policy {
    use AlphaSource::{Smoothed as SmoothedAlpha, Voice};
    use SizeSource::{Default, Discrete, Smoothed};

    let (size, moves, alpha) = match condition {
        Condition::Baseline => (Default, false, Voice),
        Condition::FrameChange => (Default, false, SmoothedAlpha),
        Condition::SizeChange => (Smoothed, false, Voice),
        Condition::SizeChangeDiscrete => (Discrete, false, Voice),
        Condition::PositionChange => (Default, true, Voice),
        Condition::PositionAndSizeChange => (Smoothed, true, Voice),
    };
    Policy { size, moves, alpha }
}

/// Every candidate value a condition may pick from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidates {
    pub bounds: LayoutBounds,
    pub smoothed: SmoothedSignals,
    pub discrete_width: f64,
    pub discrete_height: f64,
    pub top_diff: f64,
    pub left_diff: f64,
    pub voice_alpha: f64,
}

/// Visible window placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width: f64,
    pub height: f64,
    pub top_diff: f64,
    pub left_diff: f64,
    pub border_alpha: f64,
}

/// Apply a condition's policy to the candidates
#[must_use]
pub fn select_placement(condition: Condition, candidates: &Candidates) -> Placement {
    let rule = policy(condition);

    let (width, height) = match rule.size {
        SizeSource::Default => (candidates.bounds.default_width(), candidates.bounds.default_height()),
        SizeSource::Smoothed => (candidates.smoothed.width, candidates.smoothed.height),
        SizeSource::Discrete => (candidates.discrete_width, candidates.discrete_height),
    };
    let (top_diff, left_diff) = if rule.moves {
        (candidates.top_diff, candidates.left_diff)
    } else {
        (DEFAULT_TOP_DIFF, DEFAULT_LEFT_DIFF)
    };
    let border_alpha = match rule.alpha {
        AlphaSource::Voice => candidates.voice_alpha,
        AlphaSource::Smoothed => candidates.smoothed.border_alpha,
    };

    Placement {
        width,
        height,
        top_diff,
        left_diff,
        border_alpha,
    }
}

/// Per-participant geometry engine owning its smoothing state
#[derive(Debug)]
pub struct GeometryEngine {
    participant_id: i64,
    screen: ScreenSize,
    params: GeometryParams,
    border: BorderColor,
    smoother: GeometrySmoother,
}

impl GeometryEngine {
    #[must_use]
    pub fn new(participant_id: i64, screen: ScreenSize, params: GeometryParams, smoother: GeometrySmoother) -> Self {
        Self {
            participant_id,
            screen,
            params,
            border: BorderColor::default(),
            smoother,
        }
    }

    /// Engine with default parameters and a 10-frame moving average
    #[must_use]
    pub fn with_defaults(participant_id: i64, screen: ScreenSize) -> Self {
        Self::new(participant_id, screen, GeometryParams::default(), GeometrySmoother::default())
    }

    #[must_use]
    pub const fn participant_id(&self) -> i64 {
        self.participant_id
    }

    pub fn set_participant_id(&mut self, participant_id: i64) {
        self.participant_id = participant_id;
    }

    #[must_use]
    pub const fn screen(&self) -> &ScreenSize {
        &self.screen
    }

    #[must_use]
    pub const fn params(&self) -> &GeometryParams {
        &self.params
    }

    /// Current layout bounds for `remote_count` remote participants
    #[must_use]
    pub fn bounds(&self, remote_count: usize) -> LayoutBounds {
        self.screen.bounds(remote_count)
    }

    /// Drop smoothing history, e.g. when the tracked face changes
    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    /// Compute this frame's window record
    pub fn compute(&mut self, orientation: &HeadOrientation, signals: &FrameSignals) -> WindowGeometry {
        let bounds = self.screen.bounds(signals.remote_count);
        let margin = self.params.gaze_margin;

        let raw = raw_signals(orientation.magnitude(), &bounds, &self.params);
        let smoothed = self.smoother.apply(raw.width, raw.height, raw.border_alpha);

        let discrete_width = discrete_size(smoothed.width, bounds.width_max, bounds.width_min, margin);
        let discrete_height = discrete_size(smoothed.height, bounds.height_max, bounds.height_min, margin);
        let gaze_status = classify_gaze(raw.width, &bounds, margin);
        let (top_diff, left_diff) = position_offsets(orientation, self.params.distance_rate_move);

        let placement = select_placement(
            signals.condition,
            &Candidates {
                bounds,
                smoothed,
                discrete_width,
                discrete_height,
                top_diff,
                left_diff,
                voice_alpha: signals.border_alpha_voice,
            },
        );

        debug!(
            "participant {} {}: theta={:.1} raw_w={:.1} w={:.1} h={:.1} alpha={:.3} gaze='{}'",
            self.participant_id,
            signals.condition,
            orientation.angle_deg,
            raw.width,
            placement.width,
            placement.height,
            placement.border_alpha,
            gaze_status
        );

        WindowGeometry {
            participant_id: self.participant_id,
            top_diff: placement.top_diff,
            left_diff: placement.left_diff,
            width: placement.width,
            height: placement.height,
            border_red: self.border.red,
            border_green: self.border.green,
            border_blue: self.border.blue,
            border_alpha: placement.border_alpha,
            border_alpha_value_based_voice: signals.border_alpha_voice,
            theta: orientation.angle_deg,
            width_in_case_of_change: raw.width,
            height_in_case_of_change: raw.height,
            is_speaking: signals.is_speaking,
            transcript: signals.transcript.clone(),
            gaze_status,
        }
    }
}
