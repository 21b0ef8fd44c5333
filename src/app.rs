//! Frame replay application.
//!
//! Reads recorded landmark frames and session events as JSON lines, runs the
//! local participant's pipeline and emits one data channel record per
//! processed frame.

use crate::{
    condition::Condition,
    config::Config,
    error::Result,
    geometry::{FrameSignals, GeometryEngine},
    measurement::MeasurementSession,
    orientation::{Landmark, OrientationEstimator},
    participants::RemoteParticipants,
    pipeline::GazeWindowPipeline,
    window_state::WindowGeometry,
    Error,
};
use log::{debug, info, warn};
use serde::Deserialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Loaded or default configuration file settings
    pub config: Config,
    /// Print each window record as a JSON line
    pub emit: bool,
    /// Start a measurement with the first frame
    pub measure: bool,
}

impl AppConfig {
    #[must_use]
    pub const fn new(config: Config, emit: bool, measure: bool) -> Self {
        Self { config, emit, measure }
    }

    #[must_use]
    pub fn output_dir(&self) -> &PathBuf {
        &self.config.session.output_dir
    }
}

/// One recorded landmark frame with its speech signals
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedFrame {
    /// Capture time in seconds
    #[serde(default)]
    pub t: f64,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    #[serde(default)]
    pub border_alpha_voice: f64,
    #[serde(default)]
    pub is_speaking: bool,
    #[serde(default)]
    pub transcript: String,
}

/// Session event interleaved with frames
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// A remote participant subscribed
    Join { peer: String },
    /// A remote participant went away
    Leave { peer: String },
    /// Data channel message from a remote participant
    Message { peer: String, payload: WindowGeometry },
    /// Experimenter switched the condition
    Condition { id: i64 },
    StartMeasurement {
        #[serde(default)]
        t: f64,
    },
    StopMeasurement,
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayLine {
    Frame(RecordedFrame),
    Event(ReplayEvent),
}

impl ReplayLine {
    /// Parse one JSON line; lines with an `event` key are events, the rest frames
    ///
    /// # Errors
    ///
    /// Returns an error if the line is not valid JSON of either shape.
    pub fn parse(line: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(line)?;
        if value.get("event").is_some() {
            Ok(Self::Event(serde_json::from_value(value)?))
        } else {
            Ok(Self::Frame(serde_json::from_value(value)?))
        }
    }
}

/// Counters reported after a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub frames_skipped: u64,
    pub malformed_lines: u64,
    pub records_emitted: u64,
    pub measurement_files: Vec<PathBuf>,
}

/// Main application struct
#[derive(Debug)]
pub struct GazeWindowApp {
    config: AppConfig,
    pipeline: GazeWindowPipeline,
    remotes: RemoteParticipants,
    measurement: MeasurementSession,
    condition: Condition,
    condition_id: i64,
    measured: bool,
}

impl GazeWindowApp {
    /// Create the application from its configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing gaze window application");
        config.config.validate()?;

        let session = &config.config.session;
        let condition_id = session.condition;
        let condition = session.condition();
        let engine = GeometryEngine::new(
            session.participant_id,
            config.config.screen,
            config.config.geometry,
            config.config.create_smoother()?,
        );
        let pipeline = GazeWindowPipeline::new(OrientationEstimator::default(), engine);
        let measurement = MeasurementSession::new(session.participant_id, condition_id);

        info!(
            "Participant {} in condition {} ({})",
            session.participant_id,
            condition_id,
            condition
        );

        Ok(Self {
            config,
            pipeline,
            remotes: RemoteParticipants::new(),
            measurement,
            condition,
            condition_id,
            measured: false,
        })
    }

    #[must_use]
    pub const fn condition(&self) -> Condition {
        self.condition
    }

    /// Condition id as selected, including unknown ids
    #[must_use]
    pub const fn condition_id(&self) -> i64 {
        self.condition_id
    }

    #[must_use]
    pub const fn remotes(&self) -> &RemoteParticipants {
        &self.remotes
    }

    #[must_use]
    pub const fn measurement(&self) -> &MeasurementSession {
        &self.measurement
    }

    #[must_use]
    pub const fn pipeline(&self) -> &GazeWindowPipeline {
        &self.pipeline
    }

    /// Replay every line of `input`, writing emitted records to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if reading input, writing output or saving a
    /// measurement log fails. Malformed lines are skipped.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<RunSummary> {
        info!("Starting replay");
        let mut summary = RunSummary::default();

        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match ReplayLine::parse(trimmed) {
                Ok(ReplayLine::Frame(frame)) => self.handle_frame(&frame, &mut output, &mut summary)?,
                Ok(ReplayLine::Event(event)) => self.handle_event(event, &mut summary)?,
                Err(e) => {
                    warn!("Skipping malformed line {}: {}", index + 1, e);
                    summary.malformed_lines += 1;
                }
            }
        }

        if self.measurement.is_active() {
            self.finish_measurement(&mut summary)?;
        }
        output.flush()?;

        info!(
            "Replay finished: {} frames, {} skipped, {} malformed lines",
            summary.frames, summary.frames_skipped, summary.malformed_lines
        );
        Ok(summary)
    }

    fn handle_frame<W: Write>(&mut self, frame: &RecordedFrame, output: &mut W, summary: &mut RunSummary) -> Result<()> {
        summary.frames += 1;

        if self.config.measure && !self.measured {
            self.start_measurement(frame.t);
        }

        let signals = FrameSignals::new(self.condition, self.remotes.count())
            .with_voice_alpha(frame.border_alpha_voice)
            .with_speech(frame.is_speaking, &frame.transcript);

        let Some(geometry) = self.pipeline.process_frame(&frame.landmarks, &signals) else {
            summary.frames_skipped += 1;
            return Ok(());
        };

        if self.config.emit {
            writeln!(output, "{}", geometry.to_json()?)?;
            summary.records_emitted += 1;
        }
        if self.measurement.is_active() {
            self.measurement.record(frame.t, &geometry, &self.remotes)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: ReplayEvent, summary: &mut RunSummary) -> Result<()> {
        debug!("Event: {:?}", event);
        match event {
            ReplayEvent::Join { peer } => self.remotes.join(&peer),
            ReplayEvent::Leave { peer } => {
                if !self.remotes.leave(&peer) {
                    warn!("Leave for unknown participant {peer}");
                }
            }
            ReplayEvent::Message { peer, payload } => self.remotes.receive(&peer, payload),
            ReplayEvent::Condition { id } => {
                self.condition_id = id;
                self.condition = Condition::from_id(id);
                self.measurement.set_condition(id);
                info!("Condition changed to {} ({})", id, Condition::name_for_id(id));
            }
            ReplayEvent::StartMeasurement { t } => self.start_measurement(t),
            ReplayEvent::StopMeasurement => {
                if self.measurement.is_active() {
                    self.finish_measurement(summary)?;
                } else {
                    warn!("Stop requested with no measurement in progress");
                }
            }
        }
        Ok(())
    }

    fn start_measurement(&mut self, t: f64) {
        self.measured = true;
        self.measurement.start(self.condition_id, t);
    }

    fn finish_measurement(&mut self, summary: &mut RunSummary) -> Result<()> {
        self.measurement.finish()?;
        let path = self
            .measurement
            .save(self.config.output_dir())
            .map_err(|e| Error::MeasurementError(format!("Failed to save measurement: {e}")))?;
        summary.measurement_files.push(path);
        Ok(())
    }
}
