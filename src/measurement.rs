//! Measurement sessions and the head-direction CSV log.
//!
//! The CSV layout is consumed by existing analysis scripts and must not
//! change: a UTF-8 BOM, a header row, every field enclosed in double quotes,
//! rows joined by `\n`.

use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{
    condition::Condition,
    constants::UNKNOWN_PARTICIPANT_ID,
    direction::classify,
    participants::RemoteParticipants,
    window_state::WindowGeometry,
    Error, Result,
};

/// CSV column names in file order
pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "condition",
    "startTime",
    "endTime",
    "theta",
    "direction",
    "windowWidth",
    "windowHeight",
    "statusGaze",
];

const UTF8_BOM: &str = "\u{feff}";

/// One row of the head-direction log
#[derive(Debug, Clone, PartialEq)]
pub struct HeadDirectionRecord {
    pub id: i64,
    pub condition: i64,
    pub start_time: f64,
    pub end_time: f64,
    pub theta: f64,
    pub direction: String,
    pub window_width: f64,
    pub window_height: f64,
    pub status_gaze: String,
}

impl HeadDirectionRecord {
    /// First row of every log
    #[must_use]
    pub fn sentinel(condition_id: i64) -> Self {
        Self {
            id: UNKNOWN_PARTICIPANT_ID,
            condition: condition_id,
            start_time: 0.0,
            end_time: 0.0,
            theta: 0.0,
            direction: String::new(),
            window_width: 0.0,
            window_height: 0.0,
            status_gaze: String::new(),
        }
    }

    /// Row for a participant; a peer that has not sent anything yet is logged with zeros
    #[must_use]
    pub fn from_geometry(geometry: Option<&WindowGeometry>, condition_id: i64, start_time: f64, end_time: f64) -> Self {
        let (id, theta, width, height, status) = geometry.map_or(
            (UNKNOWN_PARTICIPANT_ID, 0.0, 0.0, 0.0, String::new()),
            |g| {
                (
                    g.participant_id,
                    g.theta,
                    g.width_in_case_of_change,
                    g.height_in_case_of_change,
                    g.gaze_status.to_string(),
                )
            },
        );
        Self {
            id,
            condition: condition_id,
            start_time,
            end_time,
            theta,
            direction: classify(theta).to_string(),
            window_width: width,
            window_height: height,
            status_gaze: status,
        }
    }

    fn fields(&self) -> [String; 9] {
        [
            self.id.to_string(),
            self.condition.to_string(),
            format_number(self.start_time),
            format_number(self.end_time),
            format_number(self.theta),
            self.direction.clone(),
            format_number(self.window_width),
            format_number(self.window_height),
            self.status_gaze.clone(),
        ]
    }
}

/// Render a number the way the browser client printed it
fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if (1e-6..1e21).contains(&value.abs()) {
        format!("{value}")
    } else {
        // Exponent form with an explicit sign, e.g. `1e-7` or `1.5e+21`
        let formatted = format!("{value:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
            _ => formatted,
        }
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Records head direction rows between `start` and `finish`.
///
/// The condition is kept as the raw id the experimenter selected, so an
/// unknown id still shows up as itself in rows and the file name.
#[derive(Debug, Clone)]
pub struct MeasurementSession {
    participant_id: i64,
    condition_id: i64,
    records: Vec<HeadDirectionRecord>,
    started_at: f64,
    last_end: f64,
    active: bool,
}

impl MeasurementSession {
    #[must_use]
    pub fn new(participant_id: i64, condition_id: i64) -> Self {
        Self {
            participant_id,
            condition_id,
            records: Vec::new(),
            started_at: 0.0,
            last_end: 0.0,
            active: false,
        }
    }

    /// Begin a measurement at `now` (seconds); earlier rows are discarded
    pub fn start(&mut self, condition_id: i64, now: f64) {
        info!(
            "Measurement started: participant {} condition {} ({})",
            self.participant_id,
            condition_id,
            Condition::name_for_id(condition_id)
        );
        self.condition_id = condition_id;
        self.records = vec![HeadDirectionRecord::sentinel(condition_id)];
        self.started_at = now;
        self.last_end = 0.0;
        self.active = true;
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Raw condition id written into rows
    #[must_use]
    pub const fn condition_id(&self) -> i64 {
        self.condition_id
    }

    /// Behavioural condition; unknown ids behave as Baseline
    #[must_use]
    pub fn condition(&self) -> Condition {
        Condition::try_from_id(self.condition_id).unwrap_or_default()
    }

    /// Change the condition id written into subsequent rows
    pub fn set_condition(&mut self, condition_id: i64) {
        self.condition_id = condition_id;
    }

    #[must_use]
    pub fn records(&self) -> &[HeadDirectionRecord] {
        &self.records
    }

    /// Append the local row and one row per subscribed peer.
    ///
    /// All rows of one call share `startTime` (the previous call's `endTime`)
    /// and `endTime` (seconds since `start`).
    ///
    /// # Errors
    ///
    /// Returns `Error::MeasurementError` when no measurement is running.
    pub fn record(&mut self, now: f64, local: &WindowGeometry, remotes: &RemoteParticipants) -> Result<()> {
        if !self.active {
            return Err(Error::MeasurementError("No measurement in progress".to_string()));
        }
        let end_time = now - self.started_at;
        let start_time = self.last_end;

        self.records.push(HeadDirectionRecord::from_geometry(
            Some(local),
            self.condition_id,
            start_time,
            end_time,
        ));
        for (_, geometry) in remotes.iter() {
            self.records.push(HeadDirectionRecord::from_geometry(
                geometry,
                self.condition_id,
                start_time,
                end_time,
            ));
        }

        self.last_end = end_time;
        Ok(())
    }

    /// Stop recording; rows stay available for export
    ///
    /// # Errors
    ///
    /// Returns `Error::MeasurementError` when no measurement is running.
    pub fn finish(&mut self) -> Result<&[HeadDirectionRecord]> {
        if !self.active {
            return Err(Error::MeasurementError("No measurement in progress".to_string()));
        }
        self.active = false;
        info!("Measurement finished with {} rows", self.records.len());
        Ok(&self.records)
    }

    /// `C{condition}_ID{participant}_headDirectionResults.csv`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "C{}_ID{}_headDirectionResults.csv",
            self.condition_id,
            self.participant_id
        )
    }

    /// Write the log as CSV
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(UTF8_BOM.as_bytes())?;
        let header = CSV_HEADER.iter().map(|h| quote(h)).collect::<Vec<_>>().join(",");
        writer.write_all(header.as_bytes())?;
        for record in &self.records {
            let row = record.fields().iter().map(|f| quote(f)).collect::<Vec<_>>().join(",");
            writer.write_all(b"\n")?;
            writer.write_all(row.as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Save the log into `dir` under [`Self::file_name`]
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name());
        let file = File::create(&path).map_err(|e| Error::IoError(format!("{}: {e}", path.display())))?;
        self.write_csv(BufWriter::new(file))?;
        info!("Wrote measurement log to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window_state::GazeStatus;

    fn local(theta: f64) -> WindowGeometry {
        let mut geometry = WindowGeometry::initial(1, 900.0, 450.0);
        geometry.theta = theta;
        geometry.width_in_case_of_change = 1000.0;
        geometry.height_in_case_of_change = 500.0;
        geometry.gaze_status = GazeStatus::MutualGaze;
        geometry
    }

    #[test]
    fn test_start_writes_sentinel() {
        let mut session = MeasurementSession::new(1, 1);
        session.start(Condition::SizeChange.id(), 100.0);
        assert_eq!(session.records(), &[HeadDirectionRecord::sentinel(3)]);
        assert_eq!(session.records()[0].condition, 3);
    }

    #[test]
    fn test_record_requires_active_session() {
        let mut session = MeasurementSession::new(1, 1);
        assert!(session.record(1.0, &local(0.0), &RemoteParticipants::new()).is_err());
        assert!(session.finish().is_err());
    }

    #[test]
    fn test_time_chaining_and_remote_rows() {
        let mut session = MeasurementSession::new(1, 1);
        let mut peers = RemoteParticipants::new();
        peers.join("known");
        peers.join("silent");
        let mut remote = WindowGeometry::initial(2, 400.0, 300.0);
        remote.theta = 90.0;
        remote.width_in_case_of_change = 420.0;
        peers.receive("known", remote);

        session.start(Condition::Baseline.id(), 10.0);
        session.record(10.5, &local(45.0), &peers).unwrap();
        session.record(11.25, &local(300.0), &peers).unwrap();

        let records = session.records();
        assert_eq!(records.len(), 1 + 3 + 3);

        let first = &records[1];
        assert_eq!((first.start_time, first.end_time), (0.0, 0.5));
        assert_eq!(first.direction, "LeftDown");
        assert_eq!(first.window_width, 1000.0);
        assert_eq!(first.status_gaze, "mutual gaze");

        assert_eq!(records[2].id, 2);
        assert_eq!(records[2].direction, "Down");
        assert_eq!(records[2].window_width, 420.0);

        let silent = &records[3];
        assert_eq!(silent.id, -1);
        assert_eq!(silent.theta, 0.0);
        assert_eq!(silent.direction, "Left");
        assert_eq!(silent.status_gaze, "");

        let second = &records[4];
        assert_eq!((second.start_time, second.end_time), (0.5, 1.25));
        assert_eq!(second.direction, "LeftUp");
    }

    #[test]
    fn test_csv_output() {
        let mut session = MeasurementSession::new(5, 1);
        session.start(Condition::PositionChange.id(), 0.0);
        session.record(0.5, &local(12.5), &RemoteParticipants::new()).unwrap();
        session.finish().unwrap();

        let mut buffer = Vec::new();
        session.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let expected = "\u{feff}\"ID\",\"condition\",\"startTime\",\"endTime\",\"theta\",\"direction\",\"windowWidth\",\"windowHeight\",\"statusGaze\"\n\
                        \"-1\",\"5\",\"0\",\"0\",\"0\",\"\",\"0\",\"0\",\"\"\n\
                        \"1\",\"5\",\"0\",\"0.5\",\"12.5\",\"Left\",\"1000\",\"500\",\"mutual gaze\"";
        assert_eq!(text, expected);
        assert_eq!(session.file_name(), "C5_ID5_headDirectionResults.csv");
    }

    #[test]
    fn test_quote_escaping() {
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_format_number_exponent_ranges() {
        assert_eq!(format_number(1e-6), "0.000001");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(-2.5e-9), "-2.5e-9");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-1.2345e22), "-1.2345e+22");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }
}
