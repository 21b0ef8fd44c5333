//! Tests for the head direction CSV log written to disk

use gaze_window::{
    condition::Condition,
    measurement::{MeasurementSession, CSV_HEADER},
    participants::RemoteParticipants,
    window_state::{GazeStatus, WindowGeometry},
};
use tempfile::TempDir;

fn local_record(theta: f64, width: f64, height: f64) -> WindowGeometry {
    let mut geometry = WindowGeometry::initial(3, 576.0, 324.0);
    geometry.theta = theta;
    geometry.width_in_case_of_change = width;
    geometry.height_in_case_of_change = height;
    geometry.gaze_status = GazeStatus::GazeAversion;
    geometry
}

fn split_rows(text: &str) -> Vec<Vec<String>> {
    text.trim_start_matches('\u{feff}')
        .split('\n')
        .map(|row| {
            row.split("\",\"")
                .map(|field| field.trim_matches('"').to_string())
                .collect()
        })
        .collect()
}

#[test]
fn test_save_writes_named_file() {
    let dir = TempDir::new().unwrap();
    let mut session = MeasurementSession::new(3, Condition::Baseline.id());
    session.start(Condition::SizeChangeDiscrete.id(), 2.0);
    session.record(2.25, &local_record(200.0, 512.0, 288.0), &RemoteParticipants::new()).unwrap();
    session.finish().unwrap();

    let path = session.save(dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "C4_ID3_headDirectionResults.csv");

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with('\u{feff}'));
    assert!(!text.ends_with('\n'));

    let rows = split_rows(&text);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], CSV_HEADER.iter().map(|h| h.to_string()).collect::<Vec<_>>());
    assert_eq!(rows[1], ["-1", "4", "0", "0", "0", "", "0", "0", ""]);
    assert_eq!(
        rows[2],
        ["3", "4", "0", "0.25", "200", "Right", "512", "288", "gaze aversion"]
    );
}

#[test]
fn test_rows_per_subscribed_remote() {
    let mut remotes = RemoteParticipants::new();
    remotes.join("peer-a");
    remotes.join("peer-b");
    remotes
        .receive_json(
            "peer-b",
            &{
                let mut remote = WindowGeometry::initial(8, 400.0, 300.0);
                remote.theta = 230.0;
                remote.width_in_case_of_change = 410.0;
                remote.height_in_case_of_change = 310.0;
                remote.gaze_status = GazeStatus::MutualGaze;
                remote.to_json().unwrap()
            },
        )
        .unwrap();

    let mut session = MeasurementSession::new(3, Condition::Baseline.id());
    session.start(Condition::Baseline.id(), 0.0);
    session.record(1.0, &local_record(10.0, 500.0, 300.0), &remotes).unwrap();
    remotes.leave("peer-a");
    session.record(2.0, &local_record(10.0, 500.0, 300.0), &remotes).unwrap();

    let records = session.records();
    // sentinel, 3 rows, then 2 rows after a peer left
    assert_eq!(records.len(), 1 + 3 + 2);

    assert_eq!(records[2].id, -1);
    assert_eq!(records[2].direction, "Left");
    assert_eq!(records[2].window_width, 0.0);

    assert_eq!(records[3].id, 8);
    assert_eq!(records[3].direction, "RightUp");
    assert_eq!(records[3].window_height, 310.0);
    assert_eq!(records[3].status_gaze, "mutual gaze");

    assert_eq!((records[4].start_time, records[4].end_time), (1.0, 2.0));
    assert_eq!(records[5].id, 8);
}

#[test]
fn test_restart_discards_previous_rows() {
    let mut session = MeasurementSession::new(1, Condition::Baseline.id());
    session.start(Condition::Baseline.id(), 0.0);
    session.record(0.5, &local_record(0.0, 1.0, 1.0), &RemoteParticipants::new()).unwrap();
    session.start(Condition::FrameChange.id(), 10.0);

    assert_eq!(session.records().len(), 1);
    assert_eq!(session.records()[0].condition, 2);

    session.record(10.5, &local_record(0.0, 1.0, 1.0), &RemoteParticipants::new()).unwrap();
    assert_eq!((session.records()[1].start_time, session.records()[1].end_time), (0.0, 0.5));
}

#[test]
fn test_out_of_range_theta_logs_error_direction() {
    let mut session = MeasurementSession::new(1, Condition::Baseline.id());
    session.start(Condition::Baseline.id(), 0.0);
    session.record(1.0, &local_record(f64::NAN, 1.0, 1.0), &RemoteParticipants::new()).unwrap();
    assert_eq!(session.records()[1].direction, "Error");

    let mut buffer = Vec::new();
    session.write_csv(&mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.contains("\"NaN\",\"Error\""));
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let mut session = MeasurementSession::new(1, Condition::Baseline.id());
    session.start(Condition::Baseline.id(), 0.0);
    assert!(session.save(dir.path().join("missing")).is_err());
}
