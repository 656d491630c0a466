// Unit tests for domain models

use super::*;

#[test]
fn test_time_spec_parse_seconds() {
    let time = TimeSpec::parse("123.456").unwrap();
    assert_eq!(time.seconds, 123.456);
}

#[test]
fn test_time_spec_parse_mm_ss() {
    let time = TimeSpec::parse("01:30.5").unwrap();
    assert_eq!(time.seconds, 90.5);
}

#[test]
fn test_time_spec_parse_hh_mm_ss() {
    let time = TimeSpec::parse("01:02:03.5").unwrap();
    assert_eq!(time.seconds, 3723.5);
}

#[test]
fn test_time_spec_parse_invalid() {
    assert!(TimeSpec::parse("invalid").is_err());
    assert!(TimeSpec::parse("00:60").is_err());
    assert!(TimeSpec::parse("1:60:00").is_err());
    assert!(TimeSpec::parse("-10").is_err());
    assert!(TimeSpec::parse("1:2:3:4").is_err());
}

#[test]
fn test_time_spec_display() {
    assert_eq!(TimeSpec::from_seconds(3723.5).to_string(), "1:02:03.500");
    assert_eq!(TimeSpec::from_seconds(123.5).to_string(), "2:03.500");
}

#[test]
fn test_trim_range_floors_milliseconds() {
    let range = TrimRangeMs::from_seconds(2.0009, 7.9999);
    assert_eq!(range.start_ms, 2000);
    assert_eq!(range.end_ms, 7999);
    assert_eq!(range.duration_ms(), 5999);
}

#[test]
fn test_seconds_to_millis_floor_edge_cases() {
    assert_eq!(seconds_to_millis_floor(-1.0), 0);
    assert_eq!(seconds_to_millis_floor(f64::NAN), 0);
    assert_eq!(seconds_to_millis_floor(0.0015), 1);
}

#[test]
fn test_resolution_presets() {
    assert_eq!(Resolution::parse("720p").unwrap(), Resolution { width: 1280, height: 720 });
    assert_eq!(Resolution::parse("1080P").unwrap(), Resolution { width: 1920, height: 1080 });
    assert_eq!(Resolution::parse("480p").unwrap(), Resolution { width: 854, height: 480 });
}

#[test]
fn test_resolution_custom() {
    let resolution = Resolution::parse("640x360").unwrap();
    assert_eq!(resolution.to_string(), "640x360");
    assert!(Resolution::parse("0x360").is_err());
    assert!(Resolution::parse("wide").is_err());
    assert!(Resolution::new(100, 0).is_err());
}

#[test]
fn test_size_limit_must_be_positive() {
    assert!(SizeLimit::new(50.0).is_ok());
    assert!(SizeLimit::new(0.0).is_err());
    assert!(SizeLimit::new(f64::INFINITY).is_err());
}

#[test]
fn test_export_options_gain_is_clamped() {
    assert_eq!(ExportOptions::default().gain, 1.0);
    assert_eq!(ExportOptions::default().with_gain(3.5).gain, 2.0);
    assert_eq!(ExportOptions::default().with_gain(-1.0).gain, 0.0);
    assert_eq!(ExportOptions::default().with_gain(f64::NAN).gain, 1.0);
}

#[test]
fn test_form_fields_minimal() {
    let request = UploadRequest {
        file: SourceFile::new("clip.mp4", vec![1, 2, 3]),
        range: TrimRangeMs::from_seconds(0.0, 10.0),
        options: ExportOptions::default(),
    };

    assert_eq!(
        request.form_fields(),
        vec![
            ("startTime", "0".to_string()),
            ("endTime", "10000".to_string()),
            ("volume", "1".to_string()),
        ]
    );
}

#[test]
fn test_form_fields_with_all_options() {
    let options = ExportOptions::default()
        .with_gain(1.5)
        .with_size_limit(SizeLimit::new(50.0).unwrap())
        .with_resolution(Resolution::from_preset(ResolutionPreset::Hd720))
        .with_frame_rate(30)
        .unwrap()
        .with_bitrate_kbps(1000)
        .unwrap();
    let request = UploadRequest {
        file: SourceFile::new("clip.mp4", vec![0; 4]),
        range: TrimRangeMs::from_seconds(2.0, 8.0),
        options,
    };

    let fields = request.form_fields();
    assert!(fields.contains(&("volume", "1.5".to_string())));
    assert!(fields.contains(&("maxSizeMb", "50".to_string())));
    assert!(fields.contains(&("resolution", "1280x720".to_string())));
    assert!(fields.contains(&("fps", "30".to_string())));
    assert!(fields.contains(&("bitrate", "1000".to_string())));
}

#[test]
fn test_upload_response_deserializes_camel_case() {
    let json = r#"{"status":"success","filename":"out.mp4","processedVideo":"/download/out.mp4"}"#;
    let response: UploadResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.status, UploadStatus::Success);
    assert_eq!(response.filename.as_deref(), Some("out.mp4"));
    assert_eq!(response.processed_video.as_deref(), Some("/download/out.mp4"));
    assert!(response.message.is_none());

    let error: UploadResponse =
        serde_json::from_str(r#"{"status":"error","message":"Ungültiges Format"}"#).unwrap();
    assert_eq!(error.status, UploadStatus::Error);
    assert_eq!(error.message.as_deref(), Some("Ungültiges Format"));
}

#[test]
fn test_job_state_classification() {
    assert!(JobState::Polling.is_active());
    assert!(JobState::Ready.is_active());
    assert!(!JobState::Idle.is_active());
    assert!(JobState::Failed(JobError::DownloadTimeout { attempts: 200 }).is_terminal());
    assert!(JobState::Cancelled.is_terminal());
    assert!(!JobState::Submitting.is_terminal());
}
