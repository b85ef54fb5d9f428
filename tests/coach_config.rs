use std::sync::Mutex;

use tempfile::NamedTempFile;

use form_coach::config::CoachConfig;
use form_coach::ExerciseKind;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "COACH_CONFIG",
        "COACH_CATALOG_PATH",
        "COACH_INITIAL_FEEDBACK",
        "COACH_NO_POSE_FEEDBACK",
        "COACH_MISSING_FRAMES_BEFORE_NO_POSE",
        "COACH_SEGMENT_EPSILON",
        "COACH_TARGET_FPS",
    ] {
        std::env::remove_var(key);
    }
}

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    std::io::Write::write_all(&mut file, contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn defaults_without_config() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = CoachConfig::load().expect("load config");
    assert!(cfg.catalog_path.is_none());
    assert_eq!(cfg.session.initial_feedback, "Ready");
    assert_eq!(cfg.session.no_pose_feedback, "No pose detected");
    assert_eq!(cfg.session.missing_frames_before_no_pose, 3);
    assert_eq!(cfg.session.segment_epsilon, 1e-6);
    assert_eq!(cfg.target_fps, 30);
    assert_eq!(cfg.catalog().expect("catalog").len(), 11);
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_temp(
        r#"{
            "feedback": {
                "initial": "Get Set",
                "no_pose": "Step into frame",
                "missing_frames_before_no_pose": 10
            },
            "geometry": {
                "segment_epsilon": 0.001
            },
            "replay": {
                "target_fps": 24
            }
        }"#,
    );

    std::env::set_var("COACH_CONFIG", file.path());
    std::env::set_var("COACH_NO_POSE_FEEDBACK", "Nobody there");
    std::env::set_var("COACH_TARGET_FPS", "15");
    std::env::set_var("COACH_MISSING_FRAMES_BEFORE_NO_POSE", "0");

    let cfg = CoachConfig::load().expect("load config");

    assert_eq!(cfg.session.initial_feedback, "Get Set");
    assert_eq!(cfg.session.no_pose_feedback, "Nobody there");
    assert_eq!(cfg.session.missing_frames_before_no_pose, 0);
    assert_eq!(cfg.session.segment_epsilon, 0.001);
    assert_eq!(cfg.target_fps, 15);

    clear_env();
}

#[test]
fn rejects_unknown_fields_and_bad_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_temp(r#"{ "feedback": { "initial": "Go" }, "rtsp": {} }"#);
    std::env::set_var("COACH_CONFIG", file.path());
    assert!(CoachConfig::load().is_err());
    clear_env();

    std::env::set_var("COACH_SEGMENT_EPSILON", "0");
    assert!(CoachConfig::load().is_err());
    clear_env();

    std::env::set_var("COACH_TARGET_FPS", "fast");
    assert!(CoachConfig::load().is_err());
    clear_env();
}

#[test]
fn extra_catalog_extends_builtins() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let catalog_file = write_temp(
        r#"
[[exercise]]
name = "WALL SIT"
kind = "timed"
landmarks = [23, 25, 27, 24, 26, 28]
correct_form_angle = 100.0

[exercise.feedback]
correct = "Hold It"
incorrect = "Sit Lower"
"#,
    );
    std::env::set_var("COACH_CATALOG_PATH", catalog_file.path());

    let cfg = CoachConfig::load().expect("load config");
    let catalog = cfg.catalog().expect("catalog");
    assert_eq!(catalog.len(), 12);
    let wall_sit = catalog.lookup("WALL SIT").expect("registered");
    assert_eq!(wall_sit.kind(), ExerciseKind::Timed);
    assert_eq!(wall_sit.correct_form_angle(), Some(100.0));
    assert!(catalog.lookup("SQUAT").is_ok());

    clear_env();
}

#[test]
fn catalog_file_redefining_builtin_fails() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let catalog_file = write_temp(
        r#"
[[exercise]]
name = "SQUAT"
landmarks = [23, 25, 27, 24, 26, 28]
up_threshold = 150.0
down_threshold = 110.0
"#,
    );
    std::env::set_var("COACH_CATALOG_PATH", catalog_file.path());

    let cfg = CoachConfig::load().expect("load config");
    assert!(cfg.catalog().is_err());

    clear_env();
}
