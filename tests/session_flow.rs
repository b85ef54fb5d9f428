use form_coach::catalog::builtin::{BICEP_CURL, LUNGE, PLANK, SQUAT};
use form_coach::replay::synthetic_pose;
use form_coach::{
    CoachError, ExerciseCatalog, ExerciseKind, LandmarkFrame, Session, SessionSettings, Stage,
    Validity,
};

fn squat_reps(session: &mut Session<'_>, catalog: &ExerciseCatalog, reps: usize) {
    let def = catalog.lookup(SQUAT).unwrap();
    for _ in 0..reps {
        for angle in [170.0, 140.0, 100.0, 140.0] {
            session.observe(&synthetic_pose(def, angle)).unwrap();
        }
    }
}

#[test]
fn switching_exercise_resets_progress() {
    let catalog = ExerciseCatalog::builtin();
    let mut session = Session::new(&catalog);
    session.begin(SQUAT).unwrap();
    squat_reps(&mut session, &catalog, 3);
    assert_eq!(session.snapshot().unwrap().rep_count, 3);

    let replaced = session.begin(BICEP_CURL).unwrap().expect("squat summary");
    assert_eq!(replaced.exercise, SQUAT);
    assert_eq!(replaced.reps, 3);
    assert_eq!(replaced.frames_classified, 12);

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.exercise, BICEP_CURL);
    assert_eq!(snapshot.stage, Some(Stage::Up));
    assert_eq!(snapshot.rep_count, 0);
    assert_eq!(snapshot.feedback, "Ready");
    assert_eq!(snapshot.validity, Validity::Neutral);
}

#[test]
fn workout_produces_summaries_in_order() {
    let catalog = ExerciseCatalog::builtin();
    let mut session = Session::new(&catalog);

    session.begin(SQUAT).unwrap();
    squat_reps(&mut session, &catalog, 2);
    session.observe_no_pose().unwrap();

    session.begin(LUNGE).unwrap();
    let skipped = session.skip().unwrap();
    assert_eq!(skipped.exercise, LUNGE);
    assert_eq!(skipped.reps, 0);
    assert!(session.active_exercise().is_none());

    session.begin(PLANK).unwrap();
    let plank = catalog.lookup(PLANK).unwrap();
    for _ in 0..5 {
        session.observe(&synthetic_pose(plank, 170.0)).unwrap();
    }

    let summaries = session.finish();
    let names: Vec<&str> = summaries.iter().map(|s| s.exercise.as_str()).collect();
    assert_eq!(names, vec![SQUAT, LUNGE, PLANK]);
    assert_eq!(summaries[0].reps, 2);
    assert_eq!(summaries[0].frames_without_pose, 1);
    assert_eq!(summaries[2].kind, ExerciseKind::Timed);
    assert_eq!(summaries[2].frames_hold_correct, 5);
    assert_eq!(summaries[2].reps, 0);
}

#[test]
fn dropped_frames_keep_rep_progress() {
    let catalog = ExerciseCatalog::builtin();
    let mut session = Session::new(&catalog);
    session.begin(SQUAT).unwrap();
    squat_reps(&mut session, &catalog, 1);

    let empty = LandmarkFrame::new(Vec::new());
    for _ in 0..10 {
        let err = session.observe(&empty).unwrap_err();
        assert!(matches!(err, CoachError::MissingLandmarks { .. }));
    }
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.rep_count, 1);
    assert_eq!(snapshot.feedback, "No pose detected");

    // Pose returns: the next rep still counts from the saved stage.
    squat_reps(&mut session, &catalog, 1);
    assert_eq!(session.snapshot().unwrap().rep_count, 2);

    let summary = session.finish().pop().unwrap();
    assert_eq!(summary.frames_missing_landmarks, 10);
}

#[test]
fn missing_fallback_can_be_disabled() {
    let catalog = ExerciseCatalog::builtin();
    let settings = SessionSettings {
        initial_feedback: "Get Set".to_string(),
        missing_frames_before_no_pose: 0,
        ..SessionSettings::default()
    };
    let mut session = Session::with_settings(&catalog, settings);
    session.begin(SQUAT).unwrap();
    assert_eq!(session.snapshot().unwrap().feedback, "Get Set");

    let empty = LandmarkFrame::new(Vec::new());
    for _ in 0..10 {
        assert!(session.observe(&empty).is_err());
    }
    assert_eq!(session.snapshot().unwrap().feedback, "Get Set");
}

#[test]
fn observe_without_exercise_fails() {
    let catalog = ExerciseCatalog::builtin();
    let mut session = Session::new(&catalog);
    let frame = synthetic_pose(catalog.lookup(SQUAT).unwrap(), 170.0);
    assert_eq!(
        session.observe(&frame).unwrap_err(),
        CoachError::NoActiveExercise
    );
    assert!(session.finish().is_empty());
}

#[test]
fn snapshot_serializes_for_renderers() {
    let catalog = ExerciseCatalog::builtin();
    let mut session = Session::new(&catalog);
    session.begin(SQUAT).unwrap();
    let json = serde_json::to_value(session.snapshot().unwrap()).unwrap();
    assert_eq!(json["exercise"], "SQUAT");
    assert_eq!(json["kind"], "rep_based");
    assert_eq!(json["stage"], "up");
    assert_eq!(json["rep_count"], 0);
}
