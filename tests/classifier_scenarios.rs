use form_coach::catalog::builtin::{BENT_OVER_ROW, JUMPING_JACKS, PLANK, PUSH_UP, SQUAT};
use form_coach::replay::{pose_with_angles, synthetic_pose};
use form_coach::{
    ClassifierState, CoachError, ExerciseCatalog, ExerciseDefinition, FrameEvent, LandmarkFrame,
    LandmarkPoint, PostureValidation, RepClassifier, Stage, Validity,
};

fn builtin(name: &str) -> ExerciseDefinition {
    ExerciseCatalog::builtin()
        .lookup(name)
        .expect("built-in exercise")
        .clone()
}

/// Feed one frame per angle and return the rep count after each.
fn run(def: &ExerciseDefinition, state: &mut ClassifierState, angles: &[f64]) -> Vec<u32> {
    let classifier = RepClassifier::new();
    angles
        .iter()
        .map(|&angle| {
            classifier
                .classify(def, state, &synthetic_pose(def, angle))
                .expect("classify");
            state.rep_count()
        })
        .collect()
}

#[test]
fn squat_counts_on_reaching_depth() {
    let def = builtin(SQUAT);
    let classifier = RepClassifier::new();
    let mut state = ClassifierState::new(&def);
    assert_eq!(state.stage(), Stage::Up);
    assert_eq!(state.feedback(), "Ready");

    classifier
        .classify(&def, &mut state, &synthetic_pose(&def, 170.0))
        .unwrap();
    assert_eq!(state.stage(), Stage::Up);
    assert_eq!(state.rep_count(), 0);

    let outcome = classifier
        .classify(&def, &mut state, &synthetic_pose(&def, 110.0))
        .unwrap();
    assert_eq!(outcome.event, FrameEvent::RepCompleted);
    assert_eq!(state.stage(), Stage::Down);
    assert_eq!(state.rep_count(), 1);
    assert_eq!(state.feedback(), "Good Rep");
    assert_eq!(state.validity(), Validity::Valid);
}

#[test]
fn push_up_starts_down_and_counts_on_extension() {
    let def = builtin(PUSH_UP);
    let classifier = RepClassifier::new();
    let mut state = ClassifierState::new(&def);
    assert_eq!(state.stage(), Stage::Down);

    classifier
        .classify(&def, &mut state, &synthetic_pose(&def, 80.0))
        .unwrap();
    assert_eq!(state.stage(), Stage::Down);
    assert_eq!(state.rep_count(), 0);
    assert_eq!(state.feedback(), "Ready");

    classifier
        .classify(&def, &mut state, &synthetic_pose(&def, 170.0))
        .unwrap();
    assert_eq!(state.stage(), Stage::Up);
    assert_eq!(state.rep_count(), 1);
    assert_eq!(state.feedback(), "Good Rep");
}

#[test]
fn plank_reports_form_without_counting() {
    let def = builtin(PLANK);
    let classifier = RepClassifier::new();
    let mut state = ClassifierState::new(&def);

    let outcome = classifier
        .classify(&def, &mut state, &pose_with_angles(&def, 165.0, 165.0, None))
        .unwrap();
    assert_eq!(outcome.event, FrameEvent::HoldCorrect);
    assert_eq!(state.feedback(), "Hold Position");
    assert_eq!(state.validity(), Validity::Valid);

    let outcome = classifier
        .classify(&def, &mut state, &pose_with_angles(&def, 140.0, 165.0, None))
        .unwrap();
    assert_eq!(outcome.event, FrameEvent::HoldIncorrect);
    assert_eq!(state.feedback(), "Straighten Back");
    assert_eq!(state.validity(), Validity::Invalid);
    assert_eq!(state.rep_count(), 0);
}

#[test]
fn bent_over_row_never_counts_while_upright() {
    let def = builtin(BENT_OVER_ROW);
    let classifier = RepClassifier::new();
    let mut state = ClassifierState::new(&def);

    for angle in [170.0, 60.0, 170.0, 60.0] {
        let frame = pose_with_angles(&def, angle, angle, Some(150.0));
        let outcome = classifier.classify(&def, &mut state, &frame).unwrap();
        assert_eq!(outcome.event, FrameEvent::PostureRejected);
        assert!(outcome.angles.is_none());
        assert_eq!(state.feedback(), "Bend Over More");
        assert_eq!(state.validity(), Validity::Invalid);
    }
    assert_eq!(state.rep_count(), 0);
    assert_eq!(state.stage(), Stage::Up);

    // Bent over, the same motion counts.
    for angle in [170.0, 60.0] {
        let frame = pose_with_angles(&def, angle, angle, Some(80.0));
        classifier.classify(&def, &mut state, &frame).unwrap();
    }
    assert_eq!(state.rep_count(), 1);
    assert_eq!(state.feedback(), "Good Squeeze");
}

/// Custom exercise guarded by a right angle over landmarks 6-8, with the
/// guard joint laid out so its angle is exactly representable.
fn right_angle_guarded() -> ExerciseDefinition {
    ExerciseDefinition::rep_based("GUARDED", [0, 1, 2, 3, 4, 5], 160.0, 90.0)
        .with_posture_validation(PostureValidation::new([6, 7, 8], 90.0, "Bend Over More"))
}

fn with_guard_end(def: &ExerciseDefinition, primary: f64, far_end: (f32, f32)) -> LandmarkFrame {
    let mut points = pose_with_angles(def, primary, primary, None).points().to_vec();
    points[6] = LandmarkPoint::new(0.5, 0.25);
    points[7] = LandmarkPoint::new(0.5, 0.5);
    points[8] = LandmarkPoint::new(far_end.0, far_end.1);
    LandmarkFrame::new(points)
}

#[test]
fn guard_exactly_at_limit_passes() {
    let def = right_angle_guarded();
    let classifier = RepClassifier::new();
    let mut state = ClassifierState::new(&def);

    let outcome = classifier
        .classify(&def, &mut state, &with_guard_end(&def, 170.0, (0.75, 0.5)))
        .unwrap();
    assert_eq!(outcome.guard_angle.unwrap().degrees, 90.0);
    assert_eq!(outcome.event, FrameEvent::Rest);

    let outcome = classifier
        .classify(&def, &mut state, &with_guard_end(&def, 60.0, (0.75, 0.5)))
        .unwrap();
    assert_eq!(outcome.event, FrameEvent::RepCompleted);
    assert_eq!(state.rep_count(), 1);
}

#[test]
fn guard_just_past_limit_rejects() {
    let def = right_angle_guarded();
    let classifier = RepClassifier::new();
    let mut state = ClassifierState::new(&def);

    let outcome = classifier
        .classify(&def, &mut state, &with_guard_end(&def, 60.0, (0.75, 0.501)))
        .unwrap();
    assert!(outcome.guard_angle.unwrap().degrees > 90.0);
    assert_eq!(outcome.event, FrameEvent::PostureRejected);
    assert_eq!(state.rep_count(), 0);
    assert_eq!(state.feedback(), "Bend Over More");
}

#[test]
fn full_traversal_counts_once_at_any_frame_rate() {
    let def = builtin(SQUAT);
    for steps in [1usize, 2, 5, 30, 120] {
        let mut state = ClassifierState::new(&def);
        let mut angles = vec![170.0];
        angles.extend((1..=steps).map(|i| 170.0 - 110.0 * i as f64 / steps as f64));
        angles.extend((1..=steps).map(|i| 60.0 + 110.0 * i as f64 / steps as f64));
        let counts = run(&def, &mut state, &angles);
        assert_eq!(*counts.last().unwrap(), 1, "steps={steps}");
    }
}

#[test]
fn oscillation_at_threshold_counts_once() {
    let def = builtin(SQUAT);
    let mut state = ClassifierState::new(&def);
    let angles = [170.0, 119.0, 121.0, 119.0, 125.0, 118.0, 140.0, 110.0];
    let counts = run(&def, &mut state, &angles);
    assert_eq!(counts, vec![0, 1, 1, 1, 1, 1, 1, 1]);
    assert_eq!(state.feedback(), "Get Up Straight");
}

#[test]
fn rep_count_never_decreases() {
    let def = builtin(JUMPING_JACKS);
    let mut state = ClassifierState::new(&def);
    let angles: Vec<f64> = (0..400)
        .map(|i| 90.0 + 85.0 * (i as f64 * 0.37).sin())
        .collect();
    let counts = run(&def, &mut state, &angles);
    assert!(counts.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(*counts.last().unwrap() > 0);
}

#[test]
fn missing_landmarks_do_not_touch_state() {
    let def = builtin(SQUAT);
    let classifier = RepClassifier::new();
    let mut state = ClassifierState::new(&def);
    run(&def, &mut state, &[170.0, 100.0]);
    let before = state.clone();

    let truncated = LandmarkFrame::new(synthetic_pose(&def, 170.0).points()[..20].to_vec());
    let err = classifier
        .classify(&def, &mut state, &truncated)
        .unwrap_err();
    assert!(matches!(err, CoachError::MissingLandmarks { .. }));
    assert_eq!(state, before);
}

#[test]
fn unknown_exercise_is_not_found() {
    let catalog = ExerciseCatalog::builtin();
    assert_eq!(
        catalog.lookup("YOGA").unwrap_err(),
        CoachError::NotFound("YOGA".to_string())
    );
    assert_eq!(
        catalog.lookup("squat").unwrap_err(),
        CoachError::NotFound("squat".to_string())
    );
}
