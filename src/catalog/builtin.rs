//! Reference exercise set shipped with the coach.

use super::definition::FeedbackKey::{Correct, Down, Incorrect, TransitionDown, TransitionUp, Up};
use super::definition::{ExerciseDefinition, PostureValidation};
use crate::landmark::{
    LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ANKLE,
    RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};

pub const SQUAT: &str = "SQUAT";
pub const BICEP_CURL: &str = "BICEP CURL";
pub const PUSH_UP: &str = "PUSH-UP";
pub const LUNGE: &str = "LUNGE";
pub const PLANK: &str = "PLANK";
pub const OVERHEAD_PRESS: &str = "OVERHEAD PRESS";
pub const BENT_OVER_ROW: &str = "BENT OVER ROW";
pub const JUMPING_JACKS: &str = "JUMPING JACKS";
pub const GLUTE_BRIDGE: &str = "GLUTE BRIDGE";
pub const HIGH_KNEES: &str = "HIGH KNEES";
pub const BURPEES: &str = "BURPEES";

const HIP_KNEE_ANKLE: [usize; 6] = [
    LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE,
];
const SHOULDER_ELBOW_WRIST: [usize; 6] = [
    LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST, RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST,
];
const SHOULDER_HIP_ANKLE: [usize; 6] = [
    LEFT_SHOULDER, LEFT_HIP, LEFT_ANKLE, RIGHT_SHOULDER, RIGHT_HIP, RIGHT_ANKLE,
];
const SHOULDER_HIP_KNEE: [usize; 6] = [
    LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE, RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE,
];
const HIP_SHOULDER_ELBOW: [usize; 6] = [
    LEFT_HIP, LEFT_SHOULDER, LEFT_ELBOW, RIGHT_HIP, RIGHT_SHOULDER, RIGHT_ELBOW,
];

/// The reference exercises in registration order.
pub fn reference_exercises() -> Vec<ExerciseDefinition> {
    vec![
        ExerciseDefinition::rep_based(SQUAT, HIP_KNEE_ANKLE, 160.0, 120.0).with_feedback(&[
            (Up, "Ready"),
            (Down, "Good Rep"),
            (TransitionUp, "Get Up Straight"),
            (TransitionDown, "Go Deeper"),
        ]),
        ExerciseDefinition::rep_based(BICEP_CURL, SHOULDER_ELBOW_WRIST, 160.0, 40.0)
            .with_feedback(&[
                (Up, "Ready"),
                (Down, "Good Rep"),
                (TransitionUp, "Go Down Straight"),
                (TransitionDown, "Curl Up"),
            ]),
        ExerciseDefinition::rep_based(PUSH_UP, SHOULDER_ELBOW_WRIST, 160.0, 90.0)
            .inverted()
            .with_feedback(&[
                (Up, "Good Rep"),
                (Down, "Ready"),
                (TransitionUp, "Push Up"),
                (TransitionDown, "Go Lower"),
            ]),
        ExerciseDefinition::rep_based(LUNGE, HIP_KNEE_ANKLE, 160.0, 100.0).with_feedback(&[
            (Up, "Ready"),
            (Down, "Good Rep"),
            (TransitionUp, "Push Back Up"),
            (TransitionDown, "Step Forward"),
        ]),
        ExerciseDefinition::timed(PLANK, SHOULDER_HIP_ANKLE, 160.0).with_feedback(&[
            (Correct, "Hold Position"),
            (Incorrect, "Straighten Back"),
        ]),
        ExerciseDefinition::rep_based(OVERHEAD_PRESS, SHOULDER_ELBOW_WRIST, 160.0, 90.0)
            .inverted()
            .with_feedback(&[
                (Up, "Good Rep"),
                (Down, "Ready"),
                (TransitionUp, "Press Up"),
                (TransitionDown, "Lower Slowly"),
            ]),
        ExerciseDefinition::rep_based(BENT_OVER_ROW, SHOULDER_ELBOW_WRIST, 160.0, 90.0)
            .with_feedback(&[
                (Up, "Ready"),
                (Down, "Good Squeeze"),
                (TransitionUp, "Lower Slowly"),
                (TransitionDown, "Pull!"),
            ])
            .with_posture_validation(PostureValidation::new(
                [LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE],
                110.0,
                "Bend Over More",
            )),
        ExerciseDefinition::rep_based(JUMPING_JACKS, HIP_SHOULDER_ELBOW, 140.0, 60.0)
            .inverted()
            .with_feedback(&[
                (Up, "Good Rep"),
                (Down, "Ready"),
                (TransitionUp, "Arms Up!"),
                (TransitionDown, "Arms Down!"),
            ]),
        ExerciseDefinition::rep_based(GLUTE_BRIDGE, SHOULDER_HIP_KNEE, 160.0, 100.0)
            .inverted()
            .with_feedback(&[
                (Up, "Good Squeeze"),
                (Down, "Ready"),
                (TransitionUp, "Lift Hips"),
                (TransitionDown, "Lower Slowly"),
            ]),
        ExerciseDefinition::rep_based(HIGH_KNEES, SHOULDER_HIP_KNEE, 150.0, 100.0).with_feedback(
            &[
                (Up, "Ready"),
                (Down, "Good Rep"),
                (TransitionUp, "Knee Down"),
                (TransitionDown, "Knee Up!"),
            ],
        ),
        ExerciseDefinition::rep_based(BURPEES, SHOULDER_HIP_KNEE, 160.0, 100.0).with_feedback(&[
            (Up, "Ready"),
            (Down, "Good Rep"),
            (TransitionUp, "Jump Up"),
            (TransitionDown, "Chest to Floor"),
        ]),
    ]
}
