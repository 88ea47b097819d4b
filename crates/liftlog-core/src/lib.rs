// ABOUTME: Core library for liftlog, containing the fitness-log domain types and derived views.
// ABOUTME: Storage lives in liftlog-store; everything here is pure data and computation.

pub mod error;
pub mod model;
pub mod views;
pub mod workout_log;

pub use error::ValidationError;
pub use model::{
    Cardio, CardioDraft, Entity, Exercise, ExerciseDraft, Photo, PhotoDraft, Set, SetDraft,
    UserProfile, WeightUnit, Workout, WorkoutDraft,
};
pub use views::Dataset;
pub use workout_log::{CardioLog, ExerciseLog, SetLog, WorkoutLog};
