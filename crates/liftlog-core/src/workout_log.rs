// ABOUTME: Describes a whole logged workout (workout fields, exercises with sets, cardio) as one unit.
// ABOUTME: Used to create or re-save a workout together with all of its child records.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, require_non_negative};
use crate::model::{WeightUnit, WorkoutDraft, validate_cardio_fields};

/// A workout as entered on the log form: the workout itself plus its children.
/// When `workout.id` names an existing workout the log replaces its children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub workout: WorkoutDraft,
    #[serde(default)]
    pub exercises: Vec<ExerciseLog>,
    #[serde(default)]
    pub cardio: Vec<CardioLog>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub name: String,
    #[serde(default)]
    pub sets: Vec<SetLog>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetLog {
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub unit: WeightUnit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardioLog {
    pub activity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
}

impl WorkoutLog {
    pub fn new(workout: WorkoutDraft) -> Self {
        Self {
            workout,
            exercises: Vec::new(),
            cardio: Vec::new(),
        }
    }

    pub fn with_exercise(mut self, exercise: ExerciseLog) -> Self {
        self.exercises.push(exercise);
        self
    }

    pub fn with_cardio(mut self, cardio: CardioLog) -> Self {
        self.cardio.push(cardio);
        self
    }

    /// Exercises that will be stored: those with a non-blank name.
    pub fn filled_exercises(&self) -> impl Iterator<Item = &ExerciseLog> {
        self.exercises.iter().filter(|e| !e.name.trim().is_empty())
    }

    /// Cardio entries that will be stored: those with a non-blank activity.
    pub fn filled_cardio(&self) -> impl Iterator<Item = &CardioLog> {
        self.cardio.iter().filter(|c| !c.activity.trim().is_empty())
    }

    /// Check every child that will be stored. Blank rows are skipped, not rejected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for exercise in self.filled_exercises() {
            for set in exercise.filled_sets() {
                require_non_negative("weight", set.weight)?;
            }
        }
        for cardio in self.filled_cardio() {
            validate_cardio_fields(&cardio.activity, cardio.distance, cardio.intensity)?;
        }
        Ok(())
    }
}

impl ExerciseLog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: Vec::new(),
        }
    }

    pub fn with_set(mut self, reps: u32, weight: f64, unit: WeightUnit) -> Self {
        self.sets.push(SetLog { reps, weight, unit });
        self
    }

    /// Sets with either reps or weight entered, in form order.
    pub fn filled_sets(&self) -> impl Iterator<Item = &SetLog> {
        self.sets.iter().filter(|s| !s.is_empty())
    }
}

impl SetLog {
    pub fn is_empty(&self) -> bool {
        self.reps == 0 && self.weight == 0.0
    }
}

impl CardioLog {
    pub fn new(activity: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft() -> WorkoutDraft {
        WorkoutDraft::new(NaiveDate::from_ymd_opt(2026, 2, 12).unwrap(), "Legs")
    }

    #[test]
    fn blank_rows_are_skipped() {
        let log = WorkoutLog::new(draft())
            .with_exercise(
                ExerciseLog::new("Squat")
                    .with_set(10, 60.0, WeightUnit::Kg)
                    .with_set(0, 0.0, WeightUnit::Kg)
                    .with_set(0, 20.0, WeightUnit::Kg),
            )
            .with_exercise(ExerciseLog::new("   ").with_set(5, 5.0, WeightUnit::Kg))
            .with_cardio(CardioLog::new(""))
            .with_cardio(CardioLog::new("Bike"));

        let exercises: Vec<_> = log.filled_exercises().collect();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].filled_sets().count(), 2);
        assert_eq!(log.filled_cardio().count(), 1);
    }

    #[test]
    fn validate_rejects_bad_children_only_when_stored() {
        let mut cardio = CardioLog::new("Bike");
        cardio.intensity = Some(30);
        let log = WorkoutLog::new(draft()).with_cardio(cardio);
        assert_eq!(
            log.validate(),
            Err(ValidationError::IntensityOutOfRange(30))
        );

        let mut blank = CardioLog::new(" ");
        blank.intensity = Some(30);
        let log = WorkoutLog::new(draft()).with_cardio(blank);
        assert!(log.validate().is_ok());
    }

    #[test]
    fn log_deserializes_with_defaults() {
        let json = r#"{
            "workout": {"date": "2026-02-12", "name": "Push"},
            "exercises": [{"name": "Bench", "sets": [{"reps": 8, "weight": 80}]}]
        }"#;
        let log: WorkoutLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.workout.name.as_deref(), Some("Push"));
        assert!(log.cardio.is_empty());
        assert_eq!(log.exercises[0].sets[0].unit, WeightUnit::Kg);
    }
}
