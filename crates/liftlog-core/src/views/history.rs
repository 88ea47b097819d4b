// ABOUTME: Assembles a workout with its exercises, ordered sets, and cardio entries.
// ABOUTME: history() lists every workout that way, newest first.

use crate::model::{Cardio, Exercise, Set, Workout};
use crate::views::Dataset;

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseWithSets {
    pub exercise: Exercise,
    /// Ascending by set number.
    pub sets: Vec<Set>,
}

/// A workout together with all of its child records.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDetails {
    pub workout: Workout,
    pub exercises: Vec<ExerciseWithSets>,
    pub cardio: Vec<Cardio>,
}

impl WorkoutDetails {
    pub fn set_count(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }
}

/// Details for a single workout, or None if no workout has that id.
pub fn workout_details(dataset: &Dataset, workout_id: &str) -> Option<WorkoutDetails> {
    dataset
        .workout(workout_id)
        .map(|workout| details_for(dataset, workout))
}

/// All workouts with their details, newest date first.
pub fn history(dataset: &Dataset) -> Vec<WorkoutDetails> {
    dataset
        .workouts_newest_first()
        .into_iter()
        .map(|workout| details_for(dataset, workout))
        .collect()
}

fn details_for(dataset: &Dataset, workout: &Workout) -> WorkoutDetails {
    let exercises = dataset
        .exercises_for(&workout.id)
        .map(|exercise| ExerciseWithSets {
            exercise: exercise.clone(),
            sets: dataset.sets_for(&exercise.id).into_iter().cloned().collect(),
        })
        .collect();

    WorkoutDetails {
        workout: workout.clone(),
        exercises,
        cardio: dataset.cardio_for(&workout.id).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::*;

    fn sample() -> Dataset {
        Dataset {
            workouts: vec![
                workout("w1", "2026-02-10", "Legs + Biceps"),
                workout("w2", "2026-02-12", "Shoulders + Triceps"),
            ],
            exercises: vec![
                exercise("e1", "w1", "Squat"),
                exercise("e2", "w2", "Shoulder Press"),
                exercise("e3", "w2", "Rope Pushdown"),
            ],
            sets: vec![
                set("s2", "e2", 2, 10, 30.0),
                set("s1", "e2", 1, 12, 28.0),
                set("s3", "e1", 1, 5, 100.0),
            ],
            cardio: vec![cardio("c1", "w2", "Rowing", Some(10))],
            photos: Vec::new(),
        }
    }

    #[test]
    fn details_include_children_in_order() {
        let details = workout_details(&sample(), "w2").unwrap();

        assert_eq!(details.workout.name, "Shoulders + Triceps");
        assert_eq!(details.exercises.len(), 2);
        assert_eq!(details.exercises[0].exercise.name, "Shoulder Press");
        let numbers: Vec<u32> = details.exercises[0]
            .sets
            .iter()
            .map(|s| s.set_number)
            .collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(details.exercises[1].sets.is_empty());
        assert_eq!(details.cardio.len(), 1);
        assert_eq!(details.set_count(), 2);
    }

    #[test]
    fn missing_workout_has_no_details() {
        assert!(workout_details(&sample(), "nope").is_none());
    }

    #[test]
    fn history_is_newest_first() {
        let listed = history(&sample());
        let ids: Vec<&str> = listed.iter().map(|d| d.workout.id.as_str()).collect();
        assert_eq!(ids, vec!["w2", "w1"]);
        assert_eq!(listed[1].exercises[0].sets.len(), 1);
    }
}
