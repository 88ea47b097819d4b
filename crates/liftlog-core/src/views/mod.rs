// ABOUTME: Read-only views derived from a loaded dataset: history, dashboard, progress, calendar.
// ABOUTME: Each view is a pure function over Dataset so callers load storage once per screen.

pub mod calendar;
pub mod dashboard;
pub mod history;
pub mod progress;

pub use calendar::{CalendarDay, calendar_month};
pub use dashboard::{DashboardSummary, RecentWorkout, dashboard_summary};
pub use history::{ExerciseWithSets, WorkoutDetails, history, workout_details};
pub use progress::{
    ExerciseCatalog, PHOTO_MATCH_WINDOW_DAYS, ProgressPoint, RECENT_EXERCISE_LIMIT,
    closest_photo, exercise_catalog, exercise_progress,
};

use crate::model::{Cardio, Exercise, Photo, Set, Workout};

/// Every domain collection, as loaded from storage in storage order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub workouts: Vec<Workout>,
    pub exercises: Vec<Exercise>,
    pub sets: Vec<Set>,
    pub cardio: Vec<Cardio>,
    pub photos: Vec<Photo>,
}

impl Dataset {
    pub fn workout(&self, workout_id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == workout_id)
    }

    pub fn exercises_for<'a>(&'a self, workout_id: &'a str) -> impl Iterator<Item = &'a Exercise> {
        self.exercises.iter().filter(move |e| e.workout_id == workout_id)
    }

    /// Sets of one exercise, ascending by set number. Ties keep storage order.
    pub fn sets_for(&self, exercise_id: &str) -> Vec<&Set> {
        let mut sets: Vec<&Set> = self
            .sets
            .iter()
            .filter(|s| s.exercise_id == exercise_id)
            .collect();
        sets.sort_by_key(|s| s.set_number);
        sets
    }

    pub fn cardio_for<'a>(&'a self, workout_id: &'a str) -> impl Iterator<Item = &'a Cardio> {
        self.cardio.iter().filter(move |c| c.workout_id == workout_id)
    }

    /// Workouts newest first. Workouts on the same day keep storage order.
    pub fn workouts_newest_first(&self) -> Vec<&Workout> {
        let mut workouts: Vec<&Workout> = self.workouts.iter().collect();
        workouts.sort_by(|a, b| b.date.cmp(&a.date));
        workouts
    }

    /// Workouts oldest first. Workouts on the same day keep storage order.
    pub fn workouts_oldest_first(&self) -> Vec<&Workout> {
        let mut workouts: Vec<&Workout> = self.workouts.iter().collect();
        workouts.sort_by_key(|w| w.date);
        workouts
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use crate::model::{Cardio, Exercise, Photo, Set, WeightUnit, Workout};

    pub fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    pub fn workout(id: &str, day: &str, name: &str) -> Workout {
        Workout {
            id: id.to_string(),
            date: date(day),
            name: name.to_string(),
            notes: None,
        }
    }

    pub fn exercise(id: &str, workout_id: &str, name: &str) -> Exercise {
        Exercise {
            id: id.to_string(),
            workout_id: workout_id.to_string(),
            name: name.to_string(),
        }
    }

    pub fn set(id: &str, exercise_id: &str, number: u32, reps: u32, weight: f64) -> Set {
        Set {
            id: id.to_string(),
            exercise_id: exercise_id.to_string(),
            set_number: number,
            reps,
            weight,
            unit: WeightUnit::Kg,
        }
    }

    pub fn cardio(id: &str, workout_id: &str, activity: &str, minutes: Option<u32>) -> Cardio {
        Cardio {
            id: id.to_string(),
            workout_id: workout_id.to_string(),
            activity: activity.to_string(),
            duration: minutes,
            distance: None,
            intensity: None,
        }
    }

    pub fn photo(id: &str, day: &str) -> Photo {
        Photo {
            id: id.to_string(),
            date: date(day),
            image: "data:image/jpeg;base64,AAAA".to_string(),
            tags: None,
            notes: None,
        }
    }
}
