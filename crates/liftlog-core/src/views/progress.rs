// ABOUTME: Per-exercise progress: the exercise catalog, a heaviest-set series over time, and photo matching.
// ABOUTME: Exercises are matched across workouts by exact name.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::model::{Photo, Set, WeightUnit};
use crate::views::Dataset;

/// How many recently performed exercise names the catalog surfaces.
pub const RECENT_EXERCISE_LIMIT: usize = 6;

/// A photo is shown next to a progress series only within this many days.
pub const PHOTO_MATCH_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseCatalog {
    /// Most recently performed first, at most RECENT_EXERCISE_LIMIT names.
    pub recent: Vec<String>,
    /// Every distinct name, sorted.
    pub all: Vec<String>,
}

/// One workout's performance for a single exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub workout_id: String,
    pub workout_name: String,
    pub heaviest_weight: f64,
    pub heaviest_reps: u32,
    pub unit: WeightUnit,
    pub total_sets: usize,
    /// Weight x reps over all sets, in `unit`.
    pub total_volume: f64,
    pub sets: Vec<Set>,
}

pub fn exercise_catalog(dataset: &Dataset) -> ExerciseCatalog {
    let mut seen = HashSet::new();
    let mut recent = Vec::new();
    let mut all = BTreeSet::new();

    for workout in dataset.workouts_newest_first() {
        for exercise in dataset.exercises_for(&workout.id) {
            if seen.insert(exercise.name.as_str()) {
                if recent.len() < RECENT_EXERCISE_LIMIT {
                    recent.push(exercise.name.clone());
                }
                all.insert(exercise.name.clone());
            }
        }
    }

    ExerciseCatalog {
        recent,
        all: all.into_iter().collect(),
    }
}

/// The progress series for `name`, oldest workout first. Workouts where the
/// exercise has no sets are left out. When a workout lists the exercise more
/// than once, the first entry is used.
pub fn exercise_progress(dataset: &Dataset, name: &str) -> Vec<ProgressPoint> {
    let mut points = Vec::new();

    for workout in dataset.workouts_oldest_first() {
        let Some(exercise) = dataset.exercises_for(&workout.id).find(|e| e.name == name) else {
            continue;
        };
        let sets = dataset.sets_for(&exercise.id);
        let Some(heaviest) = heaviest_set(&sets) else {
            continue;
        };

        let total_volume: f64 = sets
            .iter()
            .map(|s| s.unit.convert(s.volume(), heaviest.unit))
            .sum();

        points.push(ProgressPoint {
            date: workout.date,
            workout_id: workout.id.clone(),
            workout_name: workout.name.clone(),
            heaviest_weight: heaviest.weight,
            heaviest_reps: heaviest.reps,
            unit: heaviest.unit,
            total_sets: sets.len(),
            total_volume,
            sets: sets.into_iter().cloned().collect(),
        });
    }

    points
}

/// Compared in kg so mixed-unit sets rank correctly. First set wins ties.
fn heaviest_set<'a>(sets: &[&'a Set]) -> Option<&'a Set> {
    let mut best: Option<&'a Set> = None;
    for set in sets {
        match best {
            Some(current)
                if set.unit.convert(set.weight, WeightUnit::Kg)
                    <= current.unit.convert(current.weight, WeightUnit::Kg) => {}
            _ => best = Some(*set),
        }
    }
    best
}

/// The photo dated closest to `date`, if it lies within `max_days`.
/// The earliest stored photo wins a tie.
pub fn closest_photo(dataset: &Dataset, date: NaiveDate, max_days: i64) -> Option<&Photo> {
    let distance = |photo: &Photo| (photo.date - date).num_days().abs();

    let mut best: Option<&Photo> = None;
    for photo in &dataset.photos {
        match best {
            Some(current) if distance(photo) >= distance(current) => {}
            _ => best = Some(photo),
        }
    }
    best.filter(|photo| distance(*photo) <= max_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::*;

    fn sample() -> Dataset {
        Dataset {
            workouts: vec![
                workout("w2", "2026-02-12", "Legs B"),
                workout("w1", "2026-02-05", "Legs A"),
                workout("w3", "2026-02-14", "Arms"),
            ],
            exercises: vec![
                exercise("e1", "w1", "Squat"),
                exercise("e2", "w2", "Squat"),
                exercise("e3", "w2", "Lunge"),
                exercise("e4", "w3", "Curl"),
                exercise("e5", "w3", "Squat"),
            ],
            sets: vec![
                set("s1", "e1", 1, 10, 60.0),
                set("s2", "e1", 2, 8, 70.0),
                set("s3", "e2", 1, 5, 80.0),
                set("s4", "e2", 2, 3, 80.0),
            ],
            cardio: Vec::new(),
            photos: vec![photo("p1", "2026-01-01"), photo("p2", "2026-02-15")],
        }
    }

    #[test]
    fn catalog_lists_recent_and_sorted_names() {
        let catalog = exercise_catalog(&sample());
        assert_eq!(catalog.recent, vec!["Curl", "Squat", "Lunge"]);
        assert_eq!(catalog.all, vec!["Curl", "Lunge", "Squat"]);
    }

    #[test]
    fn catalog_caps_recent_names() {
        let mut dataset = Dataset {
            workouts: vec![workout("w", "2026-02-12", "Everything")],
            ..Dataset::default()
        };
        for i in 0..9 {
            dataset
                .exercises
                .push(exercise(&format!("e{i}"), "w", &format!("Lift {i}")));
        }

        let catalog = exercise_catalog(&dataset);
        assert_eq!(catalog.recent.len(), RECENT_EXERCISE_LIMIT);
        assert_eq!(catalog.all.len(), 9);
    }

    #[test]
    fn progress_is_oldest_first_and_skips_empty_entries() {
        let points = exercise_progress(&sample(), "Squat");

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].workout_id, "w1");
        assert_eq!(points[0].heaviest_weight, 70.0);
        assert_eq!(points[0].heaviest_reps, 8);
        assert_eq!(points[0].total_sets, 2);
        assert_eq!(points[0].total_volume, 1160.0);

        // Tie on weight keeps the first set.
        assert_eq!(points[1].workout_id, "w2");
        assert_eq!(points[1].heaviest_reps, 5);
        assert_eq!(points[1].total_volume, 640.0);
    }

    #[test]
    fn heaviest_compares_across_units() {
        let kg = set("a", "e", 1, 5, 50.0);
        let mut lbs = set("b", "e", 2, 5, 100.0);
        lbs.unit = WeightUnit::Lbs;

        let heaviest = heaviest_set(&[&kg, &lbs]).unwrap();
        assert_eq!(heaviest.id, "a");
    }

    #[test]
    fn unknown_exercise_has_no_progress() {
        assert!(exercise_progress(&sample(), "Deadlift").is_empty());
    }

    #[test]
    fn closest_photo_respects_window() {
        let dataset = sample();

        let near = closest_photo(&dataset, date("2026-02-12"), PHOTO_MATCH_WINDOW_DAYS);
        assert_eq!(near.map(|p| p.id.as_str()), Some("p2"));

        let far = closest_photo(&dataset, date("2026-03-30"), PHOTO_MATCH_WINDOW_DAYS);
        assert!(far.is_none());

        assert!(closest_photo(&Dataset::default(), date("2026-02-12"), 7).is_none());
    }
}
