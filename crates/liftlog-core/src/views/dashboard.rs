// ABOUTME: Computes the dashboard summary: lifetime totals, the latest workout, and the latest photo.
// ABOUTME: Lifted volume is normalized into one unit so kg and lbs sets can be summed.

use crate::model::{Photo, WeightUnit, Workout};
use crate::views::Dataset;

/// The most recent workout and how much was logged in it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentWorkout {
    pub workout: Workout,
    pub exercise_count: usize,
    pub cardio_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_workouts: usize,
    pub total_reps: u64,
    /// Sum of weight x reps over every set, expressed in `volume_unit`.
    pub total_volume: f64,
    pub volume_unit: WeightUnit,
    pub total_cardio_minutes: u64,
    pub last_workout: Option<RecentWorkout>,
    pub latest_photo: Option<Photo>,
}

impl DashboardSummary {
    pub fn is_empty(&self) -> bool {
        self.total_workouts == 0
    }
}

/// Summarize everything reachable from stored workouts.
/// Sets and cardio entries whose parent workout is gone are not counted.
pub fn dashboard_summary(dataset: &Dataset, unit: WeightUnit) -> DashboardSummary {
    let mut total_reps = 0u64;
    let mut total_volume = 0.0;
    let mut total_cardio_minutes = 0u64;

    for workout in &dataset.workouts {
        for exercise in dataset.exercises_for(&workout.id) {
            for set in dataset.sets_for(&exercise.id) {
                total_reps += u64::from(set.reps);
                total_volume += set.unit.convert(set.volume(), unit);
            }
        }
        total_cardio_minutes += dataset
            .cardio_for(&workout.id)
            .filter_map(|c| c.duration)
            .map(u64::from)
            .sum::<u64>();
    }

    let last_workout = latest_by_date(&dataset.workouts, |w| w.date).map(|workout| RecentWorkout {
        exercise_count: dataset.exercises_for(&workout.id).count(),
        cardio_count: dataset.cardio_for(&workout.id).count(),
        workout: workout.clone(),
    });

    DashboardSummary {
        total_workouts: dataset.workouts.len(),
        total_reps,
        total_volume,
        volume_unit: unit,
        total_cardio_minutes,
        last_workout,
        latest_photo: latest_by_date(&dataset.photos, |p| p.date).cloned(),
    }
}

/// The item with the latest date; the first one stored wins a tie.
fn latest_by_date<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Option<&T> {
    let mut best: Option<&T> = None;
    for item in items {
        match best {
            Some(current) if key(item) <= key(current) => {}
            _ => best = Some(item),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::*;

    #[test]
    fn empty_dataset_has_empty_summary() {
        let summary = dashboard_summary(&Dataset::default(), WeightUnit::Kg);
        assert!(summary.is_empty());
        assert_eq!(summary.total_reps, 0);
        assert_eq!(summary.total_volume, 0.0);
        assert!(summary.last_workout.is_none());
        assert!(summary.latest_photo.is_none());
    }

    #[test]
    fn totals_cover_all_workouts() {
        let mut lbs_set = set("s3", "e2", 1, 10, 100.0);
        lbs_set.unit = WeightUnit::Lbs;

        let dataset = Dataset {
            workouts: vec![
                workout("w1", "2026-02-10", "Legs"),
                workout("w2", "2026-02-12", "Push"),
            ],
            exercises: vec![exercise("e1", "w1", "Squat"), exercise("e2", "w2", "Bench")],
            sets: vec![
                set("s1", "e1", 1, 10, 60.0),
                set("s2", "e1", 2, 8, 70.0),
                lbs_set,
                set("orphan", "gone", 1, 100, 100.0),
            ],
            cardio: vec![
                cardio("c1", "w1", "Bike", Some(15)),
                cardio("c2", "w2", "Row", None),
                cardio("c3", "w2", "Run", Some(20)),
            ],
            photos: vec![photo("p1", "2026-02-01"), photo("p2", "2026-02-11")],
        };

        let summary = dashboard_summary(&dataset, WeightUnit::Kg);

        assert_eq!(summary.total_workouts, 2);
        assert_eq!(summary.total_reps, 28);
        let expected = 600.0 + 560.0 + 1000.0 / WeightUnit::LBS_PER_KG;
        assert!((summary.total_volume - expected).abs() < 1e-9);
        assert_eq!(summary.total_cardio_minutes, 35);

        let last = summary.last_workout.unwrap();
        assert_eq!(last.workout.id, "w2");
        assert_eq!(last.exercise_count, 1);
        assert_eq!(last.cardio_count, 2);
        assert_eq!(summary.latest_photo.unwrap().id, "p2");
    }

    #[test]
    fn latest_prefers_first_stored_on_ties() {
        let workouts = vec![
            workout("a", "2026-02-12", "A"),
            workout("b", "2026-02-12", "B"),
        ];
        let latest = latest_by_date(&workouts, |w| w.date).unwrap();
        assert_eq!(latest.id, "a");
    }
}
