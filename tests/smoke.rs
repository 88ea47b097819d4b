// ABOUTME: End-to-end smoke test for the full liftlog lifecycle over on-disk backends.
// ABOUTME: Logs workouts, edits one, checks views, cascades a delete, and reopens storage.

use chrono::NaiveDate;
use liftlog_core::views;
use liftlog_core::{
    CardioLog, ExerciseLog, PhotoDraft, UserProfile, WeightUnit, WorkoutDraft, WorkoutLog,
};
use liftlog_store::{FileBackend, KeyValueBackend, SqliteBackend, StorageService};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn lifecycle<B: KeyValueBackend>(service: &mut StorageService<B>) -> String {
    // 1. Log two workouts
    let legs = service
        .save_workout_log(
            &WorkoutLog::new(WorkoutDraft::new(date("2026-02-10"), "Legs + Biceps"))
                .with_exercise(
                    ExerciseLog::new("Squat")
                        .with_set(10, 60.0, WeightUnit::Kg)
                        .with_set(8, 70.0, WeightUnit::Kg),
                )
                .with_exercise(ExerciseLog::new("Curl").with_set(12, 25.0, WeightUnit::Lbs)),
        )
        .unwrap();

    let shoulders = service
        .save_workout_log(
            &WorkoutLog::new(WorkoutDraft::new(date("2026-02-12"), "Shoulders"))
                .with_exercise(ExerciseLog::new("Squat").with_set(5, 80.0, WeightUnit::Kg))
                .with_cardio({
                    let mut rowing = CardioLog::new("Rowing");
                    rowing.duration = Some(10);
                    rowing.intensity = Some(12);
                    rowing
                }),
        )
        .unwrap();

    // 2. Photo and profile
    service
        .save_photo(&PhotoDraft::new(date("2026-02-13"), "data:image/png;base64,AAAA"))
        .unwrap();
    service
        .save_user_profile(&UserProfile::new("Sam", WeightUnit::Kg))
        .unwrap();

    // 3. Edit the second workout: rename and replace its children
    let edited = service
        .save_workout_log(
            &WorkoutLog::new(
                WorkoutDraft::update(&shoulders.workout.id).with_name("Shoulders + Triceps"),
            )
            .with_exercise(
                ExerciseLog::new("Squat")
                    .with_set(5, 85.0, WeightUnit::Kg)
                    .with_set(0, 0.0, WeightUnit::Kg),
            )
            .with_exercise(ExerciseLog::new("Rope Pushdown").with_set(12, 30.0, WeightUnit::Kg)),
        )
        .unwrap();
    assert_eq!(edited.workout.id, shoulders.workout.id);
    assert_eq!(edited.workout.date, date("2026-02-12"));
    assert!(edited.cardio.is_empty(), "edit replaces cardio too");

    // 4. Views over the stored data
    let dataset = service.load_dataset().unwrap();
    let history = views::history(&dataset);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].workout.name, "Shoulders + Triceps");

    let progress = views::exercise_progress(&dataset, "Squat");
    let heaviest: Vec<f64> = progress.iter().map(|p| p.heaviest_weight).collect();
    assert_eq!(heaviest, vec![70.0, 85.0]);
    let photo = views::closest_photo(&dataset, progress[1].date, views::PHOTO_MATCH_WINDOW_DAYS);
    assert!(photo.is_some());

    let summary = views::dashboard_summary(&dataset, WeightUnit::Kg);
    assert_eq!(summary.total_workouts, 2);
    assert_eq!(summary.total_reps, 10 + 8 + 12 + 5 + 12);
    assert_eq!(summary.total_cardio_minutes, 0);

    let catalog = views::exercise_catalog(&dataset);
    assert_eq!(catalog.all, vec!["Curl", "Rope Pushdown", "Squat"]);

    // 5. Cascade delete the first workout
    service.delete_workout(&legs.workout.id).unwrap();
    assert_eq!(service.get_workout_by_id(&legs.workout.id).unwrap(), None);
    assert!(service
        .get_exercises_by_workout_id(&legs.workout.id)
        .unwrap()
        .is_empty());
    for entry in &legs.exercises {
        assert!(service
            .get_sets_by_exercise_id(&entry.exercise.id)
            .unwrap()
            .is_empty());
    }
    assert_eq!(service.get_all_exercises().unwrap().len(), 2);
    assert_eq!(service.get_all_sets().unwrap().len(), 2);

    shoulders.workout.id
}

#[test]
fn smoke_test_file_backend_lifecycle() {
    let dir = tempfile::TempDir::new().unwrap();
    let data = dir.path().join("data");

    let mut service = StorageService::open(FileBackend::open(&data).unwrap());
    let kept_id = lifecycle(&mut service);
    let backend = service.into_inner().into_inner();

    for key in ["workouts", "exercises", "sets", "cardio", "photos", "userProfile"] {
        assert!(backend.get(key).unwrap().is_some(), "{key} not stored");
        assert!(data.join(format!("{key}.json")).exists(), "{key}.json missing");
    }
    drop(backend);

    // Everything survives a reopen
    let service = StorageService::open(FileBackend::open(&data).unwrap());
    let workouts = service.get_all_workouts().unwrap();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0].id, kept_id);
    assert_eq!(
        service.get_user_profile().unwrap(),
        Some(UserProfile::new("Sam", WeightUnit::Kg))
    );
    assert_eq!(service.get_all_photos().unwrap().len(), 1);
}

#[test]
fn smoke_test_sqlite_backend_lifecycle() {
    let dir = tempfile::TempDir::new().unwrap();
    let db = dir.path().join("liftlog.db");

    let mut service = StorageService::open(SqliteBackend::open(&db).unwrap());
    let kept_id = lifecycle(&mut service);
    let store = service.into_inner();
    assert!(store.backend().get("workouts").unwrap().is_some());
    drop(store);

    let service = StorageService::open(SqliteBackend::open(&db).unwrap());
    let details = service.workout_details(&kept_id).unwrap().unwrap();
    assert_eq!(details.workout.name, "Shoulders + Triceps");
    assert_eq!(details.exercises.len(), 2);
    assert_eq!(details.set_count(), 2);
}
