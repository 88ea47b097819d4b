// ABOUTME: Domain access layer: typed CRUD for workouts, exercises, sets, cardio, photos and the profile.
// ABOUTME: Owns the cascade rules (deleting a workout removes its exercises, their sets, and its cardio).

use liftlog_core::views::{self, ExerciseWithSets, WorkoutDetails};
use liftlog_core::{
    Cardio, CardioDraft, Dataset, Entity, Exercise, ExerciseDraft, Photo, PhotoDraft, Set,
    SetDraft, UserProfile, ValidationError, Workout, WorkoutDraft, WorkoutLog,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::backend::KeyValueBackend;
use crate::record::{Record, RecordStore, StoreError, record_id, upsert};

/// Errors from the domain access layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid {collection} record: {source}")]
    Invalid {
        collection: &'static str,
        #[source]
        source: ValidationError,
    },

    #[error("malformed {collection} record: {reason}")]
    Malformed {
        collection: &'static str,
        reason: String,
    },

    #[error("no {collection} record with id {id}")]
    MissingParent { collection: &'static str, id: String },

    #[error("invalid workout log: {0}")]
    InvalidLog(#[source] ValidationError),
}

/// Typed access to every fitness-log collection over one record store.
pub struct StorageService<B> {
    store: RecordStore<B>,
}

impl<B: KeyValueBackend> StorageService<B> {
    pub fn new(store: RecordStore<B>) -> Self {
        Self { store }
    }

    /// Shorthand for `StorageService::new(RecordStore::new(backend))`.
    pub fn open(backend: B) -> Self {
        Self::new(RecordStore::new(backend))
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    pub fn into_inner(self) -> RecordStore<B> {
        self.store
    }

    // --- workouts ---

    pub fn get_all_workouts(&self) -> Result<Vec<Workout>, ServiceError> {
        self.all()
    }

    pub fn get_workout_by_id(&self, id: &str) -> Result<Option<Workout>, ServiceError> {
        self.by_id(id)
    }

    pub fn save_workout(&mut self, draft: &WorkoutDraft) -> Result<Workout, ServiceError> {
        self.save_entity(draft)
    }

    /// Delete a workout with its exercises, their sets, and its cardio entries.
    /// A missing id is not an error.
    pub fn delete_workout(&mut self, id: &str) -> Result<String, ServiceError> {
        let exercises = self.delete_exercises_by_workout_id(id)?;
        let cardio = self.delete_cardio_by_workout_id(id)?;
        self.store.delete(Workout::COLLECTION, id)?;
        tracing::info!(
            "deleted workout {} ({} exercises, {} cardio entries)",
            id,
            exercises,
            cardio
        );
        Ok(id.to_string())
    }

    // --- exercises ---

    pub fn get_all_exercises(&self) -> Result<Vec<Exercise>, ServiceError> {
        self.all()
    }

    pub fn get_exercise_by_id(&self, id: &str) -> Result<Option<Exercise>, ServiceError> {
        self.by_id(id)
    }

    pub fn get_exercises_by_workout_id(
        &self,
        workout_id: &str,
    ) -> Result<Vec<Exercise>, ServiceError> {
        let mut exercises: Vec<Exercise> = self.all()?;
        exercises.retain(|e| e.workout_id == workout_id);
        Ok(exercises)
    }

    /// Save an exercise. A supplied `workout_id` must name a stored workout.
    pub fn save_exercise(&mut self, draft: &ExerciseDraft) -> Result<Exercise, ServiceError> {
        if let Some(workout_id) = &draft.workout_id {
            self.require_parent::<Workout>(workout_id)?;
        }
        self.save_entity(draft)
    }

    /// Delete an exercise and its sets.
    pub fn delete_exercise(&mut self, id: &str) -> Result<String, ServiceError> {
        self.delete_sets_by_exercise_id(id)?;
        Ok(self.store.delete(Exercise::COLLECTION, id)?)
    }

    /// Remove every exercise of a workout and all of their sets, one write per
    /// collection. Returns how many exercises were removed.
    pub fn delete_exercises_by_workout_id(
        &mut self,
        workout_id: &str,
    ) -> Result<usize, ServiceError> {
        let exercise_ids = self.ids_where(Exercise::COLLECTION, "workout_id", workout_id)?;
        if exercise_ids.is_empty() {
            return Ok(0);
        }
        let sets = self.remove_where(Set::COLLECTION, "exercise_id", &exercise_ids)?;
        let removed = self.remove_where(
            Exercise::COLLECTION,
            "workout_id",
            &[workout_id.to_string()],
        )?;
        tracing::debug!(
            "removed {} exercises and {} sets of workout {}",
            removed,
            sets,
            workout_id
        );
        Ok(removed)
    }

    // --- sets ---

    pub fn get_all_sets(&self) -> Result<Vec<Set>, ServiceError> {
        self.all()
    }

    pub fn get_set_by_id(&self, id: &str) -> Result<Option<Set>, ServiceError> {
        self.by_id(id)
    }

    /// Sets of one exercise, ascending by set number. Ties keep storage order.
    pub fn get_sets_by_exercise_id(&self, exercise_id: &str) -> Result<Vec<Set>, ServiceError> {
        let mut sets: Vec<Set> = self.all()?;
        sets.retain(|s| s.exercise_id == exercise_id);
        sets.sort_by_key(|s| s.set_number);
        Ok(sets)
    }

    /// Save a set. A supplied `exercise_id` must name a stored exercise.
    pub fn save_set(&mut self, draft: &SetDraft) -> Result<Set, ServiceError> {
        if let Some(exercise_id) = &draft.exercise_id {
            self.require_parent::<Exercise>(exercise_id)?;
        }
        self.save_entity(draft)
    }

    pub fn delete_set(&mut self, id: &str) -> Result<String, ServiceError> {
        Ok(self.store.delete(Set::COLLECTION, id)?)
    }

    pub fn delete_sets_by_exercise_id(&mut self, exercise_id: &str) -> Result<usize, ServiceError> {
        self.remove_where(Set::COLLECTION, "exercise_id", &[exercise_id.to_string()])
    }

    // --- cardio ---

    pub fn get_all_cardio(&self) -> Result<Vec<Cardio>, ServiceError> {
        self.all()
    }

    pub fn get_cardio_by_id(&self, id: &str) -> Result<Option<Cardio>, ServiceError> {
        self.by_id(id)
    }

    pub fn get_cardio_by_workout_id(&self, workout_id: &str) -> Result<Vec<Cardio>, ServiceError> {
        let mut cardio: Vec<Cardio> = self.all()?;
        cardio.retain(|c| c.workout_id == workout_id);
        Ok(cardio)
    }

    /// Save a cardio entry. A supplied `workout_id` must name a stored workout.
    pub fn save_cardio(&mut self, draft: &CardioDraft) -> Result<Cardio, ServiceError> {
        if let Some(workout_id) = &draft.workout_id {
            self.require_parent::<Workout>(workout_id)?;
        }
        self.save_entity(draft)
    }

    pub fn delete_cardio(&mut self, id: &str) -> Result<String, ServiceError> {
        Ok(self.store.delete(Cardio::COLLECTION, id)?)
    }

    pub fn delete_cardio_by_workout_id(&mut self, workout_id: &str) -> Result<usize, ServiceError> {
        self.remove_where(Cardio::COLLECTION, "workout_id", &[workout_id.to_string()])
    }

    // --- photos ---

    pub fn get_all_photos(&self) -> Result<Vec<Photo>, ServiceError> {
        self.all()
    }

    pub fn get_photo_by_id(&self, id: &str) -> Result<Option<Photo>, ServiceError> {
        self.by_id(id)
    }

    pub fn save_photo(&mut self, draft: &PhotoDraft) -> Result<Photo, ServiceError> {
        self.save_entity(draft)
    }

    pub fn delete_photo(&mut self, id: &str) -> Result<String, ServiceError> {
        Ok(self.store.delete(Photo::COLLECTION, id)?)
    }

    // --- profile ---

    /// The stored profile, if any. An unreadable profile reads as absent.
    pub fn get_user_profile(&self) -> Result<Option<UserProfile>, ServiceError> {
        let Some(record) = self
            .store
            .get_all(UserProfile::COLLECTION)?
            .into_iter()
            .next()
        else {
            return Ok(None);
        };

        match serde_json::from_value(Value::Object(record)) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                tracing::warn!("ignoring unreadable user profile: {}", e);
                Ok(None)
            }
        }
    }

    /// Replace the profile. The collection always holds exactly one record afterwards.
    pub fn save_user_profile(
        &mut self,
        profile: &UserProfile,
    ) -> Result<UserProfile, ServiceError> {
        profile
            .validate()
            .map_err(|source| ServiceError::Invalid {
                collection: UserProfile::COLLECTION,
                source,
            })?;
        let record = to_record(UserProfile::COLLECTION, profile)?;
        self.store.replace_all(UserProfile::COLLECTION, &[record])?;
        Ok(profile.clone())
    }

    // --- whole-log operations ---

    /// Every domain collection, loaded once for the derived views.
    pub fn load_dataset(&self) -> Result<Dataset, ServiceError> {
        Ok(Dataset {
            workouts: self.all()?,
            exercises: self.all()?,
            sets: self.all()?,
            cardio: self.all()?,
            photos: self.all()?,
        })
    }

    pub fn workout_details(
        &self,
        workout_id: &str,
    ) -> Result<Option<WorkoutDetails>, ServiceError> {
        Ok(views::workout_details(&self.load_dataset()?, workout_id))
    }

    /// Save a workout together with its exercises, sets and cardio.
    ///
    /// When the log's workout id names a stored workout, that workout is
    /// patched and all of its existing children are replaced by the log's,
    /// so child ids change on every edit. Blank exercises, blank cardio rows
    /// and empty sets are skipped. Sets are renumbered from 1 in the order
    /// given.
    ///
    /// Every collection is staged in memory and written once. If a write
    /// fails, the collections written before it are restored, so a failed
    /// save leaves the stored log as it was.
    pub fn save_workout_log(&mut self, log: &WorkoutLog) -> Result<WorkoutDetails, ServiceError> {
        log.validate().map_err(ServiceError::InvalidLog)?;

        let mut workouts = self.store.get_all(Workout::COLLECTION)?;
        let mut exercise_records = self.store.get_all(Exercise::COLLECTION)?;
        let mut set_records = self.store.get_all(Set::COLLECTION)?;
        let mut cardio_records = self.store.get_all(Cardio::COLLECTION)?;

        let editing = log
            .workout
            .id
            .as_deref()
            .is_some_and(|id| workouts.iter().any(|r| record_id(r) == Some(id)));

        let workout: Workout = stage(&mut workouts, &log.workout)?;
        if editing {
            let old_exercises = ids_matching(&exercise_records, "workout_id", &workout.id);
            let sets = retain_unmatched(&mut set_records, "exercise_id", &old_exercises);
            retain_unmatched(&mut exercise_records, "workout_id", &[workout.id.clone()]);
            let cardio = retain_unmatched(&mut cardio_records, "workout_id", &[workout.id.clone()]);
            tracing::debug!(
                "replacing {} exercises, {} sets and {} cardio entries of workout {}",
                old_exercises.len(),
                sets,
                cardio,
                workout.id
            );
        }

        let mut exercises = Vec::new();
        for entry in log.filled_exercises() {
            let exercise: Exercise = stage(
                &mut exercise_records,
                &ExerciseDraft::new(workout.id.as_str(), entry.name.trim()),
            )?;

            let mut sets = Vec::new();
            for (index, set) in entry.filled_sets().enumerate() {
                let draft = SetDraft::new(
                    exercise.id.as_str(),
                    index as u32 + 1,
                    set.reps,
                    set.weight,
                    set.unit,
                );
                sets.push(stage::<Set, _>(&mut set_records, &draft)?);
            }
            exercises.push(ExerciseWithSets { exercise, sets });
        }

        let mut cardio = Vec::new();
        for entry in log.filled_cardio() {
            let draft = CardioDraft {
                id: None,
                workout_id: Some(workout.id.clone()),
                activity: Some(entry.activity.trim().to_string()),
                duration: entry.duration,
                distance: entry.distance,
                intensity: entry.intensity,
            };
            cardio.push(stage::<Cardio, _>(&mut cardio_records, &draft)?);
        }

        self.store.replace_collections(&[
            (Workout::COLLECTION, workouts.as_slice()),
            (Exercise::COLLECTION, exercise_records.as_slice()),
            (Set::COLLECTION, set_records.as_slice()),
            (Cardio::COLLECTION, cardio_records.as_slice()),
        ])?;

        let details = WorkoutDetails {
            workout,
            exercises,
            cardio,
        };
        tracing::info!(
            "{} workout {} ({} exercises, {} sets, {} cardio entries)",
            if editing { "updated" } else { "logged" },
            details.workout.id,
            details.exercises.len(),
            details.set_count(),
            details.cardio.len()
        );
        Ok(details)
    }

    // --- helpers ---

    /// Every readable record of `T`. Records that no longer decode are skipped.
    fn all<T: Entity>(&self) -> Result<Vec<T>, ServiceError> {
        let records = self.store.get_all(T::COLLECTION)?;
        Ok(records
            .into_iter()
            .filter_map(|record| decode_lenient(T::COLLECTION, record))
            .collect())
    }

    fn by_id<T: Entity>(&self, id: &str) -> Result<Option<T>, ServiceError> {
        Ok(self
            .store
            .get_by_id(T::COLLECTION, id)?
            .and_then(|record| decode_lenient(T::COLLECTION, record)))
    }

    /// Merge `draft` into its collection. The merged record must decode and
    /// validate as `T`, otherwise nothing is written.
    fn save_entity<T: Entity, D: Serialize>(&mut self, draft: &D) -> Result<T, ServiceError> {
        let record = to_record(T::COLLECTION, draft)?;
        let stored = self
            .store
            .save_with(T::COLLECTION, record, |merged| decode::<T>(merged).map(|_| ()))?;
        decode(&stored)
    }

    fn require_parent<P: Entity>(&self, id: &str) -> Result<(), ServiceError> {
        if self.store.get_by_id(P::COLLECTION, id)?.is_none() {
            return Err(ServiceError::MissingParent {
                collection: P::COLLECTION,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Ids of raw records whose `field` equals `value`.
    fn ids_where(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<String>, ServiceError> {
        Ok(ids_matching(&self.store.get_all(collection)?, field, value))
    }

    /// Drop every raw record whose `field` is one of `values` in a single write.
    /// Works on raw records so children that no longer decode are removed too.
    fn remove_where(
        &mut self,
        collection: &str,
        field: &str,
        values: &[String],
    ) -> Result<usize, ServiceError> {
        let mut records = self.store.get_all(collection)?;
        let removed = retain_unmatched(&mut records, field, values);
        if removed > 0 {
            self.store.replace_all(collection, &records)?;
        }
        Ok(removed)
    }
}

fn ids_matching(records: &[Record], field: &str, value: &str) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.get(field).and_then(Value::as_str) == Some(value))
        .filter_map(|r| record_id(r).map(str::to_string))
        .collect()
}

/// Keep only records whose `field` is not one of `values`. Returns how many were dropped.
fn retain_unmatched(records: &mut Vec<Record>, field: &str, values: &[String]) -> usize {
    let before = records.len();
    records.retain(|r| {
        !r.get(field)
            .and_then(Value::as_str)
            .is_some_and(|v| values.iter().any(|wanted| wanted == v))
    });
    before - records.len()
}

/// Merge `draft` into an in-memory collection and decode the result as `T`.
fn stage<T: Entity, D: Serialize>(
    records: &mut Vec<Record>,
    draft: &D,
) -> Result<T, ServiceError> {
    let record = to_record(T::COLLECTION, draft)?;
    let staged = upsert(records, T::COLLECTION, record);
    decode(&staged)
}

fn to_record<T: Serialize>(collection: &'static str, value: &T) -> Result<Record, ServiceError> {
    match serde_json::to_value(value).map_err(StoreError::from)? {
        Value::Object(record) => Ok(record),
        other => Err(ServiceError::Malformed {
            collection,
            reason: format!("expected an object, found {other}"),
        }),
    }
}

fn decode<T: Entity>(record: &Record) -> Result<T, ServiceError> {
    let entity: T = serde_json::from_value(Value::Object(record.clone())).map_err(|e| {
        ServiceError::Malformed {
            collection: T::COLLECTION,
            reason: e.to_string(),
        }
    })?;
    entity.validate().map_err(|source| ServiceError::Invalid {
        collection: T::COLLECTION,
        source,
    })?;
    Ok(entity)
}

fn decode_lenient<T: Entity>(collection: &str, record: Record) -> Option<T> {
    let id = record_id(&record).unwrap_or("<no id>").to_string();
    match serde_json::from_value(Value::Object(record)) {
        Ok(entity) => Some(entity),
        Err(e) => {
            tracing::warn!("skipping unreadable {} record {}: {}", collection, id, e);
            None
        }
    }
}
