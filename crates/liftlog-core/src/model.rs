// ABOUTME: Defines the persisted fitness-log entities (workouts, exercises, sets, cardio, photos, profile).
// ABOUTME: Each entity has a draft form whose absent fields are left out of the stored patch.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, require_non_negative, require_text};

/// A record type stored in its own collection and addressed by a generated id.
pub trait Entity: DeserializeOwned {
    /// Backend key holding the collection.
    const COLLECTION: &'static str;

    /// Check field rules that serde cannot express.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Unit a set's weight was recorded in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    pub const LBS_PER_KG: f64 = 2.204_622_62;

    /// Convert `weight` expressed in `self` into `to`.
    pub fn convert(self, weight: f64, to: WeightUnit) -> f64 {
        match (self, to) {
            (WeightUnit::Kg, WeightUnit::Lbs) => weight * Self::LBS_PER_KG,
            (WeightUnit::Lbs, WeightUnit::Kg) => weight / Self::LBS_PER_KG,
            _ => weight,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" => Ok(WeightUnit::Kg),
            "lbs" | "lb" => Ok(WeightUnit::Lbs),
            other => Err(ValidationError::UnknownUnit(other.to_string())),
        }
    }
}

/// A training session on a given day. Parent of exercises and cardio entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Entity for Workout {
    const COLLECTION: &'static str = "workouts";

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

/// A named lift performed within a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub workout_id: String,
    pub name: String,
}

impl Entity for Exercise {
    const COLLECTION: &'static str = "exercises";

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("workout_id", &self.workout_id)?;
        require_text("name", &self.name)
    }
}

/// One set of an exercise. `set_number` orders sets for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Set {
    pub id: String,
    pub exercise_id: String,
    pub set_number: u32,
    pub reps: u32,
    pub weight: f64,
    pub unit: WeightUnit,
}

impl Set {
    /// Weight times reps, in the set's own unit.
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

impl Entity for Set {
    const COLLECTION: &'static str = "sets";

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("exercise_id", &self.exercise_id)?;
        if self.set_number == 0 {
            return Err(ValidationError::SetNumberZero);
        }
        require_non_negative("weight", self.weight)
    }
}

/// A cardio activity logged as part of a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cardio {
    pub id: String,
    pub workout_id: String,
    pub activity: String,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Perceived effort on a 1-20 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
}

impl Entity for Cardio {
    const COLLECTION: &'static str = "cardio";

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("workout_id", &self.workout_id)?;
        validate_cardio_fields(&self.activity, self.distance, self.intensity)
    }
}

pub(crate) fn validate_cardio_fields(
    activity: &str,
    distance: Option<f64>,
    intensity: Option<u8>,
) -> Result<(), ValidationError> {
    require_text("activity", activity)?;
    if let Some(distance) = distance {
        require_non_negative("distance", distance)?;
    }
    match intensity {
        Some(value) if !(1..=20).contains(&value) => {
            Err(ValidationError::IntensityOutOfRange(value))
        }
        _ => Ok(()),
    }
}

/// A progress photo. Linked to workouts only by sharing a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub date: NaiveDate,
    /// Encoded image payload, typically a `data:` URL.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Entity for Photo {
    const COLLECTION: &'static str = "photos";

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("image", &self.image)
    }
}

/// The single user profile. Never more than one is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(rename = "preferredUnit")]
    pub preferred_unit: WeightUnit,
}

impl UserProfile {
    pub const COLLECTION: &'static str = "userProfile";

    pub fn new(name: impl Into<String>, preferred_unit: WeightUnit) -> Self {
        Self {
            name: name.into(),
            preferred_unit,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

/// Fields to create or patch a workout. `id: None` creates a new record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkoutDraft {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date: Some(date),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A patch that only names the workout to change.
    pub fn update(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ExerciseDraft {
    pub fn new(workout_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            workout_id: Some(workout_id.into()),
            name: Some(name.into()),
        }
    }

    pub fn update(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<WeightUnit>,
}

impl SetDraft {
    pub fn new(
        exercise_id: impl Into<String>,
        set_number: u32,
        reps: u32,
        weight: f64,
        unit: WeightUnit,
    ) -> Self {
        Self {
            id: None,
            exercise_id: Some(exercise_id.into()),
            set_number: Some(set_number),
            reps: Some(reps),
            weight: Some(weight),
            unit: Some(unit),
        }
    }

    pub fn update(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_set_number(mut self, set_number: u32) -> Self {
        self.set_number = Some(set_number);
        self
    }

    pub fn with_reps(mut self, reps: u32) -> Self {
        self.reps = Some(reps);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardioDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
}

impl CardioDraft {
    pub fn new(workout_id: impl Into<String>, activity: impl Into<String>) -> Self {
        Self {
            workout_id: Some(workout_id.into()),
            activity: Some(activity.into()),
            ..Self::default()
        }
    }

    pub fn update(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_intensity(mut self, intensity: u8) -> Self {
        self.intensity = Some(intensity);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PhotoDraft {
    pub fn new(date: NaiveDate, image: impl Into<String>) -> Self {
        Self {
            date: Some(date),
            image: Some(image.into()),
            ..Self::default()
        }
    }

    pub fn update(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
