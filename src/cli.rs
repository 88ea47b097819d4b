// ABOUTME: Command-line interface definition for the liftlog binary.
// ABOUTME: Global flags override the LIFTLOG_* environment configuration.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use liftlog_core::WeightUnit;

use crate::config::BackendKind;

#[derive(Debug, Clone, Parser)]
#[command(name = "liftlog", version, about = "Personal workout log")]
pub struct Cli {
    /// Data directory (overrides LIFTLOG_HOME)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Storage backend: file or sqlite (overrides LIFTLOG_BACKEND)
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,

    /// Byte quota enforced by the backend (overrides LIFTLOG_QUOTA_BYTES)
    #[arg(long, global = true)]
    pub quota_bytes: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Save a workout log from a JSON file. A workout id that already exists edits that workout.
    Log { file: PathBuf },

    /// List workouts, newest first
    History,

    /// Show one workout with its exercises, sets and cardio
    Show { id: String },

    /// Delete a workout together with its exercises, sets and cardio
    Delete { id: String },

    /// Totals across every logged workout
    Summary,

    /// Exercise names: recently performed and alphabetical
    Exercises,

    /// Heaviest set per workout for one exercise
    Progress { name: String },

    /// Workouts and photos for each day of a month
    Calendar {
        /// Month as YYYY-MM
        month: String,
    },

    /// Manage progress photos
    #[command(subcommand)]
    Photo(PhotoCommand),

    /// Show or set the user profile
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum PhotoCommand {
    /// Store an image file as a progress photo
    Add {
        file: PathBuf,
        /// Date the photo was taken (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List photos, newest first
    List,
    /// Delete a photo
    Delete { id: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProfileCommand {
    Show,
    Set {
        name: String,
        /// kg or lbs
        #[arg(long, default_value = "kg")]
        unit: WeightUnit,
    },
}
