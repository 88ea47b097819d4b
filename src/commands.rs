// ABOUTME: Executes CLI commands against a storage service and prints plain-text reports.
// ABOUTME: Output goes to the given writer so commands can be exercised without a terminal.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use base64::Engine;
use chrono::{Datelike, NaiveDate};
use liftlog_core::views::{self, PHOTO_MATCH_WINDOW_DAYS, WorkoutDetails};
use liftlog_core::{PhotoDraft, UserProfile, WeightUnit, WorkoutLog};
use liftlog_store::{KeyValueBackend, StorageService};

use crate::cli::{Command, PhotoCommand, ProfileCommand};

pub fn run<B: KeyValueBackend>(
    service: &mut StorageService<B>,
    command: Command,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Log { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let log: WorkoutLog = serde_json::from_str(&text)
                .with_context(|| format!("parsing workout log {}", file.display()))?;
            let details = service.save_workout_log(&log)?;
            writeln!(out, "saved {}", details.workout.id)?;
            print_details(out, &details)?;
        }

        Command::History => {
            let dataset = service.load_dataset()?;
            let history = views::history(&dataset);
            if history.is_empty() {
                writeln!(out, "no workouts logged")?;
            }
            for details in history {
                writeln!(
                    out,
                    "{}  {:<28} {} exercises, {} sets, {} cardio  {}",
                    details.workout.date,
                    details.workout.name,
                    details.exercises.len(),
                    details.set_count(),
                    details.cardio.len(),
                    details.workout.id
                )?;
            }
        }

        Command::Show { id } => {
            let Some(details) = service.workout_details(&id)? else {
                bail!("no workout with id {id}");
            };
            print_details(out, &details)?;
        }

        Command::Delete { id } => {
            if service.get_workout_by_id(&id)?.is_none() {
                bail!("no workout with id {id}");
            }
            service.delete_workout(&id)?;
            writeln!(out, "deleted {id}")?;
        }

        Command::Summary => {
            let unit = preferred_unit(service)?;
            let summary = views::dashboard_summary(&service.load_dataset()?, unit);
            writeln!(out, "workouts:      {}", summary.total_workouts)?;
            writeln!(out, "total reps:    {}", summary.total_reps)?;
            writeln!(
                out,
                "total volume:  {:.1} {}",
                summary.total_volume, summary.volume_unit
            )?;
            writeln!(out, "cardio:        {} min", summary.total_cardio_minutes)?;
            if let Some(last) = &summary.last_workout {
                writeln!(
                    out,
                    "last workout:  {} {} ({} exercises, {} cardio)",
                    last.workout.date, last.workout.name, last.exercise_count, last.cardio_count
                )?;
            }
            if let Some(photo) = &summary.latest_photo {
                writeln!(out, "latest photo:  {} {}", photo.date, photo.id)?;
            }
        }

        Command::Exercises => {
            let catalog = views::exercise_catalog(&service.load_dataset()?);
            writeln!(out, "recent: {}", catalog.recent.join(", "))?;
            for name in &catalog.all {
                writeln!(out, "  {name}")?;
            }
        }

        Command::Progress { name } => {
            let dataset = service.load_dataset()?;
            let points = views::exercise_progress(&dataset, &name);
            if points.is_empty() {
                writeln!(out, "no sets logged for {name}")?;
            }
            for point in &points {
                write!(
                    out,
                    "{}  {:.1} {} x {}  ({} sets, {:.1} {} volume)",
                    point.date,
                    point.heaviest_weight,
                    point.unit,
                    point.heaviest_reps,
                    point.total_sets,
                    point.total_volume,
                    point.unit
                )?;
                match views::closest_photo(&dataset, point.date, PHOTO_MATCH_WINDOW_DAYS) {
                    Some(photo) => writeln!(out, "  photo {} ({})", photo.id, photo.date)?,
                    None => writeln!(out)?,
                }
            }
        }

        Command::Calendar { month } => {
            let first = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
                .with_context(|| format!("month must be YYYY-MM, got {month:?}"))?;
            let dataset = service.load_dataset()?;
            let days = views::calendar_month(&dataset, first.year(), first.month())
                .with_context(|| format!("invalid month {month}"))?;
            for day in days.iter().filter(|d| d.is_active()) {
                let names: Vec<&str> = day.workouts.iter().map(|w| w.name.as_str()).collect();
                writeln!(
                    out,
                    "{}  {}{}",
                    day.date,
                    names.join(", "),
                    if day.photos.is_empty() {
                        String::new()
                    } else {
                        format!("  [{} photo(s)]", day.photos.len())
                    }
                )?;
            }
        }

        Command::Photo(PhotoCommand::Add {
            file,
            date,
            tags,
            notes,
        }) => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let mut draft = PhotoDraft::new(date, image_data_url(&file)?);
            draft.tags = tags;
            draft.notes = notes;
            let photo = service.save_photo(&draft)?;
            writeln!(out, "saved photo {} ({})", photo.id, photo.date)?;
        }

        Command::Photo(PhotoCommand::List) => {
            let mut photos = service.get_all_photos()?;
            photos.sort_by(|a, b| b.date.cmp(&a.date));
            for photo in photos {
                writeln!(
                    out,
                    "{}  {}  {}",
                    photo.date,
                    photo.id,
                    photo.tags.as_deref().unwrap_or("")
                )?;
            }
        }

        Command::Photo(PhotoCommand::Delete { id }) => {
            service.delete_photo(&id)?;
            writeln!(out, "deleted photo {id}")?;
        }

        Command::Profile(ProfileCommand::Show) => match service.get_user_profile()? {
            Some(profile) => writeln!(out, "{} ({})", profile.name, profile.preferred_unit)?,
            None => writeln!(out, "no profile set")?,
        },

        Command::Profile(ProfileCommand::Set { name, unit }) => {
            let profile = service.save_user_profile(&UserProfile::new(name, unit))?;
            writeln!(out, "profile saved: {} ({})", profile.name, profile.preferred_unit)?;
        }
    }
    Ok(())
}

fn print_details(out: &mut impl Write, details: &WorkoutDetails) -> Result<()> {
    let workout = &details.workout;
    writeln!(out, "{} {}", workout.date, workout.name)?;
    if let Some(notes) = &workout.notes {
        writeln!(out, "  notes: {notes}")?;
    }
    for entry in &details.exercises {
        writeln!(out, "  {}", entry.exercise.name)?;
        for set in &entry.sets {
            writeln!(
                out,
                "    {}. {} x {} {}",
                set.set_number, set.reps, set.weight, set.unit
            )?;
        }
    }
    for cardio in &details.cardio {
        let mut line = format!("  {}", cardio.activity);
        if let Some(minutes) = cardio.duration {
            line.push_str(&format!(", {minutes} min"));
        }
        if let Some(distance) = cardio.distance {
            line.push_str(&format!(", {distance} km"));
        }
        if let Some(intensity) = cardio.intensity {
            line.push_str(&format!(", intensity {intensity}"));
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn preferred_unit<B: KeyValueBackend>(service: &StorageService<B>) -> Result<WeightUnit> {
    Ok(service
        .get_user_profile()?
        .map(|p| p.preferred_unit)
        .unwrap_or_default())
}

/// Read an image file into a `data:` URL.
fn image_data_url(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        other => bail!("unsupported image type {other:?} for {}", path.display()),
    };
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{encoded}"))
}
