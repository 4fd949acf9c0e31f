//! Manage learner profiles

use crate::cli::app::{ProfileAction, ProfileCommand, ProfileSetArgs, ProfileShowArgs};
use anyhow::Result;
use parlo_core::AppConfig;
use parlo_core::model::UserProfile;
use parlo_core::store::{ContentStore, FileStore};
use uuid::Uuid;

/// Execute the profile command
pub async fn execute(command: ProfileCommand, config: AppConfig) -> Result<()> {
    match command.action {
        ProfileAction::Set(args) => set(args, config).await,
        ProfileAction::Show(args) => show(args, config).await,
    }
}

async fn set(args: ProfileSetArgs, config: AppConfig) -> Result<()> {
    let store = FileStore::open(&config.data_dir)?;

    let profile = UserProfile {
        user_id: args.user.unwrap_or_else(Uuid::new_v4),
        proficiency: args.level,
        goal: args.goal,
        focus_areas: args.focus_areas,
        native_language: args.native,
    };
    store.upsert_profile(&profile).await?;

    println!("Profile saved for user {}.", profile.user_id);
    println!("Run 'parlo generate --user {}' to build a learning path.", profile.user_id);
    Ok(())
}

async fn show(args: ProfileShowArgs, config: AppConfig) -> Result<()> {
    let store = FileStore::open(&config.data_dir)?;

    let Some(profile) = store.user_profile(args.user).await? else {
        println!("No profile stored for user {}.", args.user);
        return Ok(());
    };

    println!("Profile {}", profile.user_id);
    println!("  Proficiency: {}", profile.proficiency);
    println!("  Goal: {}", profile.goal);
    if !profile.focus_areas.is_empty() {
        println!("  Focus: {}", profile.focus_areas.join(", "));
    }
    println!("  Native language: {}", profile.native_language);
    Ok(())
}
