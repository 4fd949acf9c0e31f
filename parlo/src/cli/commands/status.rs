//! Show a user's learning path

use crate::cli::app::StatusArgs;
use anyhow::Result;
use parlo_core::AppConfig;
use parlo_core::store::{ContentStore, FileStore};

/// Execute the status command
pub async fn execute(args: StatusArgs, config: AppConfig) -> Result<()> {
    let store = FileStore::open(&config.data_dir)?;

    let Some(path) = store.learning_path_for_user(args.user).await? else {
        println!("No learning path for user {} yet.", args.user);
        println!("Run 'parlo generate --user {}' to create one.", args.user);
        return Ok(());
    };

    println!("Learning path {}", path.id);
    println!("  Status: {}", path.status);
    println!("  Level: {}", path.level);
    println!("  Goal: {}", path.goal);
    if !path.focus_areas.is_empty() {
        println!("  Focus: {}", path.focus_areas.join(", "));
    }
    if let Some(generated_at) = path.generated_at {
        println!("  Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
    }

    let units = store.units_for_path(path.id).await?;
    if units.is_empty() {
        println!("\nNo units yet.");
        return Ok(());
    }

    for unit in units {
        println!("\n{}. {} [{}]", unit.order_index, unit.title, unit.status);
        println!("   {}", unit.description);

        for lesson in store.lessons_for_unit(unit.id).await? {
            let content = if lesson.content.is_some() { "" } else { " (no content)" };
            println!(
                "   {}.{} {} ({}) [{}]{}",
                unit.order_index, lesson.order_index, lesson.title, lesson.lesson_type,
                lesson.status, content
            );
        }
    }

    Ok(())
}
