//! Delete a failed learning path

use crate::cli::app::ResetArgs;
use anyhow::{Result, bail};
use parlo_core::AppConfig;
use parlo_core::model::PathStatus;
use parlo_core::store::{ContentStore, FileStore};

/// Execute the reset command
pub async fn execute(args: ResetArgs, config: AppConfig) -> Result<()> {
    let store = FileStore::open(&config.data_dir)?;

    let Some(path) = store.learning_path_for_user(args.user).await? else {
        println!("No learning path for user {} to reset.", args.user);
        return Ok(());
    };

    if path.status != PathStatus::Failed {
        bail!(
            "only failed learning paths can be reset; the current one is '{}'",
            path.status
        );
    }

    store.delete_learning_path(path.id).await?;
    println!("Deleted failed learning path {}.", path.id);
    println!("Run 'parlo generate --user {}' to start over.", args.user);

    Ok(())
}
