//! Generate a learning path for a user

use crate::cli::app::GenerateArgs;
use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use parlo_core::model::PathStatus;
use parlo_core::pipeline::ChannelObserver;
use parlo_core::store::{ContentStore, FileStore};
use parlo_core::{AppConfig, PathGenerator};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Execute the generate command
pub async fn execute(args: GenerateArgs, config: AppConfig) -> Result<()> {
    config.validate()?;
    let store = Arc::new(FileStore::open(&config.data_dir)?);

    // Surface the current path before the pipeline refuses the run.
    if let Some(existing) = store.learning_path_for_user(args.user).await? {
        match existing.status {
            PathStatus::Ready => {
                println!("A learning path already exists for this user.");
                println!("Run 'parlo status --user {}' to see it.", args.user);
                return Ok(());
            }
            PathStatus::Generating => {
                println!("A generation is already in progress for this user.");
                return Ok(());
            }
            PathStatus::Failed => {
                if args.retry {
                    store.delete_learning_path(existing.id).await?;
                    info!(path = %existing.id, "deleted failed learning path before retry");
                } else {
                    bail!(
                        "the previous generation failed; run with --retry to delete it and start over"
                    );
                }
            }
        }
    }

    let provider =
        config.provider.build().context("could not construct the generation provider")?;
    if !provider.is_available().await {
        bail!("generation provider '{}' is not available; check your configuration", provider.name());
    }

    let (sender, mut receiver) = mpsc::unbounded_channel();
    let observer = Arc::new(ChannelObserver::new(sender));
    let generator = PathGenerator::new(provider, store, config.pipeline)
        .with_observer(observer);

    let printer = if args.json {
        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                if let Ok(line) = serde_json::to_string(&event) {
                    println!("{line}");
                }
            }
        })
    } else {
        let style = ProgressStyle::default_bar()
            .template("  [{bar:40.cyan/blue}] {pos}% {msg}")
            .context("invalid progress bar template")?
            .progress_chars("=>-");
        tokio::spawn(async move {
            let bar = ProgressBar::new(100);
            bar.set_style(style);
            bar.set_message("Creating course outline");
            while let Some(event) = receiver.recv().await {
                bar.set_position(u64::from(event.progress));
                bar.set_message(event.message);
            }
            if bar.position() >= 100 {
                bar.finish();
            } else {
                bar.abandon();
            }
        })
    };

    let result = generator.generate(args.user).await;
    // Dropping the generator closes the progress channel and ends the printer.
    drop(generator);
    let _ = printer.await;

    match result {
        Ok(path_id) => {
            println!("Learning path {path_id} is ready.");
            println!("Run 'parlo status --user {}' to see it.", args.user);
            Ok(())
        }
        Err(err) => {
            println!(
                "Generation failed; run 'parlo generate --user {} --retry' to start over.",
                args.user
            );
            Err(err.into())
        }
    }
}
