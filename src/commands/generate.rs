//! Generate static files

use anyhow::{bail, Result};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::path::Path;
use std::time::Duration;

use crate::content::loader::ContentLoader;
use crate::generator::{BuildReport, Generator};
use crate::preview::{CommandRasterizer, PreviewRenderer, Rasterizer};
use crate::Site;

/// Generate the site; with `rasterize`, also write PNG cards
pub fn run(site: &Site, rasterize: bool) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(site);
    let loaded = loader.load_posts()?;
    tracing::info!(
        "Loaded {} posts ({} failed to load)",
        loaded.posts.len(),
        loaded.failures.len()
    );

    // The card is injected fresh on every run so template edits are
    // picked up by watch mode
    let previews = PreviewRenderer::for_site(site)?;

    let rasterizer: Option<Box<dyn Rasterizer>> = if rasterize {
        match CommandRasterizer::from_config(&site.config.rasterizer) {
            Some(r) => Some(Box::new(r)),
            None => bail!("--png requires `rasterizer.command` in _config.yml"),
        }
    } else {
        None
    };

    let generator = Generator::new(site, previews, rasterizer)?;
    let mut report = generator.generate(&loaded.posts)?;
    report.failures.splice(0..0, loaded.failures);

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts ({} failed) in {:.2}s",
        report.built.len(),
        report.failures.len(),
        duration.as_secs_f64()
    );

    Ok(report)
}

/// Watch for file changes and regenerate
pub async fn watch(site: &Site, rasterize: bool) -> Result<()> {
    let site = site.clone();
    tokio::task::spawn_blocking(move || watch_blocking(&site, rasterize)).await?
}

fn watch_blocking(site: &Site, rasterize: bool) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Bursts of events within 500ms collapse into one rebuild
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    debouncer
        .watcher()
        .watch(&site.content_dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", site.content_dir);

    if site.asset_dir.exists() {
        debouncer
            .watcher()
            .watch(&site.asset_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", site.asset_dir);
    }

    let config_path = site.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
                if changed.is_empty() {
                    continue;
                }
                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }

                tracing::info!("Regenerating...");
                match Site::new(&site.base_dir).and_then(|s| run(&s, rasterize)) {
                    Ok(report) => {
                        for failure in &report.failures {
                            tracing::error!("{}", failure);
                        }
                    }
                    Err(e) => tracing::error!("Generation failed: {:#}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Editor droppings and VCS files never trigger a rebuild
fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}
