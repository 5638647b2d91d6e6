use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;

use mount_cleaner::{CleanupReport, DebrisCleaner};
use vaultkeep_core::{Environment, SystemEnvironment};

use super::Context;

pub fn execute(config_path: Option<PathBuf>, dir: Option<PathBuf>, json: bool) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => {
            let ctx = Context::load(config_path)?;
            SystemEnvironment::new(&ctx.config, &ctx.paths)
                .mount_points_dir()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "No mount points directory configured (pass DIR, set general.mount_points_dir or {})",
                        vaultkeep_core::paths::MOUNT_POINTS_DIR_VAR
                    )
                })?
        }
    };

    let report = DebrisCleaner::new().remove_debris(&dir);
    if json {
        println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
    } else {
        println!("{}", human_summary(&report));
    }
    Ok(())
}

fn human_summary(report: &CleanupReport) -> String {
    let mut lines = vec![format!("Mount points: {}", report.directory.display())];
    if let Some(error) = &report.listing_error {
        lines.push(format!("Unable to list directory: {error}"));
        return lines.join("\n");
    }

    lines.push(format!(
        "Scanned {} entries, removed {}, kept {}, failed {}",
        report.attempted(),
        report.removed_count(),
        report.retained().count(),
        report.failures.len()
    ));
    for entry in report.removed() {
        lines.push(format!("  removed {}", entry.path.display()));
    }
    for failure in &report.failures {
        lines.push(format!("  failed to {failure}"));
    }
    lines.join("\n")
}

fn report_json(report: &CleanupReport) -> serde_json::Value {
    json!({
        "directory": report.directory,
        "listing_error": report.listing_error.as_ref().map(ToString::to_string),
        "entries": report.entries.iter().map(|entry| json!({
            "path": entry.path,
            "kind": format!("{:?}", entry.kind),
            "action": format!("{:?}", entry.action),
        })).collect::<Vec<_>>(),
        "failures": report.failures.iter().map(|failure| json!({
            "path": failure.path,
            "operation": failure.operation.to_string(),
            "error": failure.source.to_string(),
        })).collect::<Vec<_>>(),
    })
}
