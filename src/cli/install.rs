use super::GlobalOptions;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use uplift::core::{UpliftError, UpliftResult};
use uplift::di::ConfigProvider;
use uplift::update::{ArchiveFormat, Updater};

pub struct InstallOptions {
    pub version: Option<String>,
    pub root: PathBuf,
    pub temp: Option<PathBuf>,
    pub format: Option<ArchiveFormat>,
    pub yes: bool,
}

pub async fn run(global: &GlobalOptions, opts: InstallOptions) -> UpliftResult<()> {
    let config = global.load_config()?;
    let container = global.container(&config)?;
    let temp_dir = match opts.temp {
        Some(dir) => dir,
        None => container.config().temp_dir()?,
    };

    let mut updater = Updater::new(container.config(), container.transport());
    if let Some(format) = opts.format {
        updater.set_archive_format(format);
    }

    let target = match &opts.version {
        Some(version) => version.clone(),
        None => match updater.latest_version().await? {
            Some(latest) => format!("{} (latest)", latest),
            None => {
                return Err(UpliftError::NotFound(format!(
                    "No releases published for {}/{}",
                    config.owner, config.repository
                )))
            }
        },
    };

    if !opts.yes && !confirm_install(&target, &opts.root)? {
        println!("Install cancelled");
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Installing {}...", target));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = match &opts.version {
        Some(version) => updater.install_version(version, &opts.root, &temp_dir).await,
        None => updater.install_latest(&opts.root, &temp_dir).await,
    };
    spinner.finish_and_clear();
    let report = result?;

    println!(
        "✓ Installed {} into {} ({} files, {} new directories)",
        report.version,
        opts.root.display(),
        report.merge.files_moved,
        report.merge.directories_created
    );
    Ok(())
}

fn confirm_install(version: &str, root: &std::path::Path) -> UpliftResult<bool> {
    println!(
        "Installing {} will overwrite files in {}. Nothing is rolled back if it fails.",
        version,
        root.display()
    );
    Confirm::new()
        .with_prompt("Have you backed up this directory?")
        .default(false)
        .interact()
        .map_err(|e| UpliftError::Config(format!("Failed to read input: {}", e)))
}
