use super::GlobalOptions;
use uplift::core::{UpliftError, UpliftResult};
use uplift::release::ReleaseRecord;
use uplift::update::ArchiveFormat;

pub async fn list(global: &GlobalOptions, json: bool) -> UpliftResult<()> {
    let config = global.load_config()?;
    let mut updater = global.updater(&config)?;
    let records = updater.catalog_mut().records().await?;

    if json {
        let out = serde_json::to_string_pretty(records)
            .map_err(|e| UpliftError::Config(format!("Failed to serialize releases: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    if records.is_empty() {
        println!("No releases published for {}/{}", config.owner, config.repository);
        return Ok(());
    }

    println!("Releases of {}/{}:", config.owner, config.repository);
    for record in records {
        println!("  {}", summary_line(record));
    }
    Ok(())
}

pub async fn latest(global: &GlobalOptions) -> UpliftResult<()> {
    let config = global.load_config()?;
    let mut updater = global.updater(&config)?;

    match updater.latest_version().await? {
        Some(version) => println!("{}", version),
        None => println!("No releases published for {}/{}", config.owner, config.repository),
    }
    Ok(())
}

pub async fn show(global: &GlobalOptions, version: &str) -> UpliftResult<()> {
    let config = global.load_config()?;
    let mut updater = global.updater(&config)?;
    let record = updater
        .catalog_mut()
        .lookup(version)
        .await?
        .cloned()
        .ok_or_else(|| UpliftError::NotFound(format!("Version {} is not published", version)))?;

    println!("{}", summary_line(&record));
    for format in [ArchiveFormat::Zip, ArchiveFormat::TarGz] {
        if let Some(url) = record.archive_url(format) {
            println!("  {:<7} {}", format.to_string(), url);
        }
    }
    if let Some(body) = &record.body {
        println!();
        println!("{}", body.trim_end());
    }
    Ok(())
}

fn summary_line(record: &ReleaseRecord) -> String {
    let mut line = record.name.clone();
    if let Some(date) = record.published_at {
        line.push_str(&format!("  {}", date.format("%Y-%m-%d")));
    }
    if let Some(title) = &record.title {
        line.push_str(&format!("  {}", title));
    }
    if record.is_prerelease {
        line.push_str("  (prerelease)");
    }
    line
}
