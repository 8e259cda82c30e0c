use super::GlobalOptions;
use uplift::core::UpliftResult;

pub async fn run(global: &GlobalOptions, version: &str) -> UpliftResult<()> {
    let config = global.load_config()?;
    let mut updater = global.updater(&config)?;

    if updater.is_up_to_date(version).await? {
        println!("{} is up to date", version);
        return Ok(());
    }

    if let Some(latest) = updater.latest_version().await? {
        println!("Update available: {} → {}", version, latest);
    }
    if let Some(next) = updater.next_version(version).await? {
        let title = updater.title(&next).await?;
        if title.is_empty() {
            println!("Next release: {}", next);
        } else {
            println!("Next release: {} ({})", next, title);
        }
    }
    Ok(())
}
