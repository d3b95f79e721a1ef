use anyhow::Context;

use saver_core::models::settings::BotSettings;

/// Loads settings from `.env` and the environment and makes sure the temp
/// directory is usable before the bot starts taking links.
pub fn load_settings() -> anyhow::Result<BotSettings> {
    let settings = BotSettings::from_env()?;
    prepare(settings)
}

fn prepare(settings: BotSettings) -> anyhow::Result<BotSettings> {
    std::fs::create_dir_all(&settings.temp_dir).with_context(|| {
        format!(
            "Не удалось создать каталог временных файлов {}",
            settings.temp_dir.display()
        )
    })?;

    tracing::debug!("Loaded settings: {:?}", settings);
    Ok(settings)
}
