use nsconf_core::AppConfig;
use nsconf_prefs::theme::{self, ThemeStore};
use nsconf_prefs::{system_preference, JsonFileStorage};

fn init(config: &AppConfig) -> &'static ThemeStore {
    theme::init(
        Box::new(JsonFileStorage::from_config(&config.prefs)),
        system_preference(),
    )
}

pub fn show(config: &AppConfig) -> anyhow::Result<()> {
    println!("{}", init(config).theme());
    Ok(())
}

pub fn toggle(config: &AppConfig) -> anyhow::Result<()> {
    init(config);
    let theme = theme::toggle().ok_or_else(|| anyhow::anyhow!("theme store not initialized"))?;
    println!("{theme}");
    Ok(())
}
