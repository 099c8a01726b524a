use crate::settings::SettingsReader;

pub mod doc_store;
pub mod logging;
pub mod settings;

/// Load settings from a local JSON file. The service cannot run on a
/// partial configuration, so any failure here ends the process.
pub fn load_settings<T>(path: &str) -> T
where
    T: for<'de> serde::Deserialize<'de>,
{
    match SettingsReader::read_config_file::<T>(path) {
        Err(val) => {
            println!("Failed to load settings from {path}: {val}");
            std::process::exit(1);
        }
        Ok(val) => val,
    }
}
