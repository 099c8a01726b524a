use anyhow::Result;
use serde::Deserialize;
use std::fs;

#[derive(Debug)]
pub struct SettingsReader {}

impl SettingsReader {
    /// Read settings from a local JSON file
    pub fn read_config_file<Settings>(path: &str) -> Result<Settings>
    where
        Settings: for<'de> Deserialize<'de>,
    {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
