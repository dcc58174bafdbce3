use std::path::{Path, PathBuf};

use engine::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use engine::GameSettings;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "torus_snake_config.yaml";

fn default_config_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn get_config_manager(
    path: Option<&Path>,
) -> ConfigManager<FileContentConfigProvider, RunnerConfig, YamlConfigSerializer> {
    match path {
        Some(path) => ConfigManager::from_yaml_file(path),
        None => ConfigManager::from_yaml_file(default_config_path()),
    }
}

fn default_log_every_ticks() -> u64 {
    100
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct RunnerConfig {
    pub game: GameSettings,
    /// Ends a game's tick loop after this many ticks.
    #[serde(default)]
    pub max_ticks: Option<u64>,
    #[serde(default)]
    pub restart_on_game_over: bool,
    #[serde(default = "default_log_every_ticks")]
    pub log_every_ticks: u64,
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        if self.max_ticks == Some(0) {
            return Err("max_ticks must be greater than 0 when set".to_string());
        }
        if self.log_every_ticks == 0 {
            return Err("log_every_ticks must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            game: GameSettings::default(),
            max_ticks: None,
            restart_on_game_over: false,
            log_every_ticks: default_log_every_ticks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::config::{ConfigContentProvider, ConfigSerializer};

    fn get_temp_file_path() -> PathBuf {
        let random_number: u32 = rand::random();
        std::env::temp_dir().join(format!("temp_torus_snake_config_{}.yaml", random_number))
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(RunnerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_string() {
        let default_config = RunnerConfig::default();
        let serializer = YamlConfigSerializer::new();

        let serialized_string = serializer.serialize(&default_config).unwrap();
        let deserialized_config: RunnerConfig = serializer.deserialize(&serialized_string).unwrap();

        assert_eq!(default_config, deserialized_config);
    }

    #[test]
    fn test_config_can_be_saved_and_loaded_through_manager() {
        let config = RunnerConfig {
            max_ticks: Some(500),
            restart_on_game_over: true,
            game: GameSettings {
                autoplay: true,
                seed: Some(42),
                ..GameSettings::default()
            },
            ..RunnerConfig::default()
        };
        let file_path = get_temp_file_path();
        let manager = get_config_manager(Some(file_path.as_path()));

        assert!(manager.set_config(&config).is_ok());
        assert_eq!(manager.get_config().unwrap(), config);

        let fresh_manager = get_config_manager(Some(file_path.as_path()));
        assert_eq!(fresh_manager.get_config().unwrap(), config);

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_config_file_does_not_exist_returns_default_config() {
        let manager = get_config_manager(Some(Path::new("this_file_does_not_exist.yaml")));
        assert_eq!(manager.get_config().unwrap(), RunnerConfig::default());
    }

    #[test]
    fn test_invalid_config_cant_be_read() {
        let invalid_config_content = r#"
            game:
              width: 905
              height: 600
              block_size: 15
              tick_interval_ms: 50
              initial_positions:
                - { x: 0, y: 0 }
              initial_direction: Right
        "#;

        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(file_path.clone());
        content_provider
            .set_config_content(invalid_config_content)
            .unwrap();

        let manager: ConfigManager<_, RunnerConfig, _> =
            ConfigManager::new(content_provider, YamlConfigSerializer::new());
        assert!(manager.get_config().is_err());

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_invalid_config_cant_be_written() {
        let config = RunnerConfig {
            log_every_ticks: 0,
            ..RunnerConfig::default()
        };
        let file_path = get_temp_file_path();
        let manager = get_config_manager(Some(file_path.as_path()));

        assert!(manager.set_config(&config).is_err());
        assert!(!file_path.exists());
    }
}
