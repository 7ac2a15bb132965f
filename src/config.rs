use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub boxes: BoxesConfig,
    pub watch: WatchConfig,
    pub indicator: IndicatorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoxesConfig {
    /// Явный путь к директории с боксами. Если не задан, используется XDG.
    #[serde(default)]
    pub config_dir: Option<PathBuf>,
    /// 0 отключает таймаут
    pub command_timeout_ms: u64,
    pub max_status_output_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    pub enabled: bool,
    pub mode: String,
    pub debounce_ms: u64,
    pub polling_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndicatorConfig {
    pub backend: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
            boxes: BoxesConfig {
                config_dir: None,
                command_timeout_ms: 10_000,
                max_status_output_bytes: 4096,
            },
            watch: WatchConfig {
                enabled: true,
                mode: "notify".to_string(),
                debounce_ms: 200,
                polling_interval_ms: 2000,
            },
            indicator: IndicatorConfig {
                backend: "console".to_string(),
            },
        }
    }
}

impl Config {
    /// Загрузка: значения по умолчанию <- TOML файл (если задан) <- переменные LOOT_*
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                anyhow::bail!("Файл конфигурации {:?} не найден", path);
            }
            figment = figment.merge(Toml::file(path));
        }

        let config: Config = figment
            .merge(Env::prefixed("LOOT_").split("__"))
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.boxes.max_status_output_bytes < 16 {
            anyhow::bail!("max_status_output_bytes должно быть минимум 16");
        }

        match self.watch.mode.as_str() {
            "notify" | "polling" => {}
            _ => anyhow::bail!("Неверный режим отслеживания: {}", self.watch.mode),
        }

        if self.watch.polling_interval_ms < 100 {
            anyhow::bail!("polling_interval_ms должно быть минимум 100");
        }

        match self.indicator.backend.as_str() {
            "log" | "console" => {}
            _ => anyhow::bail!("Неизвестный индикатор: {}", self.indicator.backend),
        }

        Ok(())
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        match self.boxes.command_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.watch.debounce_ms)
    }

    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.watch.polling_interval_ms)
    }
}
