use super::{
    breeding::BreedingConfig, evolution::EvolutionConfig, fitness::FitnessConfig,
    traits::validate_section,
};
use crate::error::PatternEvoError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Environment overrides look like `PATTERNEVO__EVOLUTION__GENERATIONS=8`
pub const ENV_PREFIX: &str = "PATTERNEVO";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub breeding: BreedingConfig,
    pub fitness: FitnessConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), PatternEvoError> {
        validate_section(&self.evolution)?;
        validate_section(&self.breeding)?;
        validate_section(&self.fitness)
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Layer a TOML or JSON file (format from its extension) under
    /// environment overrides, then validate before swapping it in.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PatternEvoError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let loaded: AppConfig = settings.try_deserialize()?;
        loaded.validate()?;

        log::info!("Loaded configuration from {}", path.as_ref().display());
        *self.write_lock() = loaded;
        Ok(())
    }

    /// Defaults plus environment overrides only
    pub fn load_from_env(&self) -> Result<(), PatternEvoError> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let loaded: AppConfig = settings.try_deserialize()?;
        loaded.validate()?;
        *self.write_lock() = loaded;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PatternEvoError> {
        let toml_str = toml::to_string_pretty(&*self.read_lock())?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.read_lock().clone()
    }

    pub fn update<F>(&self, f: F) -> Result<(), PatternEvoError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        candidate.validate()?;
        *self.write_lock() = candidate;
        Ok(())
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, AppConfig> {
        self.config.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, AppConfig> {
        self.config.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
