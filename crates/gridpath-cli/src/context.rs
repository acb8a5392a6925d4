use std::path::PathBuf;

use eyre::{Context, Result};
use gridpath_core::config::{self, GridConfig};
use gridpath_core::{DirectoryCatalog, PathClassifier};

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: GridConfig,
    pub local_cwd: PathBuf,
}

impl AppContext {
    /// Loads `gridpath.toml` and layers the global flags on top.
    pub fn load(cli: &Cli) -> Result<Self> {
        if let Some(dir) = &cli.config_dir {
            config::set_config_dir(dir);
        }
        let mut config = GridConfig::load_default()?;
        if let Some(home) = &cli.home {
            config.home = Some(home.clone());
        }
        if let Some(cwd) = &cli.cwd {
            config.cwd = Some(cwd.clone());
        }
        for (name, dir) in &cli.zones {
            config.insert_zone(name.clone(), dir.clone());
        }
        for (name, zone) in &config.zones {
            if zone.path.is_none() {
                log::warn!("zone {name} has no directory; remote paths in it will not resolve");
            }
        }

        let local_cwd = std::env::current_dir().wrap_err("reading current directory")?;
        Ok(Self { config, local_cwd })
    }

    pub fn classifier(&self) -> PathClassifier {
        PathClassifier::from_config(&self.config, self.local_cwd.clone())
    }

    pub fn catalog(&self) -> DirectoryCatalog {
        DirectoryCatalog::from_config(&self.config)
    }
}
