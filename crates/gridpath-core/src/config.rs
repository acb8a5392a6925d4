use directories::{BaseDirs, ProjectDirs};
use eyre::{eyre, Context, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "gridpath.toml";

/// Set by `--config-dir`; wins over the platform location.
static CONFIG_DIR_OVERRIDE: Lazy<RwLock<Option<PathBuf>>> = Lazy::new(|| RwLock::new(None));

pub fn set_config_dir<P: AsRef<Path>>(path: P) {
    *CONFIG_DIR_OVERRIDE.write() = Some(path.as_ref().to_path_buf());
}

pub fn clear_config_dir_override() {
    CONFIG_DIR_OVERRIDE.write().take();
}

/// Directory holding `gridpath.toml`: the `--config-dir` override, then the
/// platform config dir, then `~/.config/gridpath`.
pub fn config_dir() -> Result<PathBuf> {
    let dir = CONFIG_DIR_OVERRIDE
        .read()
        .clone()
        .or_else(|| {
            ProjectDirs::from("org", "Gridpath", "gridpath")
                .map(|proj| proj.config_dir().to_path_buf())
        })
        .or_else(|| BaseDirs::new().map(|base| base.home_dir().join(".config").join("gridpath")));
    dir.ok_or_else(|| eyre!("no configuration directory: pass --config-dir or set HOME"))
}

/// Client environment for path classification and the directory catalog.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Home collection, the expansion of `~`
    pub home: Option<String>,
    /// Remote working collection that relative remote paths join
    pub cwd: Option<String>,
    /// Zones known to this client, keyed by zone name
    #[serde(default)]
    pub zones: BTreeMap<String, ZoneConfig>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ZoneConfig {
    /// Local directory backing the zone when served by the directory catalog
    pub path: Option<PathBuf>,
    /// Comment/description
    pub comment: Option<String>,
}

impl GridConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .wrap_err_with(|| format!("failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: GridConfig = toml::from_str(content).wrap_err("invalid gridpath config")?;
        Ok(config)
    }

    /// Loads `gridpath.toml` from the configuration directory, falling back to
    /// an empty environment when the file does not exist.
    pub fn load_default() -> Result<Self> {
        let path = config_dir()?.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn zone_names(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    /// Registers or replaces a zone backed by `path`.
    pub fn insert_zone(&mut self, name: impl Into<String>, path: PathBuf) {
        self.zones.entry(name.into()).or_default().path = Some(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zones_and_collections() {
        let config = GridConfig::parse(
            r#"
            home = "/tempZone/home/rods"
            cwd = "/tempZone/home/rods/work"

            [zones.tempZone]
            path = "/srv/grid/tempZone"
            comment = "primary"

            [zones.archive]
            "#,
        )
        .unwrap();
        assert_eq!(config.home.as_deref(), Some("/tempZone/home/rods"));
        assert_eq!(config.zone_names().collect::<Vec<_>>(), ["archive", "tempZone"]);
        assert_eq!(
            config.zones["tempZone"].path.as_deref(),
            Some(Path::new("/srv/grid/tempZone"))
        );
        assert!(config.zones["archive"].path.is_none());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(GridConfig::parse("zone_root = \"/x\"").is_err());
    }

    #[test]
    fn load_default_reads_override_dir() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "cwd = \"/z/home\"\n[zones.z]\n",
        )?;
        set_config_dir(tmp.path());
        let loaded = GridConfig::load_default();
        clear_config_dir_override();
        let config = loaded?;
        assert_eq!(config.cwd.as_deref(), Some("/z/home"));
        assert!(config.zones.contains_key("z"));
        Ok(())
    }

    #[test]
    fn insert_zone_overrides_path() {
        let mut config = GridConfig::default();
        config.insert_zone("z", PathBuf::from("/a"));
        config.insert_zone("z", PathBuf::from("/b"));
        assert_eq!(config.zones["z"].path.as_deref(), Some(Path::new("/b")));
    }
}
