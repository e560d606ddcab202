//! Configuration loading with per-name caching.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ProductConfig, SiteConfig};
use crate::{CorkscrewError, Result};

/// Loads and caches site and product configurations from a config root.
///
/// Layout under the root mirrors the config directory the crawler ships
/// with: `sites/<name>.yaml` and `products/<type>.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    site_cache: HashMap<String, SiteConfig>,
    product_cache: HashMap<String, ProductConfig>,
}

impl ConfigLoader {
    /// Creates a loader rooted at a config directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            site_cache: HashMap::new(),
            product_cache: HashMap::new(),
        }
    }

    /// The directory holding site configs.
    pub fn sites_dir(&self) -> PathBuf {
        self.root.join("sites")
    }

    /// The directory holding product configs.
    pub fn products_dir(&self) -> PathBuf {
        self.root.join("products")
    }

    /// Loads a site configuration by name, using the cache when warm.
    ///
    /// # Errors
    ///
    /// [`CorkscrewError::FileNotFound`] when the file is missing,
    /// [`CorkscrewError::ConfigError`] on invalid YAML.
    pub fn load_site(&mut self, name: &str) -> Result<SiteConfig> {
        if let Some(config) = self.site_cache.get(name) {
            return Ok(config.clone());
        }

        let path = self.sites_dir().join(format!("{}.yaml", name));
        let config: SiteConfig = load_yaml(&path)?;
        self.site_cache.insert(name.to_string(), config.clone());

        Ok(config)
    }

    /// Loads a product configuration by type name, using the cache when
    /// warm.
    ///
    /// # Errors
    ///
    /// [`CorkscrewError::FileNotFound`] when the file is missing,
    /// [`CorkscrewError::ConfigError`] on invalid YAML.
    pub fn load_product(&mut self, name: &str) -> Result<ProductConfig> {
        if let Some(config) = self.product_cache.get(name) {
            return Ok(config.clone());
        }

        let path = self.products_dir().join(format!("{}.yaml", name));
        let config: ProductConfig = load_yaml(&path)?;
        self.product_cache.insert(name.to_string(), config.clone());

        Ok(config)
    }

    /// Lists the available site configuration names.
    pub fn available_sites(&self) -> Vec<String> {
        list_yaml_stems(&self.sites_dir())
    }

    /// Lists the available product configuration names.
    pub fn available_products(&self) -> Vec<String> {
        list_yaml_stems(&self.products_dir())
    }

    /// Clears the config cache.
    pub fn clear_cache(&mut self) {
        self.site_cache.clear();
        self.product_cache.clear();
    }
}

impl Default for ConfigLoader {
    /// Roots the loader at `~/.config/corkscrew`, falling back to a
    /// relative `config` directory when no home directory exists.
    fn default() -> Self {
        let root = dirs::home_dir()
            .map(|home| home.join(".config").join("corkscrew"))
            .unwrap_or_else(|| PathBuf::from("config"));
        Self::new(root)
    }
}

fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(CorkscrewError::FileNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| CorkscrewError::ConfigError(format!("invalid YAML in {}: {}", path.display(), e)))
}

fn list_yaml_stems(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "yaml"))
        .filter_map(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(root: &Path, kind: &str, name: &str, content: &str) {
        let dir = root.join(kind);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.yaml", name)), content).unwrap();
    }

    #[test]
    fn test_load_site() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "sites", "totalwine", "site:\n  name: Total Wine\n");

        let mut loader = ConfigLoader::new(tmp.path());
        let config = loader.load_site("totalwine").unwrap();

        assert_eq!(config.site.name, "Total Wine");
    }

    #[test]
    fn test_load_product() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            "products",
            "wine",
            "product_type: wine\nextra_fields:\n  - varietal\n",
        );

        let mut loader = ConfigLoader::new(tmp.path());
        let config = loader.load_product("wine").unwrap();

        assert_eq!(config.product_type, "wine");
        assert_eq!(config.extra_fields, vec!["varietal"]);
    }

    #[test]
    fn test_missing_config_file() {
        let tmp = TempDir::new().unwrap();
        let mut loader = ConfigLoader::new(tmp.path());

        assert!(matches!(
            loader.load_site("nonexistent"),
            Err(CorkscrewError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "sites", "broken", "site: [unbalanced\n");

        let mut loader = ConfigLoader::new(tmp.path());
        assert!(matches!(loader.load_site("broken"), Err(CorkscrewError::ConfigError(_))));
    }

    #[test]
    fn test_caching_survives_file_removal() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "sites", "cached", "site:\n  name: Cached\n");

        let mut loader = ConfigLoader::new(tmp.path());
        loader.load_site("cached").unwrap();

        fs::remove_file(tmp.path().join("sites").join("cached.yaml")).unwrap();
        let config = loader.load_site("cached").unwrap();
        assert_eq!(config.site.name, "Cached");

        loader.clear_cache();
        assert!(loader.load_site("cached").is_err());
    }

    #[test]
    fn test_available_listings() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "sites", "beta", "{}");
        write_config(tmp.path(), "sites", "alpha", "{}");
        write_config(tmp.path(), "products", "wine", "{}");

        let loader = ConfigLoader::new(tmp.path());
        assert_eq!(loader.available_sites(), vec!["alpha", "beta"]);
        assert_eq!(loader.available_products(), vec!["wine"]);
    }

    #[test]
    fn test_available_listings_missing_dirs() {
        let tmp = TempDir::new().unwrap();
        let loader = ConfigLoader::new(tmp.path());

        assert!(loader.available_sites().is_empty());
        assert!(loader.available_products().is_empty());
    }
}
