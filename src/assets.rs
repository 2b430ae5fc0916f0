//! Catalog asset loading with an embedded fallback
//!
//! The catalog description is looked up as follows:
//!
//! - If `CATALOG_FILE` is NOT set: use the embedded `catalog.yaml` only
//! - If `CATALOG_FILE` IS set and the file is missing: seed it with the
//!   embedded catalog, then use the file
//! - If `CATALOG_FILE` IS set and the file exists: use the file

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the embedded default catalog
pub const CATALOG_ASSET: &str = "catalog.yaml";

/// Embedded default catalog
#[derive(RustEmbed)]
#[folder = "catalogs/"]
#[include = "*.yaml"]
struct EmbeddedCatalog;

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Where the catalog was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Embedded => write!(f, "embedded"),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Asset loader with optional filesystem override
pub struct AssetLoader {
    /// External catalog file path (from CATALOG_FILE env var)
    catalog_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// The path should be `Some` only if the env var was set.
    /// If `None`, the embedded catalog is used exclusively.
    pub fn new(catalog_file: Option<PathBuf>) -> Self {
        Self { catalog_file }
    }

    /// Create a loader from the `CATALOG_FILE` environment variable
    pub fn from_env() -> Self {
        Self::new(std::env::var("CATALOG_FILE").ok().map(PathBuf::from))
    }

    pub fn catalog_file(&self) -> Option<&Path> {
        self.catalog_file.as_deref()
    }

    /// Source the next [`read_catalog`](Self::read_catalog) will use
    pub fn catalog_source(&self) -> CatalogSource {
        match self.catalog_file {
            Some(ref path) if path.exists() => CatalogSource::File(path.clone()),
            _ => CatalogSource::Embedded,
        }
    }

    /// Read the catalog file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to the embedded catalog.
    pub fn read_catalog(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.catalog_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading catalog from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedCatalog::get(CATALOG_ASSET)
            .map(|f| {
                tracing::trace!("Loading catalog from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded catalog.yaml not found")
            })
    }

    /// Read the catalog as a UTF-8 string
    pub fn read_catalog_string(&self) -> io::Result<String> {
        let bytes = self.read_catalog()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Seed a configured but missing catalog file with the embedded one
    ///
    /// Returns true if a file was written.
    pub fn seed_if_configured(&self) -> io::Result<bool> {
        let Some(ref path) = self.catalog_file else {
            return Ok(false);
        };
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        match EmbeddedCatalog::get(CATALOG_ASSET) {
            Some(data) => {
                fs::write(path, &*data.data)?;
                tracing::info!(path = %path.display(), "Seeded catalog file with embedded default");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Extract the embedded catalog to the filesystem (init command)
    ///
    /// Uses the configured path, or `./catalog.yaml` if none is set.
    pub fn init(&self, force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();
        let path = self
            .catalog_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("./catalog.yaml"));

        if !force && path.exists() {
            report.skipped.push(path.display().to_string());
            return Ok(report);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Some(data) = EmbeddedCatalog::get(CATALOG_ASSET) {
            fs::write(&path, &*data.data)?;
            report.written.push(path.display().to_string());
        }
        Ok(report)
    }

    /// List embedded assets (for display)
    pub fn list_embedded() -> Vec<String> {
        EmbeddedCatalog::iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_present() {
        let loader = AssetLoader::new(None);
        let text = loader.read_catalog_string().unwrap();
        assert!(text.contains("entries:"));
        assert_eq!(loader.catalog_source(), CatalogSource::Embedded);
        assert_eq!(AssetLoader::list_embedded(), vec![CATALOG_ASSET.to_string()]);
    }

    #[test]
    fn test_embedded_folder_holds_only_catalogs() {
        let files: Vec<_> = EmbeddedCatalog::iter().collect();
        assert!(!files.is_empty());
        assert!(files.iter().all(|f| f.ends_with(".yaml") && !f.contains('/')), "{files:?}");
    }

    #[test]
    fn test_missing_file_falls_back_to_embedded() {
        let loader = AssetLoader::new(Some(PathBuf::from("/nonexistent/catalog.yaml")));
        assert_eq!(loader.catalog_source(), CatalogSource::Embedded);
        assert!(loader.read_catalog().is_ok());
    }

    #[test]
    fn test_source_display() {
        assert_eq!(CatalogSource::Embedded.to_string(), "embedded");
        assert_eq!(
            CatalogSource::File(PathBuf::from("/tmp/c.yaml")).to_string(),
            "/tmp/c.yaml"
        );
    }
}
