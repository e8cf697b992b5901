//! JSON file site store
//!
//! All site records live in one file, `{"sites": [...]}`, cached in memory after
//! the first read. Every save rewrites the file through a temp file + rename so
//! a crash never leaves it half written.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domain_provisioner_core::error::{CoreError, CoreResult};
use domain_provisioner_core::traits::SiteStore;
use domain_provisioner_core::types::SiteRecord;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

const MAX_STORE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

#[derive(Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    sites: Vec<SiteRecord>,
}

pub struct JsonFileSiteStore {
    path: PathBuf,
    /// None until first load
    cache: RwLock<Option<Vec<SiteRecord>>>,
}

impl JsonFileSiteStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_from_file(&self) -> CoreResult<Vec<SiteRecord>> {
        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Site store {} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(CoreError::StorageError(format!(
                    "Failed to read site store metadata: {e}"
                )));
            }
        };

        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "Site store too large: {} bytes (max: {MAX_STORE_FILE_SIZE} bytes)",
                metadata.len()
            )));
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to read site store: {e}")))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let file: StoreFile = serde_json::from_str(&content)
            .map_err(|e| CoreError::StorageError(format!("Invalid site store format: {e}")))?;
        Ok(file.sites)
    }

    async fn write_to_file(&self, sites: &[SiteRecord]) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(&StoreFile {
            sites: sites.to_vec(),
        })
        .map_err(|e| CoreError::StorageError(format!("Failed to serialize sites: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CoreError::StorageError(format!("Failed to create store directory: {e}"))
            })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to write site store: {e}")))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to replace site store: {e}")))
    }

    async fn all(&self) -> CoreResult<Vec<SiteRecord>> {
        {
            let cache = self.cache.read().await;
            if let Some(ref sites) = *cache {
                return Ok(sites.clone());
            }
        }

        let mut cache = self.cache.write().await;
        if let Some(ref sites) = *cache {
            return Ok(sites.clone());
        }
        let sites = self.load_from_file().await?;
        *cache = Some(sites.clone());
        Ok(sites)
    }
}

#[async_trait]
impl SiteStore for JsonFileSiteStore {
    async fn find_by_slug(&self, slug: &str) -> CoreResult<Option<SiteRecord>> {
        Ok(self.all().await?.into_iter().find(|s| s.slug == slug))
    }

    async fn save(&self, site: &SiteRecord) -> CoreResult<()> {
        let mut cache = self.cache.write().await;
        let mut sites = match cache.take() {
            Some(sites) => sites,
            None => self.load_from_file().await?,
        };

        if let Some(pos) = sites.iter().position(|s| s.slug == site.slug) {
            sites[pos] = site.clone();
        } else {
            sites.push(site.clone());
        }

        let written = self.write_to_file(&sites).await;
        // on failure the cache stays empty and the next read reloads the file
        if written.is_ok() {
            *cache = Some(sites);
            tracing::debug!("Site {} saved", site.slug);
        }
        written
    }

    async fn find_awaiting_provisioning(&self) -> CoreResult<Vec<SiteRecord>> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(SiteRecord::awaiting_provisioning)
            .collect())
    }
}
