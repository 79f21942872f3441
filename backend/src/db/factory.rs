//! Repository factory for dependency injection.
//!
//! Creates the repository the binary hands to the HTTP state, based on
//! environment variables or a `repository.toml` file.

use log::info;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use super::config::MongoConfig;
use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "mongo-repo")]
use super::repositories::MongoRepository;
use super::repository::{PropertyRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// MongoDB implementation
    Mongo,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("mongo", "mongodb", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variables.
    ///
    /// Reads `REPOSITORY_TYPE`. When unset, defaults to Mongo if `MONGODB_URI`
    /// or `DB_CLUSTER` is present, otherwise Local.
    pub fn from_env() -> Result<Self, String> {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse();
        }

        if std::env::var("MONGODB_URI").is_ok() || std::env::var("DB_CLUSTER").is_ok() {
            Ok(Self::Mongo)
        } else {
            Ok(Self::Local)
        }
    }

    /// True when any of `REPOSITORY_TYPE`, `MONGODB_URI` or `DB_CLUSTER` is set.
    pub fn is_set_in_env() -> bool {
        ["REPOSITORY_TYPE", "MONGODB_URI", "DB_CLUSTER"]
            .iter()
            .any(|key| std::env::var_os(key).is_some())
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```no_run
/// use homenest::db::{RepositoryFactory, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let local = RepositoryFactory::create(RepositoryType::Local, None).await?;
///     assert!(local.health_check().await?);
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `mongo_config` - Connection settings (required for Mongo)
    pub async fn create(
        repo_type: RepositoryType,
        mongo_config: Option<&MongoConfig>,
    ) -> RepositoryResult<Arc<dyn PropertyRepository>> {
        match repo_type {
            RepositoryType::Mongo => {
                let config = mongo_config.ok_or_else(|| {
                    RepositoryError::configuration("Mongo repository requires MongoConfig")
                })?;
                Self::create_mongo(config).await
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Connect to MongoDB.
    #[cfg(feature = "mongo-repo")]
    pub async fn create_mongo(config: &MongoConfig) -> RepositoryResult<Arc<dyn PropertyRepository>> {
        let repo = MongoRepository::connect(config.clone()).await?;
        Ok(Arc::new(repo))
    }

    #[cfg(not(feature = "mongo-repo"))]
    pub async fn create_mongo(config: &MongoConfig) -> RepositoryResult<Arc<dyn PropertyRepository>> {
        let _ = config;
        Err(RepositoryError::configuration(
            "Mongo repository feature not enabled",
        ))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn PropertyRepository> {
        info!("Using in-memory local repository");
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    pub async fn from_env() -> RepositoryResult<Arc<dyn PropertyRepository>> {
        let repo_type = RepositoryType::from_env().map_err(RepositoryError::configuration)?;

        match repo_type {
            RepositoryType::Mongo => {
                let config = MongoConfig::from_env().map_err(RepositoryError::configuration)?;
                Self::create_mongo(&config).await
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn PropertyRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config).await
    }

    /// Create the repository the server runs with.
    ///
    /// Environment variables win when any store variable is set. Otherwise a
    /// `repository.toml` in a standard location is used, and without one the
    /// in-memory store.
    pub async fn from_env_or_default_config() -> RepositoryResult<Arc<dyn PropertyRepository>> {
        Self::from_env_or_config(RepositoryConfig::default_location()).await
    }

    /// Like [`Self::from_env_or_default_config`] with an explicit file candidate.
    pub async fn from_env_or_config(
        config_path: Option<PathBuf>,
    ) -> RepositoryResult<Arc<dyn PropertyRepository>> {
        match config_path {
            Some(path) if !RepositoryType::is_set_in_env() => {
                info!("Loading repository settings from {}", path.display());
                Self::from_config_file(path).await
            }
            _ => Self::from_env().await,
        }
    }

    async fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn PropertyRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        let mongo_config = config.to_mongo_config()?;
        Self::create(repo_type, mongo_config.as_ref()).await
    }
}
