use crate::config::models::AppConfig;
use crate::core::error::{AuthorizationError, ConfigError, InventoryError};
use crate::core::types::{AwsCredentials, ClusterDescriptor, InstanceDescriptor};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// RDS control-plane calls made on behalf of one identity.
#[async_trait]
pub(crate) trait RdsInventoryPort: Send + Sync {
    async fn describe_db_clusters(&self) -> Result<Vec<ClusterDescriptor>, InventoryError>;

    async fn describe_db_instances(&self) -> Result<Vec<InstanceDescriptor>, InventoryError>;
}

pub(crate) type AuthorizedRdsClient = Arc<dyn RdsInventoryPort>;

#[async_trait]
pub(crate) trait AwsClientFactory: Send + Sync {
    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
    ) -> Result<AwsCredentials, AuthorizationError>;

    fn new_client(&self, credentials: &AwsCredentials) -> AuthorizedRdsClient;

    fn default_client(&self) -> AuthorizedRdsClient;
}

pub(crate) trait ConfigurationStore: Send + Sync {
    fn load_app_config_file(&self, path: &Path) -> Result<AppConfig, ConfigError>;
    fn get_default_config_path(&self) -> PathBuf;
}
