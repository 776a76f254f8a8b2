use crate::adapters::aws::rds_inventory::RdsSdkInventoryClient;
use crate::core::error::AuthorizationError;
use crate::core::types::AwsCredentials;
use crate::ports::{AuthorizedRdsClient, AwsClientFactory};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds RDS clients for the process identity and for assumed roles.
pub(crate) struct AwsSdkClientFactory {
    sdk_config: SdkConfig,
    sts_client: aws_sdk_sts::Client,
    default_client: AuthorizedRdsClient,
}

impl AwsSdkClientFactory {
    pub(crate) async fn from_default_chain(region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let sdk_config = loader.load().await;
        info!(
            region = ?sdk_config.region().map(|r| r.to_string()),
            "Loaded AWS SDK configuration from the default credential chain."
        );
        Self::from_sdk_config(sdk_config)
    }

    pub(crate) fn from_sdk_config(sdk_config: SdkConfig) -> Self {
        let sts_client = aws_sdk_sts::Client::new(&sdk_config);
        let default_client: AuthorizedRdsClient = Arc::new(RdsSdkInventoryClient::new(
            aws_sdk_rds::Client::new(&sdk_config),
        ));
        Self {
            sdk_config,
            sts_client,
            default_client,
        }
    }
}

pub(crate) fn credentials_from_sts(sts_creds: aws_sdk_sts::types::Credentials) -> AwsCredentials {
    let expiry_system_time = std::time::UNIX_EPOCH
        + std::time::Duration::from_secs_f64(sts_creds.expiration.as_secs_f64().max(0.0));

    AwsCredentials::new(
        sts_creds.access_key_id,
        sts_creds.secret_access_key,
        Some(sts_creds.session_token),
        Some(expiry_system_time),
        "AssumeRoleProvider",
    )
}

#[async_trait]
impl AwsClientFactory for AwsSdkClientFactory {
    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
    ) -> Result<AwsCredentials, AuthorizationError> {
        let output = self
            .sts_client
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .send()
            .await
            .map_err(|e| AuthorizationError::AssumeRole {
                role_arn: role_arn.to_string(),
                source: Box::new(e),
            })?;

        let sts_creds = output
            .credentials
            .ok_or_else(|| AuthorizationError::MissingCredentials {
                role_arn: role_arn.to_string(),
            })?;
        let credentials = credentials_from_sts(sts_creds);
        debug!(
            role_arn,
            expiry = ?credentials.expiry(),
            "Received temporary credentials from STS."
        );
        Ok(credentials)
    }

    fn new_client(&self, credentials: &AwsCredentials) -> AuthorizedRdsClient {
        let provider = SharedCredentialsProvider::new(credentials.clone());
        let rds_config = self
            .sdk_config
            .to_builder()
            .credentials_provider(provider)
            .build();
        Arc::new(RdsSdkInventoryClient::new(aws_sdk_rds::Client::new(
            &rds_config,
        )))
    }

    fn default_client(&self) -> AuthorizedRdsClient {
        Arc::clone(&self.default_client)
    }
}
