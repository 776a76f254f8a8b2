use crate::core::credential_cache::{CachedRdsClient, CredentialCache};
use crate::core::error::AuthorizationError;
use crate::core::types::ClientSelector;
use crate::ports::{AuthorizedRdsClient, AwsClientFactory};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves the RDS client a discovery request should use.
///
/// Assumed-role clients are cached per role ARN. Concurrent requests for the
/// same uncached role may each call STS; the last one to finish wins the cache
/// slot. Nothing collapses those calls into one.
pub(crate) struct RdsClientResolver {
    client_factory: Arc<dyn AwsClientFactory>,
    credential_cache: Arc<CredentialCache>,
    role_session_name: String,
}

impl RdsClientResolver {
    pub(crate) fn new(
        client_factory: Arc<dyn AwsClientFactory>,
        credential_cache: Arc<CredentialCache>,
        role_session_name: String,
    ) -> Self {
        Self {
            client_factory,
            credential_cache,
            role_session_name,
        }
    }

    pub(crate) async fn resolve(
        &self,
        selector: &ClientSelector,
    ) -> Result<AuthorizedRdsClient, AuthorizationError> {
        match selector {
            ClientSelector::Default => Ok(self.client_factory.default_client()),
            ClientSelector::AssumedRole(role_arn) => self.resolve_assumed_role(role_arn).await,
        }
    }

    async fn resolve_assumed_role(
        &self,
        role_arn: &str,
    ) -> Result<AuthorizedRdsClient, AuthorizationError> {
        if let Some(cached) = self.credential_cache.get(role_arn).await {
            debug!("Using cached RDS client for role: {}", role_arn);
            return Ok(Arc::clone(&cached.client));
        }

        debug!("Attempting to assume role: {}", role_arn);
        let credentials = self
            .client_factory
            .assume_role(role_arn, &self.role_session_name)
            .await?;

        let client = self.client_factory.new_client(&credentials);
        self.credential_cache
            .put(
                role_arn.to_string(),
                CachedRdsClient::new(Arc::clone(&client), credentials),
            )
            .await;
        info!("Successfully assumed role: {}", role_arn);
        Ok(client)
    }
}
