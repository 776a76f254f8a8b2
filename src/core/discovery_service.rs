use crate::core::credential_resolver::RdsClientResolver;
use crate::core::error::DiscoveryError;
use crate::core::inventory_mapper::discover_targets;
use crate::core::types::{ClientSelector, DiscoveryRecord};
use tracing::debug;

pub(crate) struct DiscoveryService {
    resolver: RdsClientResolver,
}

impl DiscoveryService {
    pub(crate) fn new(resolver: RdsClientResolver) -> Self {
        Self { resolver }
    }

    pub(crate) async fn discover(
        &self,
        selector: &ClientSelector,
    ) -> Result<Vec<DiscoveryRecord>, DiscoveryError> {
        let client = self.resolver.resolve(selector).await?;
        let records = discover_targets(client.as_ref()).await?;
        debug!(?selector, targets = records.len(), "RDS discovery completed.");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::aws::tests::mock_providers::{
        DEFAULT_ACCOUNT_MARKER, MockAwsClientFactory,
    };
    use crate::core::credential_cache::CredentialCache;
    use crate::ports::AwsClientFactory;
    use assert_matches::assert_matches;
    use std::sync::Arc;
    use std::time::Duration;

    fn service(factory: &Arc<MockAwsClientFactory>) -> DiscoveryService {
        DiscoveryService::new(RdsClientResolver::new(
            Arc::clone(factory) as Arc<dyn AwsClientFactory>,
            Arc::new(CredentialCache::new(1024, Duration::from_secs(600))),
            "PrometheusRdsServiceDisocvery".to_string(),
        ))
    }

    #[tokio::test]
    async fn test_default_identity_lists_default_account() {
        let factory = Arc::new(MockAwsClientFactory::new());
        let records = service(&factory)
            .discover(&ClientSelector::Default)
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].labels["__meta_rds_instance_id"],
            DEFAULT_ACCOUNT_MARKER
        );
    }

    #[tokio::test]
    async fn test_assumed_role_lists_target_account() {
        let factory = Arc::new(MockAwsClientFactory::new());
        let records = service(&factory)
            .discover(&ClientSelector::AssumedRole(
                "arn:aws:iam::111111111111:role/sd".to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_ne!(
            records[0].labels["__meta_rds_instance_id"],
            DEFAULT_ACCOUNT_MARKER
        );
    }

    #[tokio::test]
    async fn test_authorization_failure_is_reported() {
        let factory = Arc::new(MockAwsClientFactory::new());
        factory.fail_role("arn:aws:iam::111111111111:role/sd");

        let err = service(&factory)
            .discover(&ClientSelector::AssumedRole(
                "arn:aws:iam::111111111111:role/sd".to_string(),
            ))
            .await
            .unwrap_err();
        assert_matches!(err, DiscoveryError::Authorization(_));
    }
}
