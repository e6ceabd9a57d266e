use crate::config::{Config, ProviderKind};
use crate::domain::ports::MarketDataService;
use crate::infrastructure::mock::MockMarketDataService;
use crate::infrastructure::yahoo::YahooMarketDataService;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create_market_data_service(config: &Config) -> Result<Arc<dyn MarketDataService>> {
        match config.provider {
            ProviderKind::Mock => {
                info!("ServiceFactory: Using mock market data (synthetic, offline)");
                Ok(Arc::new(MockMarketDataService::demo(&config.benchmark_symbol)))
            }
            ProviderKind::Yahoo => {
                info!(
                    "ServiceFactory: Using Yahoo Finance market data at {}",
                    config.yahoo_base_url
                );
                Ok(Arc::new(YahooMarketDataService::from_config(config)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::Market;

    #[tokio::test]
    async fn test_mock_provider_serves_demo_universe() {
        let config = Config {
            provider: ProviderKind::Mock,
            ..Config::default()
        };
        let service = ServiceFactory::create_market_data_service(&config).unwrap();
        let universe = service.get_universe(Market::Mex).await.unwrap();
        assert_eq!(universe, Market::Mex.fallback_universe());
    }

    #[test]
    fn test_yahoo_provider_builds() {
        let service = ServiceFactory::create_market_data_service(&Config::default());
        assert!(service.is_ok());
    }
}
