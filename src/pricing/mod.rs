//! Weekly salary data: the remote salary API and the bundled seed file.

pub mod seed;
pub mod types;

use crate::core::http::api_key_header_map;
use crate::storage::models::PricingRecord;
use crate::{Result, Season, Week};
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

pub use seed::{load_seed_file, SeedBatch};
pub use types::{parse_salary, parse_salary_response};

/// Source of one slate's salaries.
#[async_trait]
pub trait PricingProvider: Send + Sync {
    /// Skill-position salaries for a week. Opponent codes are returned raw.
    async fn salaries(&self, season: Season, week: Week) -> Result<Vec<PricingRecord>>;
}

/// `GET {base_url}/salaries?season=&week=` with an optional `x-api-key`.
#[derive(Debug, Clone)]
pub struct SalaryApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl SalaryApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl PricingProvider for SalaryApiClient {
    async fn salaries(&self, season: Season, week: Week) -> Result<Vec<PricingRecord>> {
        let url = format!("{}/salaries", self.base_url);
        let params = [
            ("season", season.as_u16().to_string()),
            ("week", week.as_u16().to_string()),
        ];
        info!("Fetching salaries for {} week {}", season, week);

        let body = self
            .client
            .get(&url)
            .headers(api_key_header_map(self.api_key.as_deref())?)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_salary_response(&body, season, week)
    }
}
