use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport seam for [`crate::nasa::NasaClient`]: production code goes
/// through [`super::BasicClient`], tests inject a fake.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
