use crate::diary_entry::DiaryEntry;
use color_eyre::eyre::eyre;
use color_eyre::Result;

/// HTTP source for diary entries. Fetching is the only fallible step in the
/// crate; callers fall back to local data when it fails.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: reqwest::Client,
    url: String,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>) -> Self {
        RemoteSource {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single GET against the configured address, body decoded as a JSON
    /// array of entries. Transport, status and decode failures all surface
    /// as the same `Err`.
    pub async fn fetch(&self) -> Result<Vec<DiaryEntry>> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(eyre!("HTTP {}", response.status()));
        }
        let entries = response.json::<Vec<DiaryEntry>>().await?;
        Ok(entries)
    }
}
