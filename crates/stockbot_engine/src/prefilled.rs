use std::path::PathBuf;

use futures_util::StreamExt;
use stockbot_core::{parse_prefilled, PrefilledStock};
use stockbot_logging::bot_info;
use url::Url;

use crate::settings::FetchSettings;
use crate::types::LoadError;

/// Where the prefilled stock list lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefilledSource {
    File(PathBuf),
    Url(Url),
}

impl PrefilledSource {
    /// `http(s)://` strings become URLs; anything else is a file path.
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::File(PathBuf::from(raw)),
        }
    }
}

impl Default for PrefilledSource {
    fn default() -> Self {
        Self::File(PathBuf::from("data/prefilled_stocks.json"))
    }
}

#[async_trait::async_trait]
pub trait PrefilledLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<PrefilledStock>, LoadError>;
}

#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl PrefilledLoader for FileLoader {
    async fn load(&self) -> Result<Vec<PrefilledStock>, LoadError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(parse_prefilled(&text)?)
    }
}

#[derive(Debug, Clone)]
pub struct HttpLoader {
    url: Url,
    settings: FetchSettings,
}

impl HttpLoader {
    pub fn new(url: Url, settings: FetchSettings) -> Self {
        Self { url, settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, LoadError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl PrefilledLoader for HttpLoader {
    async fn load(&self) -> Result<Vec<PrefilledStock>, LoadError> {
        let client = self.build_client()?;
        let response = client
            .get(self.url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus(status.as_u16()));
        }

        let max_bytes = self.settings.max_bytes;
        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(LoadError::TooLarge { max_bytes });
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if body.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(LoadError::TooLarge { max_bytes });
            }
            body.extend_from_slice(&chunk);
        }

        let text = String::from_utf8_lossy(&body);
        Ok(parse_prefilled(&text)?)
    }
}

/// Load the prefilled list from whichever source is configured.
pub async fn load_prefilled(
    source: &PrefilledSource,
    settings: &FetchSettings,
) -> Result<Vec<PrefilledStock>, LoadError> {
    let stocks = match source {
        PrefilledSource::File(path) => FileLoader::new(path.clone()).load().await?,
        PrefilledSource::Url(url) => HttpLoader::new(url.clone(), settings.clone()).load().await?,
    };
    bot_info!("loaded {} prefilled stock(s) from {:?}", stocks.len(), source);
    Ok(stocks)
}

fn map_reqwest_error(err: reqwest::Error) -> LoadError {
    if err.is_timeout() {
        return LoadError::Timeout;
    }
    LoadError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_strings_become_urls() {
        assert!(matches!(
            PrefilledSource::parse("https://example.com/data/prefilled_stocks.json"),
            PrefilledSource::Url(_)
        ));
        assert_eq!(
            PrefilledSource::parse("data/stocks.json"),
            PrefilledSource::File(PathBuf::from("data/stocks.json"))
        );
    }

    #[test]
    fn windows_drive_paths_stay_files() {
        assert!(matches!(
            PrefilledSource::parse("C:\\data\\stocks.json"),
            PrefilledSource::File(_)
        ));
    }
}
