use std::fs;
use std::time::Duration;

use stockbot_core::PrefilledError;
use stockbot_engine::{
    load_prefilled, FetchSettings, FileLoader, HttpLoader, LoadError, PrefilledLoader,
    PrefilledSource,
};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STOCKS: &str = r#"[
    {"isin": "INE002A01018", "code": "RELIANCE", "name": "Reliance Industries"},
    {"isin": "INE467B01029", "code": "TCS"}
]"#;

#[tokio::test]
async fn file_loader_reads_records() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("prefilled_stocks.json");
    fs::write(&file, STOCKS).unwrap();

    let stocks = FileLoader::new(&file).load().await.unwrap();

    assert_eq!(stocks.len(), 2);
    assert_eq!(stocks[0].name.as_deref(), Some("Reliance Industries"));
    assert_eq!(stocks[1].code, "TCS");
    assert_eq!(stocks[1].name, None);
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let source = PrefilledSource::File(temp.path().join("absent.json"));

    let err = load_prefilled(&source, &FetchSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Io { .. }));
}

#[tokio::test]
async fn malformed_file_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("broken.json");
    fs::write(&file, "[{\"isin\": ").unwrap();

    let err = FileLoader::new(&file).load().await.unwrap_err();

    assert!(matches!(err, LoadError::Parse(PrefilledError::Json(_))));
}

#[tokio::test]
async fn http_loader_fetches_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/prefilled_stocks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(STOCKS, "application/json"))
        .mount(&server)
        .await;

    let raw = format!("{}/data/prefilled_stocks.json", server.uri());
    let source = PrefilledSource::parse(&raw);
    assert!(matches!(source, PrefilledSource::Url(_)));

    let stocks = load_prefilled(&source, &FetchSettings::default())
        .await
        .unwrap();
    assert_eq!(stocks.len(), 2);
    assert_eq!(stocks[0].isin, "INE002A01018");
}

#[tokio::test]
async fn http_loader_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/missing.json", server.uri())).unwrap();
    let err = HttpLoader::new(url, FetchSettings::default())
        .load()
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::HttpStatus(404)));
}

#[tokio::test]
async fn http_loader_rejects_oversized_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/big.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(STOCKS, "application/json"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 16,
        ..FetchSettings::default()
    };
    let url = Url::parse(&format!("{}/big.json", server.uri())).unwrap();
    let err = HttpLoader::new(url, settings).load().await.unwrap_err();

    assert!(matches!(err, LoadError::TooLarge { max_bytes: 16 }));
}

#[tokio::test]
async fn http_loader_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw(STOCKS, "application/json"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let url = Url::parse(&format!("{}/slow.json", server.uri())).unwrap();
    let err = HttpLoader::new(url, settings).load().await.unwrap_err();

    assert!(matches!(err, LoadError::Timeout));
}
