use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use whisperfy::application::ports::{FetchError, MediaFetcher};
use whisperfy::infrastructure::fetch::HttpMediaFetcher;

const MEDIA_BYTES: &[u8] = b"ID3 not really an mp3 but close enough";

async fn start_file_host() -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new()
        .route("/media/talk.mp3", get(|| async { MEDIA_BYTES }))
        .route("/media/noext", get(|| async { MEDIA_BYTES }))
        .route(
            "/media/missing.mp3",
            get(|| async { (StatusCode::NOT_FOUND, "gone").into_response() }),
        )
        .route("/media/huge.wav", get(|| async { vec![0u8; 4096] }))
        .route(
            "/media/slow.mp3",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                MEDIA_BYTES
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn files_in(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[tokio::test]
async fn given_reachable_file_when_fetching_then_stages_bytes_with_url_extension() {
    let (base_url, shutdown_tx) = start_file_host().await;
    let dir = tempfile::tempdir().unwrap();
    let fetcher = HttpMediaFetcher::new(dir.path().to_path_buf()).unwrap();

    let staged = fetcher
        .fetch(&format!("{}/media/talk.mp3", base_url))
        .await
        .unwrap();

    let path = staged.path().unwrap().to_path_buf();
    assert_eq!(path.extension().unwrap(), "mp3");
    assert!(path.starts_with(dir.path()));
    assert_eq!(std::fs::read(&path).unwrap(), MEDIA_BYTES);
    assert_eq!(staged.size_bytes(), MEDIA_BYTES.len() as u64);
    assert_eq!(staged.source_url(), format!("{}/media/talk.mp3", base_url));

    drop(staged);
    assert!(!path.exists());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_url_without_extension_when_fetching_then_uses_fallback_extension() {
    let (base_url, shutdown_tx) = start_file_host().await;
    let dir = tempfile::tempdir().unwrap();
    let fetcher = HttpMediaFetcher::new(dir.path().to_path_buf())
        .unwrap()
        .with_fallback_extension(".webm");

    let staged = fetcher
        .fetch(&format!("{}/media/noext", base_url))
        .await
        .unwrap();

    assert_eq!(staged.path().unwrap().extension().unwrap(), "webm");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_concurrent_fetches_of_same_url_when_staging_then_paths_are_distinct() {
    let (base_url, shutdown_tx) = start_file_host().await;
    let dir = tempfile::tempdir().unwrap();
    let fetcher = HttpMediaFetcher::new(dir.path().to_path_buf()).unwrap();
    let url = format!("{}/media/talk.mp3", base_url);

    let (a, b) = tokio::join!(fetcher.fetch(&url), fetcher.fetch(&url));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a.path().unwrap(), b.path().unwrap());
    assert_eq!(files_in(dir.path()), 2);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_non_success_status_when_fetching_then_returns_status_and_leaves_nothing() {
    let (base_url, shutdown_tx) = start_file_host().await;
    let dir = tempfile::tempdir().unwrap();
    let fetcher = HttpMediaFetcher::new(dir.path().to_path_buf()).unwrap();

    let result = fetcher
        .fetch(&format!("{}/media/missing.mp3", base_url))
        .await;

    assert!(matches!(result, Err(FetchError::Status(404))));
    assert_eq!(files_in(dir.path()), 0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_file_over_limit_when_fetching_then_rejects_and_removes_partial_file() {
    let (base_url, shutdown_tx) = start_file_host().await;
    let dir = tempfile::tempdir().unwrap();
    let fetcher = HttpMediaFetcher::new(dir.path().to_path_buf())
        .unwrap()
        .with_max_bytes(1024);

    let result = fetcher
        .fetch(&format!("{}/media/huge.wav", base_url))
        .await;

    assert!(matches!(
        result,
        Err(FetchError::TooLarge { limit_bytes: 1024 })
    ));
    assert_eq!(files_in(dir.path()), 0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_slow_host_when_timeout_elapses_then_returns_timeout_and_leaves_nothing() {
    let (base_url, shutdown_tx) = start_file_host().await;
    let dir = tempfile::tempdir().unwrap();
    let fetcher = HttpMediaFetcher::new(dir.path().to_path_buf())
        .unwrap()
        .with_timeout(Duration::from_millis(100));

    let result = fetcher
        .fetch(&format!("{}/media/slow.mp3", base_url))
        .await;

    assert!(matches!(result, Err(FetchError::Timeout(_))));
    assert_eq!(files_in(dir.path()), 0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_non_http_scheme_when_fetching_then_rejects_as_invalid_url() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = HttpMediaFetcher::new(dir.path().to_path_buf()).unwrap();

    let result = fetcher.fetch("file:///etc/passwd").await;

    assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
}

#[tokio::test]
async fn given_unparseable_url_when_fetching_then_rejects_as_invalid_url() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = HttpMediaFetcher::new(dir.path().to_path_buf()).unwrap();

    let result = fetcher.fetch("not a url").await;

    assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
}
