use gosub_navigator::context::BrowsingContext;
use gosub_navigator::dom::Document;
use gosub_navigator::net::{
    CapturedForm, FetchError, Fetcher, FieldKind, FormField, FormValue, HttpFetcher, HttpMethod, Request,
};
use gosub_navigator::screen::{HistoryState, HtmlScreen, RequestScreen, Screen};
use gosub_navigator::{LoadError, NavigatorConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

const OK_PAGE: &str = r#"<html><head><title>OK</title></head><body class="ok"><div id="content">fine</div></body></html>"#;

/// Starts a tiny HTTP/1.1 server on a random local port and returns its base url.
async fn serve() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(handle(stream));
        }
    });
    Url::parse(&format!("http://{addr}/")).unwrap()
}

async fn handle(mut stream: TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    let path = target.split('?').next().unwrap_or("/");

    let (status, extra, payload): (&str, Vec<(&str, &str)>, String) = match path {
        "/ok" => ("200 OK", vec![], OK_PAGE.to_string()),
        "/redirect" => ("302 Found", vec![("Location", "/landing")], String::new()),
        "/landing" => ("200 OK", vec![], "<title>Landing</title>landed".to_string()),
        "/missing" => ("404 Not Found", vec![], "not here".to_string()),
        "/echo" => ("200 OK", vec![], format!("{head}{body}")),
        "/canonical" => ("200 OK", vec![("X-Request-URL", "/canonical?from=header")], "canonical".to_string()),
        "/slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            ("200 OK", vec![], "late".to_string())
        }
        _ => ("404 Not Found", vec![], String::new()),
    };

    let mut response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n",
        payload.len()
    );
    for (name, value) in extra {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str("\r\n");
    response.push_str(&payload);

    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn fetcher(config: &NavigatorConfig) -> Arc<dyn Fetcher> {
    Arc::new(HttpFetcher::new(config).unwrap())
}

#[tokio::test]
async fn fetch_reports_status_headers_and_body() {
    let base = serve().await;
    let fetcher = HttpFetcher::new(&NavigatorConfig::default()).unwrap();

    let response = fetcher
        .fetch(Request::new(HttpMethod::Get, base.join("/ok").unwrap()))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.url.path(), "/ok");
    assert_eq!(response.text(), OK_PAGE);
    assert!(response.headers.get("content-type").is_some());
}

#[tokio::test]
async fn fetch_follows_redirects() {
    let base = serve().await;
    let fetcher = HttpFetcher::new(&NavigatorConfig::default()).unwrap();

    let response = fetcher
        .fetch(Request::new(HttpMethod::Get, base.join("/redirect").unwrap()))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.url.path(), "/landing");
}

#[tokio::test]
async fn error_statuses_are_responses() {
    let base = serve().await;
    let fetcher = HttpFetcher::new(&NavigatorConfig::default()).unwrap();

    let response = fetcher
        .fetch(Request::new(HttpMethod::Get, base.join("/missing").unwrap()))
        .await
        .unwrap();
    assert_eq!(response.status, 404);
    assert_eq!(response.status_text, "Not Found");
}

#[tokio::test]
async fn refused_connection_is_a_fetch_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = HttpFetcher::new(&NavigatorConfig::default()).unwrap();
    let url = Url::parse(&format!("http://{addr}/")).unwrap();
    let err = fetcher.fetch(Request::new(HttpMethod::Get, url)).await.unwrap_err();
    assert!(matches!(err, FetchError::Net(_)));
}

#[tokio::test]
async fn request_screen_sends_navigation_headers() {
    let base = serve().await;
    let config = NavigatorConfig::default();
    let ctx = BrowsingContext::new(base.clone());

    let mut screen = RequestScreen::with_config(&config, fetcher(&config));
    let content = screen.load("/echo", &ctx).await.unwrap();
    let echoed = content.to_ascii_lowercase();

    assert!(echoed.starts_with("get /echo "));
    assert!(echoed.contains("x-pjax: true"));
    assert!(echoed.contains("x-requested-with: xmlhttprequest"));
}

#[tokio::test]
async fn request_screen_records_redirect_for_history() {
    let base = serve().await;
    let config = NavigatorConfig::default();
    let ctx = BrowsingContext::new(base.clone());

    let mut screen = RequestScreen::with_config(&config, fetcher(&config));
    let content = screen.load("/redirect", &ctx).await.unwrap();

    assert!(content.contains("landed"));
    assert_eq!(screen.before_update_history_path("/redirect"), "/landing");
    assert_eq!(screen.request_path().as_deref(), Some("/redirect"));
}

#[tokio::test]
async fn request_screen_prefers_request_url_header() {
    let base = serve().await;
    let config = NavigatorConfig::default();
    let ctx = BrowsingContext::new(base.clone());

    let mut screen = RequestScreen::with_config(&config, fetcher(&config));
    screen.load("/canonical", &ctx).await.unwrap();
    assert_eq!(screen.before_update_history_path("/canonical"), "/canonical?from=header");
}

#[tokio::test]
async fn request_screen_classifies_invalid_status() {
    let base = serve().await;
    let config = NavigatorConfig::default();
    let ctx = BrowsingContext::new(base.clone());

    let mut screen = RequestScreen::with_config(&config, fetcher(&config));
    let err = screen.load("/missing", &ctx).await.unwrap_err();
    assert_eq!(err, LoadError::InvalidStatus { status_code: 404 });
    assert_eq!(err.to_string(), "Invalid status code");
    assert_eq!(screen.request().and_then(|r| r.response.as_ref()).map(|r| r.status), Some(404));
}

#[tokio::test]
async fn request_screen_classifies_connection_errors() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = NavigatorConfig::default();
    let ctx = BrowsingContext::new(Url::parse(&format!("http://{addr}/")).unwrap());
    let mut screen = RequestScreen::with_config(&config, fetcher(&config));

    let err = screen.load("/anything", &ctx).await.unwrap_err();
    assert!(err.is_request_error());
    assert!(err.to_string().starts_with("Request error"));
}

#[tokio::test]
async fn request_screen_times_out() {
    let base = serve().await;
    let config = NavigatorConfig::builder().timeout_ms(100).build().unwrap();
    let ctx = BrowsingContext::new(base.clone());

    let mut screen = RequestScreen::with_config(&config, fetcher(&config));
    let err = screen.load("/slow", &ctx).await.unwrap_err();
    assert_eq!(err, LoadError::Timeout { timeout_ms: 100 });
    assert_eq!(err.to_string(), "Request timeout");
}

#[tokio::test]
async fn form_submission_posts_multipart_body() {
    let base = serve().await;
    let config = NavigatorConfig::default();
    let mut ctx = BrowsingContext::new(base.clone());
    ctx.capture_form(
        CapturedForm::new("/echo")
            .field(FormField::text("name", "Ferris"))
            .field(FormField {
                name: "attachment".into(),
                value: FormValue::File {
                    filename: "notes.txt".into(),
                    content_type: "text/plain".into(),
                    data: b"crab notes".to_vec(),
                },
                kind: FieldKind::Value,
                disabled: false,
            })
            .submitted_by(FormField::submit("submitButton", "Send")),
    );

    let mut screen = RequestScreen::with_config(&config, fetcher(&config));
    let content = screen.load("/echo", &ctx).await.unwrap();

    assert!(content.starts_with("POST /echo "));
    assert!(content.to_ascii_lowercase().contains("content-type: multipart/form-data; boundary="));
    assert!(content.contains("name=\"name\"\r\n\r\nFerris"));
    assert!(content.contains("name=\"submitButton\"\r\n\r\nSend"));
    assert!(content.contains("name=\"attachment\"; filename=\"notes.txt\""));
    assert!(content.to_ascii_lowercase().contains("content-type: text/plain\r\n\r\ncrab notes"));
    // fields keep document order with the submitter last
    let name_at = content.find("name=\"name\"").unwrap();
    let file_at = content.find("name=\"attachment\"").unwrap();
    let submit_at = content.find("name=\"submitButton\"").unwrap();
    assert!(name_at < file_at && file_at < submit_at);

    // the server answered the POST in place, so replaying it must not be recorded
    let state = HistoryState::new("/echo", screen.before_update_history_path("/echo"), true);
    assert!(screen.before_update_history_state(state).is_none());
    // posts are never cached
    assert!(screen.cache().get("/echo").is_none());
}

#[tokio::test]
async fn html_screen_flips_fetched_page() {
    let base = serve().await;
    let config = NavigatorConfig::default();
    let ctx = BrowsingContext::new(base.clone());

    let mut document = Document::new();
    document.add_surface("content");

    let mut screen = HtmlScreen::with_config(&config, fetcher(&config));
    screen.load("/ok", &ctx).await.unwrap();
    screen.flip(&mut document);

    assert_eq!(document.title, "OK");
    assert_eq!(document.surface("content").unwrap().inner_html, "fine");
    assert_eq!(document.body.attribute("class"), Some("ok"));
}
