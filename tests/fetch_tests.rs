//! End-to-end webpage fetch runs against a local mock server.

use agentlab::fetch::{run_fetch, sanitize_filename, FetchOptions, Worklist, DEFAULT_USER_AGENT};
use chrono::Local;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<html><head><title>t</title><script>var x = 1;</script></head>
<body>
  <nav>Home | About</nav>
  <article>
    <h1>Core lead</h1>
    <p>Rotate   the hips
       before the arm.</p>
    <ul><li>Load the legs</li><li>Unwind</li></ul>
  </article>
  <footer>(c) 2025</footer>
</body></html>"#;

fn options(dir: &Path) -> FetchOptions {
    FetchOptions {
        config: dir.join("weblinks.yml"),
        output_dir: dir.join("pages"),
        timeout: Duration::from_secs(5),
        user_agent: DEFAULT_USER_AGENT.to_string(),
    }
}

#[tokio::test]
async fn test_fetch_run_moves_successes_and_keeps_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let good = format!("{}/article", server.uri());
    let bad = format!("{}/broken", server.uri());

    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path());
    std::fs::write(
        &opts.config,
        format!(
            "notes: keep me\nto_be_fetched:\n  - {good}\n  - mailto:someone@example.com\n  - {bad}\nfetched:\n  - https://already.example\n"
        ),
    )
    .unwrap();

    let summary = run_fetch(&opts).await.unwrap();

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.remaining, 1);
    assert_eq!(summary.total_fetched, 2);

    let saved = std::fs::read_to_string(&opts.config).unwrap();
    let worklist = Worklist::parse(&saved).unwrap();
    assert_eq!(worklist.to_be_fetched, vec![bad]);
    assert_eq!(
        worklist.fetched,
        vec!["https://already.example".to_string(), good.clone()]
    );
    assert!(saved.starts_with("to_be_fetched:"));
    assert!(saved.contains("notes: keep me"));

    let page = opts
        .output_dir
        .join(Local::now().format("%Y-%m-%d").to_string())
        .join(sanitize_filename(&good));
    let markdown = std::fs::read_to_string(page).unwrap();
    assert!(markdown.starts_with(&format!("# Content from: {good}\n\nSource URL: `{good}`\n")));
    assert!(markdown.contains("Core lead\n\nRotate the hips before the arm.\n\n- Load the legs\n\n- Unwind"));
    assert!(!markdown.contains("Home | About"));
    assert!(!markdown.contains("var x"));
}

#[tokio::test]
async fn test_missing_worklist_is_created_empty() {
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path());

    let summary = run_fetch(&opts).await.unwrap();

    assert_eq!(summary.attempted, 0);
    assert_eq!(summary.total_fetched, 0);
    let created = Worklist::parse(&std::fs::read_to_string(&opts.config).unwrap()).unwrap();
    assert!(created.to_be_fetched.is_empty());
    assert!(created.fetched.is_empty());
}

#[tokio::test]
async fn test_url_retried_in_same_run_ends_only_in_fetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .mount(&server)
        .await;

    let url = format!("{}/flaky", server.uri());
    let dir = tempfile::tempdir().unwrap();
    let opts = options(dir.path());
    std::fs::write(
        &opts.config,
        format!("to_be_fetched:\n  - {url}\n  - {url}\nfetched: []\n"),
    )
    .unwrap();

    let summary = run_fetch(&opts).await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.remaining, 0);

    let worklist = Worklist::parse(&std::fs::read_to_string(&opts.config).unwrap()).unwrap();
    assert!(worklist.to_be_fetched.is_empty());
    assert_eq!(worklist.fetched, vec![url]);
}
