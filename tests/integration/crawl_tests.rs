//! Integration tests for the crawler
//!
//! These tests use wiremock to serve Discuz-style thread pages and run the
//! full crawl cycle end-to-end against a temporary archive directory.

use forum_ripple::config::{parse_seeds, Config};
use forum_ripple::crawler::{crawl, HttpCoordinator};
use forum_ripple::Origin;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration archiving into `archive_dir`
fn create_test_config(archive_dir: &Path, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config.http.image_timeout_secs = 5;
    config.output.archive_dir = archive_dir.display().to_string();
    config
}

/// Renders a thread page: `(poster, op badge, body)` per post
fn thread_page(title: &str, posts: &[(&str, bool, &str)], pagination: &[&str]) -> String {
    let mut html = format!(
        r#"<html><head><title>{title} - Test Forum</title></head><body>
        <h1 class="ts"><span id="thread_subject">{title}</span></h1>"#
    );

    if !pagination.is_empty() {
        html.push_str(r#"<div class="pgs cl"><div class="pg"><strong>1</strong>"#);
        for (i, href) in pagination.iter().enumerate() {
            html.push_str(&format!(r#"<a href="{}">{}</a>"#, href, i + 2));
        }
        html.push_str("</div></div>");
    }

    for (name, marker, body) in posts {
        let em = if *marker { "<em>楼主</em>" } else { "" };
        html.push_str(&format!(
            r#"<table class="plhin"><tr>
            <td class="pls"><div class="authi"><a class="xw1" href="home.php">{name}</a></div></td>
            <td class="plc"><div class="authi">{em}</div><table><tr><td class="t_f">{body}</td></tr></table></td>
            </tr></table>"#
        ));
    }

    html.push_str("</body></html>");
    html
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn read_posts(dir: &TempDir, title: &str) -> String {
    fs::read_to_string(dir.path().join(title).join("op_posts.txt"))
        .expect("original poster text was written")
}

#[tokio::test]
async fn test_alice_scenario() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let external_link = format!(r#"<a href="{}/thread-7-1-1.html">elsewhere</a>"#, external.uri());
    let first_post = format!(
        r#"Day one. <a href="thread-2-1-1.html">part two</a> {}"#,
        external_link
    );
    mount_page(
        &server,
        "/thread-1-1-1.html",
        thread_page(
            "Travel log",
            &[
                ("Alice", true, &first_post),
                ("Bob", false, r#"Nice! <a href="thread-3-1-1.html">mine</a>"#),
                ("Alice", false, r#"Day two. <img src="data/attachment/day2.jpg">"#),
            ],
            &[],
        ),
    )
    .await;
    mount_page(
        &server,
        "/thread-2-1-1.html",
        thread_page("Travel log part two", &[("Alice", true, "The end.")], &[]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/data/attachment/day2.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/thread-3-1-1.html"))
        .respond_with(html(thread_page("Bob's thread", &[("Bob", true, "x")], &[])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html(thread_page("External", &[("Eve", true, "x")], &[])))
        .expect(0)
        .mount(&external)
        .await;

    let config = create_test_config(dir.path(), 3);
    let seeds = parse_seeds(&format!("# seeds\n{}/thread-1-1-1.html\n", server.uri()));
    let report = crawl(&config, &seeds).await.unwrap();

    let text = read_posts(&dir, "Travel log");
    assert!(text.starts_with("------ OP post 1 ------\nDay one."));
    assert!(text.contains("------ OP post 2 ------\nDay two."));
    assert!(!text.contains("Nice!"));
    assert_eq!(
        fs::read(dir.path().join("Travel log").join("img_1.jpg")).unwrap(),
        b"jpeg-bytes"
    );

    assert!(read_posts(&dir, "Travel log part two").contains("The end."));
    assert_eq!(report.threads_archived, 2);
    assert_eq!(report.posts_saved, 3);
    assert_eq!(report.images_saved, 1);
}

#[tokio::test]
async fn test_partial_page_failure_keeps_page_order() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let pagination = ["thread-5-2-1.html", "thread-5-3-1.html"];

    mount_page(
        &server,
        "/thread-5-1-1.html",
        thread_page("Long thread", &[("Alice", true, "page one text")], &pagination),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/thread-5-2-1.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/thread-5-3-1.html",
        thread_page(
            "Long thread",
            &[("Carol", false, "reply"), ("Alice", false, "page three text")],
            &pagination,
        ),
    )
    .await;

    let config = create_test_config(dir.path(), 0);
    let seeds = parse_seeds(&format!("{}/thread-5-1-1.html", server.uri()));
    let report = crawl(&config, &seeds).await.unwrap();

    let text = read_posts(&dir, "Long thread");
    let one = text.find("page one text").unwrap();
    let three = text.find("page three text").unwrap();
    assert!(one < three);
    assert!(!text.contains("reply"));
    assert_eq!(report.threads_archived, 1);
    assert_eq!(report.threads_partial, 1);
    assert_eq!(report.pages_failed, 1);
}

#[tokio::test]
async fn test_thread_without_author_writes_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/thread-8-1-1.html",
        r#"<html><head><title>Deleted</title></head><body>
        <div class="alert_error">This thread was removed.</div>
        <a href="thread-9-1-1.html">other</a></body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/thread-9-1-1.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(dir.path(), 3);
    let seeds = parse_seeds(&format!("{}/thread-8-1-1.html", server.uri()));
    let report = crawl(&config, &seeds).await.unwrap();

    assert_eq!(report.threads_abandoned, 1);
    assert_eq!(report.threads_archived, 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_self_link_fetched_once() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/thread-4-1-1.html"))
        .respond_with(html(thread_page(
            "Loop",
            &[("Dana", true, r#"back to <a href="thread-4-1-1.html#pid9">top</a>"#)],
            &[],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(dir.path(), 3);
    let origin = Origin::of(&url::Url::parse(&server.uri()).unwrap());
    let mut coordinator = HttpCoordinator::from_config(&config, origin).unwrap();
    let seed = url::Url::parse(&format!("{}/thread-4-1-1.html", server.uri())).unwrap();

    let report = coordinator.run(&[seed.clone()]).await;

    assert_eq!(report.threads_archived, 1);
    assert_eq!(report.threads_skipped, 1);
    assert!(coordinator.registry().contains(&seed));
    assert!(read_posts(&dir, "Loop").contains("back to"));
}

#[tokio::test]
async fn test_depth_limit_stops_recursion() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    for n in 1..=3 {
        let body = format!(r#"next: <a href="thread-{}-1-1.html">go</a>"#, n + 1);
        Mock::given(method("GET"))
            .and(path(format!("/thread-{}-1-1.html", n)))
            .respond_with(html(thread_page(
                &format!("Chain {}", n),
                &[("Erin", true, &body)],
                &[],
            )))
            .expect(if n <= 2 { 1 } else { 0 })
            .mount(&server)
            .await;
    }

    let config = create_test_config(dir.path(), 1);
    let seeds = parse_seeds(&format!("{}/thread-1-1-1.html", server.uri()));
    let report = crawl(&config, &seeds).await.unwrap();

    assert_eq!(report.threads_archived, 2);
    assert_eq!(report.threads_depth_exceeded, 1);
    assert_eq!(report.max_depth_reached, 1);
    assert!(dir.path().join("Chain 2").exists());
    assert!(!dir.path().join("Chain 3").exists());
}

#[tokio::test]
async fn test_failed_image_does_not_stop_archiving() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/thread-6-1-1.html",
        thread_page(
            "Gallery: 1/2",
            &[(
                "Frank",
                true,
                r#"<img src="a.png"><img file="missing.gif" src="static/none.gif"><img zoomfile="c.webp">"#,
            )],
            &[],
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"a".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/c.webp"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"c".to_vec()))
        .mount(&server)
        .await;

    let config = create_test_config(dir.path(), 0);
    let seeds = parse_seeds(&format!("{}/thread-6-1-1.html", server.uri()));
    let report = crawl(&config, &seeds).await.unwrap();

    let folder = dir.path().join("Gallery_ 1_2");
    assert!(folder.join("op_posts.txt").exists());
    assert_eq!(report.images_saved, 2);
    assert_eq!(report.images_failed, 1);
    assert_eq!(report.threads_archived, 1);
}

#[tokio::test]
async fn test_gbk_page_declared_in_meta() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let page = thread_page("游记", &[("小明", true, "第一天 楼主更新")], &[]).replace(
        "<head>",
        r#"<head><meta http-equiv="Content-Type" content="text/html; charset=gbk">"#,
    );
    let (bytes, _, _) = encoding_rs::GBK.encode(&page);
    Mock::given(method("GET"))
        .and(path("/thread-11-1-1.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(bytes.into_owned())
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let config = create_test_config(dir.path(), 0);
    let seeds = parse_seeds(&format!("{}/thread-11-1-1.html", server.uri()));
    let report = crawl(&config, &seeds).await.unwrap();

    assert_eq!(report.threads_archived, 1);
    assert!(read_posts(&dir, "游记").contains("第一天 楼主更新"));
}
