use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use manhwa_fetch::{CrawlerConfig, ManhwaCrawler, RangeInput};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// 记录收到的请求路径和 User-Agent
#[derive(Default)]
struct Seen {
    paths: Vec<String>,
    user_agents: Vec<String>,
}

/// 预设路径的响应方式
enum Route {
    Page(String),
    Status(&'static str),
    /// 接受连接但永不回复
    Hang,
}

/// 在本地端口上按路由响应，未知路径返回 404
async fn serve(routes: HashMap<String, Route>) -> (String, Arc<Mutex<Seen>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Seen::default()));
    let routes = Arc::new(routes);

    let seen_by_server = seen.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let routes = routes.clone();
            let seen = seen_by_server.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&request).to_string();
                let path = request
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();
                let user_agent = request
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("user-agent").then(|| value.trim().to_string())
                    })
                    .unwrap_or_default();
                {
                    let mut seen = seen.lock().unwrap();
                    seen.paths.push(path.clone());
                    seen.user_agents.push(user_agent);
                }

                let (status, body) = match routes.get(&path) {
                    Some(Route::Page(body)) => ("200 OK", body.clone()),
                    Some(Route::Status(status)) => (*status, "<html><body>Error</body></html>".to_string()),
                    Some(Route::Hang) => {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        return;
                    }
                    None => ("404 Not Found", "<html><body>Not Found</body></html>".to_string()),
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (base_url, seen)
}

fn chapter_page(images: &[&str]) -> String {
    let tags: String = images
        .iter()
        .map(|src| format!(r#"<img class="wp-manga-chapter-img" data-src="{}" src="/static/placeholder.gif">"#, src))
        .collect();
    format!(
        r#"<html><body><img src="/static/logo.png"><div class="reading-content">{}</div></body></html>"#,
        tags
    )
}

fn crawler_with_timeout(base_url: &str, timeout: Duration) -> ManhwaCrawler {
    let config = CrawlerConfig::default()
        .with_base_url(base_url)
        .with_chapter_delay(Duration::ZERO)
        .with_timeout(timeout);
    ManhwaCrawler::with_config(config).unwrap()
}

fn crawler(base_url: &str) -> ManhwaCrawler {
    crawler_with_timeout(base_url, Duration::from_secs(5))
}

fn page(path: &str, images: &[&str]) -> (String, Route) {
    (path.to_string(), Route::Page(chapter_page(images)))
}

#[tokio::test]
async fn single_chapter_end_to_end() {
    let images: Vec<String> = (1..=12).map(|i| format!("/uploads/solo/ch1/{:02}.PNG", i)).collect();
    let refs: Vec<&str> = images.iter().map(String::as_str).collect();
    let pages = HashMap::from([page("/webtoon/solo-leveling/chapter-1", &refs)]);
    let (base_url, seen) = serve(pages).await;

    let result = crawler(&base_url)
        .run(&RangeInput::new("Solo Leveling", "1", ""))
        .await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(
        result.constructed_url.as_deref(),
        Some(format!("{}/webtoon/solo-leveling/chapter-1", base_url).as_str())
    );
    let names: Vec<_> = result.images().iter().map(|i| i.name.clone()).collect();
    let expected: Vec<_> = (1..=12)
        .map(|i| format!("solo-leveling_chapter_1_page_{}.png", i))
        .collect();
    assert_eq!(names, expected);
    assert_eq!(
        result.images()[0].url,
        format!("{}/uploads/solo/ch1/01.PNG", base_url)
    );

    let seen = seen.lock().unwrap();
    assert_eq!(seen.paths, vec!["/webtoon/solo-leveling/chapter-1"]);
    assert!(seen.user_agents[0].starts_with("Mozilla/5.0"));
}

#[tokio::test]
async fn range_skips_chapter_that_returns_404() {
    let pages = HashMap::from([
        page(
            "/webtoon/solo-leveling/chapter-5",
            &["https://cdn.example/5/1.jpg", "//cdn.example/5/2.webp"],
        ),
        page("/webtoon/solo-leveling/chapter-7", &["https://cdn.example/7/1.jpeg"]),
    ]);
    let (base_url, seen) = serve(pages).await;

    let result = crawler(&base_url)
        .run(&RangeInput::new("Solo Leveling", "5", "7"))
        .await;

    assert!(result.success);
    assert!(result
        .message
        .as_deref()
        .unwrap()
        .contains("1 chapter(s) in range could not be fetched"));
    let summary: Vec<_> = result
        .images()
        .iter()
        .map(|i| (i.chapter_number, i.name.as_str(), i.url.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (5, "solo-leveling_chapter_5_page_1.jpg", "https://cdn.example/5/1.jpg"),
            (5, "solo-leveling_chapter_5_page_2.webp", "https://cdn.example/5/2.webp"),
            (7, "solo-leveling_chapter_7_page_1.jpeg", "https://cdn.example/7/1.jpeg"),
        ]
    );

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen.paths,
        vec![
            "/webtoon/solo-leveling/chapter-5",
            "/webtoon/solo-leveling/chapter-6",
            "/webtoon/solo-leveling/chapter-7",
        ]
    );
}

#[tokio::test]
async fn unknown_manga_reports_not_found() {
    let (base_url, _) = serve(HashMap::new()).await;

    let result = crawler(&base_url)
        .run(&RangeInput::new("Does Not Exist", "1", "2"))
        .await;

    assert!(!result.success);
    assert!(result.images.is_none());
    assert!(result.error.unwrap().starts_with("No images found for 'Does Not Exist'"));
    assert_eq!(
        result.constructed_url.as_deref(),
        Some("chapters 1–2 for 'Does Not Exist'")
    );
}

#[tokio::test]
async fn server_errors_mid_range_count_as_missing_chapters() {
    let routes = HashMap::from([
        page("/webtoon/abc/chapter-1", &["https://cdn.example/1/1.jpg"]),
        ("/webtoon/abc/chapter-2".to_string(), Route::Status("500 Internal Server Error")),
        ("/webtoon/abc/chapter-3".to_string(), Route::Status("403 Forbidden")),
        page("/webtoon/abc/chapter-4", &["https://cdn.example/4/1.jpg"]),
    ]);
    let (base_url, seen) = serve(routes).await;

    let result = crawler(&base_url).run(&RangeInput::new("abc", "1", "4")).await;

    assert!(result.success);
    assert_eq!(
        result.message.as_deref(),
        Some(
            "Successfully fetched 2 images from 2 chapter(s). \
             2 chapter(s) in range could not be fetched or contained no images."
        )
    );
    let chapters: Vec<_> = result.images().iter().map(|i| i.chapter_number).collect();
    assert_eq!(chapters, vec![1, 4]);
    assert_eq!(seen.lock().unwrap().paths.len(), 4);
}

#[tokio::test]
async fn silent_server_is_cut_off_by_timeout() {
    let routes = HashMap::from([("/webtoon/abc/chapter-1".to_string(), Route::Hang)]);
    let (base_url, _) = serve(routes).await;

    let started = Instant::now();
    let result = crawler_with_timeout(&base_url, Duration::from_millis(200))
        .run(&RangeInput::new("abc", "1", ""))
        .await;

    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(!result.success);
    assert!(result.error.unwrap().starts_with("No images found for 'abc' in chapter 1."));
}
