use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use std::time::Duration;

/// A page that does most things right
#[allow(dead_code)]
pub const GOOD_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Rust Web Performance Guide: Faster Pages with Async Rust</title>
  <meta name="description" content="Learn how to build fast web pages with async Rust. Discover practical techniques for caching, compression and concurrency, and get started today.">
  <meta property="og:title" content="Rust Web Performance Guide">
  <meta property="og:description" content="Build faster pages with async Rust.">
  <meta property="og:image" content="/cover.png">
  <meta name="twitter:card" content="summary_large_image">
  <link rel="stylesheet" href="/site.css">
  <script type="application/ld+json">{"@context": "https://schema.org", "@type": "Article", "headline": "Rust Web Performance Guide", "author": {"@type": "Person", "name": "Ann"}, "datePublished": "2024-01-01"}</script>
  <style>@media (max-width: 600px) { body { font-size: 16px } }</style>
</head>
<body>
  <h1>Rust Web Performance Guide</h1>
  <p>Rust makes it practical to build fast web services. This guide walks through the basics.</p>
  <h2>Why speed matters</h2>
  <p>Fast pages keep readers around. Slow pages lose them. Every extra second costs visits.</p>
  <h2>Caching</h2>
  <p>Cache what you can. Serve static files from a CDN and set long cache headers.</p>
  <img src="/diagram.png" alt="Request flow diagram" width="640" height="360">
  <p>Read the <a href="/ok?n=1">caching chapter</a> and the <a href="/ok?n=2">compression chapter</a>.</p>
  <p>See also <a href="/ok?n=3">our benchmarks</a> and the <a href="https://www.rust-lang.org/">Rust website</a>.</p>
</body>
</html>"#;

/// A page with broken and slow links
#[allow(dead_code)]
pub const LINKS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en"><head><title>Links</title></head>
<body>
  <h1>Links</h1>
  <a href="/ok?n=1">One</a>
  <a href="/ok?n=2">Two</a>
  <a href="/ok?n=3">Three</a>
  <a href="/ok?n=4">Four</a>
  <a href="/ok?n=5">Five</a>
  <a href="/ok?n=6">Six</a>
  <a href="/ok?n=7">Seven</a>
  <a href="/ok?n=8">Eight</a>
  <a href="/not-found">Missing</a>
  <a href="/slow">Slow</a>
</body></html>"#;

/// A bare page with no head metadata
#[allow(dead_code)]
pub const THIN_PAGE: &str = "<html><body><p>Hello</p></body></html>";

/// How long `/slow` waits before answering
#[allow(dead_code)]
pub const SLOW_DELAY: Duration = Duration::from_secs(3);

#[allow(dead_code)]
fn html(body: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header(("X-Content-Type-Options", "nosniff"))
        .body(body)
}

#[allow(dead_code)]
async fn robots(req: HttpRequest) -> HttpResponse {
    let host = req.connection_info().host().to_string();
    HttpResponse::Ok().content_type("text/plain").body(format!(
        "User-agent: *\nDisallow: /private\n\nSitemap: http://{}/sitemap.xml\n",
        host
    ))
}

#[allow(dead_code)]
async fn sitemap(req: HttpRequest) -> HttpResponse {
    let host = req.connection_info().host().to_string();
    HttpResponse::Ok().content_type("application/xml").body(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>http://{host}/</loc></url>
  <url><loc>http://{host}/links</loc></url>
</urlset>"#
    ))
}

/// Starts a server on a random local port and returns its base URL
#[allow(dead_code)]
pub async fn start_test_server() -> String {
    let http_server = HttpServer::new(|| {
        App::new()
            .route("/", web::get().to(|| async { html(GOOD_PAGE) }))
            .route("/links", web::get().to(|| async { html(LINKS_PAGE) }))
            .route("/thin", web::get().to(|| async { html(THIN_PAGE) }))
            .route("/private/page", web::get().to(|| async { html(GOOD_PAGE) }))
            .route("/robots.txt", web::get().to(robots))
            .route("/sitemap.xml", web::get().to(sitemap))
            .route(
                "/ok",
                web::get().to(|| async { HttpResponse::Ok().body("OK") }),
            )
            .route(
                "/not-found",
                web::get().to(|| async { HttpResponse::NotFound().body("Not Found") }),
            )
            .route(
                "/server-error",
                web::get().to(|| async { HttpResponse::InternalServerError().body("Error") }),
            )
            .route(
                "/redirect",
                web::get().to(|| async {
                    HttpResponse::MovedPermanently()
                        .append_header(("Location", "/ok"))
                        .finish()
                }),
            )
            .route(
                "/slow",
                web::get().to(|| async {
                    tokio::time::sleep(SLOW_DELAY).await;
                    HttpResponse::Ok().body("Finally")
                }),
            )
    })
    .workers(2)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    url
}
