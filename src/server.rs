use std::path::{Path, PathBuf};

use actix_cors::Cors;
use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use linkedin_scraper_lib::{fetcher, logger, output, renderer};
use linkedin_scraper_lib::{ProfileScraper, ScrapeError};

const OUTPUT_DIR: &str = "outputs";

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>LinkedIn Profile Scraper</title>
<style>
body { font-family: Arial, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
input[type=url] { width: 100%; padding: 0.5rem; }
button { margin-top: 0.5rem; padding: 0.5rem 1.5rem; }
pre { background: #f5f5f5; padding: 1rem; white-space: pre-wrap; }
.warning { background: #fff3cd; border: 1px solid #ffc107; border-radius: 5px; padding: 1rem; }
</style>
</head>
<body>
<h1>LinkedIn Profile Scraper</h1>
<p class="warning">Only works with publicly visible profiles. Respect LinkedIn's
Terms of Service and users' privacy.</p>
<form id="f">
  <input type="url" id="url" placeholder="https://www.linkedin.com/in/username" required>
  <button type="submit">Scrape Profile</button>
</form>
<div id="status"></div>
<pre id="preview"></pre>
<script>
document.getElementById('f').addEventListener('submit', async (e) => {
  e.preventDefault();
  const status = document.getElementById('status');
  const preview = document.getElementById('preview');
  status.textContent = 'Scraping, please wait...';
  preview.textContent = '';
  const resp = await fetch('/api/scrape', {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify({url: document.getElementById('url').value})
  });
  const data = await resp.json();
  if (data.status === 'ok') {
    status.innerHTML = 'Done. <a href="/api/download/' + data.download_id + '">Download Markdown</a>';
    preview.textContent = data.profile.markdown;
  } else {
    status.textContent = data.message || 'Scrape failed.';
  }
});
</script>
</body>
</html>"#;

#[derive(serde::Deserialize)]
struct ScrapeRequest {
    url: String,
}

#[derive(serde::Serialize)]
struct ScrapedProfile {
    name: String,
    headline: Option<String>,
    location: Option<String>,
    markdown: String,
    filename: String,
    experience_entries: usize,
    education_entries: usize,
    skills: usize,
    languages: usize,
    certifications: usize,
}

enum Outcome {
    /// Pipeline ran but no heuristic matched a name; distinct from an error.
    Empty,
    Scraped(Box<ScrapedProfile>, String),
}

#[derive(Debug, Error)]
enum ApiError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
    #[error("failed to save output: {0}")]
    Io(#[from] std::io::Error),
}

fn run_scrape(url: &str) -> Result<Outcome, ApiError> {
    let scraper = ProfileScraper::new();
    let record = scraper.scrape_profile(url)?;

    if record.name.is_none() {
        return Ok(Outcome::Empty);
    }

    let markdown = renderer::render(&record);
    let download_id = Uuid::new_v4().to_string();
    output::save_markdown(
        Path::new(OUTPUT_DIR),
        &format!("{}.md", download_id),
        &markdown,
    )?;

    let profile = ScrapedProfile {
        name: record.name.clone().unwrap_or_default(),
        headline: record.headline.clone(),
        location: record.location.clone(),
        filename: output::markdown_filename(record.name.as_deref()),
        experience_entries: record.experience.len(),
        education_entries: record.education.len(),
        skills: record.skills.len(),
        languages: record.languages.len(),
        certifications: record.certifications.len(),
        markdown,
    };
    Ok(Outcome::Scraped(Box::new(profile), download_id))
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[get("/api/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json("Server is running")
}

#[post("/api/scrape")]
async fn scrape_profile(req: web::Json<ScrapeRequest>) -> impl Responder {
    let url = req.url.trim().to_string();
    if !fetcher::is_profile_url(&url) {
        return HttpResponse::BadRequest().json(json!({
            "status": "invalid_url",
            "message": format!("Invalid URL format. URL should start with: {}", fetcher::PROFILE_URL_PREFIX),
        }));
    }

    match web::block(move || run_scrape(&url)).await {
        Ok(Ok(Outcome::Scraped(profile, download_id))) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "download_id": download_id,
            "profile": profile,
        })),
        Ok(Ok(Outcome::Empty)) => HttpResponse::Ok().json(json!({
            "status": "no_data",
            "message": "Could not find profile data. The profile may be private, \
                        the request may have been blocked, or the URL may be wrong.",
        })),
        Ok(Err(ApiError::Scrape(ScrapeError::Fetch(e)))) => HttpResponse::BadGateway().json(json!({
            "status": "fetch_error",
            "message": format!("Error fetching profile: {}. Check the network and try again later.", e),
        })),
        Ok(Err(ApiError::Scrape(e @ ScrapeError::Parse { .. }))) => HttpResponse::BadGateway().json(json!({
            "status": "parse_error",
            "message": e.to_string(),
        })),
        Ok(Err(ApiError::Io(e))) => HttpResponse::InternalServerError().json(json!({
            "status": "io_error",
            "message": e.to_string(),
        })),
        Err(_) => HttpResponse::InternalServerError().json("Scrape worker failed"),
    }
}

#[get("/api/download/{id}")]
async fn download_result(path: web::Path<String>) -> impl Responder {
    // Ids are always UUIDs; anything else is rejected before touching the fs.
    let id = match Uuid::parse_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().body("Unknown download id"),
    };

    let file_path = PathBuf::from(OUTPUT_DIR).join(format!("{}.md", id));
    match std::fs::read_to_string(&file_path) {
        Ok(content) => {
            let filename = attachment_filename(&content);
            HttpResponse::Ok()
                .content_type("text/markdown; charset=utf-8")
                .append_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", filename),
                ))
                .body(content)
        }
        Err(_) => HttpResponse::NotFound().body("Result file not found."),
    }
}

/// Recovers the profile name from the document's `# ` heading so the
/// downloaded file carries the same name the CLI would have used.
fn attachment_filename(markdown: &str) -> String {
    let name = markdown
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("# "))
        .map(|name| name.replace('"', ""));
    output::markdown_filename(name.as_deref())
}


#[actix_web::main]
async fn main() -> std::io::Result<()> {
    logger::init();
    std::fs::create_dir_all(OUTPUT_DIR)?;

    log::info!("Starting Web Server at http://127.0.0.1:7860");

    HttpServer::new(|| {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .service(index)
            .service(health_check)
            .service(scrape_profile)
            .service(download_result)
    })
    .bind(("127.0.0.1", 7860))?
    .run()
    .await
}
