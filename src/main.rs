use std::env;
use std::fs;
use std::path::Path;
use std::process;

use log::{error, info, warn};

use linkedin_scraper_lib::{delay_manager, fetcher, logger, output, renderer};
use linkedin_scraper_lib::{ProfileScraper, ScrapeError};

const USAGE: &str = "Usage: linkedin_scraper <linkedin_profile_url>
       linkedin_scraper --batch <url_file> [--delay <seconds>]

Examples:
  linkedin_scraper https://www.linkedin.com/in/username
  linkedin_scraper --batch urls.txt --delay 10";

fn main() {
    logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let exit_code = if args[0] == "--batch" {
        let file = match args.get(1) {
            Some(f) => f.clone(),
            None => {
                eprintln!("{}", USAGE);
                process::exit(1);
            }
        };
        let mut delay_secs: u64 = 3;
        let mut i = 2;
        while i < args.len() {
            match args[i].as_str() {
                "--delay" => {
                    delay_secs = match args.get(i + 1).and_then(|s| s.parse().ok()) {
                        Some(d) => d,
                        None => {
                            eprintln!("--delay expects a number of seconds");
                            process::exit(1);
                        }
                    };
                    i += 2;
                }
                other => {
                    eprintln!("Unknown option: {}\n{}", other, USAGE);
                    process::exit(1);
                }
            }
        }
        run_batch(&file, delay_secs)
    } else {
        run_single(&args[0])
    };

    process::exit(exit_code);
}

fn run_single(url: &str) -> i32 {
    if !fetcher::is_profile_url(url) {
        eprintln!("Error: Please provide a valid LinkedIn profile URL");
        eprintln!("URL should start with: {}", fetcher::PROFILE_URL_PREFIX);
        return 1;
    }

    println!("Scraping LinkedIn profile: {}", url);
    println!("Please wait...\n");

    let scraper = ProfileScraper::new();
    let record = match scraper.scrape_profile(url) {
        Ok(record) => record,
        Err(ScrapeError::Fetch(e)) => {
            error!("Error fetching profile: {}", e);
            eprintln!("\nNetwork failure, timeout, or the server refused the request.");
            eprintln!("Check the connection and try again after a few minutes.");
            return 1;
        }
        Err(e @ ScrapeError::Parse { .. }) => {
            error!("{}", e);
            eprintln!("\nThe response body was not parseable HTML.");
            eprintln!("The profile may be served in an unexpected format.");
            return 1;
        }
    };

    if record.name.is_none() {
        eprintln!("\nWarning: Could not extract profile data. This could be due to:");
        eprintln!("- LinkedIn's anti-scraping measures");
        eprintln!("- Private profile (not publicly visible)");
        eprintln!("- Invalid URL");
        eprintln!("- Network issues");
        eprintln!("\nNote: For best results, consider using LinkedIn's official API");
        return 1;
    }

    let markdown = renderer::render(&record);
    let filename = output::markdown_filename(record.name.as_deref());
    let path = match output::save_markdown(Path::new("."), &filename, &markdown) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to write {}: {}", filename, e);
            return 1;
        }
    };

    println!("✓ Profile scraped successfully!");
    println!("✓ Markdown file created: {}", path.display());
    println!("\n{}", "=".repeat(50));
    println!("PREVIEW:");
    println!("{}\n", "=".repeat(50));
    let preview: String = markdown.chars().take(500).collect();
    if markdown.chars().count() > 500 {
        println!("{}...", preview);
    } else {
        println!("{}", preview);
    }

    0
}

fn run_batch(file: &str, delay_secs: u64) -> i32 {
    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            error!("Could not read URL file {}: {}", file, e);
            return 1;
        }
    };

    let urls: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if urls.is_empty() {
        error!("No URLs found in {}. Expected one profile URL per line.", file);
        return 1;
    }

    info!("Starting batch run: {} profiles, {}s base delay", urls.len(), delay_secs);

    let scraper = ProfileScraper::new();
    let mut saved = 0usize;

    for (i, url) in urls.iter().enumerate() {
        // Delay between profiles, not before the first one.
        if i > 0 {
            delay_manager::profile_delay(delay_secs);
        }

        info!("Processing {} / {} : {}", i + 1, urls.len(), url);

        if !fetcher::is_profile_url(url) {
            warn!("Skipping invalid profile URL: {}", url);
            continue;
        }

        match scraper.scrape_profile(url) {
            Ok(record) if record.name.is_some() => {
                let markdown = renderer::render(&record);
                let filename = output::markdown_filename(record.name.as_deref());
                match output::save_markdown(Path::new("."), &filename, &markdown) {
                    Ok(path) => {
                        saved += 1;
                        info!("Saved {:?}", path);
                    }
                    Err(e) => error!("Failed to write {}: {}", filename, e),
                }
            }
            Ok(_) => warn!("No profile data found at {} (private or blocked?)", url),
            Err(e) => warn!("Failed to scrape {}: {}", url, e),
        }
    }

    info!("Batch complete: {} of {} profiles saved.", saved, urls.len());
    if saved == 0 {
        error!("Batch run produced no output; every URL failed or was skipped.");
        return 1;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_with_no_scrapable_urls_exits_nonzero() {
        let path = std::env::temp_dir().join("batch_invalid_urls.txt");
        fs::write(&path, "https://example.com/in/nobody\n# comment only\n").unwrap();
        assert_eq!(run_batch(path.to_str().unwrap(), 0), 1);
    }

    #[test]
    fn batch_with_missing_file_exits_nonzero() {
        assert_eq!(run_batch("/nonexistent/urls.txt", 0), 1);
    }
}
