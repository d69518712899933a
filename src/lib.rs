pub mod delay_manager;
pub mod extractor;
pub mod fetcher;
pub mod logger;
pub mod output;
pub mod record;
pub mod renderer;
pub mod scraper;

// Exporting types for convenience
pub use extractor::Extractor;
pub use fetcher::{FetchError, FetchedPage, Fetcher};
pub use record::{CertificationEntry, EducationEntry, ExperienceEntry, ProfileRecord};
pub use self::scraper::{ProfileScraper, ScrapeError};
