use serde::{Deserialize, Serialize};

/// One extraction pass over one profile page.
///
/// Scalar fields are `None` when no heuristic matched; list fields default
/// to empty. An empty string is never stored, so `name.is_none()` is the
/// reliable "found nothing" signal for callers. Repeated-entry lists may
/// contain nested or duplicate entries for the same logical item because
/// the candidate scan is deliberately over-broad.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub source_url: String,
    pub retrieved_at: String,
    pub name: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub certifications: Vec<CertificationEntry>,
}

impl ProfileRecord {
    pub fn new(source_url: &str, retrieved_at: &str) -> Self {
        ProfileRecord {
            source_url: source_url.to_string(),
            retrieved_at: retrieved_at.to_string(),
            ..Default::default()
        }
    }

    /// True when not a single heuristic matched anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.headline.is_none()
            && self.location.is_none()
            && self.summary.is_none()
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.skills.is_empty()
            && self.languages.is_empty()
            && self.certifications.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: Option<String>,
    pub company: Option<String>,
    pub date_range: Option<String>,
    pub description: Option<String>,
}

impl ExperienceEntry {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.company.is_none()
            && self.date_range.is_none()
            && self.description.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub date_range: Option<String>,
}

impl EducationEntry {
    pub fn is_empty(&self) -> bool {
        self.school.is_none() && self.degree.is_none() && self.date_range.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub name: Option<String>,
    pub issuer: Option<String>,
}

impl CertificationEntry {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.issuer.is_none()
    }
}
