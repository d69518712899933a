use crate::record::ProfileRecord;

/// Renders a record as a Markdown document.
///
/// Pure function: fixed section order, sections with no data are omitted
/// entirely, the dividers and the retrieval footer are always present. A
/// fully empty record still renders to a minimal valid document.
pub fn render(record: &ProfileRecord) -> String {
    let mut md: Vec<String> = Vec::new();

    if let Some(name) = &record.name {
        md.push(format!("# {}", name));
        md.push(String::new());
    }

    if let Some(headline) = &record.headline {
        md.push(format!("**{}**", headline));
        md.push(String::new());
    }

    if let Some(location) = &record.location {
        md.push(format!("📍 {}", location));
        md.push(String::new());
    }

    md.push(format!("🔗 [LinkedIn Profile]({})", record.source_url));
    md.push(String::new());

    md.push("---".to_string());
    md.push(String::new());

    if let Some(summary) = &record.summary {
        md.push("## About".to_string());
        md.push(String::new());
        md.push(summary.clone());
        md.push(String::new());
    }

    if !record.experience.is_empty() {
        md.push("## Experience".to_string());
        md.push(String::new());
        for exp in &record.experience {
            if let Some(title) = &exp.title {
                md.push(format!("### {}", title));
            }
            if let Some(company) = &exp.company {
                md.push(format!("**{}**", company));
            }
            if let Some(date_range) = &exp.date_range {
                md.push(format!("*{}*", date_range));
            }
            if let Some(description) = &exp.description {
                md.push(String::new());
                md.push(description.clone());
            }
            md.push(String::new());
        }
    }

    if !record.education.is_empty() {
        md.push("## Education".to_string());
        md.push(String::new());
        for edu in &record.education {
            if let Some(school) = &edu.school {
                md.push(format!("### {}", school));
            }
            if let Some(degree) = &edu.degree {
                md.push(format!("**{}**", degree));
            }
            if let Some(date_range) = &edu.date_range {
                md.push(format!("*{}*", date_range));
            }
            md.push(String::new());
        }
    }

    if !record.skills.is_empty() {
        md.push("## Skills".to_string());
        md.push(String::new());
        for skill in &record.skills {
            md.push(format!("- {}", skill));
        }
        md.push(String::new());
    }

    if !record.languages.is_empty() {
        md.push("## Languages".to_string());
        md.push(String::new());
        for lang in &record.languages {
            md.push(format!("- {}", lang));
        }
        md.push(String::new());
    }

    if !record.certifications.is_empty() {
        md.push("## Certifications".to_string());
        md.push(String::new());
        for cert in &record.certifications {
            if let Some(name) = &cert.name {
                md.push(format!("### {}", name));
            }
            if let Some(issuer) = &cert.issuer {
                md.push(format!("*Issued by: {}*", issuer));
            }
            md.push(String::new());
        }
    }

    md.push("---".to_string());
    md.push(String::new());
    md.push(format!("*Profile scraped on: {}*", record.retrieved_at));

    md.join("\n")
}
