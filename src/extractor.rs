use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::record::{CertificationEntry, EducationEntry, ExperienceEntry, ProfileRecord};

/// One structural heuristic: a tag set plus an optional case-insensitive
/// pattern checked against the element's `class` or `id` attribute.
struct ElementRule {
    selector: Selector,
    attr_pattern: Option<Regex>,
}

impl ElementRule {
    fn new(tags: &str, attr_pattern: Option<&str>) -> Self {
        ElementRule {
            selector: Selector::parse(tags).unwrap(),
            attr_pattern: attr_pattern.map(|p| Regex::new(&format!("(?i){}", p)).unwrap()),
        }
    }
}

/// Field heuristics for one profile page.
///
/// Each field has an ordered rule list; the first rule whose first matching
/// element carries non-empty text wins. Rules are plain data so new
/// heuristics can be appended without touching the extraction flow.
pub struct Extractor {
    section_sel: Selector,
    item_sel: Selector,

    name_rules: Vec<ElementRule>,
    headline_rules: Vec<ElementRule>,
    location_rules: Vec<ElementRule>,
    summary_rules: Vec<ElementRule>,

    og_title_sel: Selector,
    meta_description_sel: Selector,

    experience_pat: Regex,
    exp_title_rules: Vec<ElementRule>,
    exp_company_rules: Vec<ElementRule>,
    exp_date_rules: Vec<ElementRule>,
    exp_description_rules: Vec<ElementRule>,

    education_pat: Regex,
    edu_school_rules: Vec<ElementRule>,
    edu_degree_rules: Vec<ElementRule>,
    edu_date_rules: Vec<ElementRule>,

    certification_pat: Regex,
    cert_name_rules: Vec<ElementRule>,
    cert_issuer_rules: Vec<ElementRule>,

    skills_pat: Regex,
    skill_item_rule: ElementRule,

    language_pat: Regex,
    language_item_sel: Selector,
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            section_sel: Selector::parse("section").unwrap(),
            // Knowingly over-broad: both li and div are considered entry
            // candidates, so nested or duplicate entries can appear for one
            // logical item. Callers tolerate partial/duplicate entries.
            item_sel: Selector::parse("li, div").unwrap(),

            name_rules: vec![
                ElementRule::new("h1", Some("name")),
                ElementRule::new("h1", Some("top-card")),
                ElementRule::new("h1", None),
            ],
            headline_rules: vec![
                ElementRule::new("div", Some("headline")),
                ElementRule::new("h2", Some("top-card")),
            ],
            location_rules: vec![
                ElementRule::new("span", Some("location")),
                ElementRule::new("div", Some("location")),
            ],
            summary_rules: vec![
                ElementRule::new("section", Some("about")),
                ElementRule::new("div", Some("summary")),
            ],

            og_title_sel: Selector::parse(r#"meta[property="og:title"]"#).unwrap(),
            meta_description_sel: Selector::parse(r#"meta[name="description"]"#).unwrap(),

            experience_pat: Regex::new("(?i)experience").unwrap(),
            exp_title_rules: vec![ElementRule::new("h3, h4", Some("title"))],
            exp_company_rules: vec![ElementRule::new("span, p", Some("company"))],
            exp_date_rules: vec![ElementRule::new("span, p", Some("date"))],
            exp_description_rules: vec![ElementRule::new("div, p", Some("description"))],

            education_pat: Regex::new("(?i)education").unwrap(),
            edu_school_rules: vec![ElementRule::new("h3, h4", Some("school"))],
            edu_degree_rules: vec![ElementRule::new("span, p", Some("degree"))],
            edu_date_rules: vec![ElementRule::new("span, p", Some("date"))],

            certification_pat: Regex::new("(?i)certification").unwrap(),
            cert_name_rules: vec![ElementRule::new("h3, h4", None)],
            cert_issuer_rules: vec![ElementRule::new("span, p", Some("issuer"))],

            skills_pat: Regex::new("(?i)skills").unwrap(),
            skill_item_rule: ElementRule::new("span, p", Some("skill")),

            language_pat: Regex::new("(?i)language").unwrap(),
            language_item_sel: Selector::parse("span, p").unwrap(),
        }
    }

    /// Runs every field heuristic against the parsed document. Never fails:
    /// a field with no match stays absent/empty.
    pub fn extract(&self, document: &Html, source_url: &str, retrieved_at: &str) -> ProfileRecord {
        let root = document.root_element();
        let mut record = ProfileRecord::new(source_url, retrieved_at);

        record.name = self.extract_name(root);
        record.headline = self.extract_headline(root);
        record.location = text_by_rules(root, &self.location_rules);
        record.summary = self.extract_summary(root);
        record.experience = self.extract_experience(root);
        record.education = self.extract_education(root);
        record.skills = self.extract_skills(root);
        record.languages = self.extract_languages(root);
        record.certifications = self.extract_certifications(root);

        record
    }

    fn extract_name(&self, root: ElementRef<'_>) -> Option<String> {
        if let Some(name) = text_by_rules(root, &self.name_rules) {
            return Some(name);
        }
        // Fall back to the og:title meta tag, stripping the "| ..." suffix.
        self.meta_content(root, &self.og_title_sel).and_then(|content| {
            let head = content.split('|').next().unwrap_or("").trim().to_string();
            if head.is_empty() {
                None
            } else {
                Some(head)
            }
        })
    }

    fn extract_headline(&self, root: ElementRef<'_>) -> Option<String> {
        if let Some(headline) = text_by_rules(root, &self.headline_rules) {
            return Some(headline);
        }
        // Meta description usually reads "Headline - rest of the blurb".
        self.meta_content(root, &self.meta_description_sel)
            .and_then(|content| {
                if !content.contains(" - ") {
                    return None;
                }
                let head = content.split(" - ").next().unwrap_or("").trim().to_string();
                if head.is_empty() {
                    None
                } else {
                    Some(head)
                }
            })
    }

    fn extract_summary(&self, root: ElementRef<'_>) -> Option<String> {
        let container = first_match_any(root, &self.summary_rules)?;
        // Drop h2/h3 subtrees so the section title does not leak into the body.
        let text = text_without_headings(container);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn extract_experience(&self, root: ElementRef<'_>) -> Vec<ExperienceEntry> {
        let mut entries = Vec::new();
        let section = match self.find_section(root, &self.experience_pat, true) {
            Some(s) => s,
            None => return entries,
        };
        for item in section.select(&self.item_sel) {
            let entry = ExperienceEntry {
                title: text_by_rules(item, &self.exp_title_rules),
                company: text_by_rules(item, &self.exp_company_rules),
                date_range: text_by_rules(item, &self.exp_date_rules),
                description: text_by_rules(item, &self.exp_description_rules),
            };
            if !entry.is_empty() {
                entries.push(entry);
            }
        }
        entries
    }

    fn extract_education(&self, root: ElementRef<'_>) -> Vec<EducationEntry> {
        let mut entries = Vec::new();
        let section = match self.find_section(root, &self.education_pat, true) {
            Some(s) => s,
            None => return entries,
        };
        for item in section.select(&self.item_sel) {
            let entry = EducationEntry {
                school: text_by_rules(item, &self.edu_school_rules),
                degree: text_by_rules(item, &self.edu_degree_rules),
                date_range: text_by_rules(item, &self.edu_date_rules),
            };
            if !entry.is_empty() {
                entries.push(entry);
            }
        }
        entries
    }

    fn extract_certifications(&self, root: ElementRef<'_>) -> Vec<CertificationEntry> {
        let mut entries = Vec::new();
        let section = match self.find_section(root, &self.certification_pat, false) {
            Some(s) => s,
            None => return entries,
        };
        for item in section.select(&self.item_sel) {
            let entry = CertificationEntry {
                name: text_by_rules(item, &self.cert_name_rules),
                issuer: text_by_rules(item, &self.cert_issuer_rules),
            };
            if !entry.is_empty() {
                entries.push(entry);
            }
        }
        entries
    }

    fn extract_skills(&self, root: ElementRef<'_>) -> Vec<String> {
        let section = match self.find_section(root, &self.skills_pat, false) {
            Some(s) => s,
            None => return Vec::new(),
        };
        section
            .select(&self.skill_item_rule.selector)
            .filter(|el| match &self.skill_item_rule.attr_pattern {
                Some(pattern) => attr_matches(*el, pattern),
                None => true,
            })
            .map(clean_text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    fn extract_languages(&self, root: ElementRef<'_>) -> Vec<String> {
        let section = match self.find_section(root, &self.language_pat, false) {
            Some(s) => s,
            None => return Vec::new(),
        };
        section
            .select(&self.language_item_sel)
            .map(clean_text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// Locates a `<section>` whose id (checked first, ids being more
    /// reliable when present) or class matches the pattern.
    fn find_section<'a>(
        &self,
        root: ElementRef<'a>,
        pattern: &Regex,
        check_id: bool,
    ) -> Option<ElementRef<'a>> {
        if check_id {
            if let Some(section) = root
                .select(&self.section_sel)
                .find(|s| attr_value_matches(*s, "id", pattern))
            {
                return Some(section);
            }
        }
        root.select(&self.section_sel)
            .find(|s| attr_value_matches(*s, "class", pattern))
    }

    fn meta_content(&self, root: ElementRef<'_>, selector: &Selector) -> Option<String> {
        root.select(selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|c| c.to_string())
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

fn attr_value_matches(el: ElementRef<'_>, attr: &str, pattern: &Regex) -> bool {
    el.value().attr(attr).is_some_and(|v| pattern.is_match(v))
}

fn attr_matches(el: ElementRef<'_>, pattern: &Regex) -> bool {
    attr_value_matches(el, "class", pattern) || attr_value_matches(el, "id", pattern)
}

/// First element under `scope` satisfying the rule, regardless of text.
fn first_match<'a>(scope: ElementRef<'a>, rule: &ElementRule) -> Option<ElementRef<'a>> {
    scope.select(&rule.selector).find(|el| match &rule.attr_pattern {
        Some(pattern) => attr_matches(*el, pattern),
        None => true,
    })
}

fn first_match_any<'a>(scope: ElementRef<'a>, rules: &[ElementRule]) -> Option<ElementRef<'a>> {
    rules.iter().find_map(|rule| first_match(scope, rule))
}

/// Applies rules in priority order. Per rule only the first matching
/// element is considered; if its text is empty the next rule gets a turn.
fn text_by_rules(scope: ElementRef<'_>, rules: &[ElementRule]) -> Option<String> {
    for rule in rules {
        if let Some(el) = first_match(scope, rule) {
            let text = clean_text(el);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Trimmed, whitespace-collapsed text content of an element.
fn clean_text(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<Vec<_>>().join(" "))
}

/// Like `clean_text` but skips any h2/h3 subtree.
fn text_without_headings(el: ElementRef<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut stack: Vec<_> = el.children().rev().collect();
    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(t) => parts.push(t.to_string()),
            Node::Element(e) if matches!(e.name(), "h2" | "h3") => {}
            Node::Element(_) => stack.extend(node.children().rev()),
            _ => {}
        }
    }
    normalize_ws(&parts.join(" "))
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> ProfileRecord {
        let document = Html::parse_document(html);
        Extractor::new().extract(
            &document,
            "https://www.linkedin.com/in/test",
            "2024-01-01T00:00:00+00:00",
        )
    }

    const FULL_PROFILE: &str = r#"<html><head>
        <meta property="og:title" content="Jane Doe | LinkedIn">
        <meta name="description" content="Staff Engineer at Acme - Berlin, Germany">
        </head><body>
        <h1 class="top-card-layout__name">  Jane Doe  </h1>
        <div class="top-card__headline">Staff Engineer at Acme</div>
        <span class="profile-location">Berlin, Germany</span>
        <section class="core-section about-me">
            <h2>About</h2>
            <p>Building   reliable systems since 2010.</p>
        </section>
        <section id="experience-section">
            <li>
                <h3 class="job-title">Staff Engineer</h3>
                <span class="company-name">Acme GmbH</span>
                <span class="date-range">2020 - Present</span>
                <p class="role-description">Owns the ingestion pipeline.</p>
            </li>
        </section>
        <section class="education-section">
            <li>
                <h3 class="school-name">TU Berlin</h3>
                <span class="degree-title">MSc Computer Science</span>
                <span class="date-range">2008 - 2010</span>
            </li>
        </section>
        <section class="skills-section">
            <span class="skill-pill">Go</span>
            <span class="skill-pill">Rust</span>
            <span class="skill-pill">Go</span>
        </section>
        <section class="languages-section">
            <span>German</span>
            <span>English</span>
        </section>
        <section class="certifications-section">
            <li>
                <h3>CKA</h3>
                <span class="issuer-name">CNCF</span>
            </li>
        </section>
        </body></html>"#;

    #[test]
    fn empty_document_yields_empty_record() {
        let record = extract("<html><body><p>nothing to see</p></body></html>");
        assert!(record.is_empty());
        assert_eq!(record.source_url, "https://www.linkedin.com/in/test");
    }

    #[test]
    fn name_comes_from_matching_h1_trimmed() {
        let record = extract(FULL_PROFILE);
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn name_falls_back_to_og_title() {
        let record = extract(
            r#"<html><head><meta property="og:title" content="Jane Doe | LinkedIn"></head>
               <body><p>wall</p></body></html>"#,
        );
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn bare_h1_is_last_resort_for_name() {
        let record = extract("<html><body><h1>John Smith</h1></body></html>");
        assert_eq!(record.name.as_deref(), Some("John Smith"));
    }

    #[test]
    fn headline_falls_back_to_meta_description() {
        let record = extract(
            r#"<html><head><meta name="description" content="Staff Engineer at Acme - Berlin"></head>
               <body></body></html>"#,
        );
        assert_eq!(record.headline.as_deref(), Some("Staff Engineer at Acme"));
    }

    #[test]
    fn meta_description_without_delimiter_is_ignored() {
        let record = extract(
            r#"<html><head><meta name="description" content="just a blurb"></head>
               <body></body></html>"#,
        );
        assert!(record.headline.is_none());
    }

    #[test]
    fn scalar_fields_from_full_profile() {
        let record = extract(FULL_PROFILE);
        assert_eq!(record.headline.as_deref(), Some("Staff Engineer at Acme"));
        assert_eq!(record.location.as_deref(), Some("Berlin, Germany"));
    }

    #[test]
    fn summary_excludes_section_heading() {
        let record = extract(FULL_PROFILE);
        let summary = record.summary.expect("summary present");
        assert_eq!(summary, "Building reliable systems since 2010.");
        assert!(!summary.contains("About"));
    }

    #[test]
    fn experience_entry_with_all_subfields() {
        let record = extract(FULL_PROFILE);
        assert_eq!(record.experience.len(), 1);
        let exp = &record.experience[0];
        assert_eq!(exp.title.as_deref(), Some("Staff Engineer"));
        assert_eq!(exp.company.as_deref(), Some("Acme GmbH"));
        assert_eq!(exp.date_range.as_deref(), Some("2020 - Present"));
        assert_eq!(exp.description.as_deref(), Some("Owns the ingestion pipeline."));
    }

    #[test]
    fn empty_experience_candidates_are_dropped() {
        let record = extract(
            r#"<html><body>
               <section id="experience-section">
                   <li><span class="irrelevant">decorative chrome</span></li>
               </section>
               </body></html>"#,
        );
        assert!(record.experience.is_empty());
    }

    #[test]
    fn education_entry_extracted() {
        let record = extract(FULL_PROFILE);
        assert_eq!(record.education.len(), 1);
        let edu = &record.education[0];
        assert_eq!(edu.school.as_deref(), Some("TU Berlin"));
        assert_eq!(edu.degree.as_deref(), Some("MSc Computer Science"));
        assert_eq!(edu.date_range.as_deref(), Some("2008 - 2010"));
    }

    #[test]
    fn skills_keep_document_order_and_duplicates() {
        let record = extract(FULL_PROFILE);
        assert_eq!(record.skills, vec!["Go", "Rust", "Go"]);
    }

    #[test]
    fn languages_collected_unfiltered() {
        let record = extract(FULL_PROFILE);
        assert_eq!(record.languages, vec!["German", "English"]);
    }

    #[test]
    fn certification_name_and_issuer() {
        let record = extract(FULL_PROFILE);
        assert_eq!(record.certifications.len(), 1);
        assert_eq!(record.certifications[0].name.as_deref(), Some("CKA"));
        assert_eq!(record.certifications[0].issuer.as_deref(), Some("CNCF"));
    }

    #[test]
    fn extraction_is_idempotent() {
        let document = Html::parse_document(FULL_PROFILE);
        let extractor = Extractor::new();
        let a = extractor.extract(&document, "u", "t");
        let b = extractor.extract(&document, "u", "t");
        assert_eq!(a, b);
    }

    #[test]
    fn auth_wall_page_yields_record_without_name() {
        let record = extract(
            r#"<html><body><main class="authwall">Sign in to continue</main></body></html>"#,
        );
        assert!(record.name.is_none());
        assert!(record.experience.is_empty());
    }
}
