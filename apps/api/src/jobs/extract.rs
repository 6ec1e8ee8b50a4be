//! Main-content extraction from a job posting page.
//!
//! Boilerplate regions are skipped. The description is then located by trying
//! job-board specific containers first, then generic page landmarks, then the
//! whole body.

use scraper::{ElementRef, Html, Node, Selector};

const NOISE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "svg",
    "iframe",
    "nav",
    "footer",
    "header",
    "aside",
    ".cookie-banner",
    ".advertisement",
    ".sidebar",
    ".comments",
    ".related-jobs",
    ".similar-jobs",
];

const PRIORITY_SELECTORS: &[&str] = &[
    ".job-description",
    ".job-details",
    "[itemprop='description']",
    ".description",
    "#job-description",
    ".posting-requirements",
    ".job-posting-section",
    ".job-content",
    "[data-automation='jobDescription']",
    ".jobsearch-JobComponent-description",
];
const PRIORITY_MIN_CHARS: usize = 300;

const GENERIC_SELECTORS: &[&str] = &["main", "article", "[role='main']", "#main", "#content", ".content"];
const GENERIC_MIN_CHARS: usize = 500;

/// Returns the cleaned main text of an HTML page.
pub fn extract_text_content(html: &str) -> String {
    let document = Html::parse_document(html);
    let noise = compile(NOISE_SELECTORS);

    let tiers = [
        (PRIORITY_SELECTORS, PRIORITY_MIN_CHARS),
        (GENERIC_SELECTORS, GENERIC_MIN_CHARS),
    ];
    for (selectors, min_chars) in tiers {
        for selector in compile(selectors) {
            let Some(element) = document
                .select(&selector)
                .find(|el| !is_within_noise(*el, &noise))
            else {
                continue;
            };
            let text = element_text(element, &noise);
            if text.chars().count() > min_chars {
                return text;
            }
        }
    }

    if let Some(body) = compile(&["body"])
        .first()
        .and_then(|sel| document.select(sel).next())
    {
        return element_text(body, &noise);
    }

    element_text(document.root_element(), &noise)
}

/// Collapses every whitespace run to a single space.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn compile(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
}

fn is_noise(element: ElementRef, noise: &[Selector]) -> bool {
    noise.iter().any(|sel| sel.matches(&element))
}

fn is_within_noise(element: ElementRef, noise: &[Selector]) -> bool {
    is_noise(element, noise)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| is_noise(ancestor, noise))
}

fn element_text(element: ElementRef, noise: &[Selector]) -> String {
    let mut out = String::new();
    collect_visible_text(element, noise, &mut out);
    clean_text(&out)
}

fn collect_visible_text(element: ElementRef, noise: &[Selector], out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    if !is_noise(child_el, noise) {
                        collect_visible_text(child_el, noise, out);
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(words: usize) -> String {
        vec!["responsibility"; words].join(" ")
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  a\n\n b\t\tc   "), "a b c");
    }

    #[test]
    fn test_priority_selector_wins() {
        let html = format!(
            r#"<html><body>
                <nav>Home Jobs Login</nav>
                <main>{}</main>
                <div class="job-description"><h2>About the role</h2><p>{}</p></div>
            </body></html>"#,
            paragraph(80),
            paragraph(40)
        );
        let text = extract_text_content(&html);
        assert!(text.starts_with("About the role"));
        assert!(!text.contains("Login"));
    }

    #[test]
    fn test_short_priority_match_falls_through_to_generic() {
        let html = format!(
            r#"<html><body>
                <div class="description">Too short</div>
                <article>{}</article>
            </body></html>"#,
            paragraph(60)
        );
        let text = extract_text_content(&html);
        assert!(text.starts_with("responsibility"));
        assert!(!text.contains("Too short"));
    }

    #[test]
    fn test_noise_inside_content_is_skipped() {
        let html = format!(
            r#"<html><body><div class="job-description">
                <script>var tracking = 1;</script>
                <p>{}</p>
                <aside class="similar-jobs">Other openings</aside>
            </div></body></html>"#,
            paragraph(40)
        );
        let text = extract_text_content(&html);
        assert!(!text.contains("tracking"));
        assert!(!text.contains("Other openings"));
    }

    #[test]
    fn test_candidate_inside_noise_is_ignored() {
        let html = format!(
            r#"<html><body>
                <aside><div class="job-description">{}</div></aside>
                <p>Visible body text</p>
            </body></html>"#,
            paragraph(60)
        );
        let text = extract_text_content(&html);
        assert_eq!(text, "Visible body text");
    }

    #[test]
    fn test_body_fallback() {
        let html = "<html><head><title>t</title><style>p{}</style></head>\
                    <body><header>Brand</header><p>Senior   Rust\nEngineer</p></body></html>";
        assert_eq!(extract_text_content(html), "Senior Rust Engineer");
    }
}
