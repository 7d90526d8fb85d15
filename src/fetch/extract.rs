//! Main-text extraction from HTML pages.

use scraper::{ElementRef, Html, Selector};

/// Candidate content roots, most specific first
const ROOT_SELECTORS: [&str; 4] = ["article", "main", "[role=main]", "body"];

/// Subtrees that never carry page content
const SKIPPED: [&str; 10] = [
    "script", "style", "nav", "header", "footer", "aside", "form", "noscript", "iframe", "svg",
];

/// Elements whose text forms one paragraph
const BLOCKS: [&str; 15] = [
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "pre", "blockquote", "td", "th", "dt", "dd",
    "figcaption",
];

/// Containers that separate paragraphs without being one
/// (`br` stays inside its paragraph as a space)
const BREAKS: [&str; 9] = [
    "div", "section", "article", "main", "ul", "ol", "table", "tr", "figure",
];

#[derive(Default)]
struct Collector {
    paragraphs: Vec<String>,
    buffer: String,
    list_depth: usize,
}

impl Collector {
    fn flush(&mut self) {
        let text = self.buffer.split_whitespace().collect::<Vec<_>>().join(" ");
        self.buffer.clear();
        if text.is_empty() {
            return;
        }
        if self.list_depth > 0 {
            self.paragraphs.push(format!("- {}", text));
        } else {
            self.paragraphs.push(text);
        }
    }

    fn walk(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        if SKIPPED.contains(&name) {
            return;
        }

        let block = BLOCKS.contains(&name);
        let boundary = block || BREAKS.contains(&name);
        if boundary {
            self.flush();
        }
        if name == "li" {
            self.list_depth += 1;
        }

        for child in element.children() {
            if let Some(el) = ElementRef::wrap(child) {
                self.walk(el);
            } else if let Some(text) = child.value().as_text() {
                self.buffer.push(' ');
                self.buffer.push_str(text);
            }
        }

        if boundary {
            self.flush();
        }
        if name == "li" {
            self.list_depth -= 1;
        }
    }
}

/// Readable text of the page's main content, one paragraph per block
/// element separated by blank lines. Empty when nothing usable is found.
pub fn extract_main_content(html: &str) -> String {
    let document = Html::parse_document(html);

    let root = ROOT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| document.select(&selector).next());

    let Some(root) = root else {
        tracing::warn!("No content root found in page");
        return String::new();
    };

    let mut collector = Collector::default();
    collector.walk(root);
    collector.flush();

    let text = collector.paragraphs.join("\n\n");
    if text.is_empty() {
        tracing::warn!("Could not extract main content. Returning empty string.");
    } else {
        tracing::debug!(length = text.len(), "Extracted main content");
    }
    text
}
