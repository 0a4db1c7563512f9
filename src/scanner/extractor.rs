//! Link and contact extraction from HTML
//!
//! This module turns a page body into three sets:
//! - Absolute HTTP(S) links found in `href`/`src` attributes
//! - Email addresses from `mailto:` links and the page text
//! - Phone numbers from `tel:` links and the page text
//!
//! Extraction is pure: no I/O, no shared state. The sets are ordered so that
//! serialized output is stable for identical input.

use crate::config::ExtractorConfig;
use crate::url::resolve_link;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use url::Url;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

static EMAIL_EXACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

// Optional country code, optional (area) code, then a 3+4 digit local number. Each group
// may be separated by a single space, dot or dash.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?[0-9]{1,3}[\s.-]?)?(?:\(?[0-9]{2,4}\)?[\s.-]?)?[0-9]{3}[\s.-]?[0-9]{4}")
        .expect("valid phone regex")
});

/// Attributes whose values are treated as link references
const LINK_ATTRIBUTES: &[&str] = &["href", "src"];

/// Elements whose text is never scanned for contacts
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements that separate their text from the surrounding text
const BLOCK_ELEMENTS: &[&str] = &[
    "html", "head", "title", "body", "address", "article", "aside", "blockquote", "br",
    "dd", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "option",
    "p", "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Links and contact identifiers found in one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub links: BTreeSet<String>,
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.emails.is_empty() && self.phones.is_empty()
    }
}

/// Reasons a body cannot be processed as markup at all
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("Body is binary data, not markup")]
    BinaryContent,
}

/// Extracts links, emails, and phone numbers from HTML
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    min_phone_digits: usize,
    max_phone_digits: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

impl Extractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            min_phone_digits: config.min_phone_digits,
            max_phone_digits: config.max_phone_digits,
        }
    }

    /// Parses HTML content and extracts links and contacts
    ///
    /// # Link Rules
    ///
    /// - Every `href` and `src` attribute, on any element, is resolved against `base_url`
    /// - Fragments are stripped; fragment-only references are dropped
    /// - `mailto:` values feed the email set, `tel:` values feed the phone set
    /// - Other non-HTTP(S) schemes are dropped
    ///
    /// # Text Rules
    ///
    /// Emails and phone numbers are matched over the decoded text of the document,
    /// excluding `<script>` and `<style>` contents. Inline markup does not split a match;
    /// block elements and `<br>` do. Emails are lowercased; phones are reduced to digits
    /// with an optional leading `+`.
    ///
    /// # Errors
    ///
    /// Broken markup is tolerated. Only bodies that are not text at all (containing NUL
    /// bytes) are reported as [`ParseFailure::BinaryContent`].
    ///
    /// # Example
    ///
    /// ```
    /// use contact_sweep::scanner::Extractor;
    /// use url::Url;
    ///
    /// let html = r#"<p>Mail <a href="mailto:Team@Example.com">us</a> or call 555-123-4567</p>"#;
    /// let base = Url::parse("https://example.com/").unwrap();
    /// let found = Extractor::default().extract(html, &base).unwrap();
    /// assert!(found.emails.contains("team@example.com"));
    /// assert!(found.phones.contains("5551234567"));
    /// ```
    pub fn extract(&self, html: &str, base_url: &Url) -> Result<Extraction, ParseFailure> {
        if html.contains('\0') {
            return Err(ParseFailure::BinaryContent);
        }

        let document = Html::parse_document(html);
        let mut extraction = Extraction::default();

        for node in document.tree.root().descendants() {
            let Some(element) = node.value().as_element() else {
                continue;
            };

            for (name, value) in element.attrs() {
                if LINK_ATTRIBUTES.contains(&name) {
                    self.collect_reference(value, base_url, &mut extraction);
                }
            }
        }

        let text = document_text(&document);
        for found in EMAIL_RE.find_iter(&text) {
            extraction.emails.insert(found.as_str().to_lowercase());
        }
        self.collect_text_phones(&text, &mut extraction.phones);

        Ok(extraction)
    }

    /// Routes one attribute value to the link, email, or phone set
    fn collect_reference(&self, value: &str, base_url: &Url, extraction: &mut Extraction) {
        let value = value.trim();

        if let Some(target) = strip_scheme(value, "mailto:") {
            let addresses = target.split('?').next().unwrap_or_default();
            for address in addresses.split(',') {
                let address = address.trim();
                if EMAIL_EXACT_RE.is_match(address) {
                    extraction.emails.insert(address.to_lowercase());
                }
            }
            return;
        }

        if let Some(number) = strip_scheme(value, "tel:") {
            if let Some(phone) = self.normalize_phone(number) {
                extraction.phones.insert(phone);
            }
            return;
        }

        if let Some(link) = resolve_link(value, base_url) {
            extraction.links.insert(link);
        }
    }

    fn collect_text_phones(&self, text: &str, phones: &mut BTreeSet<String>) {
        for found in PHONE_RE.find_iter(text) {
            let glued_before = text[..found.start()]
                .chars()
                .next_back()
                .map_or(false, |c| c.is_ascii_alphanumeric());
            let glued_after = text[found.end()..]
                .chars()
                .next()
                .map_or(false, |c| c.is_ascii_alphanumeric());

            if glued_before || glued_after {
                continue;
            }

            if let Some(phone) = self.normalize_phone(found.as_str()) {
                phones.insert(phone);
            }
        }
    }

    /// Reduces a raw number to digits with an optional leading `+`
    ///
    /// Returns None when the digit count falls outside the configured bounds.
    fn normalize_phone(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.len() < self.min_phone_digits || digits.len() > self.max_phone_digits {
            return None;
        }

        if raw.starts_with('+') {
            Some(format!("+{}", digits))
        } else {
            Some(digits)
        }
    }
}

/// Extracts links and contacts using the default digit bounds
pub fn extract(html: &str, base_url: &Url) -> Result<Extraction, ParseFailure> {
    Extractor::default().extract(html, base_url)
}

/// Case-insensitive scheme prefix strip
fn strip_scheme<'a>(value: &'a str, scheme: &str) -> Option<&'a str> {
    let prefix = value.get(..scheme.len())?;
    if prefix.eq_ignore_ascii_case(scheme) {
        Some(&value[scheme.len()..])
    } else {
        None
    }
}

/// One step of the document walk in [`document_text`]
enum TextStep<'a> {
    Enter(ElementRef<'a>),
    Text(&'a str),
    Boundary,
}

/// Concatenates the visible text of a document
///
/// Text nodes inside inline markup are joined directly, so `<b>555</b>-123-4567` reads as
/// one number. Block elements and `<br>` are bounded by a space so that neighbouring
/// blocks never merge.
fn document_text(document: &Html) -> String {
    let mut text = String::new();
    let mut stack = vec![TextStep::Enter(document.root_element())];

    while let Some(step) = stack.pop() {
        match step {
            TextStep::Boundary => text.push(' '),
            TextStep::Text(fragment) => text.push_str(fragment),
            TextStep::Enter(element) => {
                let name = element.value().name();
                if HIDDEN_TEXT_ELEMENTS.contains(&name) {
                    continue;
                }

                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    text.push(' ');
                    stack.push(TextStep::Boundary);
                }

                // Reversed so the stack pops children in document order
                for child in element.children().rev() {
                    match child.value() {
                        Node::Text(fragment) => stack.push(TextStep::Text(&**fragment)),
                        Node::Element(_) => {
                            if let Some(child) = ElementRef::wrap(child) {
                                stack.push(TextStep::Enter(child));
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    text
}
