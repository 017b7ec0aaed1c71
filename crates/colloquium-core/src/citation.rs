//! # Citation Metadata
//!
//! Paper links in the registry are enriched with citation metadata when the
//! URL carries an identifier. Which provider is asked depends on the shape:
//!
//! - arXiv: `arxiv.org/abs/<id>`, `arxiv.org/pdf/<id>`, `10.48550/arXiv.<id>`
//! - DOI: any `10.NNNN/...` embedded in the URL
//!
//! Links without an identifier, and lookups that fail, fall back to the raw
//! link text as the title.

use crate::Link;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ARXIV_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)arxiv\.org/(?:abs|pdf)/(\d{4}\.\d{4,5})(?:v\d+)?")
        .expect("arxiv url pattern is valid")
});

static ARXIV_DOI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)10\.48550/arxiv\.(\d{4}\.\d{4,5})").expect("arxiv doi pattern is valid")
});

static DOI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"10\.\d{4,9}/[^\s?#&]+").expect("doi pattern is valid"));

/// Which metadata provider can describe a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationTarget {
    /// arXiv identifier, e.g. `2310.13018`.
    Arxiv(String),
    /// Plain DOI, e.g. `10.1126/science.1192788`.
    Doi(String),
}

impl CitationTarget {
    /// Classify a URL. `None` when it carries no identifier.
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        if let Some(caps) = ARXIV_URL.captures(url).or_else(|| ARXIV_DOI.captures(url)) {
            return caps.get(1).map(|m| Self::Arxiv(m.as_str().to_string()));
        }

        DOI.find(url).map(|m| {
            let doi = m
                .as_str()
                .trim_end_matches(['.', ',', ')', ';'])
                .trim_end_matches(".pdf");
            Self::Doi(doi.to_string())
        })
    }
}

/// One author, split the way APA needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub family: String,
    #[serde(default)]
    pub given: Option<String>,
}

impl Author {
    #[must_use]
    pub fn new(family: impl Into<String>, given: Option<String>) -> Self {
        Self {
            family: family.into(),
            given: given.filter(|g| !g.trim().is_empty()),
        }
    }

    /// Split "Andrew M. Saxe" into given "Andrew M." and family "Saxe".
    #[must_use]
    pub fn from_full_name(name: &str) -> Option<Self> {
        let name = name.split_whitespace().collect::<Vec<_>>();
        let (family, given) = name.split_last()?;
        Some(Self::new(*family, Some(given.join(" "))))
    }

    /// "Saxe, A.", or the family name alone.
    #[must_use]
    pub fn apa(&self) -> String {
        match self.given.as_deref().and_then(|g| g.trim().chars().next()) {
            Some(initial) => format!("{}, {}.", self.family, initial),
            None => self.family.clone(),
        }
    }
}

/// Bibliographic metadata for one paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub pages: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
}

impl Citation {
    /// A citation that only knows its title (the fallback shape).
    #[must_use]
    pub fn from_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn is_title_only(&self) -> bool {
        self.authors.is_empty() && self.year.is_none() && self.journal.is_none() && self.doi.is_none()
    }

    /// "Saxe, A. & Ganguli, S." / "Saxe, A. et al."
    #[must_use]
    pub fn apa_authors(&self) -> String {
        match self.authors.as_slice() {
            [] => "Unknown Author".to_string(),
            [only] => only.apa(),
            [first, second] => format!("{} & {}", first.apa(), second.apa()),
            [first, ..] => format!("{} et al.", first.apa()),
        }
    }

    /// APA-style reference line:
    /// "Saxe, A. et al. (2013). Title. Journal, 5(2), 1–10. https://doi.org/..."
    ///
    /// A title-only citation renders as the title alone.
    #[must_use]
    pub fn format_line(&self) -> String {
        let title = self.title.trim_end_matches('.');
        if self.is_title_only() {
            return format!("{}.", title);
        }

        let year = self
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "n.d.".to_string());
        let mut line = format!("{} ({}). {}", self.apa_authors(), year, title);

        if let Some(journal) = self.journal.as_deref().filter(|j| !j.is_empty()) {
            line.push_str(". ");
            line.push_str(journal.trim_end_matches('.'));
            if let Some(volume) = self.volume.as_deref() {
                line.push_str(", ");
                line.push_str(volume);
                if let Some(issue) = self.issue.as_deref() {
                    line.push_str(&format!("({})", issue));
                }
                if let Some(pages) = self.pages.as_deref() {
                    line.push_str(", ");
                    line.push_str(&pages.replace('-', "\u{2013}"));
                }
            }
        }

        match self.doi.as_deref() {
            Some(doi) => line.push_str(&format!(". https://doi.org/{}", doi)),
            None => line.push('.'),
        }
        line
    }
}

/// A registry link paired with whatever citation could be resolved for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub link: Link,
    pub citation: Citation,
}

impl Reference {
    /// Reference that falls back to the link text.
    #[must_use]
    pub fn unresolved(link: Link) -> Self {
        let citation = Citation::from_title(link.text.clone());
        Self { link, citation }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arxiv_abs_and_pdf_urls() {
        assert_eq!(
            CitationTarget::from_url("https://arxiv.org/abs/2310.13018"),
            Some(CitationTarget::Arxiv("2310.13018".to_string()))
        );
        assert_eq!(
            CitationTarget::from_url("https://arxiv.org/pdf/1312.6120v3.pdf"),
            Some(CitationTarget::Arxiv("1312.6120".to_string()))
        );
        assert_eq!(
            CitationTarget::from_url("https://doi.org/10.48550/arXiv.2310.13018"),
            Some(CitationTarget::Arxiv("2310.13018".to_string()))
        );
    }

    #[test]
    fn doi_embedded_in_publisher_url() {
        assert_eq!(
            CitationTarget::from_url("https://www.science.org/doi/abs/10.1126/science.1192788"),
            Some(CitationTarget::Doi("10.1126/science.1192788".to_string()))
        );
        assert_eq!(
            CitationTarget::from_url(
                "https://nyaspubs.onlinelibrary.wiley.com/doi/full/10.1111/nyas.13046?casa_token=XD66"
            ),
            Some(CitationTarget::Doi("10.1111/nyas.13046".to_string()))
        );
    }

    #[test]
    fn urls_without_identifier() {
        assert_eq!(CitationTarget::from_url("https://osf.io/preprints/psyarxiv/tz4dn"), None);
        assert_eq!(
            CitationTarget::from_url("https://proceedings.mlr.press/v162/saxe22a.html"),
            None
        );
    }

    fn author(full: &str) -> Author {
        Author::from_full_name(full).expect("name")
    }

    #[test]
    fn author_from_full_name() {
        assert_eq!(
            author("Andrew M. Saxe"),
            Author::new("Saxe", Some("Andrew M.".to_string()))
        );
        assert_eq!(author("Plato"), Author::new("Plato", None));
        assert_eq!(Author::from_full_name("  "), None);
        assert_eq!(author("Andrew M. Saxe").apa(), "Saxe, A.");
        assert_eq!(author("Plato").apa(), "Plato");
    }

    #[test]
    fn apa_author_lists() {
        let mut citation = Citation::from_title("T");
        assert_eq!(citation.apa_authors(), "Unknown Author");
        citation.authors = vec![author("Andrew Saxe"), author("Surya Ganguli")];
        assert_eq!(citation.apa_authors(), "Saxe, A. & Ganguli, S.");
        citation.authors.push(author("James McClelland"));
        assert_eq!(citation.apa_authors(), "Saxe, A. et al.");
    }

    #[test]
    fn format_line_full() {
        let citation = Citation {
            title: "How to grow a mind".to_string(),
            authors: vec![author("Joshua B. Tenenbaum"), author("Charles Kemp")],
            year: Some(2011),
            journal: Some("Science".to_string()),
            volume: Some("331".to_string()),
            issue: Some("6022".to_string()),
            pages: Some("1279-1285".to_string()),
            doi: Some("10.1126/science.1192788".to_string()),
        };
        assert_eq!(
            citation.format_line(),
            "Tenenbaum, J. & Kemp, C. (2011). How to grow a mind. Science, 331(6022), \
             1279\u{2013}1285. https://doi.org/10.1126/science.1192788"
        );
    }

    #[test]
    fn format_line_without_year_or_doi() {
        let citation = Citation {
            title: "Exact solutions.".to_string(),
            authors: vec![author("Andrew Saxe")],
            journal: Some("arXiv".to_string()),
            ..Citation::default()
        };
        assert_eq!(citation.format_line(), "Saxe, A. (n.d.). Exact solutions. arXiv.");
    }

    #[test]
    fn format_line_title_only() {
        assert_eq!(Citation::from_title("Paper 1: Something.").format_line(), "Paper 1: Something.");
    }

    #[test]
    fn unresolved_reference_uses_link_text() {
        let reference = Reference::unresolved(Link::new("Paper 1: X", "https://example.org"));
        assert_eq!(reference.citation.title, "Paper 1: X");
        assert!(reference.citation.authors.is_empty());
    }
}
