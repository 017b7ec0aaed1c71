//! Citation metadata client.
//!
//! arXiv identifiers go to the arXiv export API (Atom XML). Other DOIs go to
//! the DOI resolver with CSL-JSON content negotiation.

use super::{CitationSource, ClientError, check_status, send};
use async_trait::async_trait;
use colloquium_core::{Author, Citation, CitationTarget};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::Value;

const CSL_JSON: &str = "application/vnd.citationstyles.csl+json";
const ARXIV_JOURNAL: &str = "arXiv";
const ARXIV_DOI_PREFIX: &str = "10.48550/arXiv.";

#[derive(Clone)]
pub struct CitationClient {
    http: reqwest::Client,
    arxiv_url: String,
    doi_url: String,
}

impl CitationClient {
    pub fn new(
        http: reqwest::Client,
        arxiv_url: impl Into<String>,
        doi_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            arxiv_url: arxiv_url.into(),
            doi_url: doi_url.into(),
        }
    }

    async fn arxiv(&self, id: &str) -> Result<Citation, ClientError> {
        let req = self.http.get(&self.arxiv_url).query(&[("id_list", id)]);
        let resp = check_status(send(req, &self.arxiv_url).await?).await?;
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;
        let mut citation = parse_arxiv_atom(&body)?;
        citation.doi = Some(format!("{ARXIV_DOI_PREFIX}{id}"));
        Ok(citation)
    }

    async fn doi(&self, doi: &str) -> Result<Citation, ClientError> {
        let url = format!("{}/{}", self.doi_url.trim_end_matches('/'), doi);
        let req = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, CSL_JSON);
        let resp = check_status(send(req, &self.doi_url).await?).await?;
        let body: Value = resp
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;
        let mut citation = parse_csl_json(&body)?;
        if citation.doi.is_none() {
            citation.doi = Some(doi.to_string());
        }
        Ok(citation)
    }
}

#[async_trait]
impl CitationSource for CitationClient {
    async fn lookup(&self, target: &CitationTarget) -> Result<Citation, ClientError> {
        match target {
            CitationTarget::Arxiv(id) => self.arxiv(id).await,
            CitationTarget::Doi(doi) => self.doi(doi).await,
        }
    }
}

// =============================================================================
// ARXIV (ATOM)
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum AtomField {
    Title,
    AuthorName,
    Published,
    JournalRef,
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Read the first `<entry>` of an arXiv Atom feed.
pub(crate) fn parse_arxiv_atom(xml: &str) -> Result<Citation, ClientError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut in_entry = false;
    let mut in_author = false;
    let mut field: Option<AtomField> = None;
    let mut text = String::new();

    let mut title = String::new();
    let mut authors = Vec::new();
    let mut published = String::new();
    let mut journal_ref = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let local = e.local_name();
                match local.as_ref() {
                    b"entry" => in_entry = true,
                    b"author" if in_entry => in_author = true,
                    b"title" if in_entry && !in_author => field = Some(AtomField::Title),
                    b"name" if in_author => field = Some(AtomField::AuthorName),
                    b"published" if in_entry => field = Some(AtomField::Published),
                    b"journal_ref" if in_entry => field = Some(AtomField::JournalRef),
                    _ => {}
                }
                text.clear();
            }
            Ok(Event::Text(e)) => {
                if field.is_some() {
                    let chunk = e
                        .unescape()
                        .map_err(|e| ClientError::ParseError(e.to_string()))?;
                    text.push_str(&chunk);
                }
            }
            Ok(Event::End(e)) => {
                let local = e.local_name();
                match (local.as_ref(), field) {
                    (b"entry", _) => break,
                    (b"author", _) => in_author = false,
                    (b"title", Some(AtomField::Title)) => title = collapse_whitespace(&text),
                    (b"name", Some(AtomField::AuthorName)) => {
                        if let Some(author) = Author::from_full_name(&text) {
                            authors.push(author);
                        }
                    }
                    (b"published", Some(AtomField::Published)) => published = text.trim().to_string(),
                    (b"journal_ref", Some(AtomField::JournalRef)) => {
                        journal_ref = collapse_whitespace(&text);
                    }
                    _ => {}
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ClientError::ParseError(format!("Atom feed: {e}"))),
            _ => {}
        }
        buf.clear();
    }

    if !in_entry || title.is_empty() {
        return Err(ClientError::ParseError("Atom feed has no entry".to_string()));
    }
    // arXiv reports bad identifiers as an entry titled "Error".
    if title == "Error" {
        return Err(ClientError::ParseError("arXiv rejected the identifier".to_string()));
    }

    Ok(Citation {
        title,
        authors,
        year: published.get(..4).and_then(|y| y.parse().ok()),
        journal: Some(if journal_ref.is_empty() {
            ARXIV_JOURNAL.to_string()
        } else {
            journal_ref
        }),
        ..Citation::default()
    })
}

// =============================================================================
// DOI (CSL-JSON)
// =============================================================================

/// CSL-JSON allows most text fields as a string or an array of strings.
fn first_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.as_str(),
        Value::Array(items) => items.first()?.as_str()?,
        _ => return None,
    };
    let text = collapse_whitespace(text);
    (!text.is_empty()).then_some(text)
}

/// Volume, issue and page arrive as strings or bare numbers.
fn text_or_number(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        other => first_text(Some(other)),
    }
}

/// Authors without a family name are dropped.
fn csl_author(author: &Value) -> Option<Author> {
    if let Some(literal) = first_text(author.get("literal")) {
        return Some(Author::new(literal, None));
    }
    match first_text(author.get("family")) {
        Some(family) => Some(Author::new(family, first_text(author.get("given")))),
        None => first_text(author.get("name")).map(|name| Author::new(name, None)),
    }
}

fn csl_year(body: &Value) -> Option<i32> {
    ["issued", "published-print", "published-online", "created"]
        .iter()
        .find_map(|key| {
            body.get(*key)?
                .get("date-parts")?
                .get(0)?
                .get(0)?
                .as_i64()
                .and_then(|y| i32::try_from(y).ok())
        })
}

pub(crate) fn parse_csl_json(body: &Value) -> Result<Citation, ClientError> {
    let title = first_text(body.get("title"))
        .ok_or_else(|| ClientError::ParseError("CSL-JSON has no title".to_string()))?;

    let authors = body
        .get("author")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(csl_author).collect())
        .unwrap_or_default();

    Ok(Citation {
        title,
        authors,
        year: csl_year(body),
        journal: first_text(body.get("container-title"))
            .or_else(|| first_text(body.get("publisher"))),
        volume: text_or_number(body.get("volume")),
        issue: text_or_number(body.get("issue")),
        pages: text_or_number(body.get("page")),
        doi: first_text(body.get("DOI")),
    })
}

// =============================================================================
// TESTS
// =============================================================================
