//! arXiv 主索引 - 请求 Atom 接口并解析条目

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{PaperIndex, SearchError};
use crate::types::paper::{PaperRecord, PaperSource};

pub struct ArxivIndex {
    http: reqwest::Client,
    base_url: String,
    summary_max_chars: usize,
}

impl ArxivIndex {
    pub fn new(http: reqwest::Client, base_url: &str, summary_max_chars: usize) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            summary_max_chars,
        }
    }
}

#[async_trait]
impl PaperIndex for ArxivIndex {
    fn source(&self) -> PaperSource {
        PaperSource::Arxiv
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<PaperRecord>, SearchError> {
        let max_results = max_results.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("search_query", query),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "relevance"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                index: PaperSource::Arxiv,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_atom_feed(&body, self.summary_max_chars)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
    AuthorName,
}

#[derive(Default)]
struct EntryBuilder {
    id: String,
    title: String,
    summary: String,
    published: String,
    authors: Vec<String>,
    author_name: String,
    pdf_url: Option<String>,
}

impl EntryBuilder {
    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Id => &mut self.id,
            Field::Title => &mut self.title,
            Field::Summary => &mut self.summary,
            Field::Published => &mut self.published,
            Field::AuthorName => &mut self.author_name,
        }
    }

    fn finish(self, summary_max_chars: usize) -> Result<PaperRecord, SearchError> {
        let summary = collapse_whitespace(&self.summary);
        // arXiv 以特殊条目报告查询错误
        if self.id.contains("/api/errors") {
            return Err(SearchError::Api(summary));
        }

        let published = self.published.trim();
        let published = published.get(..10).unwrap_or(published).to_string();
        let pdf_url = self.pdf_url.unwrap_or_else(|| self.id.trim().to_string());

        Ok(PaperRecord::new(
            collapse_whitespace(&self.title),
            self.authors,
            &summary,
            published,
            pdf_url,
            PaperSource::Arxiv,
            summary_max_chars,
        ))
    }
}

/// 解析 arXiv 返回的 Atom 文档
pub fn parse_atom_feed(
    xml: &str,
    summary_max_chars: usize,
) -> Result<Vec<PaperRecord>, SearchError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut papers = Vec::new();

    let mut entry: Option<EntryBuilder> = None;
    let mut in_author = false;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = element_name(e);
                if name == "entry" {
                    entry = Some(EntryBuilder::default());
                } else if let Some(current) = entry.as_mut() {
                    match name.as_str() {
                        "author" => in_author = true,
                        "name" if in_author => field = Some(Field::AuthorName),
                        "id" if !in_author => field = Some(Field::Id),
                        "title" if !in_author => field = Some(Field::Title),
                        "summary" if !in_author => field = Some(Field::Summary),
                        "published" if !in_author => field = Some(Field::Published),
                        "link" => read_pdf_link(e, current),
                        _ => {}
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                if element_name(e) == "link"
                    && let Some(current) = entry.as_mut()
                {
                    read_pdf_link(e, current);
                }
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(current), Some(active)) = (entry.as_mut(), field) {
                    let text = e
                        .unescape()
                        .map_err(|err| SearchError::Parse(err.to_string()))?;
                    current.field_mut(active).push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => {
                let local_name = e.local_name();
                let name = String::from_utf8_lossy(local_name.as_ref());
                match name.as_ref() {
                    "entry" => {
                        if let Some(finished) = entry.take() {
                            papers.push(finished.finish(summary_max_chars)?);
                        }
                        in_author = false;
                    }
                    "author" => {
                        if let Some(current) = entry.as_mut() {
                            let author = collapse_whitespace(&current.author_name);
                            if !author.is_empty() {
                                current.authors.push(author);
                            }
                            current.author_name.clear();
                        }
                        in_author = false;
                    }
                    _ => {}
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SearchError::Parse(format!(
                    "Atom 文档第 {} 字节处出错: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(papers)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn read_pdf_link(e: &BytesStart<'_>, entry: &mut EntryBuilder) {
    let mut is_pdf = false;
    let mut href = None;
    for attr in e.attributes().flatten() {
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => continue,
        };
        match attr.key.local_name().as_ref() {
            b"title" => is_pdf = value == "pdf",
            b"href" => href = Some(value),
            _ => {}
        }
    }
    if is_pdf && let Some(href) = href {
        entry.pdf_url = Some(href);
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
