/// Related-title extraction
///
/// Scans a title page as a stream of HTML tokens, without building a DOM, and
/// collects the catalog identifiers linked from its related-titles section.
///
/// The scan is a three-state machine:
/// - `Scanning`: each anchor's first `href` is tested for the section marker
///   (substring containment). The marker anchor itself is not collected.
/// - `Collecting`: each anchor's first `href` is matched against
///   `/title/<id>/?ref`; anchors that don't match are skipped.
/// - `Done`: the limit was reached or the document ended. Whatever was
///   collected so far is the result.
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
    TokenizerResult,
};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client as HttpClient;
use tokio::sync::mpsc;

use crate::models::{CatalogId, RelatedTitles};

/// Page chunks buffered between the download and the scanner
const PAGE_CHUNK_BUFFER: usize = 8;

static TITLE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/title/([a-zA-Z0-9]+)/\?ref").expect("title link pattern is valid"));

/// Extracts the catalog identifier from a title link
///
/// `"/title/tt0071562/?ref_=tt_sims_tti"` yields `tt0071562`. Links without
/// the `/?ref` query delimiter yield `None`.
pub fn extract_identifier(link: &str) -> Option<CatalogId> {
    TITLE_LINK
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| CatalogId::new(m.as_str()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    Collecting,
    Done,
}

/// Tokenizer mode for the content of a start tag
///
/// Without a tree builder the tokenizer has no idea that script, style and
/// friends hold text, so the sink switches it the way an HTML parser would.
fn content_mode(tag: &Tag) -> TokenSinkResult<()> {
    match &*tag.name {
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
            TokenSinkResult::RawData(RawKind::Rawtext)
        }
        "plaintext" => TokenSinkResult::Plaintext,
        _ => TokenSinkResult::Continue,
    }
}

/// Token sink driving the related-titles state machine
pub struct RelatedTitleScanner {
    marker: String,
    state: ScanState,
    titles: RelatedTitles,
}

impl RelatedTitleScanner {
    pub fn new(marker: impl Into<String>, limit: usize) -> Self {
        let state = if limit == 0 {
            ScanState::Done
        } else {
            ScanState::Scanning
        };

        Self {
            marker: marker.into(),
            state,
            titles: RelatedTitles::with_capacity(limit),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ScanState::Done
    }

    /// Advances the machine with the link target of one anchor start tag
    pub fn observe_anchor(&mut self, href: &str) -> ScanState {
        match self.state {
            ScanState::Scanning => {
                if href.contains(self.marker.as_str()) {
                    tracing::debug!(marker = %self.marker, "Related titles section found");
                    self.state = ScanState::Collecting;
                }
            }
            ScanState::Collecting => match extract_identifier(href) {
                Some(id) => {
                    self.titles.push(id);
                    if self.titles.is_full() {
                        self.state = ScanState::Done;
                    }
                }
                None => {
                    tracing::debug!(href = %href, "Skipping anchor without a title link");
                }
            },
            ScanState::Done => {}
        }
        self.state
    }

    /// Ends the scan, keeping whatever was collected
    pub fn finish(&mut self) {
        self.state = ScanState::Done;
    }

    /// Takes the collected identifiers, leaving an empty list behind
    pub fn take_titles(&mut self) -> RelatedTitles {
        let capacity = self.titles.capacity();
        std::mem::replace(&mut self.titles, RelatedTitles::with_capacity(capacity))
    }
}

impl TokenSink for RelatedTitleScanner {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        if self.is_done() {
            return TokenSinkResult::Continue;
        }

        match token {
            Token::TagToken(tag) if tag.kind == TagKind::StartTag => {
                if &*tag.name == "a" {
                    if let Some(href) = tag.attrs.iter().find(|attr| &*attr.name.local == "href") {
                        self.observe_anchor(&href.value);
                    }
                    TokenSinkResult::Continue
                } else if tag.self_closing {
                    TokenSinkResult::Continue
                } else {
                    content_mode(&tag)
                }
            }
            Token::EOFToken => {
                self.finish();
                TokenSinkResult::Continue
            }
            _ => TokenSinkResult::Continue,
        }
    }
}

/// Incremental scan over a document delivered in byte chunks
///
/// Chunks may split tags or multi-byte characters anywhere; incomplete UTF-8
/// sequences are held back until the next chunk arrives.
pub struct RelatedTitleStream {
    tokenizer: Tokenizer<RelatedTitleScanner>,
    input: BufferQueue,
    pending: Vec<u8>,
}

impl RelatedTitleStream {
    pub fn new(marker: impl Into<String>, limit: usize) -> Self {
        Self {
            tokenizer: Tokenizer::new(
                RelatedTitleScanner::new(marker, limit),
                TokenizerOpts::default(),
            ),
            input: BufferQueue::new(),
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.tokenizer.sink.state()
    }

    /// Feeds the next chunk of the document and returns the scan state
    pub fn feed(&mut self, chunk: &[u8]) -> ScanState {
        if self.tokenizer.sink.is_done() {
            return ScanState::Done;
        }

        self.pending.extend_from_slice(chunk);
        let text = self.take_decodable();
        self.push_text(text);
        self.state()
    }

    /// Signals end of document and returns the collected identifiers
    pub fn finish(mut self) -> RelatedTitles {
        if !self.pending.is_empty() && !self.tokenizer.sink.is_done() {
            let rest = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            self.push_text(rest);
        }
        self.tokenizer.end();
        self.tokenizer.sink.take_titles()
    }

    fn take_decodable(&mut self) -> String {
        let complete = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => self.pending.len(),
        };
        let rest = self.pending.split_off(complete);
        let bytes = std::mem::replace(&mut self.pending, rest);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn push_text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        self.input.push_back(StrTendril::from(text));
        // The sink never yields scripts, so each feed drains the queue.
        let result = self.tokenizer.feed(&mut self.input);
        debug_assert!(matches!(result, TokenizerResult::Done));
    }
}

/// Scans a complete in-memory document
pub fn scan_document(html: &str, marker: &str, limit: usize) -> RelatedTitles {
    let mut stream = RelatedTitleStream::new(marker, limit);
    stream.feed(html.as_bytes());
    stream.finish()
}

/// Fetches title pages and extracts their related titles
#[derive(Clone)]
pub struct RelatedTitleExtractor {
    http_client: HttpClient,
    page_url: String,
    marker: String,
    limit: usize,
}

impl RelatedTitleExtractor {
    pub fn new(http_client: HttpClient, page_url: String, marker: String, limit: usize) -> Self {
        Self {
            http_client,
            page_url,
            marker,
            limit,
        }
    }

    /// URL of the title page for `id`
    pub fn page_url_for(&self, id: &CatalogId) -> String {
        format!("{}/{}/", self.page_url.trim_end_matches('/'), id)
    }

    /// Streams the title page for `id` and returns its related titles
    ///
    /// The tokenizer runs on a blocking task fed chunk by chunk as the body
    /// arrives; the download stops once the scan is done. Network failures
    /// end the scan early and the identifiers collected so far are returned.
    pub async fn related_titles(&self, id: &CatalogId) -> RelatedTitles {
        let url = self.page_url_for(id);
        let (chunk_tx, mut chunk_rx) = mpsc::channel::<Vec<u8>>(PAGE_CHUNK_BUFFER);

        let marker = self.marker.clone();
        let limit = self.limit;
        let scan = tokio::task::spawn_blocking(move || {
            let mut stream = RelatedTitleStream::new(marker, limit);
            while let Some(chunk) = chunk_rx.blocking_recv() {
                if stream.feed(&chunk) == ScanState::Done {
                    break;
                }
            }
            stream.finish()
        });

        self.stream_page(&url, chunk_tx).await;

        let titles = match scan.await {
            Ok(titles) => titles,
            Err(e) => {
                tracing::error!(error = %e, url = %url, "Related titles scan task failed");
                RelatedTitles::with_capacity(self.limit)
            }
        };

        tracing::info!(
            catalog_id = %id,
            related_count = titles.len(),
            "Related titles extracted"
        );

        titles
    }

    /// Forwards the page body to the scanner until the body ends, the
    /// request fails, or the scanner hangs up
    async fn stream_page(&self, url: &str, chunk_tx: mpsc::Sender<Vec<u8>>) {
        let mut response = match self.http_client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, url = %url, "Title page request failed");
                return;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), url = %url, "Title page returned error status");
        }

        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if chunk_tx.send(chunk.to_vec()).await.is_err() {
                        tracing::debug!(url = %url, "Scan finished before end of page");
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, url = %url, "Title page stream interrupted");
                    break;
                }
            }
        }
    }
}
