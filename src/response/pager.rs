use crate::constants;
use crate::engine::assembler::PreparedRequest;
use crate::error::Error;
use crate::response::normalizer::{normalize_resources, Record};
use crate::response::wire::{Document, PrimaryData};
use crate::transport::{ApiRequest, Transport};
use serde_json::Value;

/// Where requests are sent and which headers every page carries
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Scheme, host and base path, without a trailing slash
    pub base_url: String,
    pub headers: Vec<(String, String)>,
}

/// Final result of a paged call
#[derive(Debug, Clone, PartialEq)]
pub enum PagedOutput {
    /// Records of every page, in order
    Records(Vec<Record>),
    /// A singular resource response
    Single(Record),
    /// A response that is not in the normalized wire format
    Raw(String),
    /// The server answered with an empty body
    Empty,
}

impl PagedOutput {
    /// Renders the output for stdout; `None` when there is nothing to print
    ///
    /// # Errors
    /// Returns `Json` if a record cannot be serialized.
    pub fn render(&self) -> Result<Option<String>, Error> {
        let rendered = match self {
            Self::Records(records) => serde_json::to_string_pretty(records)?,
            Self::Single(record) => serde_json::to_string_pretty(record)?,
            Self::Raw(body) => serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|value| serde_json::to_string_pretty(&value).ok())
                .unwrap_or_else(|| body.clone()),
            Self::Empty => return Ok(None),
        };
        Ok(Some(rendered))
    }
}

/// Fetches consecutive pages until the server stops announcing a next one
pub struct PageDriver<'t, T: Transport + ?Sized> {
    transport: &'t T,
    page_size: u32,
}

impl<'t, T: Transport + ?Sized> PageDriver<'t, T> {
    pub const fn new(transport: &'t T, page_size: u32) -> Self {
        Self {
            transport,
            page_size,
        }
    }

    /// Runs the request across pages and normalizes the result
    ///
    /// # Errors
    /// - `RemoteError` on any non-success status; earlier pages are discarded
    /// - `MalformedResponse` when a normalized page cannot be decoded
    /// - `Network` when the transport fails
    pub fn run(&self, request: &PreparedRequest, endpoint: &Endpoint) -> Result<PagedOutput, Error> {
        let mut records: Vec<Record> = Vec::new();

        for page in 1u32.. {
            let api_request = self.page_request(request, endpoint, page)?;
            let response = self.transport.send(&api_request)?;

            if !response.is_success() {
                return Err(Error::RemoteError {
                    status: response.status,
                    body: response.body,
                });
            }

            if response.body.trim().is_empty() {
                tracing::debug!(page, "empty response body");
                return Ok(if records.is_empty() {
                    PagedOutput::Empty
                } else {
                    PagedOutput::Records(records)
                });
            }

            if !constants::is_json_api_content_type(&response.content_type) {
                tracing::debug!(page, content_type = %response.content_type, "raw response");
                return Ok(PagedOutput::Raw(response.body));
            }

            let document: Document = serde_json::from_str(&response.body)
                .map_err(|e| Error::malformed_response(format!("page {page}: {e}")))?;
            let data = document
                .primary_data()
                .map_err(|e| Error::malformed_response(format!("page {page}: {e}")))?;

            match data {
                PrimaryData::Empty => break,
                PrimaryData::One(resource) => {
                    let mut normalized =
                        normalize_resources(std::slice::from_ref(&resource), &document.included);
                    return Ok(normalized
                        .pop()
                        .map_or(PagedOutput::Empty, PagedOutput::Single));
                }
                PrimaryData::Many(resources) => {
                    tracing::debug!(page, count = resources.len(), "received page");
                    records.extend(normalize_resources(&resources, &document.included));
                }
            }

            if !document.has_next_page() {
                break;
            }
        }

        Ok(PagedOutput::Records(records))
    }

    fn page_request(
        &self,
        request: &PreparedRequest,
        endpoint: &Endpoint,
        page: u32,
    ) -> Result<ApiRequest, Error> {
        let raw_url = format!("{}{}", endpoint.base_url, request.path);
        let mut url = reqwest::Url::parse(&raw_url)
            .map_err(|e| Error::config(format!("invalid request URL '{raw_url}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &request.query {
                pairs.append_pair(name, value);
            }
            pairs.append_pair(constants::PARAM_PAGE_SIZE, &self.page_size.to_string());
            pairs.append_pair(constants::PARAM_PAGE_NUMBER, &page.to_string());
        }

        let mut headers = endpoint.headers.clone();
        if request.body.is_some() {
            if let Some(content_type) = &request.content_type {
                headers.push((
                    constants::HEADER_CONTENT_TYPE.to_string(),
                    content_type.clone(),
                ));
            }
        }

        Ok(ApiRequest {
            method: request.method.clone(),
            url: url.to_string(),
            headers,
            body: request.body.clone(),
        })
    }
}
