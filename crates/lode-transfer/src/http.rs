//! HTTP backends for blob transfer against short-lived signed URLs.
//!
//! Downloads stream straight off the response body. Uploads use the
//! storage provider's staged-block protocol: each chunk is PUT as a named
//! block, and the blob only becomes visible to readers when the final
//! block list is committed. That staging is what gives the pipeline its
//! all-or-nothing guarantee over plain HTTP.

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::{TransferError, TransferResult};
use crate::traits::{BlobSink, BlobSource, SinkFactory, SourceFactory, UrlIssuer};

/// Append query parameters to a signed URL, keeping its existing signature
/// parameters intact.
fn with_params(url: &Url, params: &[(&str, &str)]) -> Url {
    let mut url = url.clone();
    for (key, value) in params {
        url.query_pairs_mut().append_pair(key, value);
    }
    url
}

/// Block ids must decode to equal lengths within one blob, so the block
/// index is zero-padded before encoding.
fn block_id(index: usize) -> String {
    BASE64.encode(format!("{index:032}"))
}

fn block_list_xml(block_ids: &[String]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?><BlockList>"#);
    for id in block_ids {
        xml.push_str("<Latest>");
        xml.push_str(id);
        xml.push_str("</Latest>");
    }
    xml.push_str("</BlockList>");
    xml
}

/// Streaming read of one blob from a signed download URL.
pub struct HttpBlobSource {
    blob: String,
    stream: Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>,
}

#[async_trait]
impl BlobSource for HttpBlobSource {
    async fn next_chunk(&mut self) -> TransferResult<Option<Bytes>> {
        match self.stream.next().await {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(source)) => Err(TransferError::Transport { blob: self.blob.clone(), source }),
            None => Ok(None),
        }
    }
}

/// Staged-block write of one blob against a signed upload URL.
///
/// Chunks are uploaded as individual blocks; nothing is readable until
/// [`BlobSink::commit`] PUTs the assembled block list. Dropping the sink
/// without committing leaves only orphaned staged blocks, which the
/// storage backend garbage-collects.
pub struct BlockBlobSink {
    blob: String,
    client: Client,
    url: Url,
    block_ids: Vec<String>,
}

#[async_trait]
impl BlobSink for BlockBlobSink {
    async fn write_chunk(&mut self, chunk: Bytes) -> TransferResult<()> {
        let id = block_id(self.block_ids.len());
        let url = with_params(&self.url, &[("comp", "block"), ("blockid", &id)]);

        let response = self
            .client
            .put(url)
            .body(chunk)
            .send()
            .await
            .map_err(|source| TransferError::Transport { blob: self.blob.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Rejected { blob: self.blob.clone(), status: status.as_u16() });
        }

        self.block_ids.push(id);
        Ok(())
    }

    async fn commit(&mut self) -> TransferResult<()> {
        let url = with_params(&self.url, &[("comp", "blocklist")]);
        let body = block_list_xml(&self.block_ids);

        // A transport fault here is ambiguous (the commit may or may not
        // have landed), so it is reported as a commit failure rather than
        // a retryable transport error.
        let response = self
            .client
            .put(url)
            .header("content-type", "application/xml")
            .body(body)
            .send()
            .await
            .map_err(|e| TransferError::Commit { blob: self.blob.clone(), reason: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Commit {
                blob: self.blob.clone(),
                reason: format!("block list rejected with status {status}"),
            });
        }

        debug!(blob = %self.blob, blocks = self.block_ids.len(), "block list committed");
        Ok(())
    }
}

/// Opens streaming downloads by minting a signed URL per blob.
pub struct HttpSourceFactory {
    client: Client,
    issuer: Arc<dyn UrlIssuer>,
}

impl HttpSourceFactory {
    pub fn new(client: Client, issuer: Arc<dyn UrlIssuer>) -> Self {
        Self { client, issuer }
    }
}

#[async_trait]
impl SourceFactory for HttpSourceFactory {
    async fn open_source(&self, blob: &str) -> TransferResult<Box<dyn BlobSource>> {
        let url = self.issuer.issue(blob).await?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| TransferError::Transport { blob: blob.to_owned(), source })?;

        Ok(Box::new(HttpBlobSource {
            blob: blob.to_owned(),
            stream: Box::pin(response.bytes_stream()),
        }))
    }
}

/// Opens staged-block uploads by minting a signed URL per blob.
pub struct HttpSinkFactory {
    client: Client,
    issuer: Arc<dyn UrlIssuer>,
}

impl HttpSinkFactory {
    pub fn new(client: Client, issuer: Arc<dyn UrlIssuer>) -> Self {
        Self { client, issuer }
    }
}

#[async_trait]
impl SinkFactory for HttpSinkFactory {
    async fn open_sink(&self, blob: &str) -> TransferResult<Box<dyn BlobSink>> {
        let url = self.issuer.issue(blob).await?;
        Ok(Box::new(BlockBlobSink {
            blob: blob.to_owned(),
            client: self.client.clone(),
            url,
            block_ids: Vec::new(),
        }))
    }
}
