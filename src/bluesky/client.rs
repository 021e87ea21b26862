// Public AT Protocol client — unauthenticated XRPC over HTTP.
//
// All AT Protocol read endpoints used by the labeler are public and don't
// require authentication: record fetching, profile lookups, and blob
// downloads. A thin reqwest wrapper with a generic XRPC GET helper.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Default public API endpoint for AT Protocol read operations.
pub const DEFAULT_PUBLIC_API_URL: &str = "https://public.api.bsky.app";

/// Unauthenticated HTTP client for public AT Protocol XRPC endpoints.
pub struct PublicAtpClient {
    client: reqwest::Client,
    base_url: String,
}

impl PublicAtpClient {
    /// Create a new public API client pointing at the given base URL.
    ///
    /// Defaults to `https://public.api.bsky.app` — pass a different URL
    /// for testing or alternate PDS instances.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("sift/0.1 (policy-labeler)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Make a GET request to an XRPC endpoint and deserialize the response.
    ///
    /// `nsid` is the XRPC method name (e.g. "com.atproto.repo.getRecord").
    /// `params` are query string key-value pairs.
    pub async fn xrpc_get<T: DeserializeOwned>(
        &self,
        nsid: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/xrpc/{}", self.base_url, nsid);

        debug!(nsid = nsid, "XRPC GET request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("XRPC request failed: {nsid}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("XRPC {nsid} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize {nsid} response"))
    }

    /// Resolve a handle to its DID via the public API.
    pub async fn resolve_handle(&self, handle: &str) -> Result<String> {
        let resp: ResolveHandleResponse = self
            .xrpc_get(
                "com.atproto.identity.resolveHandle",
                &[("handle", handle)],
            )
            .await
            .with_context(|| format!("Failed to resolve handle @{handle}"))?;
        Ok(resp.did)
    }

    /// Look up the PDS service endpoint for a DID via the PLC directory.
    ///
    /// Queries plc.directory for the DID document and extracts the
    /// `#atproto_pds` service endpoint. Blob downloads go to the server
    /// that hosts the user's repo, not the public AppView.
    pub async fn resolve_pds_url(&self, did: &str) -> Result<String> {
        let url = format!("https://plc.directory/{did}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch DID document for {did}"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("PLC directory returned {status} for {did}");
        }

        let doc: DidDocument = response
            .json()
            .await
            .context("Failed to parse DID document")?;

        doc.service
            .iter()
            .find(|s| s.id == "#atproto_pds")
            .map(|s| s.service_endpoint.clone())
            .ok_or_else(|| anyhow::anyhow!("No PDS service found in DID document for {did}"))
    }

    /// Download a blob's raw bytes from the PDS that hosts it.
    ///
    /// `com.atproto.sync.getBlob` is served by the repo's own PDS, so the
    /// request goes to `pds_url` rather than the configured AppView.
    pub async fn fetch_blob(&self, pds_url: &str, did: &str, cid: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/xrpc/com.atproto.sync.getBlob",
            pds_url.trim_end_matches('/')
        );

        debug!(did = did, cid = cid, "Fetching blob");

        let response = self
            .client
            .get(&url)
            .query(&[("did", did), ("cid", cid)])
            .send()
            .await
            .with_context(|| format!("Blob request failed for {cid}"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("getBlob returned {status} for {cid}");
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read blob body for {cid}"))?;

        Ok(bytes.to_vec())
    }
}

// -- Serde types for identity resolution --

#[derive(Deserialize)]
struct ResolveHandleResponse {
    did: String,
}

#[derive(Deserialize)]
struct DidDocument {
    service: Vec<DidService>,
}

#[derive(Deserialize)]
struct DidService {
    id: String,
    #[serde(rename = "serviceEndpoint")]
    service_endpoint: String,
}
