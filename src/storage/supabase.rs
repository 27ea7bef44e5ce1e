use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{AttachmentError, AttachmentStore, Upload, object_key, validate_prefix, validate_upload};

/// Supabase Storage backed attachment store.
///
/// Objects live in a private bucket; reads go through signed URLs, which are
/// cached for most of their lifetime so a busy quote page does not re-sign on
/// every request.
#[derive(Clone)]
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
    signed_url_ttl: Duration,
    signed: Arc<Cache<String, String>>,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl SupabaseStorage {
    pub fn new(base_url: &str, service_key: &str, bucket: &str, signed_url_ttl: Duration) -> Self {
        // Leave a margin so a cached URL is never handed out about to expire.
        let cache_ttl = signed_url_ttl.mul_f32(0.8);
        let signed = Arc::new(
            Cache::builder()
                .time_to_live(cache_ttl)
                .max_capacity(10_000)
                .build(),
        );

        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            bucket: bucket.to_string(),
            signed_url_ttl,
            signed,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{key}", self.base_url, self.bucket)
    }

    fn sign_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/sign/{}/{key}", self.base_url, self.bucket)
    }
}

#[async_trait]
impl AttachmentStore for SupabaseStorage {
    async fn store(&self, upload: Upload, prefix: &str) -> Result<String, AttachmentError> {
        let ext = validate_upload(&upload)?;
        validate_prefix(prefix)?;
        let key = object_key(prefix, &ext);

        debug!("Uploading {} ({} bytes) to {key}", upload.filename, upload.content.len());

        let response = self
            .client
            .post(self.object_url(&key))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("Content-Type", upload.content_type)
            .header("x-upsert", "false")
            .body(upload.content)
            .send()
            .await
            .map_err(|e| AttachmentError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttachmentError::UploadFailed(format!("HTTP {status}")));
        }

        Ok(key)
    }

    async fn sign(&self, reference: &str) -> Result<String, AttachmentError> {
        if let Some(cached) = self.signed.get(reference).await {
            return Ok(cached);
        }

        let response = self
            .client
            .post(self.sign_url(reference))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .json(&serde_json::json!({ "expiresIn": self.signed_url_ttl.as_secs() }))
            .send()
            .await
            .map_err(|e| AttachmentError::SigningFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttachmentError::SigningFailed(format!("HTTP {status}")));
        }

        let body: SignResponse = response
            .json()
            .await
            .map_err(|e| AttachmentError::SigningFailed(format!("Bad sign response: {e}")))?;

        // Supabase answers with a path relative to /storage/v1.
        let url = format!("{}/storage/v1{}", self.base_url, body.signed_url);
        self.signed.insert(reference.to_string(), url.clone()).await;
        Ok(url)
    }
}
