// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S3 archive writer

use super::{ArchiveAdapter, ArchiveError};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use fv_core::{ArchiveConfig, ArchiveKey};
use sha2::{Digest, Sha256};

/// Error codes S3 (and compatible stores) return for a checksum mismatch
const INTEGRITY_ERROR_CODES: [&str; 4] = [
    "BadDigest",
    "InvalidDigest",
    "XAmzContentChecksumMismatch",
    "XAmzContentSHA256Mismatch",
];

/// Writes each archival record as a private object with a SHA-256 checksum
#[derive(Clone)]
pub struct S3ArchiveAdapter {
    client: Client,
    bucket: String,
}

impl S3ArchiveAdapter {
    /// Credentials come from the default AWS provider chain
    #[tracing::instrument(level = "debug", skip(cfg), fields(bucket = %cfg.bucket))]
    pub async fn new(cfg: &ArchiveConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &cfg.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &cfg.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let shared = loader.load().await;
        let s3_cfg = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(cfg.endpoint.is_some())
            .build();

        Self {
            client: Client::from_conf(s3_cfg),
            bucket: cfg.bucket.clone(),
        }
    }
}

#[async_trait]
impl ArchiveAdapter for S3ArchiveAdapter {
    async fn put(&self, key: &ArchiveKey, payload: Bytes) -> Result<(), ArchiveError> {
        let checksum = payload_checksum(&payload);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .body(ByteStream::from(payload))
            .checksum_sha256(checksum)
            .acl(ObjectCannedAcl::Private)
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| classify_put_failure(e.code(), DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

/// Base64 SHA-256 digest as expected by `x-amz-checksum-sha256`
pub fn payload_checksum(payload: &[u8]) -> String {
    BASE64.encode(Sha256::digest(payload))
}

/// Checksum rejections are integrity failures; everything else is a backend error
pub fn classify_put_failure(code: Option<&str>, message: String) -> ArchiveError {
    let is_integrity = code.is_some_and(|c| INTEGRITY_ERROR_CODES.contains(&c))
        || message.to_ascii_lowercase().contains("checksum mismatch");
    if is_integrity {
        ArchiveError::Integrity(message)
    } else {
        ArchiveError::Backend(message)
    }
}
