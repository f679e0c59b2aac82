use anyhow::{Context, Result};
use object_store::{ObjectStore, aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory};
use std::sync::Arc;
use url::Url;

use crate::config::StorageConfig;

/// Region used for S3 DSNs that neither name one nor find one in the environment.
pub const DEFAULT_S3_REGION: &str = "us-east-1";

/// Create the report object store from storage configuration
pub fn create_object_store(storage_config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    create_object_store_from_dsn(&storage_config.dsn)
}

fn parse_dsn(dsn: &str) -> Result<Url> {
    Url::parse(dsn).map_err(|e| anyhow::anyhow!("Invalid storage DSN '{}': {}", dsn, e))
}

/// Filesystem path of a `file://` DSN.
///
/// `file:///.data/exports` is relative to the working directory, any other
/// path is absolute.
fn file_path(url: &Url) -> Result<String> {
    let path = url.path();
    if path.is_empty() || path == "/" {
        anyhow::bail!("File DSN must specify a path: file:///path/to/storage");
    }
    let path = path.strip_prefix('/').filter(|p| p.starts_with('.')).unwrap_or(path);
    Ok(path.to_string())
}

/// Create an object store from a DSN string
///
/// Supported schemes: `memory://`, `file:///path` (created if missing) and
/// `s3://[access_key:secret_key@]host[:port]/bucket[?region=...]`.
pub fn create_object_store_from_dsn(dsn: &str) -> Result<Arc<dyn ObjectStore>> {
    let url = parse_dsn(dsn)?;

    match url.scheme() {
        "file" => {
            let path = file_path(&url)?;
            std::fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create storage directory '{path}'"))?;
            Ok(Arc::new(LocalFileSystem::new_with_prefix(&path)?))
        }
        "memory" => Ok(Arc::new(InMemory::new())),
        "s3" => {
            let builder = create_s3_builder_from_dsn(&url)?;
            Ok(Arc::new(builder.build()?))
        }
        scheme => Err(anyhow::anyhow!(
            "Unsupported storage scheme: {}. Supported: file, memory, s3",
            scheme
        )),
    }
}

/// Create an S3 builder from a DSN
/// DSN format: s3://[access_key:secret_key@]host[:port]/bucket[?region=ca-central-1]
pub fn create_s3_builder_from_dsn(dsn: &Url) -> Result<AmazonS3Builder> {
    let host = dsn
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("Missing S3 host in DSN"))?;
    let port = dsn.port();
    let bucket = dsn.path().trim_start_matches('/');

    if bucket.is_empty() {
        anyhow::bail!("S3 DSN must specify a bucket: s3://host/bucket");
    }

    let region = dsn
        .query_pairs()
        .find(|(key, _)| key == "region")
        .map(|(_, value)| value.into_owned())
        .or_else(|| std::env::var("AWS_DEFAULT_REGION").ok())
        .unwrap_or_else(|| DEFAULT_S3_REGION.to_string());

    let mut builder = AmazonS3Builder::new()
        .with_bucket_name(bucket)
        .with_region(region);

    let access_key = dsn.username();
    if access_key.is_empty() {
        if let Ok(env_key) = std::env::var("AWS_ACCESS_KEY_ID") {
            builder = builder.with_access_key_id(env_key);
        }
        if let Ok(env_secret) = std::env::var("AWS_SECRET_ACCESS_KEY") {
            builder = builder.with_secret_access_key(env_secret);
        }
    } else {
        builder = builder
            .with_access_key_id(access_key)
            .with_secret_access_key(dsn.password().unwrap_or(""));
    }

    // S3-compatible stores (MinIO etc.) need an explicit path-style endpoint
    if !host.contains("amazonaws.com") {
        let scheme = if port == Some(443) { "https" } else { "http" };
        let endpoint = match port {
            Some(p) => format!("{scheme}://{host}:{p}"),
            None => format!("{scheme}://{host}"),
        };
        builder = builder
            .with_endpoint(endpoint)
            .with_allow_http(true)
            .with_virtual_hosted_style_request(false);
    }

    Ok(builder)
}
