//! Banner storage collaborator
//!
//! Stores uploaded banner images in S3 when `BANNER_BUCKET_NAME` is set,
//! falling back to a local directory otherwise. Either way the caller gets
//! back a resolvable URL (or local path) to persist on the event.

use anyhow::Result;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Banner storage backend
#[derive(Clone)]
pub enum BannerStorage {
    S3 {
        client: aws_sdk_s3::Client,
        bucket: String,
        public_base: String,
    },
    Local {
        dir: PathBuf,
    },
}

impl BannerStorage {
    /// Initialize the storage backend from the environment
    ///
    /// S3 is used when `BANNER_BUCKET_NAME` is set; otherwise uploads land
    /// under `UPLOAD_DIR` (default `uploads/`).
    pub async fn from_env() -> Self {
        match env::var("BANNER_BUCKET_NAME") {
            Ok(bucket) => {
                let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
                let client = aws_sdk_s3::Client::new(&config);
                let public_base = env::var("BANNER_PUBLIC_URL")
                    .unwrap_or_else(|_| format!("https://{}.s3.amazonaws.com", bucket));

                info!("Banner storage: S3 bucket {}", bucket);
                BannerStorage::S3 {
                    client,
                    bucket,
                    public_base,
                }
            }
            Err(_) => {
                let dir =
                    PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()));
                info!("Banner storage: local directory {}", dir.display());
                BannerStorage::Local { dir }
            }
        }
    }

    /// Store a banner and return its publicly resolvable URL or local path
    pub async fn store(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        match self {
            BannerStorage::S3 {
                client,
                bucket,
                public_base,
            } => {
                client
                    .put_object()
                    .bucket(bucket)
                    .key(key)
                    .content_type(content_type)
                    .body(ByteStream::from(bytes))
                    .send()
                    .await?;

                Ok(format!("{}/{}", public_base.trim_end_matches('/'), key))
            }
            BannerStorage::Local { dir } => {
                let path = dir.join(key);
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(&path, bytes).await?;

                Ok(format!("/{}", path.display()))
            }
        }
    }
}

/// Map an image content type to a file extension for the storage key
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_known_types() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("application/pdf"), "bin");
    }

    #[tokio::test]
    async fn test_local_store_writes_file() {
        let dir = std::env::temp_dir().join(format!("banners-{}", uuid::Uuid::new_v4()));
        let storage = BannerStorage::Local { dir: dir.clone() };

        let url = storage
            .store("banners/test.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();

        assert!(url.ends_with("banners/test.png"));
        let written = tokio::fs::read(dir.join("banners/test.png")).await.unwrap();
        assert_eq!(written, vec![1, 2, 3]);

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }
}
