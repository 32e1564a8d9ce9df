use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem stand-in for object storage: each bucket is a directory under
/// the base path and keys are relative paths below it. Used for offline runs
/// and the integration suite.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn bucket_root(&self, bucket: &str) -> PathBuf {
        Path::new(&self.base_path).join(bucket)
    }

    fn collect_keys(root: &Path, dir: &Path, keys: &mut Vec<String>) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                Self::collect_keys(root, &path, keys)?;
            } else if let Ok(rel) = path.strip_prefix(root) {
                keys.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
        Ok(())
    }
}

impl Storage for LocalStorage {
    async fn head_bucket(&self, bucket: &str) -> Result<()> {
        let root = self.bucket_root(bucket);
        if root.is_dir() {
            Ok(())
        } else {
            Err(EtlError::ConnectivityError {
                bucket: bucket.to_string(),
                message: format!("No such directory: {}", root.display()),
            })
        }
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let root = self.bucket_root(bucket);
        let mut keys = Vec::new();
        if root.is_dir() {
            Self::collect_keys(&root, &root, &mut keys)?;
        }
        keys.retain(|k| k.starts_with(prefix) && k.ends_with(".json") && k != prefix);
        keys.sort();
        Ok(keys)
    }

    async fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.bucket_root(bucket).join(key))?;
        Ok(data)
    }

    async fn write_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        _content_type: &str,
    ) -> Result<()> {
        let full_path = self.bucket_root(bucket).join(key);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}
