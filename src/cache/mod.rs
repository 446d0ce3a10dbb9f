use anyhow::Result;
use chrono::Utc;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::config::CacheConfig;

/// 模型回答的磁盘缓存，按prompt的MD5分类存放
pub struct CacheManager {
    config: CacheConfig,
}

/// 缓存条目
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    /// 写入时间（Unix秒）
    pub timestamp: i64,
    /// prompt的MD5哈希值
    pub prompt_hash: String,
}

impl CacheManager {
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    pub fn hash_prompt(&self, prompt: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(prompt.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn get_cache_path(&self, category: &str, hash: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(category)
            .join(format!("{}.json", hash))
    }

    fn is_expired(&self, timestamp: i64) -> bool {
        let expire_seconds = (self.config.expire_hours * 3600) as i64;
        Utc::now().timestamp() - timestamp > expire_seconds
    }

    /// 读取缓存，未命中、过期或损坏时返回None
    pub async fn get<T>(&self, category: &str, prompt: &str) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        if !self.config.enabled {
            return Ok(None);
        }

        let hash = self.hash_prompt(prompt);
        let cache_path = self.get_cache_path(category, &hash);
        if !cache_path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(&cache_path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %cache_path.display(), "读取缓存失败: {}", e);
                return Ok(None);
            }
        };

        match serde_json::from_str::<CacheEntry<T>>(&content) {
            Ok(entry) if self.is_expired(entry.timestamp) => {
                let _ = fs::remove_file(&cache_path).await;
                Ok(None)
            }
            Ok(entry) => {
                tracing::debug!(category, hash = %hash, "命中模型回答缓存");
                Ok(Some(entry.data))
            }
            Err(e) => {
                tracing::warn!(path = %cache_path.display(), "缓存反序列化失败: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn set<T>(&self, category: &str, prompt: &str, data: T) -> Result<()>
    where
        T: Serialize,
    {
        if !self.config.enabled {
            return Ok(());
        }

        let hash = self.hash_prompt(prompt);
        let cache_path = self.get_cache_path(category, &hash);
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let entry = CacheEntry {
            data,
            timestamp: Utc::now().timestamp(),
            prompt_hash: hash,
        };
        let content = serde_json::to_string_pretty(&entry)?;
        fs::write(&cache_path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(temp_dir: &TempDir, enabled: bool) -> CacheManager {
        CacheManager::new(CacheConfig {
            enabled,
            cache_dir: temp_dir.path().to_path_buf(),
            expire_hours: 24,
        })
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let temp_dir = TempDir::new().unwrap();
        let cache = manager(&temp_dir, true);

        cache
            .set("research/coder", "prompt text", "def main(): pass".to_string())
            .await
            .unwrap();

        let cached: Option<String> = cache.get("research/coder", "prompt text").await.unwrap();
        assert_eq!(cached.as_deref(), Some("def main(): pass"));

        let other: Option<String> = cache.get("research/coder", "another prompt").await.unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache_never_hits() {
        let temp_dir = TempDir::new().unwrap();
        let cache = manager(&temp_dir, false);

        cache.set("c", "p", 1u8).await.unwrap();
        assert!(cache.get::<u8>("c", "p").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_removed() {
        let temp_dir = TempDir::new().unwrap();
        let cache = manager(&temp_dir, true);
        let hash = cache.hash_prompt("p");
        let path = temp_dir.path().join("c").join(format!("{}.json", hash));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let stale = CacheEntry {
            data: "old".to_string(),
            timestamp: Utc::now().timestamp() - 25 * 3600,
            prompt_hash: hash,
        };
        std::fs::write(&path, serde_json::to_string(&stale).unwrap()).unwrap();

        assert!(cache.get::<String>("c", "p").await.unwrap().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_hash_prompt_is_md5_hex() {
        let temp_dir = TempDir::new().unwrap();
        let cache = manager(&temp_dir, true);
        assert_eq!(cache.hash_prompt(""), "d41d8cd98f00b204e9800998ecf8427e");
    }
}
