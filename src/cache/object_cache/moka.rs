use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;
use crate::errors::{Result, TutorError};

declare_object_cache_plugin!("moka", MokaCacheWrapper);

/// 进程内缓存，值统一存储为 JSON 字符串
pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self> {
        let config = AppConfig::get();
        Self::with_settings(config.cache.memory.max_capacity, config.cache.default_ttl)
    }

    pub fn with_settings(max_capacity: u64, ttl_secs: u64) -> Result<Self> {
        if max_capacity == 0 {
            return Err(TutorError::cache_connection(
                "cache.memory.max_capacity must be greater than 0",
            ));
        }

        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs.max(1)))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {}s",
            max_capacity, ttl_secs
        );
        Ok(Self { inner })
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => {
                debug!("Cache hit: {}", key);
                CacheResult::Found(value)
            }
            None => {
                debug!("Cache miss: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        // 过期策略在构建时全局设定，单条 TTL 不生效
        if ttl != 0 {
            debug!("Moka ignores per-item TTL for key: {}", key);
        }
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ObjectCacheExt;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        id: i64,
        label: String,
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(MokaCacheWrapper::with_settings(0, 60).is_err());
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_settings(100, 60).unwrap();
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);

        cache.insert_raw("k".into(), "v".into(), 0).await;
        assert_eq!(cache.get_raw("k").await, CacheResult::Found("v".to_string()));

        cache.remove("k").await;
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        let cache = MokaCacheWrapper::with_settings(100, 60).unwrap();
        let sample = Sample {
            id: 7,
            label: "algebra".into(),
        };
        cache.insert("sample:7".into(), &sample, 0).await;
        assert_eq!(cache.get::<Sample>("sample:7").await, CacheResult::Found(sample));

        cache.insert_raw("broken".into(), "not json".into(), 0).await;
        assert_eq!(
            cache.get::<Sample>("broken").await,
            CacheResult::ExistsButNoValue
        );
    }
}
