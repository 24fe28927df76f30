//! 对象缓存
//!
//! 后端以插件形式注册（moka 内存缓存、redis），启动时按 `cache.type` 选择。
//! 认证中间件用它缓存 令牌 -> 账号 的解析结果。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// 缓存读取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法判断是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// ttl 为 0 时使用配置的默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

impl dyn ObjectCache {
    /// 读取并反序列化，反序列化失败视为未命中
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<T> {
        match self.get_raw(key).await {
            CacheResult::Found(raw) => match serde_json::from_str(&raw) {
                Ok(value) => CacheResult::Found(value),
                Err(e) => {
                    tracing::debug!("Discarding undecodable cache entry '{}': {}", key, e);
                    CacheResult::NotFound
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    pub async fn insert<T: Serialize + Sync>(&self, key: String, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(raw) => self.insert_raw(key, raw, ttl).await,
            Err(e) => tracing::warn!("Failed to serialize cache entry '{}': {}", key, e),
        }
    }
}

/// 声明并在程序加载时注册一个缓存插件
///
/// 类型需要提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::SchoolError::cache_connection)?;
                        Ok::<Box<dyn $crate::cache::ObjectCache>, $crate::errors::SchoolError>(
                            Box::new(cache),
                        )
                    })
                }),
            );
        }
    };
}
