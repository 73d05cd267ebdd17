//! 缓存层
//!
//! 后端以插件形式注册（`moka` 进程内缓存、`redis` 分布式缓存），启动时按 `cache.type` 选择。

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::{CacheResult, ObjectCache, ObjectCacheExt};

/// 声明一个缓存插件，程序加载时自动注册到插件表
///
/// 被声明的类型需要提供 `fn new() -> crate::errors::Result<Self>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
