//! Cache
//!
//! Cache explícito detrás de la interfaz de persistencia. Nunca es una
//! fuente de verdad alternativa: toda escritura pasa por el almacén y después
//! invalida las claves afectadas.

pub mod cache_config;
pub mod memory_cache;
pub mod redis_client;
pub mod vehicle_cache;

use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

pub use cache_config::CacheConfig;
pub use memory_cache::MemoryCache;
pub use redis_client::RedisClient;
pub use vehicle_cache::CachedVehicleStore;

/// Operaciones de cache sobre valores serializados
#[async_trait]
pub trait CacheOperations: Send + Sync {
    async fn get_raw(&self, key: &str) -> Result<Option<String>>;
    async fn set_raw(&self, key: &str, value: String, ttl: u64) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
    async fn exists(&self, key: &str) -> Result<bool>;
}

/// Leer y deserializar; un valor corrupto se trata como MISS
pub async fn get_json<T: DeserializeOwned>(cache: &dyn CacheOperations, key: &str) -> Result<Option<T>> {
    match cache.get_raw(key).await? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("⚠️ Valor de cache inválido para clave {}: {}", key, e);
                cache.delete(key).await?;
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

pub async fn set_json<T: Serialize + Sync>(
    cache: &dyn CacheOperations,
    key: &str,
    value: &T,
    ttl: u64,
) -> Result<()> {
    let serialized = serde_json::to_string(value)?;
    cache.set_raw(key, serialized, ttl).await
}
