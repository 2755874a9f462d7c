//! Cache en memoria
//!
//! Implementación de `CacheOperations` para desarrollo local y tests, con
//! expiración por TTL y estadísticas de aciertos.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use super::CacheOperations;

#[derive(Debug, Clone)]
struct CachedEntry {
    value: String,
    expires_at: Instant,
}

/// Estadísticas del cache
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries_expired: u64,
    pub entries_deleted: u64,
}

#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CachedEntry>>,
    stats: RwLock<CacheStats>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheOperations for MemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        let mut stats = self.stats.write().await;

        let now = Instant::now();
        let live = entries
            .get(key)
            .map(|entry| (entry.expires_at > now, entry.value.clone()));

        match live {
            Some((true, value)) => {
                stats.hits += 1;
                debug!("📥 Cache HIT para clave: {}", key);
                Ok(Some(value))
            }
            Some((false, _)) => {
                entries.remove(key);
                stats.entries_expired += 1;
                stats.misses += 1;
                debug!("⏰ Cache MISS (expirado) para clave: {}", key);
                Ok(None)
            }
            None => {
                stats.misses += 1;
                debug!("❌ Cache MISS para clave: {}", key);
                Ok(None)
            }
        }
    }

    async fn set_raw(&self, key: &str, value: String, ttl: u64) -> Result<()> {
        let entry = CachedEntry {
            value,
            expires_at: Instant::now() + Duration::from_secs(ttl),
        };
        self.entries.write().await.insert(key.to_string(), entry);
        debug!("💾 Cache SET para clave: {} (TTL: {}s)", key, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.entries.write().await.remove(key).is_some() {
            self.stats.write().await.entries_deleted += 1;
            debug!("🗑️ Cache DELETE para clave: {}", key);
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .map_or(false, |entry| entry.expires_at > Instant::now()))
    }
}
