//! Configuración de cache
//!
//! Este módulo contiene la configuración para el sistema de cache.

use serde::{Deserialize, Serialize};

/// Configuración del cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub redis_url: Option<String>,
    pub default_ttl: u64,
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            default_ttl: 300, // 5 minutos
            key_prefix: "dealership".to_string(),
        }
    }
}

impl CacheConfig {
    /// Generar clave de cache con prefijo
    pub fn make_key(&self, prefix: &str, identifier: &str) -> String {
        format!("{}:{}:{}", self.key_prefix, prefix, identifier)
    }

    pub fn vehicle_id_key(&self, id: &uuid::Uuid) -> String {
        self.make_key("vehicle:id", &id.to_string())
    }

    pub fn vehicle_vin_key(&self, vin: &str) -> String {
        self.make_key("vehicle:vin", vin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_keys() {
        let config = CacheConfig::default();
        let id = uuid::Uuid::nil();
        assert_eq!(
            config.vehicle_id_key(&id),
            "dealership:vehicle:id:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            config.vehicle_vin_key("WVWZZZ1JZXW000001"),
            "dealership:vehicle:vin:WVWZZZ1JZXW000001"
        );
    }
}
