//! Bookable service directory.

use std::collections::HashMap;
use std::sync::Arc;

use common::{Money, ServiceId};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{CatalogError, Result};

/// A bookable pet-care service (grooming, walking, vet visit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: ServiceId,
    pub name: String,
    pub price: Money,
    pub active: bool,
}

impl ServiceRecord {
    /// Creates a new active service record.
    pub fn new(id: ServiceId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            active: true,
        }
    }
}

/// In-memory directory of bookable services.
#[derive(Clone, Default)]
pub struct ServiceDirectory {
    services: Arc<RwLock<HashMap<ServiceId, ServiceRecord>>>,
}

impl ServiceDirectory {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a service record. Used for seeding.
    pub async fn insert(&self, record: ServiceRecord) {
        self.services.write().await.insert(record.id, record);
    }

    /// Returns a bookable service, rejecting unknown or inactive ones.
    pub async fn get_bookable(&self, service_id: ServiceId) -> Result<ServiceRecord> {
        let services = self.services.read().await;
        let record = services
            .get(&service_id)
            .ok_or(CatalogError::ServiceNotFound(service_id))?;
        if !record.active {
            return Err(CatalogError::ServiceUnavailable(service_id));
        }
        Ok(record.clone())
    }

    /// Returns all service records.
    pub async fn all(&self) -> Vec<ServiceRecord> {
        self.services.read().await.values().cloned().collect()
    }
}
