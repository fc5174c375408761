//! Property lookup directory
//!
//! The property -> owner relationship is owned elsewhere in the system; this
//! core only needs a read-mostly lookup to scope exports to one owner and to
//! resolve property display names. The directory keeps that mapping in memory
//! and can be populated through `register`.

use crate::store::types::Property;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory property lookup, keyed by owner
#[derive(Default)]
pub struct PropertyDirectory {
    properties: RwLock<Vec<Property>>,
}

impl PropertyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property to the directory
    pub async fn register(&self, property: Property) -> Property {
        let mut properties = self.properties.write().await;
        properties.push(property.clone());
        tracing::debug!(
            property_id = %property.id,
            owner_id = %property.owner_id,
            "Registered property"
        );
        property
    }

    /// All properties owned by `owner_id`, in registration order
    pub async fn list_owned(&self, owner_id: Uuid) -> Vec<Property> {
        self.properties
            .read()
            .await
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect()
    }

    /// Look up one property by id
    pub async fn get(&self, property_id: Uuid) -> Option<Property> {
        self.properties
            .read()
            .await
            .iter()
            .find(|p| p.id == property_id)
            .cloned()
    }

    /// Check whether `property_id` belongs to `owner_id`
    pub async fn is_owned_by(&self, property_id: Uuid, owner_id: Uuid) -> bool {
        self.properties
            .read()
            .await
            .iter()
            .any(|p| p.id == property_id && p.owner_id == owner_id)
    }
}
