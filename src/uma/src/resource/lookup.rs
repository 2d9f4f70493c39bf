//! Resolution of internal resource types to persisted resources

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::types::{Resource, ResourceType};
use crate::error::Result;
use crate::store::ResourceStore;

/// Resolves a [`ResourceType`] to its persisted [`Resource`]
///
/// Creates the resource on first use and repairs duplicates: when more than
/// one resource of a type exists, the first is kept and the rest deleted.
#[derive(Clone)]
pub struct ResourceLookup {
    resources: Arc<dyn ResourceStore>,
}

impl ResourceLookup {
    pub fn new(resources: Arc<dyn ResourceStore>) -> Self {
        Self { resources }
    }

    /// Resolve `resource_type`, creating or deduplicating as needed
    #[tracing::instrument(skip_all, fields(resource_type = %resource_type))]
    pub async fn get_resource(&self, resource_type: ResourceType) -> Result<Resource> {
        let mut found = self
            .resources
            .find_resources_by_type(resource_type.as_str())
            .await?;

        if found.is_empty() {
            let resource = Resource::internal(resource_type);
            self.resources.add_resource(resource.clone()).await?;
            info!("Created internal resource {} for type {}", resource.id, resource_type);
            return Ok(resource);
        }

        if found.len() > 1 {
            warn!(
                "Found {} resources of type {}, keeping {}",
                found.len(),
                resource_type,
                found[0].id
            );
            for duplicate in found.drain(1..) {
                self.resources.remove_resource(&duplicate.id).await?;
                debug!("Removed duplicate resource {}", duplicate.id);
            }
        }

        Ok(found.swap_remove(0))
    }
}
