//! Entity construction over the facility service and the local sync cache.
//!
//! Requires the `remote` feature (enabled by default).

use tracing::debug;

use crate::cache::FacilityCache;
use crate::client::{entry_ids, ApiClient};
use crate::entity::Entity;
use crate::error::EntityError;
use crate::types::{ChildCollection, EntityKind};

/// Builds [`Entity`] values from the API, resolving them against a cache.
///
/// # Example
///
/// ```no_run
/// use wdpro_facilities::{ApiClient, ClientOptions, FacilityService, MemoryCache};
///
/// let client = ApiClient::new(ClientOptions::new().header("Authorization", "BEARER token"))?;
/// let service = FacilityService::new(client, MemoryCache::new());
///
/// let mickey = service.character("17480")?;
/// for event in service.associated_events(&mickey) {
///     println!("{}", event);
/// }
/// # Ok::<(), wdpro_facilities::EntityError>(())
/// ```
pub struct FacilityService<C> {
    client: ApiClient,
    cache: C,
}

impl<C: FacilityCache> FacilityService<C> {
    pub fn new(client: ApiClient, cache: C) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Fetch and resolve one entity.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::NotFound` if the service doesn't know `id` or
    /// returns a record without one; other fetch failures propagate as-is.
    pub fn load(&self, kind: EntityKind, id: &str) -> Result<Entity, EntityError> {
        let raw = self.client.fetch(kind, id)?;
        Entity::from_record(kind, raw, &self.cache).map_err(|e| e.with_requested_id(id))
    }

    pub fn attraction(&self, id: &str) -> Result<Entity, EntityError> {
        self.load(EntityKind::Attraction, id)
    }

    pub fn character(&self, id: &str) -> Result<Entity, EntityError> {
        self.load(EntityKind::Character, id)
    }

    pub fn destination(&self, id: &str) -> Result<Entity, EntityError> {
        self.load(EntityKind::Destination, id)
    }

    pub fn entertainment(&self, id: &str) -> Result<Entity, EntityError> {
        self.load(EntityKind::Entertainment, id)
    }

    pub fn facility(&self, id: &str) -> Result<Entity, EntityError> {
        self.load(EntityKind::Facility, id)
    }

    pub fn theme_park(&self, id: &str) -> Result<Entity, EntityError> {
        self.load(EntityKind::ThemePark, id)
    }

    pub fn water_park(&self, id: &str) -> Result<Entity, EntityError> {
        self.load(EntityKind::WaterPark, id)
    }

    /// Ids the service lists for a kind.
    pub fn possible_ids(&self, kind: EntityKind) -> Result<Vec<String>, EntityError> {
        self.client.list_ids(&self.client.collection_url(kind))
    }

    /// Resolve the entity's related locations.
    ///
    /// Locations with an unknown type tag are skipped with a warning. The
    /// service lists stale references, so a location that fails to load is
    /// dropped without failing the call.
    pub fn related_locations(&self, entity: &Entity) -> Vec<Entity> {
        self.load_all(entity.related_location_targets())
    }

    /// Resolve the entity's associated entertainment events.
    ///
    /// Events that fail to load are dropped.
    pub fn associated_events(&self, entity: &Entity) -> Vec<Entity> {
        self.load_all(
            entity
                .associated_event_ids()
                .into_iter()
                .map(|id| (EntityKind::Entertainment, id)),
        )
    }

    /// Resolve a destination's child collection.
    ///
    /// A destination without the collection link yields an empty list.
    /// Entries that fail to load are dropped.
    ///
    /// # Errors
    ///
    /// Returns the error of the collection listing request itself.
    pub fn children(
        &self,
        destination: &Entity,
        collection: ChildCollection,
    ) -> Result<Vec<Entity>, EntityError> {
        let Some(href) = destination.link_href(collection.link_name()) else {
            return Ok(Vec::new());
        };

        let listing = self.client.fetch_href(href)?;
        let kind = collection.kind();
        Ok(self.load_all(entry_ids(&listing).into_iter().map(|id| (kind, id))))
    }

    fn load_all(&self, targets: impl IntoIterator<Item = (EntityKind, String)>) -> Vec<Entity> {
        targets
            .into_iter()
            .filter_map(|(kind, id)| match self.load(kind, &id) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    debug!(%kind, id = %id, error = %e, "dropping unavailable related entity");
                    None
                }
            })
            .collect()
    }
}
