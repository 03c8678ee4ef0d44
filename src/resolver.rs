//! Entity resolution - turns a raw facility record into an [`EntityDescriptor`].
//!
//! Each ancestor field has a fixed, ordered list of sources. Sources are
//! tried in order and the first one yielding a value wins; if none does, the
//! field stays `None`. Nothing here raises an error except a record with no
//! usable `id`.

use serde_json::Value;
use tracing::debug;

use crate::cache::FacilityCache;
use crate::error::{CacheError, EntityError};
use crate::normalize::{normalize_name, strip_composite, trailing_segment};
use crate::types::{Ancestors, EntityDescriptor};

/// One place an ancestor id can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// `links.<name>.href` on the raw record; the id is the trailing path segment.
    Link(&'static str),
    /// `<name>.id` object embedded in the raw record, truncated at `;`.
    Embedded(&'static str),
    /// `<name>` on the cached sync document, truncated at `;`.
    Cached(&'static str),
}

impl FieldSource {
    /// Read this source, returning `None` if it is absent or empty.
    pub fn read(&self, raw: &Value, cached: Option<&Value>) -> Option<String> {
        let value = match self {
            FieldSource::Link(name) => raw
                .get("links")
                .and_then(|links| links.get(name))
                .and_then(|link| link.get("href"))
                .and_then(Value::as_str)
                .and_then(trailing_segment),
            FieldSource::Embedded(name) => raw
                .get(name)
                .and_then(|embedded| embedded.get("id"))
                .and_then(Value::as_str)
                .map(strip_composite),
            FieldSource::Cached(name) => cached
                .and_then(|doc| doc.get(name))
                .and_then(Value::as_str)
                .map(strip_composite),
        };
        value.filter(|v| !v.is_empty()).map(String::from)
    }
}

pub const DESTINATION_SOURCES: &[FieldSource] = &[
    FieldSource::Link("ancestorDestination"),
    FieldSource::Embedded("ancestorDestination"),
    FieldSource::Cached("ancestorDestinationId"),
];

pub const PARK_SOURCES: &[FieldSource] = &[
    FieldSource::Link("ancestorThemePark"),
    FieldSource::Link("ancestorWaterPark"),
    FieldSource::Cached("ancestorThemeParkId"),
    FieldSource::Cached("ancestorWaterParkId"),
];

pub const RESORT_SOURCES: &[FieldSource] = &[
    FieldSource::Link("ancestorResort"),
    FieldSource::Cached("ancestorResortId"),
];

pub const LAND_SOURCES: &[FieldSource] = &[
    FieldSource::Link("ancestorLand"),
    FieldSource::Cached("ancestorLandId"),
];

pub const RESORT_AREA_SOURCES: &[FieldSource] = &[
    FieldSource::Link("ancestorResortArea"),
    FieldSource::Cached("ancestorResortAreaId"),
];

pub const ENTERTAINMENT_VENUE_SOURCES: &[FieldSource] = &[
    FieldSource::Link("ancestorEntertainmentVenue"),
    FieldSource::Cached("ancestorEntertainmentVenueId"),
];

/// Resolve one field from an ordered source list. First hit wins.
pub fn resolve_field(
    sources: &[FieldSource],
    raw: &Value,
    cached: Option<&Value>,
) -> Option<String> {
    sources.iter().find_map(|source| source.read(raw, cached))
}

/// Resolve all ancestor ids of a record.
pub fn resolve_ancestors(raw: &Value, cached: Option<&Value>) -> Ancestors {
    Ancestors {
        destination_id: resolve_field(DESTINATION_SOURCES, raw, cached),
        park_id: resolve_field(PARK_SOURCES, raw, cached),
        resort_id: resolve_field(RESORT_SOURCES, raw, cached),
        land_id: resolve_field(LAND_SOURCES, raw, cached),
        resort_area_id: resolve_field(RESORT_AREA_SOURCES, raw, cached),
        entertainment_venue_id: resolve_field(ENTERTAINMENT_VENUE_SOURCES, raw, cached),
    }
}

/// Builds descriptors against a read-only cache.
pub struct EntityResolver<C> {
    cache: C,
}

impl<C: FacilityCache> EntityResolver<C> {
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    /// Resolve a raw record into a descriptor.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::NotFound` if the record has no string `id`.
    pub fn resolve(&self, raw: &Value) -> Result<EntityDescriptor, EntityError> {
        self.resolve_with_document(raw)
            .map(|(descriptor, _)| descriptor)
    }

    /// Resolve a record and also return the cached sync document it was resolved against.
    pub fn resolve_with_document(
        &self,
        raw: &Value,
    ) -> Result<(EntityDescriptor, Option<Value>), EntityError> {
        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(EntityError::NotFound { id: None })?;

        let entity_type = string_field(raw, "type").unwrap_or_default();

        let doc_id = best_effort(self.cache.find_doc_id(id, &entity_type), "doc id");
        let cached = doc_id
            .as_deref()
            .and_then(|doc_id| best_effort(self.cache.document(doc_id), "sync document"));

        let ancestors = resolve_ancestors(raw, cached.as_ref());
        let destination_code = ancestors
            .destination_id
            .as_deref()
            .and_then(|dest| best_effort(self.cache.lookup_by_id(dest), "destination code"));

        let descriptor = EntityDescriptor {
            id: id.to_string(),
            name: string_field(raw, "name")
                .map(|name| normalize_name(&name))
                .unwrap_or_default(),
            entity_type,
            sub_type: string_field(raw, "subType"),
            doc_id,
            ancestors,
            destination_code,
        };

        Ok((descriptor, cached))
    }
}

/// Resolve a raw record against a cache.
///
/// Shorthand for `EntityResolver::new(cache).resolve(raw)`.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use wdpro_facilities::{resolve, MemoryCache};
///
/// let raw = json!({
///     "id": "X",
///     "name": "Mickey\u{2019}s Club",
///     "type": "Character",
///     "links": { "ancestorThemePark": { "href": "https://x/y/123" } }
/// });
///
/// let descriptor = resolve(&raw, &MemoryCache::new()).unwrap();
/// assert_eq!(descriptor.name, "Mickey's Club");
/// assert_eq!(descriptor.ancestors.park_id.as_deref(), Some("123"));
/// ```
pub fn resolve<C: FacilityCache>(raw: &Value, cache: C) -> Result<EntityDescriptor, EntityError> {
    EntityResolver::new(cache).resolve(raw)
}

fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(String::from)
}

/// Collapse a cache read to a value, treating failures as absence.
fn best_effort<T>(result: Result<Option<T>, CacheError>, what: &str) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "cache lookup for {} failed", what);
            None
        }
    }
}
