//! Constructed entities and their accessors.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::cache::FacilityCache;
use crate::error::EntityError;
use crate::normalize::trailing_segment;
use crate::resolver::EntityResolver;
use crate::types::{EntityDescriptor, EntityKind, RelatedLocation};

/// One facility-service entity, resolved once at construction.
///
/// Holds the upstream record, the descriptor resolved from it and the cached
/// sync document (if any) the descriptor was resolved against. Nothing is
/// refetched or re-resolved afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    kind: EntityKind,
    #[serde(flatten)]
    descriptor: EntityDescriptor,
    #[serde(skip)]
    raw: Value,
    #[serde(skip)]
    facilities_data: Option<Value>,
}

impl Entity {
    /// Build an entity from an already-fetched record.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::NotFound` if the record has no usable `id`.
    pub fn from_record<C: FacilityCache>(
        kind: EntityKind,
        raw: Value,
        cache: C,
    ) -> Result<Self, EntityError> {
        let (descriptor, facilities_data) =
            EntityResolver::new(cache).resolve_with_document(&raw)?;
        Ok(Self {
            kind,
            descriptor,
            raw,
            facilities_data,
        })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn entity_type(&self) -> &str {
        &self.descriptor.entity_type
    }

    pub fn sub_type(&self) -> Option<&str> {
        self.descriptor.sub_type.as_deref()
    }

    pub fn doc_id(&self) -> Option<&str> {
        self.descriptor.doc_id.as_deref()
    }

    pub fn destination_code(&self) -> Option<&str> {
        self.descriptor.destination_code.as_deref()
    }

    pub fn ancestor_destination_id(&self) -> Option<&str> {
        self.descriptor.ancestors.destination_id.as_deref()
    }

    /// Ancestor theme park or water park.
    pub fn ancestor_park_id(&self) -> Option<&str> {
        self.descriptor.ancestors.park_id.as_deref()
    }

    pub fn ancestor_resort_id(&self) -> Option<&str> {
        self.descriptor.ancestors.resort_id.as_deref()
    }

    pub fn ancestor_land_id(&self) -> Option<&str> {
        self.descriptor.ancestors.land_id.as_deref()
    }

    pub fn ancestor_resort_area_id(&self) -> Option<&str> {
        self.descriptor.ancestors.resort_area_id.as_deref()
    }

    pub fn ancestor_entertainment_venue_id(&self) -> Option<&str> {
        self.descriptor.ancestors.entertainment_venue_id.as_deref()
    }

    /// The record's `links` object, if it has one.
    pub fn links(&self) -> Option<&Map<String, Value>> {
        self.raw.get("links").and_then(Value::as_object)
    }

    /// Href of a named link, e.g. `themeParks` on a destination.
    pub fn link_href(&self, name: &str) -> Option<&str> {
        self.links()
            .and_then(|links| links.get(name))
            .and_then(|link| link.get("href"))
            .and_then(Value::as_str)
    }

    /// The upstream record as fetched.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The cached sync document read at construction.
    pub fn raw_facilities_data(&self) -> Option<&Value> {
        self.facilities_data.as_ref()
    }

    pub fn has_related_locations(&self) -> bool {
        self.raw.get("relatedLocations").is_some()
    }

    /// Related locations as `(id, type)` pairs.
    ///
    /// Stubs missing a type tag or a self link are skipped.
    pub fn related_location_ids(&self) -> Vec<RelatedLocation> {
        self.raw
            .pointer("/relatedLocations/primaryLocations")
            .and_then(Value::as_array)
            .map(|locations| {
                locations
                    .iter()
                    .filter_map(|stub| {
                        Some(RelatedLocation {
                            id: self_link_id(stub)?,
                            type_tag: stub.get("facilityType")?.as_str()?.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Related locations whose type tag maps to a known kind.
    ///
    /// Unknown tags are reported with a warning and left out.
    pub fn related_location_targets(&self) -> Vec<(EntityKind, String)> {
        self.related_location_ids()
            .into_iter()
            .filter_map(|location| match EntityKind::from_type_tag(&location.type_tag) {
                Some(kind) => Some((kind, location.id)),
                None => {
                    warn!(
                        id = %location.id,
                        type_tag = %location.type_tag,
                        "no entity kind for related location type, skipping"
                    );
                    None
                }
            })
            .collect()
    }

    /// Ids of associated entertainment events.
    pub fn associated_event_ids(&self) -> Vec<String> {
        self.raw
            .get("associatedEvents")
            .and_then(Value::as_array)
            .map(|events| events.iter().filter_map(self_link_id).collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} object for {}", self.kind, self.descriptor.name)
    }
}

/// Id at the end of `links.self.href`.
pub(crate) fn self_link_id(stub: &Value) -> Option<String> {
    stub.pointer("/links/self/href")
        .and_then(Value::as_str)
        .and_then(trailing_segment)
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use serde_json::json;

    fn character(raw: Value) -> Entity {
        Entity::from_record(EntityKind::Character, raw, MemoryCache::new()).unwrap()
    }

    #[test]
    fn related_location_ids_keep_unknown_types() {
        let entity = character(json!({
            "id": "1",
            "relatedLocations": { "primaryLocations": [
                { "facilityType": "Show", "links": { "self": { "href": "https://x/shows/9" } } },
                { "facilityType": "Attraction", "links": { "self": { "href": "https://x/attractions/8?x=1" } } },
                { "links": { "self": { "href": "https://x/attractions/7" } } }
            ] }
        }));
        assert!(entity.has_related_locations());
        assert_eq!(
            entity.related_location_ids(),
            vec![
                RelatedLocation { id: "9".into(), type_tag: "Show".into() },
                RelatedLocation { id: "8".into(), type_tag: "Attraction".into() },
            ]
        );
    }

    #[test]
    fn related_location_targets_drop_unknown_types() {
        let entity = character(json!({
            "id": "1",
            "relatedLocations": { "primaryLocations": [
                { "facilityType": "Show", "links": { "self": { "href": "https://x/shows/9" } } },
                { "facilityType": "Facility", "links": { "self": { "href": "https://x/facilities/5" } } }
            ] }
        }));
        assert_eq!(
            entity.related_location_targets(),
            vec![(EntityKind::Facility, "5".to_string())]
        );
    }

    #[test]
    fn no_related_locations() {
        let entity = character(json!({ "id": "1" }));
        assert!(!entity.has_related_locations());
        assert!(entity.related_location_ids().is_empty());
        assert!(entity.associated_event_ids().is_empty());
    }

    #[test]
    fn associated_event_ids_skip_broken_stubs() {
        let entity = character(json!({
            "id": "1",
            "associatedEvents": [
                { "links": { "self": { "href": "https://x/entertainments/100" } } },
                { "name": "no link" },
                { "links": { "self": { "href": "https://x/entertainments/101?region=us" } } }
            ]
        }));
        assert_eq!(entity.associated_event_ids(), vec!["100", "101"]);
    }

    #[test]
    fn display_uses_kind_and_name() {
        let entity = character(json!({ "id": "1", "name": " Goofy\u{2122}" }));
        assert_eq!(entity.to_string(), "Character object for Goofy");
    }

    #[test]
    fn link_href_lookup() {
        let entity = Entity::from_record(
            EntityKind::Destination,
            json!({ "id": "80007798", "links": { "themeParks": { "href": "https://x/destinations/80007798/theme-parks" } } }),
            MemoryCache::new(),
        )
        .unwrap();
        assert_eq!(
            entity.link_href("themeParks"),
            Some("https://x/destinations/80007798/theme-parks")
        );
        assert_eq!(entity.link_href("waterParks"), None);
    }

    #[test]
    fn serializes_descriptor_with_kind() {
        let entity = character(json!({ "id": "1", "name": "Pluto", "type": "Character" }));
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["kind"], "character");
        assert_eq!(json["name"], "Pluto");
        assert!(json.get("raw").is_none());
    }
}
