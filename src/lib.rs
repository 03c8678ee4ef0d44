//! WDPRO Facilities
//!
//! Client for the theme-park facility service: fetches characters,
//! attractions, destinations, entertainments, facilities and parks, and
//! resolves each record's ancestor chain (destination, park, resort, land,
//! resort area, entertainment venue) from its links, falling back to the
//! facility documents mirrored into a local sync cache.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use wdpro_facilities::{resolve, MemoryCache};
//!
//! let raw = json!({
//!     "id": "80010208",
//!     "name": "Space Mountain\u{00ae}",
//!     "type": "Attraction",
//!     "links": {}
//! });
//!
//! let cache = MemoryCache::new().with_document(
//!     "wdw.facilities.1_0.en_us.attraction.80010208;entityType=Attraction",
//!     &json!({ "ancestorThemeParkId": "80007944;entityType=theme-park" }),
//! );
//!
//! let descriptor = resolve(&raw, &cache).unwrap();
//! assert_eq!(descriptor.name, "Space Mountain");
//! assert_eq!(descriptor.ancestors.park_id.as_deref(), Some("80007944"));
//! ```
//!
//! # Ancestor Sources
//!
//! Sources are tried top to bottom; the first one with a value wins.
//!
//! | Field | Sources |
//! |-------|---------|
//! | destination | `links.ancestorDestination`, `ancestorDestination.id`, cached `ancestorDestinationId` |
//! | park | `links.ancestorThemePark`, `links.ancestorWaterPark`, cached `ancestorThemeParkId`, cached `ancestorWaterParkId` |
//! | resort | `links.ancestorResort`, cached `ancestorResortId` |
//! | land | `links.ancestorLand`, cached `ancestorLandId` |
//! | resort area | `links.ancestorResortArea`, cached `ancestorResortAreaId` |
//! | entertainment venue | `links.ancestorEntertainmentVenue`, cached `ancestorEntertainmentVenueId` |
//!
//! Link sources take the last path segment of the href; cached and embedded
//! sources drop everything from the first `;`.

mod cache;
#[cfg(feature = "remote")]
mod client;
mod entity;
mod error;
mod normalize;
mod resolver;
#[cfg(feature = "remote")]
mod service;
mod types;

pub use cache::{doc_id_suffix, FacilityCache, MemoryCache, SqliteCache};
pub use entity::Entity;
pub use error::{CacheError, EntityError};
pub use normalize::{normalize_name, strip_composite, trailing_segment};
pub use resolver::{resolve, resolve_ancestors, resolve_field, EntityResolver, FieldSource};
pub use types::{Ancestors, ChildCollection, EntityDescriptor, EntityKind, RelatedLocation};

#[cfg(feature = "remote")]
pub use client::{ApiClient, ClientOptions, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
#[cfg(feature = "remote")]
pub use service::FacilityService;
