//! Core types for facility entities.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Kind of entity the client knows how to construct.
///
/// Each kind maps to a facility-service collection path and to the type tags
/// the service uses when it references an entity from another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Attraction,
    Character,
    Destination,
    Entertainment,
    Facility,
    ThemePark,
    WaterPark,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Attraction,
        EntityKind::Character,
        EntityKind::Destination,
        EntityKind::Entertainment,
        EntityKind::Facility,
        EntityKind::ThemePark,
        EntityKind::WaterPark,
    ];

    /// Returns the facility-service collection segment for this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Attraction => "attractions",
            EntityKind::Character => "characters",
            EntityKind::Destination => "destinations",
            EntityKind::Entertainment => "entertainments",
            EntityKind::Facility => "facilities",
            EntityKind::ThemePark => "theme-parks",
            EntityKind::WaterPark => "water-parks",
        }
    }

    /// Map an upstream type tag (e.g. `facilityType` of a related location).
    ///
    /// Returns `None` for tags with no matching kind, such as `"Show"`.
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "Attraction" => Some(EntityKind::Attraction),
            "Character" => Some(EntityKind::Character),
            "Destination" => Some(EntityKind::Destination),
            "Entertainment" => Some(EntityKind::Entertainment),
            "Facility" => Some(EntityKind::Facility),
            "theme-park" => Some(EntityKind::ThemePark),
            "water-park" => Some(EntityKind::WaterPark),
            _ => None,
        }
    }

    /// Short name used on the command line and in `Display` output.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Attraction => "Attraction",
            EntityKind::Character => "Character",
            EntityKind::Destination => "Destination",
            EntityKind::Entertainment => "Entertainment",
            EntityKind::Facility => "Facility",
            EntityKind::ThemePark => "Theme Park",
            EntityKind::WaterPark => "Water Park",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Accepts a collection segment (`characters`), a kebab-case kind name
    /// (`theme-park`) or an upstream type tag (`Character`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|kind| {
                kind.collection() == lower
                    || kind.label().to_lowercase().replace(' ', "-") == lower
            })
            .ok_or_else(|| format!("unknown entity kind '{}'", s))
    }
}

/// Child collections a destination links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildCollection {
    ThemeParks,
    WaterParks,
    Entertainments,
    Attractions,
}

impl ChildCollection {
    /// Link name inside the destination's `links` object.
    pub fn link_name(&self) -> &'static str {
        match self {
            ChildCollection::ThemeParks => "themeParks",
            ChildCollection::WaterParks => "waterParks",
            ChildCollection::Entertainments => "entertainments",
            ChildCollection::Attractions => "attractions",
        }
    }

    /// Kind of entity listed in the collection.
    pub fn kind(&self) -> EntityKind {
        match self {
            ChildCollection::ThemeParks => EntityKind::ThemePark,
            ChildCollection::WaterParks => EntityKind::WaterPark,
            ChildCollection::Entertainments => EntityKind::Entertainment,
            ChildCollection::Attractions => EntityKind::Attraction,
        }
    }
}

impl FromStr for ChildCollection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "theme-parks" | "themeparks" => Ok(ChildCollection::ThemeParks),
            "water-parks" | "waterparks" => Ok(ChildCollection::WaterParks),
            "entertainments" => Ok(ChildCollection::Entertainments),
            "attractions" => Ok(ChildCollection::Attractions),
            _ => Err(format!("unknown destination collection '{}'", s)),
        }
    }
}

/// Ancestor identifiers of an entity.
///
/// Every field resolves independently; one being `None` says nothing about the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ancestors {
    pub destination_id: Option<String>,
    pub park_id: Option<String>,
    pub resort_id: Option<String>,
    pub land_id: Option<String>,
    pub resort_area_id: Option<String>,
    pub entertainment_venue_id: Option<String>,
}

/// Normalized, fully resolved view of one upstream entity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescriptor {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    pub sub_type: Option<String>,
    pub doc_id: Option<String>,
    pub ancestors: Ancestors,
    pub destination_code: Option<String>,
}

/// Raw `(id, type)` form of a related-location reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RelatedLocation {
    pub id: String,
    #[serde(rename = "type")]
    pub type_tag: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_collections() {
        assert_eq!(EntityKind::Character.collection(), "characters");
        assert_eq!(EntityKind::ThemePark.collection(), "theme-parks");
        assert_eq!(EntityKind::Entertainment.collection(), "entertainments");
    }

    #[test]
    fn kind_from_type_tag() {
        assert_eq!(
            EntityKind::from_type_tag("Attraction"),
            Some(EntityKind::Attraction)
        );
        assert_eq!(
            EntityKind::from_type_tag("theme-park"),
            Some(EntityKind::ThemePark)
        );
        assert_eq!(EntityKind::from_type_tag("Show"), None);
        assert_eq!(EntityKind::from_type_tag("attraction"), None);
    }

    #[test]
    fn kind_parse_accepts_collection_and_name() {
        assert_eq!("characters".parse::<EntityKind>(), Ok(EntityKind::Character));
        assert_eq!("Character".parse::<EntityKind>(), Ok(EntityKind::Character));
        assert_eq!("theme-park".parse::<EntityKind>(), Ok(EntityKind::ThemePark));
        assert_eq!("water-parks".parse::<EntityKind>(), Ok(EntityKind::WaterPark));
        assert!("show".parse::<EntityKind>().is_err());
    }

    #[test]
    fn child_collection_links() {
        assert_eq!(ChildCollection::ThemeParks.link_name(), "themeParks");
        assert_eq!(ChildCollection::WaterParks.kind(), EntityKind::WaterPark);
        assert_eq!(
            "attractions".parse::<ChildCollection>(),
            Ok(ChildCollection::Attractions)
        );
    }

    #[test]
    fn descriptor_serializes_camel_case() {
        let descriptor = EntityDescriptor {
            id: "1".into(),
            name: "Mickey".into(),
            entity_type: "Character".into(),
            sub_type: None,
            doc_id: None,
            ancestors: Ancestors {
                park_id: Some("80007944".into()),
                ..Ancestors::default()
            },
            destination_code: None,
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["entityType"], "Character");
        assert_eq!(json["ancestors"]["parkId"], "80007944");
        assert!(json["ancestors"]["landId"].is_null());
    }
}
