//! Portal builders.

use chrono::{TimeZone, Utc};
use portal2exit_domain::{ActorId, Location, Portal, PortalName, RequiredItem};

pub fn at(world: &str, x: f64, y: f64, z: f64) -> Location {
    Location::new(world, x, y, z)
}

/// A spawn-type portal at the origin of `world`.
pub fn portal(name: &str, owner: ActorId) -> Portal {
    portal_at(name, owner, at("world", 0.5, 64.0, 0.5))
}

pub fn portal_at(name: &str, owner: ActorId, location: Location) -> Portal {
    Portal::new(
        PortalName::new(name).unwrap(),
        location,
        owner,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
}

pub fn required(material: &str, amount: u32, consume: bool) -> RequiredItem {
    RequiredItem::new(super::material(material), amount, consume).unwrap()
}
