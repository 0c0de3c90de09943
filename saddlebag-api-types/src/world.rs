use serde::{Deserialize, Serialize};

use crate::region::{FfxivRegion, WowRegion};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WorldData {
    pub regions: Vec<Region>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub region: FfxivRegion,
    pub datacenters: Vec<Datacenter>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Datacenter {
    pub name: String,
    pub worlds: Vec<String>,
}

/// A WoW connected realm. Backend searches key on the connected realm id, the name is
/// only for display.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Realm {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RealmData {
    pub regions: Vec<RealmRegion>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RealmRegion {
    pub region: WowRegion,
    /// Realm new visitors land on
    pub default_realm: i32,
    pub realms: Vec<Realm>,
}
