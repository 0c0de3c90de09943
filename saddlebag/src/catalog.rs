use saddlebag_api_types::world::{Datacenter, Realm, RealmData, RealmRegion, WorldData};
use saddlebag_api_types::{FfxivRegion, WowRegion};

/// Static game server lists used by the world and realm pickers. Both lists ship inside
/// the binary.
#[derive(Debug, Clone)]
pub(crate) struct Catalog {
    worlds: WorldData,
    realms: RealmData,
}

/// Where a FFXIV world sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WorldLocation<'a> {
    pub(crate) world: &'a str,
    pub(crate) datacenter: &'a Datacenter,
    pub(crate) region: FfxivRegion,
}

impl Catalog {
    pub(crate) fn embedded() -> Result<Self, serde_json::Error> {
        Self::from_json(
            include_str!("../data/ffxiv_worlds.json"),
            include_str!("../data/wow_realms.json"),
        )
    }

    pub(crate) fn from_json(worlds: &str, realms: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            worlds: serde_json::from_str(worlds)?,
            realms: serde_json::from_str(realms)?,
        })
    }

    pub(crate) fn worlds(&self) -> &WorldData {
        &self.worlds
    }

    /// Case insensitive world lookup
    pub(crate) fn find_world(&self, name: &str) -> Option<WorldLocation<'_>> {
        let name = name.trim();
        self.worlds.regions.iter().find_map(|region| {
            region.datacenters.iter().find_map(|datacenter| {
                datacenter
                    .worlds
                    .iter()
                    .find(|world| world.eq_ignore_ascii_case(name))
                    .map(|world| WorldLocation {
                        world,
                        datacenter,
                        region: region.region,
                    })
            })
        })
    }

    fn realm_region(&self, region: WowRegion) -> Option<&RealmRegion> {
        self.realms.regions.iter().find(|r| r.region == region)
    }

    pub(crate) fn realms(&self, region: WowRegion) -> &[Realm] {
        self.realm_region(region)
            .map(|r| r.realms.as_slice())
            .unwrap_or_default()
    }

    pub(crate) fn realm(&self, region: WowRegion, id: i32) -> Option<&Realm> {
        self.realms(region).iter().find(|realm| realm.id == id)
    }

    pub(crate) fn realm_by_name(&self, region: WowRegion, name: &str) -> Option<&Realm> {
        let name = name.trim();
        self.realms(region)
            .iter()
            .find(|realm| realm.name.eq_ignore_ascii_case(name))
    }

    pub(crate) fn default_realm(&self, region: WowRegion) -> Option<&Realm> {
        let region = self.realm_region(region)?;
        region
            .realms
            .iter()
            .find(|realm| realm.id == region.default_realm)
    }
}
