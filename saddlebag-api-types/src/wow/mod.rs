pub mod export;
pub mod marketshare;
pub mod shortage;

use crate::form::{HomeDefaults, ValidationErrors};
use crate::WowRegion;

/// WoW prices are in gold, the backend works in gold as well
pub(crate) fn gold_at_least(value: f64, minimum: f64) -> bool {
    value.is_finite() && value >= minimum
}

/// Fills a missing region from the saved preferences. The saved realm only applies when
/// the search stays in the saved region.
pub(crate) fn fill_realm(
    region: &mut Option<WowRegion>,
    realm: &mut Option<i32>,
    home: &HomeDefaults,
) {
    let region = *region.get_or_insert(home.wow_region);
    if realm.is_none() && region == home.wow_region {
        *realm = Some(home.wow_realm_id);
    }
}

pub(crate) fn check_realm(
    errors: &mut ValidationErrors,
    region: Option<WowRegion>,
    realm: Option<i32>,
) {
    errors.check(region.is_some(), "region", "Pick a region");
    errors.check(
        realm.is_some_and(|id| id > 0),
        "realm",
        "Pick a realm",
    );
}
