use maud::{html, Render};
use saddlebag_api_types::WowRegion;

use crate::catalog::Catalog;

/// Realms of one region. `realms.js` refills the options from `/api/wow/realms/{region}`
/// when the select named `region_field` changes.
pub(crate) struct RealmSelect<'a> {
    pub(crate) name: &'a str,
    pub(crate) region_field: &'a str,
    pub(crate) region: WowRegion,
    pub(crate) selected: Option<i32>,
    pub(crate) catalog: &'a Catalog,
}

impl Render for RealmSelect<'_> {
    fn render(&self) -> maud::Markup {
        html! {
            select name=(self.name) id=(self.name) data-region-select=(self.region_field) {
                @for realm in self.catalog.realms(self.region) {
                    option value=(realm.id) selected[Some(realm.id) == self.selected] {
                        (realm.name)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use maud::Render;
    use saddlebag_api_types::WowRegion;

    use super::RealmSelect;
    use crate::catalog::Catalog;

    #[test]
    fn only_realms_of_the_region_are_listed() {
        let catalog = Catalog::embedded().unwrap();
        let markup = RealmSelect {
            name: "realm",
            region_field: "region",
            region: WowRegion::Europe,
            selected: Some(1305),
            catalog: &catalog,
        }
        .render()
        .into_string();
        assert!(markup.contains(r#"<option value="1305" selected>Kazzak</option>"#));
        assert!(!markup.contains("Thrall"));
    }
}
