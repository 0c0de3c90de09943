use maud::{html, Render};
use saddlebag_api_types::FormChoice;

use crate::catalog::Catalog;

pub(crate) struct WorldSelect<'a> {
    pub(crate) name: &'a str,
    pub(crate) selected: &'a str,
    pub(crate) catalog: &'a Catalog,
}

impl Render for WorldSelect<'_> {
    fn render(&self) -> maud::Markup {
        let selected = self.selected.trim();
        html! {
            select name=(self.name) id=(self.name) {
                @if selected.is_empty() {
                    option value="" selected { "Pick a world" }
                }
                @for region in &self.catalog.worlds().regions {
                    @for datacenter in &region.datacenters {
                        optgroup label={ (region.region.value()) " / " (datacenter.name) } {
                            @for world in &datacenter.worlds {
                                option value=(world) selected[world.eq_ignore_ascii_case(selected)] {
                                    (world)
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
