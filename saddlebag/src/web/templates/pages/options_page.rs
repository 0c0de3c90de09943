use std::sync::Arc;

use maud::html;
use saddlebag_api_types::{ValidationErrors, WowRegion};

use crate::catalog::Catalog;
use crate::web::preferences::{Preferences, ThemeMode};
use crate::web::templates::components::fields::{select_input, Field, NO_ERRORS};
use crate::web::templates::components::realm_select::RealmSelect;
use crate::web::templates::components::world_select::WorldSelect;
use crate::web::templates::page::Page;

pub(crate) struct OptionsPage {
    pub(crate) ffxiv_world: String,
    pub(crate) wow_region: WowRegion,
    pub(crate) wow_realm: Option<i32>,
    pub(crate) theme: ThemeMode,
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) errors: Option<ValidationErrors>,
    pub(crate) saved: bool,
    pub(crate) discord_name: Option<String>,
    pub(crate) login_enabled: bool,
}

impl OptionsPage {
    pub(crate) fn new(preferences: &Preferences, catalog: Arc<Catalog>) -> Self {
        Self {
            ffxiv_world: preferences.ffxiv_world.clone(),
            wow_region: preferences.wow_region,
            wow_realm: Some(preferences.wow_realm.id),
            theme: preferences.theme,
            catalog,
            errors: None,
            saved: false,
            discord_name: preferences
                .discord
                .as_ref()
                .map(|discord| discord.name.clone()),
            login_enabled: preferences.login_enabled,
        }
    }
}

impl Page for OptionsPage {
    fn get_name(&self) -> String {
        "Options".to_string()
    }

    fn draw_body(&self) -> maud::Markup {
        let errors = self.errors.as_ref().unwrap_or(&NO_ERRORS);
        html! {
          div class="main-content" {
            h2 { "Options" }
            @if self.saved {
              div class="card success" { "Preferences saved." }
            }
            form class="search-form" method="post" action="/options" {
              div class="field-grid" {
                (Field::new("ffxiv_world", "FFXIV home world", errors, html! {
                  (WorldSelect { name: "ffxiv_world", selected: &self.ffxiv_world, catalog: &self.catalog })
                }))
                (Field::new("wow_region", "WoW region", errors, select_input("wow_region", self.wow_region)))
                (Field::new("wow_realm", "WoW home realm", errors, html! {
                  (RealmSelect {
                    name: "wow_realm",
                    region_field: "wow_region",
                    region: self.wow_region,
                    selected: self.wow_realm,
                    catalog: &self.catalog,
                  })
                }).help("Searches use this realm unless the URL names another one"))
                (Field::new("theme", "Theme", errors, html! {
                  select id="theme" name="theme" {
                    @for theme in ThemeMode::ALL {
                      option value=(theme.as_str()) selected[theme == self.theme] { (theme.label()) }
                    }
                  }
                }))
              }
              button type="submit" class="btn-secondary" { "Save" }
            }
            section class="content-well" {
              h3 { "Discord" }
              @if let Some(name) = &self.discord_name {
                p { "Signed in as " strong { (name) } }
                a class="btn" href="/discord/logout" { "Logout" }
              } @else if self.login_enabled {
                a class="btn" href="/discord/login" { "Login with Discord" }
              } @else {
                p { "Discord login is not enabled on this server." }
              }
            }
          }
        }
    }
}
