use maud::{html, Markup};

use crate::web::templates::page::Page;

/// Every search tool is a form above its results
pub(crate) struct SearchPage {
    pub(crate) title: &'static str,
    pub(crate) description: &'static str,
    pub(crate) action: &'static str,
    /// `get` for searches so the URL can be shared
    pub(crate) method: &'static str,
    pub(crate) fields: Markup,
    pub(crate) results: Markup,
}

impl Page for SearchPage {
    fn get_name(&self) -> String {
        self.title.to_string()
    }

    fn get_description(&self) -> Option<String> {
        Some(self.description.to_string())
    }

    fn draw_body(&self) -> Markup {
        html! {
          div class="main-content" {
            h2 { (self.title) }
            p class="description" { (self.description) }
            form class="search-form" method=(self.method) action=(self.action) {
              div class="field-grid" {
                (self.fields)
              }
              button type="submit" class="btn-secondary" { "Search" }
            }
            div class="results" {
              (self.results)
            }
          }
        }
    }
}
