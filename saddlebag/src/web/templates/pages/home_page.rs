use maud::html;

use crate::web::templates::page::Page;
use crate::web::tools::Game;

pub(crate) struct HomePage;

impl Page for HomePage {
    fn get_name(&self) -> String {
        "Dashboard".to_string()
    }

    fn get_description(&self) -> Option<String> {
        Some("Market research tools for the Final Fantasy XIV and World of Warcraft economies".to_string())
    }

    fn get_tags(&self) -> Option<String> {
        Some("ffxiv, wow, marketboard, auction house, gil, gold".to_string())
    }

    fn draw_body(&self) -> maud::Markup {
        html! {
          div class="main-content" {
            @for game in [Game::Ffxiv, Game::Wow] {
              section class="content-well" {
                h2 class="content-title" { (game.label()) }
                div class="tool-grid" {
                  @for tool in game.tools() {
                    a class="card tool" href=(tool.path) {
                      h3 { (tool.name) }
                      p { (tool.summary) }
                    }
                  }
                }
              }
            }
          }
        }
    }
}
