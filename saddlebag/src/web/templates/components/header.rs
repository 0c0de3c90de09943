use maud::{html, Render};

use crate::web::preferences::Preferences;
use crate::web::tools::Game;

pub(crate) struct Header<'a> {
    pub(crate) preferences: &'a Preferences,
}

impl Render for Header<'_> {
    fn render(&self) -> maud::Markup {
        let preferences = self.preferences;
        html! {
          header {
            nav class="header" {
              a class="brand" href="/" { "Saddlebag Exchange" }
              @for game in [Game::Ffxiv, Game::Wow] {
                details class="nav-group" {
                  summary { (game.label()) }
                  ul {
                    @for tool in game.tools() {
                      li { a class="nav-item" href=(tool.path) { (tool.name) } }
                    }
                  }
                }
              }
              div class="nav-right" {
                span class="home-summary" {
                  (preferences.ffxiv_world) " / " (preferences.wow_realm.name)
                }
                a class="nav-item" href="/options" { "Options" }
                @if let Some(discord) = &preferences.discord {
                  span class="discord-user" {
                    @if let Some(avatar) = &discord.avatar_url {
                      img class="avatar" src=(avatar) alt="";
                    }
                    (discord.name)
                  }
                  a class="btn nav-item" href="/discord/logout" { "Logout" }
                } @else if preferences.login_enabled {
                  a class="btn nav-item" href="/discord/login" { "Login with Discord" }
                }
              }
            }
          }
        }
    }
}
