use maud::{html, Render};

pub(crate) struct Footer;

impl Render for Footer {
    fn render(&self) -> maud::Markup {
        html! {
            footer {
                div class="flex-column" {
                    span { "Market data from " a href="https://saddlebagexchange.com" { "Saddlebag Exchange" } "." }
                    span { "FINAL FANTASY XIV © 2010 - 2024 SQUARE ENIX CO., LTD. All Rights Reserved." }
                    span { "World of Warcraft © Blizzard Entertainment, Inc. All rights reserved." }
                }
            }
        }
    }
}
