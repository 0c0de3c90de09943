use std::ops::Deref;

use axum::response::{Html, IntoResponse};
use maud::{html, Markup, Render, DOCTYPE};

use super::components::footer::Footer;
use super::components::header::Header;
use super::head::HtmlHead;
use crate::web::preferences::Preferences;

pub(crate) trait Page {
    fn get_name(&self) -> String;
    fn get_description(&self) -> Option<String> {
        None
    }
    fn get_tags(&self) -> Option<String> {
        None
    }
    fn draw_body(&self) -> Markup;
}

/// A page plus the visitor's preferences, which decide the theme and the header
pub(crate) struct RenderPage<T: Page>(pub(crate) T, pub(crate) Preferences);

impl<P: Page + ?Sized> Page for Box<P> {
    fn get_name(&self) -> String {
        self.deref().get_name()
    }

    fn get_description(&self) -> Option<String> {
        self.deref().get_description()
    }

    fn get_tags(&self) -> Option<String> {
        self.deref().get_tags()
    }

    fn draw_body(&self) -> Markup {
        self.deref().draw_body()
    }
}

impl<T> IntoResponse for RenderPage<T>
where
    T: Page,
{
    fn into_response(self) -> axum::response::Response {
        Html(self.render().0).into_response()
    }
}

impl<T> Render for RenderPage<T>
where
    T: Page,
{
    fn render(&self) -> Markup {
        let RenderPage(page, preferences) = self;
        let description = page.get_description();
        let keywords = page.get_tags();
        let head = HtmlHead {
            title: &page.get_name(),
            description: description.as_deref(),
            keywords: keywords.as_deref(),
        };
        html! {
          (DOCTYPE)
          html lang="en" data-theme=(preferences.theme.as_str()) {
            (head)
            body {
              (Header { preferences })
              main class="container" {
                (page.draw_body())
              }
              (Footer)
            }
          }
        }
    }
}
