use axum::http::StatusCode;
use maud::html;

use crate::web::templates::page::Page;

pub(crate) struct ErrorPage {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl Page for ErrorPage {
    fn get_name(&self) -> String {
        self.status
            .canonical_reason()
            .unwrap_or("Error")
            .to_string()
    }

    fn draw_body(&self) -> maud::Markup {
        html! {
          div class="main-content" {
            h2 { (self.status.as_u16()) " " (self.get_name()) }
            p { (self.message) }
            a class="btn" href="/" { "Back to the dashboard" }
          }
        }
    }
}
