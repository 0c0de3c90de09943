use maud::{html, Render};

pub(crate) struct HtmlHead<'a> {
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) keywords: Option<&'a str>,
}

impl Render for HtmlHead<'_> {
    fn render(&self) -> maud::Markup {
        html! {
          head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            title { (self.title) " | Saddlebag Exchange" }
            link rel="stylesheet" href="/static/main.css";
            link rel="icon" href="/favicon.ico";
            script src="/static/realms.js" defer {}
            @if let Some(description) = self.description {
                meta name="description" content=(description);
            }
            @if let Some(keywords) = self.keywords {
                meta name="keywords" content=(keywords);
            }
          }
        }
    }
}
