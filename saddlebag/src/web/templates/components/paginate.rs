use maud::{html, Render};

/// Page selection control. Links are built by the caller since they carry the whole
/// search and table state.
pub(crate) struct Paginate<F: Fn(usize) -> String> {
    /// Page numbers worth linking to, ascending
    pub(crate) pages: Vec<usize>,
    pub(crate) current_page: usize,
    pub(crate) href: F,
}

impl<F: Fn(usize) -> String> Render for Paginate<F> {
    fn render(&self) -> maud::Markup {
        if self.pages.len() <= 1 {
            return html! {};
        }
        let links: Vec<(usize, bool)> = self
            .pages
            .iter()
            .scan(0, |previous, &page| {
                let gap = page > *previous + 1;
                *previous = page;
                Some((page, gap))
            })
            .collect();
        html! {
           nav class="flex-row paginate" {
            @for (page, gap) in links {
                @if gap {
                    span class="gap" { "…" }
                }
                a href=((self.href)(page)) class={ @if self.current_page == page { "btn-secondary" } @else { "btn" } } {
                    (page)
                }
            }
           }
        }
    }
}
