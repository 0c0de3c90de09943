use std::fmt::Display;

use chrono::NaiveDate;
use itertools::Itertools;
use maud::{html, Markup, Render};
use saddlebag_api_types::{FormChoice, ValidationErrors};

/// Used when a form has not been validated yet
pub(crate) static NO_ERRORS: ValidationErrors = ValidationErrors(Vec::new());

/// A labelled form input with its inline validation errors
pub(crate) struct Field<'a> {
    name: &'a str,
    label: &'a str,
    help: Option<&'a str>,
    errors: &'a ValidationErrors,
    input: Markup,
}

impl<'a> Field<'a> {
    pub(crate) fn new(
        name: &'a str,
        label: &'a str,
        errors: &'a ValidationErrors,
        input: Markup,
    ) -> Self {
        Self {
            name,
            label,
            help: None,
            errors,
            input,
        }
    }

    pub(crate) fn help(mut self, help: &'a str) -> Self {
        self.help = Some(help);
        self
    }
}

impl Render for Field<'_> {
    fn render(&self) -> Markup {
        let errors: Vec<_> = self.errors.for_field(self.name).collect();
        html! {
            div class={ "field" @if !errors.is_empty() { " has-error" } } {
                label for=(self.name) { (self.label) }
                (self.input)
                @if let Some(help) = self.help {
                    small class="help" { (help) }
                }
                @for error in errors {
                    span class="field-error" { (error.message) }
                }
            }
        }
    }
}

/// Errors that are not tied to a single input, like an unreadable query string
pub(crate) struct FormErrors<'a> {
    pub(crate) errors: &'a ValidationErrors,
}

impl Render for FormErrors<'_> {
    fn render(&self) -> Markup {
        html! {
            @for error in self.errors.for_field("form") {
                div class="card error" { (error.message) }
            }
        }
    }
}

pub(crate) fn text_input(name: &str, value: &str, placeholder: &str) -> Markup {
    html! {
        input type="text" id=(name) name=(name) value=(value) placeholder=(placeholder);
    }
}

/// `step` is `"1"` for whole numbers and `"any"` for decimals
pub(crate) fn number_input(name: &str, value: impl Display, step: &str) -> Markup {
    html! {
        input type="number" id=(name) name=(name) value=(value) step=(step);
    }
}

pub(crate) fn id_list_input(name: &str, ids: &[i32], placeholder: &str) -> Markup {
    text_input(name, &ids.iter().join(","), placeholder)
}

pub(crate) fn date_input(name: &str, value: NaiveDate) -> Markup {
    html! {
        input type="date" id=(name) name=(name) value=(value.format("%Y-%m-%d"));
    }
}

pub(crate) fn select_input<C: FormChoice>(name: &str, selected: C) -> Markup {
    html! {
        select id=(name) name=(name) {
            @for choice in C::ALL {
                option value=(choice.value()) selected[*choice == selected] { (choice.label()) }
            }
        }
    }
}

/// Booleans are a select so an unchecked box still shows up in the query string
pub(crate) fn bool_input(name: &str, value: bool) -> Markup {
    html! {
        select id=(name) name=(name) {
            option value="true" selected[value] { "Yes" }
            option value="false" selected[!value] { "No" }
        }
    }
}

#[cfg(test)]
mod test {
    use maud::Render;
    use saddlebag_api_types::{ValidationErrors, WowRegion};

    use super::{bool_input, select_input, Field, NO_ERRORS};

    #[test]
    fn field_shows_only_its_own_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("realm", "Pick a realm");
        errors.add("region", "Pick a region");
        let markup = Field::new("realm", "Realm", &errors, bool_input("realm", true))
            .render()
            .into_string();
        assert!(markup.contains("has-error"));
        assert!(markup.contains("Pick a realm"));
        assert!(!markup.contains("Pick a region"));

        let clean = Field::new("realm", "Realm", &NO_ERRORS, bool_input("realm", true))
            .render()
            .into_string();
        assert!(!clean.contains("has-error"));
    }

    #[test]
    fn select_marks_the_current_choice() {
        let markup = select_input("region", WowRegion::Europe).into_string();
        assert!(markup.contains(r#"<option value="EU" selected>Europe</option>"#));
        assert!(markup.contains(r#"<option value="NA">North America</option>"#));
    }
}
