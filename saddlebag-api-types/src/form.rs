//! Search forms shared between the page templates and the backend requests.
//!
//! Every search is a plain GET form, so the query string *is* the form state. Forms are
//! decoded with `serde_qs`, which lets missing fields fall back to their defaults and
//! supports nested lists like `groups[0][name]=Potions`.

use std::fmt::{self, Display};
use std::str::FromStr;

use itertools::Itertools;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};
use thiserror::Error;

use crate::region::{FfxivRegion, WowRegion};

/// Query strings nest at most `groups[n][field]`, so a shallow depth is plenty
const QUERY_DEPTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All the problems found with a submitted form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Records `message` against `field` unless `ok` holds
    pub fn check(&mut self, ok: bool, field: &'static str, message: impl Into<String>) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.0.iter().filter(move |error| error.field == field)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Values the user saved in their preferences. Forms use these for any
/// region/world/realm the URL left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeDefaults {
    pub ffxiv_world: String,
    pub ffxiv_region: FfxivRegion,
    pub wow_region: WowRegion,
    pub wow_realm_id: i32,
    pub wow_realm_name: String,
}

pub trait SearchForm: Serialize + DeserializeOwned + Default + Clone {
    fn validate(&self) -> Result<(), ValidationErrors>;

    fn apply_preferences(&mut self, _home: &HomeDefaults) {}

    /// Cleanup applied right after decoding, e.g. dropping blank rows
    fn normalize(&mut self) {}
}

/// Decodes a form from a query string. The form is normalized but not validated, so a
/// page can redisplay exactly what was submitted next to its errors.
pub fn parse_form<F: SearchForm>(query: &str) -> Result<F, ValidationErrors> {
    let mut form: F = serde_qs::Config::new(QUERY_DEPTH, false)
        .deserialize_str(query)
        .map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add("form", format!("Unable to read the search parameters: {e}"));
            errors
        })?;
    form.normalize();
    Ok(form)
}

pub fn to_query_string<F: Serialize>(form: &F) -> Result<String, serde_qs::Error> {
    serde_qs::to_string(form)
}

/// `serde_with` adapter for id lists written as `1, 2,3`. Whitespace and empty entries
/// are ignored so hand-edited URLs still work.
pub struct CommaList;

impl<T: Display> SerializeAs<Vec<T>> for CommaList {
    fn serialize_as<S: Serializer>(source: &Vec<T>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&source.iter().join(","))
    }
}

impl<'de, T> DeserializeAs<'de, Vec<T>> for CommaList
where
    T: FromStr,
    T::Err: Display,
{
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<Vec<T>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| {
                value
                    .parse::<T>()
                    .map_err(|e| D::Error::custom(format!("invalid value `{value}`: {e}")))
            })
            .collect()
    }
}

/// A closed set of options rendered as a `<select>`
pub trait FormChoice: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    /// Value as it appears in the query string
    fn value(&self) -> &'static str;

    fn label(&self) -> &'static str;
}

/// Declares a select-style enum whose query string value is also its serde name
#[macro_export]
macro_rules! form_choice {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            #[default]
            $default:ident => ($default_value:literal, $default_label:literal),
            $($variant:ident => ($value:literal, $label:literal),)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            #[default]
            #[serde(rename = $default_value)]
            $default,
            $(
                #[serde(rename = $value)]
                $variant,
            )*
        }

        impl $crate::form::FormChoice for $name {
            const ALL: &'static [Self] = &[Self::$default, $(Self::$variant,)*];

            fn value(&self) -> &'static str {
                match self {
                    Self::$default => $default_value,
                    $(Self::$variant => $value,)*
                }
            }

            fn label(&self) -> &'static str {
                match self {
                    Self::$default => $default_label,
                    $(Self::$variant => $label,)*
                }
            }
        }
    };
}

#[cfg(test)]
mod test {
    use serde::{Deserialize, Serialize};
    use serde_with::serde_as;

    use super::{parse_form, to_query_string, CommaList, SearchForm, ValidationErrors};

    #[serde_as]
    #[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
    #[serde(default)]
    struct IdForm {
        name: String,
        #[serde_as(as = "CommaList")]
        ids: Vec<i32>,
    }

    impl SearchForm for IdForm {
        fn validate(&self) -> Result<(), ValidationErrors> {
            let mut errors = ValidationErrors::new();
            errors.check(!self.ids.is_empty(), "ids", "At least one id is required");
            errors.into_result()
        }
    }

    #[test]
    fn comma_lists_tolerate_spaces() {
        let form: IdForm = parse_form("name=pots&ids=1,%202,,3").unwrap();
        assert_eq!(form.ids, [1, 2, 3]);
        let encoded = to_query_string(&form).unwrap();
        assert_eq!(parse_form::<IdForm>(&encoded).unwrap(), form);
    }

    #[test]
    fn bad_values_become_form_errors() {
        let errors = parse_form::<IdForm>("ids=1,two").unwrap_err();
        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].field, "form");
        assert!(errors.0[0].message.contains("two"));
    }

    #[test]
    fn validation_collects_field_errors() {
        let errors = IdForm::default().validate().unwrap_err();
        assert_eq!(errors.for_field("ids").count(), 1);
        assert_eq!(errors.to_string(), "ids: At least one id is required");
    }
}
