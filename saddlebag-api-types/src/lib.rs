mod market_state;

pub mod ffxiv;
pub mod form;
pub mod region;
pub mod result;
pub mod wow;
pub mod world;

pub use form::{
    parse_form, to_query_string, CommaList, FieldError, FormChoice, HomeDefaults, SearchForm,
    ValidationErrors,
};
pub use market_state::MarketState;
pub use region::{FfxivRegion, WowRegion};
