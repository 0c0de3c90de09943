pub(crate) mod error_page;
pub(crate) mod home_page;
pub(crate) mod options_page;
pub(crate) mod price_group_page;
pub(crate) mod search_page;
