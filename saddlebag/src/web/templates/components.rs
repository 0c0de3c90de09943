pub(crate) mod currency;
pub(crate) mod fields;
pub(crate) mod footer;
pub(crate) mod header;
pub(crate) mod paginate;
pub(crate) mod realm_select;
pub(crate) mod result_table;
pub(crate) mod world_select;
