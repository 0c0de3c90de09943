pub mod craftsim;
pub mod marketshare;
pub mod price_groups;
pub mod undercut;
