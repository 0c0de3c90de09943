pub(crate) mod ffxiv;
pub(crate) mod misc;
pub(crate) mod options;
pub(crate) mod wow;
