pub mod add;
pub mod entries;
