pub mod product;
pub mod profile;
