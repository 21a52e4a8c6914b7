pub mod models;
pub mod titles;
