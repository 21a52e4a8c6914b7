pub mod http;
pub mod tmdb;
