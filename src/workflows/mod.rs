pub mod fetcher;
pub mod filenames;
pub mod pipeline;
