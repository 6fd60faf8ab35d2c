// Infrastructure layer - Filesystem, parsers, config and page rendering
pub mod config;
pub mod fs_store;
pub mod html_page;
pub mod tabular;
