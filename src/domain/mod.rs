// Domain layer - Artifacts, tables and section views
pub mod artifact;
pub mod error;
pub mod table;
pub mod view;
