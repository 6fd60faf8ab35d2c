// Application layer - Use cases over the artifact store
pub mod artifact_store;
pub mod dashboard_service;
pub mod freshness;
