pub mod config;
pub mod errors;
pub mod extraction;
pub mod llm_client;
pub mod pipeline;
pub mod profile;
pub mod routes;
pub mod state;
pub mod structuring;
