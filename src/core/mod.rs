pub mod config;
pub mod diet;
pub mod labeler;
pub mod loader;
pub mod pipeline;
pub mod reconciler;
pub mod summary;
