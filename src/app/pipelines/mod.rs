pub mod cipher_pipeline;
pub mod climate_pipeline;
pub mod tree_pipeline;

pub use cipher_pipeline::CipherPipeline;
pub use climate_pipeline::ClimatePipeline;
pub use tree_pipeline::TreePipeline;
