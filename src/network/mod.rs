pub mod checkpoint;
pub mod metadata;
pub mod mlp;
pub mod spec;

pub use checkpoint::{artifact_name, SavedModel};
pub use metadata::ModelMetadata;
pub use mlp::Mlp;
pub use spec::MlpSpec;
