pub mod label;
pub mod loader;
pub mod split;

pub use label::DefectClass;
pub use loader::{load_dataset, Dataset};
pub use split::{train_test_split, Partition, Split};
