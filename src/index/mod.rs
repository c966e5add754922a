pub mod boundaries;
pub mod store;
pub mod suffix;
pub mod text_index;

pub use boundaries::{BoundaryMap, RECORD_TERMINATOR};
pub use store::IndexStore;
pub use suffix::SuffixArrayIndex;
pub use text_index::TextIndex;
