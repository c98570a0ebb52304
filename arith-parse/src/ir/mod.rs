pub mod reduce;
pub mod tree;

pub use reduce::{evaluate, reduce};
pub use tree::{NodeType, NodeValue, ParseTree};
