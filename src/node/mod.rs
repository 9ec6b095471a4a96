//! The workflow node: its parameter schema, host contract and executor

pub mod execute;
pub mod params;
pub mod schema;

pub use execute::{execute, ExecutionItem, PairedItem};
pub use params::{BinaryData, NodeContext, Parameters};
pub use schema::{description, NodeDescription, NodeProperty, PropertyOption};
