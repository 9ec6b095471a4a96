//! Joomla resources
//!
//! Definitions of the CMS entities the node manages, their handlers and the
//! helpers that map form values onto JSON:API requests.

pub mod dispatch;
pub mod field_mapper;
pub mod handlers;
pub mod options;
pub mod path_extractor;
pub mod protocol;

pub use dispatch::{dispatch, ResourceRequest};
pub use options::{load_options, LoadOptionsMethod};
pub use protocol::{Operation, Resource};
