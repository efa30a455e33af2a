pub mod defaults;
pub mod domain;
pub mod node_type;
pub mod schema;
pub mod typed_array;

pub use domain::{Domain, PropertyIssue};
pub use node_type::{ComponentTag, HelperType, NodeCategory, NodeType, UnknownTag};
pub use schema::{Access, NodeSchema, PropertySpec, helper_schema, node_schema};
pub use typed_array::TypedArrayKind;
