//! Generators of one protocol operation, leaf-first.

/// Parameter lists and their raw, wrapped and iterator views
pub mod parameter_list;
pub use parameter_list::{ParameterExt, ParameterList};

/// Reply field accessors
pub mod field_accessor;
pub use field_accessor::FieldAccessorGenerator;

/// Checked and unchecked request classes
pub mod cookie;
pub use cookie::{CookieBinding, ReplyClasses, Tag};

/// Method-injection hosts and resource name fragments
pub mod resource;
pub use resource::{Host, ResourceFragments};

/// Top-level generator of one operation
pub mod request;
pub use request::{c_name, HostMethods, RequestBinding, RequestOutput};
