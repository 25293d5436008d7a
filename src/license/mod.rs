//! License resolution over POM descriptors.
//!
//! - [`resolver`] — walks a descriptor's parent chain until licenses are found,
//!   guarded against cycles and runaway depth.
//! - [`overrides`] — fixed license assignments for groups known to omit `<licenses>`.

pub mod overrides;
pub mod resolver;
