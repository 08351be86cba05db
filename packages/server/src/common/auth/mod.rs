/// Authorization for donation point operations
///
/// Provides a fluent API for permission checks inside activities:
///
/// ```ignore
/// use crate::common::auth::{Actor, PointOperation};
///
/// Actor::new(identity)
///     .can(PointOperation::Edit)
///     .on(point.scope())
///     .check()?;
/// ```
///
/// Checks are pure functions of the identity and the point; the caller runs
/// them against the locked record so no partial mutation can slip through.

mod builder;
mod capability;
mod errors;
mod identity;

pub use builder::{Actor, CapabilityBuilder, PointCapabilityBuilder, PointScope};
pub use capability::PointOperation;
pub use errors::AuthError;
pub use identity::{Identity, Role};
