use std::fmt;

/// Operations on a donation point that go through the permission guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOperation {
    /// Publish a new point
    Create,

    /// Overwrite a point's details
    Edit,

    /// Hard or soft delete, depending on who created the point
    Delete,

    /// Move a point awaiting review to ACTIVE
    Approve,

    /// Move a point awaiting review to REJECTED
    Reject,

    /// Flip the public visibility switch
    ToggleActive,
}

impl PointOperation {
    /// Moderation operations are reserved to administrators.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            PointOperation::Approve | PointOperation::Reject | PointOperation::ToggleActive
        )
    }
}

impl fmt::Display for PointOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            PointOperation::Create => "create",
            PointOperation::Edit => "edit",
            PointOperation::Delete => "delete",
            PointOperation::Approve => "approve",
            PointOperation::Reject => "reject",
            PointOperation::ToggleActive => "toggle",
        };
        f.write_str(verb)
    }
}
