pub mod comment;
pub mod email;
pub mod goal;
pub mod organization;
pub mod organization_id;
pub mod preferences;
pub mod user_id;

pub use comment::{CommentKind, CommentStatus};
pub use email::Email;
pub use goal::{GoalStatus, GoalVisibility};
pub use organization::Organization;
pub use organization_id::OrganizationId;
pub use preferences::Theme;
pub use user_id::UserId;
