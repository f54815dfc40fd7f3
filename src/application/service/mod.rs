mod group_service;
mod group_view;
mod membership;

pub use group_service::{GroupCard, GroupService, JoinStatus};
pub use group_view::{merge, GroupViewMerger};
pub use membership::{audit, compute_member_count, CountDrift, JoinOutcome, MembershipLedger};
