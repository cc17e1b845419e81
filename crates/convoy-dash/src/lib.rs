//! Display-side view model for the Convoy dashboard.
//!
//! Pure state shaping over `convoy-core`: calendar-day grouping of fetched
//! lists, the selection sidebar's generation-stamped slots, and the retry
//! dispatcher reducer. Nothing here performs I/O; callers execute the
//! returned effects.

pub mod dispatch;
pub mod group;
pub mod notify;
pub mod sidebar;

pub use dispatch::{DashEffect, RetryDispatcher, RetryTarget};
pub use group::{DayGroup, Timestamped, group_by_day};
pub use notify::{Notification, NotificationKind};
pub use sidebar::SidebarSlot;
