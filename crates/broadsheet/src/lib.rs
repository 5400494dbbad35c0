#![forbid(unsafe_code)]

//! Broadsheet public facade crate.
//!
//! Re-exports the stable surface of the client core: viewport and compose-box
//! geometry from `broadsheet-geometry`, and the dispatch store, optimistic
//! mutation coordinator, notices, and comment-likes data layer from
//! `broadsheet-store`. Use the [`prelude`] for day-to-day imports.

// --- Geometry re-exports ---------------------------------------------------

pub use broadsheet_geometry::compose::{
    REPLY_MAX_HEIGHT, REPLY_MIN_HEIGHT_COLLAPSED, REPLY_MIN_HEIGHT_FOCUSED, REPLY_VERTICAL_BORDER,
    ReplyBox,
};
pub use broadsheet_geometry::puck::{calc_puck_offset, calc_puck_size, puck_visible};
pub use broadsheet_geometry::scroll::{Puck, ScrollWindow};

// --- Store re-exports ------------------------------------------------------

pub use broadsheet_store::likes::{
    CommentKey, CommentLike, LikeAction, LikeRequest, LikeResponse, LikeVerb, LikesDataLayer,
    LikesState,
};
pub use broadsheet_store::notice::{
    Notice, NoticeId, NoticeQueue, NoticeQueueConfig, NoticeStats, NoticeStatus,
};
pub use broadsheet_store::optimistic::{
    MutationState, MutationToken, OptimisticCoordinator, Reconciliation,
};
pub use broadsheet_store::store::{Store, Subscription};

// --- Prelude --------------------------------------------------------------

/// Common imports for Broadsheet applications.
pub mod prelude {
    pub use crate::{
        CommentKey, CommentLike, LikeRequest, LikeResponse, LikesDataLayer, MutationToken, Notice,
        NoticeQueue, NoticeStatus, OptimisticCoordinator, Puck, Reconciliation, ReplyBox,
        ScrollWindow, Store, Subscription,
    };
}
