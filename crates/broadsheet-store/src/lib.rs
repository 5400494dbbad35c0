#![forbid(unsafe_code)]

//! Client-side state substrate for the Broadsheet client shell.
//!
//! The pieces layer bottom-up:
//!
//! - [`store`] — a single-writer dispatch store with an append-only action
//!   log and change-notification subscribers.
//! - [`optimistic`] — per-entity pending-mutation bookkeeping: apply a change
//!   locally before the remote authority confirms it, roll back on failure,
//!   and silently discard responses made stale by a newer mutation.
//! - [`notice`] — dismissible user-visible notifications with deduplication.
//! - [`likes`] — the comment-likes data layer composing all three.
//!
//! Everything is single-threaded by design, matching a UI event loop: state
//! mutation happens only on dispatch boundaries, never concurrently.

pub mod likes;
pub mod notice;
pub mod optimistic;
pub mod store;

pub use likes::{
    CommentKey, CommentLike, LikeAction, LikeRequest, LikeResponse, LikeVerb, LikesDataLayer,
    LikesState,
};
pub use notice::{Notice, NoticeId, NoticeQueue, NoticeQueueConfig, NoticeStatus};
pub use optimistic::{MutationState, MutationToken, OptimisticCoordinator, Reconciliation};
pub use store::{Store, Subscription};
