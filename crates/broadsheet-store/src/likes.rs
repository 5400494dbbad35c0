#![forbid(unsafe_code)]

//! Comment-likes data layer.
//!
//! Liking a comment is applied optimistically: [`LikesDataLayer::like`] flips
//! the local state at once and hands back a [`LikeRequest`] descriptor for the
//! host's transport to execute. The eventual response is fed back through
//! [`handle_success`](LikesDataLayer::handle_success) (merges the
//! authoritative count) or [`handle_failure`](LikesDataLayer::handle_failure)
//! (rolls back to the pre-trigger state and pushes one error notice).
//! Responses to superseded requests are silently discarded.
//!
//! This module owns no wire format; the request descriptor names the path and
//! method and carries the correlation token, nothing more.

use std::collections::HashMap;
use tracing::debug;

use crate::notice::{NoticeQueue, NoticeQueueConfig, NoticeStatus};
use crate::optimistic::{MutationToken, OptimisticCoordinator, Reconciliation};
use crate::store::{Store, Subscription};

/// Identity of a comment within a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentKey {
    /// Site the comment belongs to.
    pub site_id: u64,
    /// Post the comment was made on.
    pub post_id: u64,
    /// The comment itself.
    pub comment_id: u64,
}

/// Like state of one comment as known locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentLike {
    /// Whether the current user likes the comment.
    pub i_like: bool,
    /// Total like count.
    pub like_count: u64,
}

/// Like state for all known comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikesState {
    items: HashMap<CommentKey, CommentLike>,
}

impl LikesState {
    /// Like state for a comment; unknown comments are unliked with count 0.
    #[must_use]
    pub fn get(&self, key: CommentKey) -> CommentLike {
        self.items.get(&key).copied().unwrap_or_default()
    }

    /// Whether the current user likes the comment.
    #[must_use]
    pub fn is_liked(&self, key: CommentKey) -> bool {
        self.get(key).i_like
    }

    /// Number of comments with known like state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no like state is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Actions over [`LikesState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    /// Optimistically like a comment (idempotent).
    Like(CommentKey),
    /// Optimistically unlike a comment (idempotent).
    Unlike(CommentKey),
    /// Overwrite with authoritative state (success merge or rollback).
    Update {
        /// Comment to overwrite.
        key: CommentKey,
        /// Authoritative like flag.
        i_like: bool,
        /// Authoritative like count.
        like_count: u64,
    },
}

/// Reducer for [`LikesState`].
pub fn reduce_likes(state: &mut LikesState, action: &LikeAction) {
    match *action {
        LikeAction::Like(key) => {
            let entry = state.items.entry(key).or_default();
            if !entry.i_like {
                entry.i_like = true;
                entry.like_count += 1;
            }
        }
        LikeAction::Unlike(key) => {
            let entry = state.items.entry(key).or_default();
            if entry.i_like {
                entry.i_like = false;
                entry.like_count = entry.like_count.saturating_sub(1);
            }
        }
        LikeAction::Update {
            key,
            i_like,
            like_count,
        } => {
            state.items.insert(
                key,
                CommentLike {
                    i_like,
                    like_count,
                },
            );
        }
    }
}

/// Direction of a like mutation, used for paths and failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeVerb {
    /// Grant a like.
    Like,
    /// Remove a like.
    Unlike,
}

impl LikeVerb {
    fn failure_text(self) -> &'static str {
        match self {
            Self::Like => "Could not like this comment",
            Self::Unlike => "Could not unlike this comment",
        }
    }
}

/// Descriptor of the outbound request for one like mutation.
///
/// The host transport executes it and feeds the outcome back with the token
/// intact; the data layer uses the token to reject stale responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeRequest {
    /// HTTP method, always `POST` for like mutations.
    pub method: &'static str,
    /// Remote API version.
    pub api_version: &'static str,
    /// Request path.
    pub path: String,
    /// Comment the mutation applies to.
    pub key: CommentKey,
    /// Which direction the mutation went.
    pub verb: LikeVerb,
    /// Correlation token for the response.
    pub token: MutationToken,
}

/// Authoritative like fields returned by the remote side on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeResponse {
    /// Whether the remote side recorded the user's like.
    pub i_like: bool,
    /// Authoritative like count (other users may have liked meanwhile).
    pub like_count: u64,
}

/// Comment-likes data layer: store + pending mutations + notices.
#[derive(Debug)]
pub struct LikesDataLayer {
    store: Store<LikesState, LikeAction>,
    pending: OptimisticCoordinator<CommentKey, CommentLike>,
    notices: NoticeQueue,
}

impl Default for LikesDataLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl LikesDataLayer {
    /// A data layer with empty state and default notice configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_notice_config(NoticeQueueConfig::default())
    }

    /// A data layer with the given notice configuration.
    #[must_use]
    pub fn with_notice_config(config: NoticeQueueConfig) -> Self {
        Self {
            store: Store::new(LikesState::default(), reduce_likes),
            pending: OptimisticCoordinator::new(),
            notices: NoticeQueue::new(config),
        }
    }

    /// Current like state for a comment.
    #[must_use]
    pub fn get(&self, key: CommentKey) -> CommentLike {
        self.store.with(|s| s.get(key))
    }

    /// Subscribe to like-state changes.
    pub fn subscribe(&self, callback: impl Fn(&LikesState) + 'static) -> Subscription {
        self.store.subscribe(callback)
    }

    /// The underlying store (read access, action log).
    #[must_use]
    pub fn store(&self) -> &Store<LikesState, LikeAction> {
        &self.store
    }

    /// The notice queue.
    #[must_use]
    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    /// Mutable notice queue access (dismissal).
    pub fn notices_mut(&mut self) -> &mut NoticeQueue {
        &mut self.notices
    }

    /// Like a comment: apply locally, register the pending mutation, and
    /// return the outbound request descriptor.
    pub fn like(&mut self, key: CommentKey) -> LikeRequest {
        self.trigger(key, LikeVerb::Like)
    }

    /// Unlike a comment: apply locally, register the pending mutation, and
    /// return the outbound request descriptor.
    pub fn unlike(&mut self, key: CommentKey) -> LikeRequest {
        self.trigger(key, LikeVerb::Unlike)
    }

    fn trigger(&mut self, key: CommentKey, verb: LikeVerb) -> LikeRequest {
        // Snapshot before the optimistic application; with a mutation already
        // in flight this includes its optimistic effect, which is the
        // cancel-and-replace rollback target the coordinator expects.
        let prior = self.store.with(|s| s.get(key));
        let action = match verb {
            LikeVerb::Like => LikeAction::Like(key),
            LikeVerb::Unlike => LikeAction::Unlike(key),
        };
        self.store.dispatch(action);
        let token = self.pending.begin(key, prior);

        let suffix = match verb {
            LikeVerb::Like => "new",
            LikeVerb::Unlike => "delete",
        };
        LikeRequest {
            method: "POST",
            api_version: "1.1",
            path: format!(
                "/sites/{}/comments/{}/likes/mine/{}",
                key.site_id, key.comment_id, suffix
            ),
            key,
            verb,
            token,
        }
    }

    /// Feed back a success response. Commits the pending mutation and merges
    /// the authoritative fields; stale responses are ignored.
    pub fn handle_success(&mut self, request: &LikeRequest, response: LikeResponse) {
        match self.pending.confirm(&request.key, request.token) {
            Reconciliation::Committed => {
                self.store.dispatch(LikeAction::Update {
                    key: request.key,
                    i_like: response.i_like,
                    like_count: response.like_count,
                });
            }
            Reconciliation::Stale => {
                debug!(key = ?request.key, token = %request.token, "stale like success ignored");
            }
        }
    }

    /// Feed back a failure response. Rolls back to the pre-trigger state and
    /// pushes one error notice; stale responses are ignored.
    pub fn handle_failure(&mut self, request: &LikeRequest) {
        let Some(prior) = self.pending.fail(&request.key, request.token) else {
            debug!(key = ?request.key, token = %request.token, "stale like failure ignored");
            return;
        };
        self.store.dispatch(LikeAction::Update {
            key: request.key,
            i_like: prior.i_like,
            like_count: prior.like_count,
        });
        self.notices
            .push(NoticeStatus::Error, request.verb.failure_text());
    }
}
