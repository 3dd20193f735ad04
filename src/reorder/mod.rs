//! Optimistic reordering of sibling lists (child topics, content blocks).
//!
//! A drag gesture becomes a [`MoveRequest`]. [`ReorderController::apply`]
//! mutates the local list, renumbers every entry densely from zero, and hands
//! back a [`Submission`] carrying the full `{id, order_no}` list. The caller
//! shows the new order right away, sends the submission, and reports the
//! response through [`ReorderController::resolve`].

use crate::api::{ApiError, ApiResult};
use crate::models::{ContentBlock, Topic, TopicId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Something with a position among its siblings.
pub(crate) trait Ordered {
    fn order_no(&self) -> u32;
    fn set_order_no(&mut self, order_no: u32);
}

/// An ordered entity the backend knows by id.
pub(crate) trait Persisted: Ordered {
    fn id(&self) -> i64;
}

impl Ordered for Topic {
    fn order_no(&self) -> u32 {
        self.order_no
    }

    fn set_order_no(&mut self, order_no: u32) {
        self.order_no = order_no;
    }
}

impl Persisted for Topic {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Ordered for ContentBlock {
    fn order_no(&self) -> u32 {
        self.block_order
    }

    fn set_order_no(&mut self, order_no: u32) {
        self.block_order = order_no;
    }
}

impl Persisted for ContentBlock {
    fn id(&self) -> i64 {
        self.id
    }
}

/// A drop: `destination` is `None` when the item was released outside any
/// valid target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MoveRequest {
    pub source: usize,
    pub destination: Option<usize>,
}

impl MoveRequest {
    pub fn new(source: usize, destination: Option<usize>) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// Assign `order_no = index` to every entry.
pub(crate) fn renumber<T: Ordered>(items: &mut [T]) {
    for (i, item) in items.iter_mut().enumerate() {
        item.set_order_no(i as u32);
    }
}

/// Move one entry and renumber the whole list.
///
/// Returns `false` (list untouched) when the move is a no-op: no destination,
/// fewer than two entries, same index, or an index out of range.
pub(crate) fn apply_move<T: Ordered>(items: &mut Vec<T>, mv: MoveRequest) -> bool {
    let Some(dest) = mv.destination else {
        return false;
    };
    let len = items.len();
    if len < 2 || mv.source == dest || mv.source >= len || dest >= len {
        return false;
    }

    let moved = items.remove(mv.source);
    items.insert(dest, moved);
    renumber(items);
    true
}

/// Sort by current `order_no`, keeping server order for ties.
pub(crate) fn sort_by_order<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(|i| i.order_no());
}

fn insert_by_order<T: Ordered>(items: &mut Vec<T>, item: T) {
    let at = items
        .iter()
        .position(|i| i.order_no() >= item.order_no())
        .unwrap_or(items.len());
    items.insert(at, item);
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OrderEntry {
    pub id: i64,
    pub order_no: u32,
}

pub(crate) fn order_entries<T: Persisted>(items: &[T]) -> Vec<OrderEntry> {
    items
        .iter()
        .map(|i| OrderEntry {
            id: i.id(),
            order_no: i.order_no(),
        })
        .collect()
}

/// The sibling set a reorder applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ReorderScope {
    /// Direct children of `parent_id`; `None` means the root topics.
    Children { parent_id: Option<TopicId> },
    /// Content blocks of the topic at `topic_path`.
    Blocks { topic_path: String },
}

/// One batch order update ready to send.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Submission {
    pub ticket: u64,
    pub scope: ReorderScope,
    pub entries: Vec<OrderEntry>,
}

/// What to do with the local list when a submission fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum RollbackPolicy {
    /// Leave the optimistic order on screen; a reload resynchronizes.
    #[default]
    Keep,
    /// Restore the last order the server confirmed.
    Revert,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SyncPhase<T> {
    Idle,
    Pending { ticket: u64 },
    Confirmed { ticket: u64 },
    Failed {
        ticket: u64,
        error: ApiError,
        last_known_good: Vec<T>,
    },
}

/// Owns one sibling list and its sync state.
#[derive(Clone, Debug)]
pub(crate) struct ReorderController<T> {
    scope: ReorderScope,
    items: Vec<T>,
    last_known_good: Vec<T>,
    in_flight: BTreeMap<u64, Vec<T>>,
    phase: SyncPhase<T>,
    next_ticket: u64,
    policy: RollbackPolicy,
}

impl<T: Persisted + Clone> ReorderController<T> {
    pub fn new(scope: ReorderScope, mut items: Vec<T>) -> Self {
        sort_by_order(&mut items);
        Self {
            scope,
            last_known_good: items.clone(),
            items,
            in_flight: BTreeMap::new(),
            phase: SyncPhase::Idle,
            next_ticket: 1,
            policy: RollbackPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RollbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[cfg(test)]
    pub fn phase(&self) -> &SyncPhase<T> {
        &self.phase
    }

    #[cfg(test)]
    pub fn last_known_good(&self) -> &[T] {
        &self.last_known_good
    }

    pub fn is_saving(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Replace the list with fresh server state.
    pub fn reset(&mut self, mut items: Vec<T>) {
        sort_by_order(&mut items);
        self.last_known_good = items.clone();
        self.items = items;
        self.in_flight.clear();
        self.phase = SyncPhase::Idle;
    }

    /// Apply a move locally. Returns the submission to send, or `None` for a
    /// no-op move (nothing changed, nothing to send).
    pub fn apply(&mut self, mv: MoveRequest) -> Option<Submission> {
        if !apply_move(&mut self.items, mv) {
            return None;
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight.insert(ticket, self.items.clone());
        self.phase = SyncPhase::Pending { ticket };

        Some(Submission {
            ticket,
            scope: self.scope.clone(),
            entries: order_entries(&self.items),
        })
    }

    /// Record the response for `ticket`. Whichever response arrives last
    /// decides the phase, even if it belongs to an older submission.
    pub fn resolve(&mut self, ticket: u64, result: ApiResult<()>) -> &SyncPhase<T> {
        let sent = self.in_flight.remove(&ticket);

        match result {
            Ok(()) => {
                if let Some(order) = sent {
                    self.last_known_good = order;
                }
                self.phase = SyncPhase::Confirmed { ticket };
            }
            Err(error) => {
                // A newer submission still in flight owns the screen; its
                // own response decides whether to revert.
                if self.policy == RollbackPolicy::Revert && self.in_flight.is_empty() {
                    self.items = self.last_known_good.clone();
                }
                self.phase = SyncPhase::Failed {
                    ticket,
                    error,
                    last_known_good: self.last_known_good.clone(),
                };
            }
        }
        &self.phase
    }

    /// Add a freshly created entity where its stored `order_no` puts it,
    /// ahead of any sibling that already holds that number.
    pub fn insert(&mut self, item: T) {
        insert_by_order(&mut self.last_known_good, item.clone());
        for sent in self.in_flight.values_mut() {
            insert_by_order(sent, item.clone());
        }
        insert_by_order(&mut self.items, item);
    }

    /// `order_no` a new sibling gets: the current sibling count.
    pub fn next_order_no(&self) -> u32 {
        self.items.len() as u32
    }

    /// Drop the entity with `id` locally. Remaining `order_no` values are left
    /// as the server has them.
    pub fn remove(&mut self, id: i64) -> Option<T> {
        self.last_known_good.retain(|i| i.id() != id);
        for sent in self.in_flight.values_mut() {
            sent.retain(|i| i.id() != id);
        }
        let pos = self.items.iter().position(|i| i.id() == id)?;
        Some(self.items.remove(pos))
    }
}

/// Transport for order submissions.
pub(crate) trait OrderSink {
    async fn submit_order(&self, scope: &ReorderScope, entries: &[OrderEntry]) -> ApiResult<()>;
}

/// Send one submission; exactly one request per call.
pub(crate) async fn send_submission<S: OrderSink>(sink: &S, sub: &Submission) -> ApiResult<()> {
    sink.submit_order(&sub.scope, &sub.entries).await
}
