use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use super::Site;
use crate::math::{Circle, Point2D};

/// Handle of a queued event, used to invalidate it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(usize);

/// Something that happens when the sweep line reaches a given height.
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// A new site becomes active.
    Site(Site),
    /// The middle arc of `triple` shrinks to a point at the center of
    /// `circle`; the event fires when the sweep line reaches its top.
    Circle { triple: [Site; 3], circle: Circle },
}

impl Event {
    /// The point at which the sweep line meets the event.
    #[must_use]
    pub fn location(&self) -> Point2D {
        match self {
            Self::Site(site) => site.point,
            Self::Circle { circle, .. } => circle.top(),
        }
    }
}

#[derive(Debug)]
struct Queued {
    location: Point2D,
    id: EventId,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    // Reversed so that `BinaryHeap` pops the lowest, then leftmost, event.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .location
            .y
            .total_cmp(&self.location.y)
            .then_with(|| other.location.x.total_cmp(&self.location.x))
            .then_with(|| other.id.0.cmp(&self.id.0))
    }
}

/// Min-priority queue of events keyed by height.
///
/// Events are never removed from the heap directly. [`EventQueue::invalidate`]
/// flags them and [`EventQueue::pop`] discards flagged events.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Queued>,
    events: Vec<Event>,
    valid: Vec<bool>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `event` and returns its handle.
    pub fn push(&mut self, event: Event) -> EventId {
        let id = EventId(self.events.len());
        self.heap.push(Queued {
            location: event.location(),
            id,
        });
        self.events.push(event);
        self.valid.push(true);
        id
    }

    /// Marks a queued event as stale. Stale events are skipped by `pop`.
    pub fn invalidate(&mut self, id: EventId) {
        if let Some(flag) = self.valid.get_mut(id.0) {
            *flag = false;
        }
    }

    #[must_use]
    pub fn is_valid(&self, id: EventId) -> bool {
        self.valid.get(id.0).copied().unwrap_or(false)
    }

    /// Removes and returns the lowest valid event.
    pub fn pop(&mut self) -> Option<(EventId, Event)> {
        while let Some(Queued { location, id }) = self.heap.pop() {
            if !self.is_valid(id) {
                debug!(%location, "skipping invalidated event");
                continue;
            }
            self.valid[id.0] = false;
            return self.events.get(id.0).map(|event| (id, *event));
        }
        None
    }

    /// Number of events still in the heap, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
