//! Story-seen tracking
//!
//! Stories are marked seen locally as soon as they are viewed; the server
//! is told separately and its failure never un-marks a story.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::bus::{AppEvent, EventBus};
use crate::models::{StoryGroup, StoryId, UserId};

#[derive(Debug, Clone)]
pub struct SeenTracker {
    seen: Arc<Mutex<HashSet<StoryId>>>,
    bus: EventBus,
}

impl SeenTracker {
    pub fn new(bus: EventBus) -> Self {
        Self {
            seen: Arc::new(Mutex::new(HashSet::new())),
            bus,
        }
    }

    /// Absorb the server's seen flags from a fetched story feed
    pub fn observe(&self, groups: &[StoryGroup]) {
        let mut seen = self.seen.lock();
        for story in groups.iter().flat_map(|g| &g.stories) {
            if story.seen {
                seen.insert(story.id.clone());
            }
        }
    }

    /// Mark a story seen; returns `true` if it was not seen before
    ///
    /// `StorySeen` is only published on the first view.
    pub fn mark_seen(&self, story_id: &StoryId, author_id: &UserId) -> bool {
        let newly_seen = self.seen.lock().insert(story_id.clone());
        if newly_seen {
            self.bus.publish(AppEvent::StorySeen {
                story_id: story_id.clone(),
                author_id: author_id.clone(),
            });
        }
        newly_seen
    }

    pub fn is_seen(&self, story_id: &StoryId) -> bool {
        self.seen.lock().contains(story_id)
    }

    pub fn has_unseen(&self, group: &StoryGroup) -> bool {
        let seen = self.seen.lock();
        group.stories.iter().any(|s| !seen.contains(&s.id))
    }

    /// Stable sort putting authors with unseen stories first
    pub fn order(&self, groups: &mut [StoryGroup]) {
        groups.sort_by_key(|g| !self.has_unseen(g));
    }
}
