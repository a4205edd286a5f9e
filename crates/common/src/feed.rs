//! Paginated listings (home feed, reels, saved posts)

use std::collections::HashSet;

use crate::models::{Chat, Comment, Message, Page, Post, Reel};

/// Anything with a stable server id, used to de-duplicate pages
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Post {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Identified for Reel {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Identified for Comment {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Identified for Chat {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Identified for Message {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

/// Accumulates pages of a listing
///
/// New posts shifting the server-side window cause the same item to show
/// up on two consecutive pages; the pager keeps only the first copy.
#[derive(Debug, Clone)]
pub struct FeedPager<T> {
    next_page: u32,
    page_size: u32,
    has_more: bool,
    items: Vec<T>,
    ids: HashSet<String>,
}

impl<T: Identified> FeedPager<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            next_page: 1,
            page_size: page_size.max(1),
            has_more: true,
            items: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// `(page, limit)` of the next page to fetch, or `None` once exhausted
    pub fn next_request(&self) -> Option<(u32, u32)> {
        self.has_more.then_some((self.next_page, self.page_size))
    }

    /// Append a fetched page, returning how many new items it contributed
    pub fn apply(&mut self, page: Page<T>) -> usize {
        let before = self.items.len();
        for item in page.items {
            if self.ids.insert(item.id().to_string()) {
                self.items.push(item);
            }
        }
        self.has_more = page.has_more;
        self.next_page = self.next_page.saturating_add(1);
        self.items.len() - before
    }

    /// Drop everything and start again from the first page
    pub fn reset(&mut self) {
        self.next_page = 1;
        self.has_more = true;
        self.items.clear();
        self.ids.clear();
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
