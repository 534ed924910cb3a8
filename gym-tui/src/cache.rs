//! Resource-keyed cache manager
//!
//! The member list and the delete history are fetched and cached
//! independently. Mutations declare which resources they invalidate; a
//! stale slot keeps its last snapshot visible until the refetch lands, so
//! readers always see a consistent list.

use shared::{DeletedMemberRecord, Member};

/// The two remotely-fetched resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Members,
    DeleteHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Freshness {
    /// Needs a (re)fetch
    Stale,
    /// A fetch is running
    InFlight,
    /// Snapshot matches the last fetch
    Fresh,
}

/// One cached resource: the last consistent snapshot plus freshness.
///
/// Every fetch is tagged with a generation number so completions apply in
/// start order, not arrival order: a response from a superseded fetch is
/// dropped instead of overwriting a newer snapshot.
#[derive(Debug)]
pub struct CacheSlot<T> {
    data: Option<Vec<T>>,
    freshness: Freshness,
    generation: u64,
}

impl<T> Default for CacheSlot<T> {
    fn default() -> Self {
        Self {
            data: None,
            freshness: Freshness::Stale,
            generation: 0,
        }
    }
}

impl<T> CacheSlot<T> {
    /// The last consistent snapshot, if any fetch has ever completed.
    pub fn snapshot(&self) -> Option<&[T]> {
        self.data.as_deref()
    }

    /// True until the first fetch completes; drives loading placeholders.
    pub fn is_loading(&self) -> bool {
        self.data.is_none()
    }

    pub fn needs_fetch(&self) -> bool {
        self.freshness == Freshness::Stale
    }

    /// Start a fetch and return its generation tag; any earlier in-flight
    /// fetch is superseded.
    pub fn begin_fetch(&mut self) -> u64 {
        self.freshness = Freshness::InFlight;
        self.generation += 1;
        self.generation
    }

    /// True when `generation` identifies the most recently started fetch.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Replace the snapshot with freshly fetched items. Completions from
    /// superseded fetches are ignored; if the slot was invalidated while
    /// the fetch ran it stays stale so the refetch still happens.
    pub fn loaded(&mut self, generation: u64, items: Vec<T>) {
        if !self.is_current(generation) {
            return;
        }
        self.data = Some(items);
        if self.freshness == Freshness::InFlight {
            self.freshness = Freshness::Fresh;
        }
    }

    /// Keep the previous snapshot on a failed fetch; the caller surfaces
    /// the error as a notice and the user can force a refetch.
    pub fn load_failed(&mut self, generation: u64) {
        if !self.is_current(generation) {
            return;
        }
        if self.freshness == Freshness::InFlight {
            self.freshness = Freshness::Fresh;
        }
    }

    pub fn invalidate(&mut self) {
        self.freshness = Freshness::Stale;
    }
}

/// Both caches, keyed by [`Resource`].
#[derive(Debug, Default)]
pub struct CacheManager {
    pub members: CacheSlot<Member>,
    pub history: CacheSlot<DeletedMemberRecord>,
}

impl CacheManager {
    pub fn invalidate(&mut self, resources: &[Resource]) {
        for resource in resources {
            match resource {
                Resource::Members => self.members.invalidate(),
                Resource::DeleteHistory => self.history.invalidate(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stale_and_loading() {
        let slot: CacheSlot<Member> = CacheSlot::default();
        assert!(slot.needs_fetch());
        assert!(slot.is_loading());
        assert!(slot.snapshot().is_none());
    }

    #[test]
    fn invalidation_keeps_the_previous_snapshot() {
        let mut slot: CacheSlot<i32> = CacheSlot::default();
        let gen = slot.begin_fetch();
        slot.loaded(gen, vec![1, 2, 3]);
        assert!(!slot.needs_fetch());

        slot.invalidate();
        assert!(slot.needs_fetch());
        // readers still see the old snapshot during the refetch window
        assert_eq!(slot.snapshot(), Some(&[1, 2, 3][..]));
        assert!(!slot.is_loading());
    }

    #[test]
    fn failed_fetch_keeps_the_previous_snapshot() {
        let mut slot: CacheSlot<i32> = CacheSlot::default();
        let gen = slot.begin_fetch();
        slot.loaded(gen, vec![1]);
        slot.invalidate();
        let gen = slot.begin_fetch();
        slot.load_failed(gen);
        assert_eq!(slot.snapshot(), Some(&[1][..]));
        assert!(!slot.needs_fetch());
    }

    #[test]
    fn late_completion_of_a_superseded_fetch_is_dropped() {
        let mut slot: CacheSlot<i32> = CacheSlot::default();
        let first = slot.begin_fetch();
        // a mutation invalidates the slot and a refetch starts while the
        // first fetch is still in flight
        slot.invalidate();
        let second = slot.begin_fetch();
        slot.loaded(second, vec![4, 5]);
        assert_eq!(slot.snapshot(), Some(&[4, 5][..]));

        // the first fetch finishes last, carrying pre-mutation data
        slot.loaded(first, vec![1, 2, 3]);
        assert_eq!(slot.snapshot(), Some(&[4, 5][..]));
        assert!(!slot.needs_fetch());

        slot.load_failed(first);
        assert_eq!(slot.snapshot(), Some(&[4, 5][..]));
        assert!(!slot.needs_fetch());
    }

    #[test]
    fn invalidation_during_a_fetch_leaves_the_slot_stale() {
        let mut slot: CacheSlot<i32> = CacheSlot::default();
        let gen = slot.begin_fetch();
        slot.invalidate();
        slot.loaded(gen, vec![1]);
        // the fetched snapshot is shown, but a refetch is still owed
        assert_eq!(slot.snapshot(), Some(&[1][..]));
        assert!(slot.needs_fetch());
    }

    #[test]
    fn manager_invalidates_by_resource_key() {
        let mut caches = CacheManager::default();
        let gen = caches.members.begin_fetch();
        caches.members.loaded(gen, vec![]);
        let gen = caches.history.begin_fetch();
        caches.history.loaded(gen, vec![]);

        caches.invalidate(&[Resource::Members]);
        assert!(caches.members.needs_fetch());
        assert!(!caches.history.needs_fetch());

        caches.invalidate(&[Resource::Members, Resource::DeleteHistory]);
        assert!(caches.history.needs_fetch());
    }
}
