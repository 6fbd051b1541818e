use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Keyed mark store
// ---------------------------------------------------------------------------

/// Identity of a drawn mark. A new id is issued only when a mark is created,
/// so a retained mark keeps its id across redraws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkId(u64);

#[derive(Debug, Clone)]
pub struct Mark<M> {
    pub id: MarkId,
    pub value: M,
}

/// Counts of the three reconciliation phases of one redraw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// Visual marks owned by stable key.
///
/// Each [`reconcile`](KeyedMarks::reconcile) call takes the desired
/// `(key, datum)` sequence and
/// * removes marks whose key is no longer desired (exit),
/// * creates marks for new keys with a fresh [`MarkId`] (enter),
/// * updates retained marks in place (update).
///
/// Iteration follows the order of the last desired sequence.
#[derive(Debug, Clone)]
pub struct KeyedMarks<K, M> {
    marks: BTreeMap<K, Mark<M>>,
    order: Vec<K>,
    next_id: u64,
}

impl<K: Ord + Clone, M> Default for KeyedMarks<K, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, M> KeyedMarks<K, M> {
    pub fn new() -> Self {
        Self {
            marks: BTreeMap::new(),
            order: Vec::new(),
            next_id: 0,
        }
    }

    /// Bring the store in line with `desired`. Repeated keys in `desired`
    /// after the first occurrence are ignored.
    pub fn reconcile<D, I, E, U>(&mut self, desired: I, mut enter: E, mut update: U) -> ReconcileStats
    where
        I: IntoIterator<Item = (K, D)>,
        E: FnMut(&K, D) -> M,
        U: FnMut(&K, D, &mut M),
    {
        let mut stats = ReconcileStats::default();
        let mut wanted: BTreeSet<K> = BTreeSet::new();
        let mut order = Vec::new();
        let mut data = Vec::new();

        for (key, datum) in desired {
            if wanted.insert(key.clone()) {
                order.push(key.clone());
                data.push((key, datum));
            }
        }

        // exit
        let before = self.marks.len();
        self.marks.retain(|key, _| wanted.contains(key));
        stats.exited = before - self.marks.len();

        for (key, datum) in data {
            match self.marks.get_mut(&key) {
                Some(mark) => {
                    update(&key, datum, &mut mark.value);
                    stats.updated += 1;
                }
                None => {
                    let id = MarkId(self.next_id);
                    self.next_id += 1;
                    let value = enter(&key, datum);
                    self.marks.insert(key, Mark { id, value });
                    stats.entered += 1;
                }
            }
        }

        self.order = order;
        stats
    }

    pub fn get(&self, key: &K) -> Option<&Mark<M>> {
        self.marks.get(key)
    }

    pub fn id_of(&self, key: &K) -> Option<MarkId> {
        self.marks.get(key).map(|m| m.id)
    }

    /// Marks in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Mark<M>)> {
        self.order
            .iter()
            .filter_map(|k| self.marks.get_key_value(k))
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Drop every mark, e.g. when a new dataset replaces the old one.
    pub fn clear(&mut self) {
        self.marks.clear();
        self.order.clear();
    }
}
