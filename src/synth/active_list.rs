//! Index-based doubly linked list over the fixed voice pool.
//!
//! Slots are identified by their index in the pool, so links are plain
//! indices and there is no pointer aliasing to worry about. Push and unlink
//! are O(1); the list never allocates after construction.

#[derive(Debug, Clone, Copy, Default)]
struct Link {
    prev: Option<u8>,
    next: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct ActiveList {
    head: Option<u8>,
    len: usize,
    links: Vec<Link>,
}

impl ActiveList {
    /// List over `capacity` slots. Slot indices must fit a `u8`.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity <= u8::MAX as usize + 1);
        Self {
            head: None,
            len: 0,
            links: vec![Link::default(); capacity],
        }
    }

    /// Insert `slot` at the head. The caller guarantees it is not linked.
    pub fn push_front(&mut self, slot: usize) {
        let index = slot as u8;
        self.links[slot] = Link {
            prev: None,
            next: self.head,
        };
        if let Some(old_head) = self.head {
            self.links[old_head as usize].prev = Some(index);
        }
        self.head = Some(index);
        self.len += 1;
    }

    /// Unlink `slot`. The caller guarantees it is linked.
    pub fn remove(&mut self, slot: usize) {
        let Link { prev, next } = self.links[slot];

        match prev {
            Some(prev) => self.links[prev as usize].next = next,
            None => self.head = next,
        }
        if let Some(next) = next {
            self.links[next as usize].prev = prev;
        }

        self.links[slot] = Link::default();
        self.len -= 1;
    }

    /// Forget every entry at once. Stale per-slot links are overwritten on
    /// the next push.
    pub fn clear(&mut self) {
        self.head = None;
        self.len = 0;
    }

    pub fn head(&self) -> Option<usize> {
        self.head.map(usize::from)
    }

    pub fn next(&self, slot: usize) -> Option<usize> {
        self.links[slot].next.map(usize::from)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Walk from the head. Most recently pushed first.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head(),
        }
    }
}

pub struct Iter<'a> {
    list: &'a ActiveList,
    cursor: Option<usize>,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let slot = self.cursor?;
        self.cursor = self.list.next(slot);
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(list: &ActiveList) -> Vec<usize> {
        list.iter().collect()
    }

    #[test]
    fn push_front_orders_newest_first() {
        let mut list = ActiveList::new(128);
        list.push_front(60);
        list.push_front(64);
        list.push_front(67);

        assert_eq!(collect(&list), vec![67, 64, 60]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn remove_head_middle_and_tail() {
        let mut list = ActiveList::new(128);
        for slot in [1, 2, 3, 4, 5] {
            list.push_front(slot);
        }

        list.remove(3);
        assert_eq!(collect(&list), vec![5, 4, 2, 1]);
        list.remove(5);
        assert_eq!(collect(&list), vec![4, 2, 1]);
        list.remove(1);
        assert_eq!(collect(&list), vec![4, 2]);
        assert_eq!(list.len(), 2);

        list.remove(4);
        list.remove(2);
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
    }

    #[test]
    fn clear_then_reuse() {
        let mut list = ActiveList::new(128);
        list.push_front(10);
        list.push_front(20);
        list.clear();

        assert!(list.is_empty());
        assert_eq!(collect(&list), Vec::<usize>::new());

        list.push_front(20);
        list.push_front(127);
        assert_eq!(collect(&list), vec![127, 20]);
        list.remove(20);
        assert_eq!(collect(&list), vec![127]);
    }

    #[test]
    fn slot_zero_is_a_normal_slot() {
        let mut list = ActiveList::new(128);
        list.push_front(0);
        list.push_front(1);
        list.remove(0);
        assert_eq!(collect(&list), vec![1]);
    }
}
