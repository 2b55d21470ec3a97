//! Arena-backed doubly linked list of keys.
//!
//! Ordering backbone for the FIFO and LRU eviction policies: the front of the
//! list is the next eviction victim, the back is the most recent insertion
//! (or access, for LRU). Nodes live in a slot arena (`Vec<Option<Node>>` with
//! a free list), so callers hold stable [`SlotId`] handles instead of
//! pointers, and `remove`/`move_to_back` are O(1) without unsafe code.

/// Stable handle to a node in a [`KeyList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Doubly linked list over an arena of slots.
///
/// All operations are O(1). Slot indices are recycled via a free list, so a
/// long-lived list does not grow beyond its high-water mark.
#[derive(Debug)]
pub struct KeyList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl<T> KeyList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty list with reserved slot capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Returns the number of nodes in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the value at the front (oldest position), if any.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id))
    }

    /// Returns the value at the back (newest position), if any.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    /// Returns the value stored under `id`, if the slot is live.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref()).map(|n| &n.value)
    }

    /// Appends a value at the back and returns its slot handle.
    pub fn push_back(&mut self, value: T) -> SlotId {
        let node = Node {
            value,
            prev: self.tail,
            next: None,
        };
        let id = self.alloc(node);
        match self.tail {
            Some(tail) => {
                if let Some(n) = self.node_mut(tail) {
                    n.next = Some(id);
                }
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.len += 1;
        id
    }

    /// Removes and returns the front value, if any.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        self.remove(head)
    }

    /// Removes the node under `id` and returns its value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.len -= 1;
        self.unlink(&node, id);
        Some(node.value)
    }

    /// Moves the node under `id` to the back (newest position).
    ///
    /// Returns `false` if the slot is not live.
    pub fn move_to_back(&mut self, id: SlotId) -> bool {
        if self.tail == Some(id) {
            return self.slot_is_live(id);
        }
        let (prev, next) = match self.slots.get(id.0).and_then(|s| s.as_ref()) {
            Some(node) => (node.prev, node.next),
            None => return false,
        };
        self.unlink_neighbors(prev, next, id);

        let old_tail = self.tail;
        if let Some(node) = self.node_mut(id) {
            node.prev = old_tail;
            node.next = None;
        }
        if let Some(tail) = old_tail {
            if let Some(n) = self.node_mut(tail) {
                n.next = Some(id);
            }
        }
        self.tail = Some(id);
        true
    }

    /// Drops every node and recycles all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates values from front (oldest) to back (newest).
    pub fn iter(&self) -> KeyListIter<'_, T> {
        KeyListIter {
            list: self,
            current: self.head,
        }
    }

    fn alloc(&mut self, node: Node<T>) -> SlotId {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                SlotId(idx)
            }
            None => {
                self.slots.push(Some(node));
                SlotId(self.slots.len() - 1)
            }
        }
    }

    fn node_mut(&mut self, id: SlotId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    fn slot_is_live(&self, id: SlotId) -> bool {
        self.slots.get(id.0).map(|s| s.is_some()).unwrap_or(false)
    }

    // Repair neighbor links after `id` left its position.
    fn unlink_neighbors(&mut self, prev: Option<SlotId>, next: Option<SlotId>, id: SlotId) {
        match prev {
            Some(prev_id) => {
                if let Some(n) = self.node_mut(prev_id) {
                    n.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next_id) => {
                if let Some(n) = self.node_mut(next_id) {
                    n.prev = prev;
                }
            }
            None => {
                if self.tail == Some(id) {
                    self.tail = prev;
                }
            }
        }
    }

    fn unlink(&mut self, node: &Node<T>, id: SlotId) {
        self.unlink_neighbors(node.prev, node.next, id);
    }
}

impl<T> Default for KeyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over a [`KeyList`].
pub struct KeyListIter<'a, T> {
    list: &'a KeyList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for KeyListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let id = self.current?;
        let node = self.list.slots.get(id.0)?.as_ref()?;
        self.current = node.next;
        Some(&node.value)
    }
}
