use tracing::trace;

/// Append-only growable buffer.
///
/// The buffer starts with a fixed capacity and doubles it whenever an append
/// would overflow, so a push costs amortized O(1). Dropping the buffer
/// releases its storage.
#[derive(Debug, Clone)]
pub struct GrowBuf<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Default for GrowBuf<T> {
    fn default() -> Self {
        Self::with_capacity(1)
    }
}

impl<T> GrowBuf<T> {
    /// Create an empty buffer that can hold `capacity` items before growing.
    ///
    /// A zero capacity is promoted to one, doubling from zero would never grow.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an item at the end of the buffer, doubling the capacity first if
    /// the buffer is full.
    pub fn push(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.grow();
        }
        self.items.push(item);
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        trace!(from = self.capacity, to = new_capacity, "growing buffer");
        self.items.reserve_exact(new_capacity - self.items.len());
        self.capacity = new_capacity;
    }

    /// Remove the last item. Popping an empty buffer is a no-op.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items the buffer holds before the next doubling.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every item while keeping the current capacity.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> std::ops::Deref for GrowBuf<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> Extend<T> for GrowBuf<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for GrowBuf<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buf = GrowBuf::default();
        buf.extend(iter);
        buf
    }
}

impl<T: PartialEq> PartialEq for GrowBuf<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for GrowBuf<T> {}
