/// Paint order of pieces by index; later entries draw on top.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaintOrder {
    ids: Vec<usize>,
}

impl PaintOrder {
    pub fn new(total: usize) -> Self {
        Self {
            ids: (0..total).collect(),
        }
    }

    /// Accepts `order` only if it is a permutation of `0..total`.
    pub fn from_order(order: Vec<usize>, total: usize) -> Option<Self> {
        if order.len() != total {
            return None;
        }
        let mut seen = vec![false; total];
        for &id in &order {
            if id >= total || seen[id] {
                return None;
            }
            seen[id] = true;
        }
        Some(Self { ids: order })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.ids
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.ids.iter().copied()
    }

    pub fn top(&self) -> Option<usize> {
        self.ids.last().copied()
    }

    /// Moves `id` to the top, keeping every other entry in place relative to
    /// the rest. Returns false if `id` is not present.
    pub fn move_to_end(&mut self, id: usize) -> bool {
        let Some(pos) = self.ids.iter().position(|&entry| entry == id) else {
            return false;
        };
        let entry = self.ids.remove(pos);
        self.ids.push(entry);
        true
    }

    /// Stable reorder by key; entries with equal keys keep their relative order.
    pub fn sort_by_key<K: Ord>(&mut self, key: impl FnMut(&usize) -> K) {
        self.ids.sort_by_key(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_to_end_is_stable() {
        let mut order = PaintOrder::new(5);
        assert!(order.move_to_end(1));
        assert_eq!(order.as_slice(), &[0, 2, 3, 4, 1]);
        assert!(order.move_to_end(1));
        assert_eq!(order.as_slice(), &[0, 2, 3, 4, 1]);
        assert!(order.move_to_end(0));
        assert_eq!(order.as_slice(), &[2, 3, 4, 1, 0]);
        assert_eq!(order.top(), Some(0));
    }

    #[test]
    fn move_to_end_ignores_unknown_ids() {
        let mut order = PaintOrder::new(3);
        assert!(!order.move_to_end(7));
        assert_eq!(order.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn from_order_requires_a_permutation() {
        assert!(PaintOrder::from_order(vec![2, 0, 1], 3).is_some());
        assert!(PaintOrder::from_order(vec![0, 0, 1], 3).is_none());
        assert!(PaintOrder::from_order(vec![0, 1], 3).is_none());
        assert!(PaintOrder::from_order(vec![0, 1, 3], 3).is_none());
    }
}
