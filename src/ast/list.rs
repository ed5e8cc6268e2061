/// Ordered child sequence used while a list-shaped node is being built
///
/// Children accumulated back-to-front get a single `reverse` before
/// `into_vec`; either way the finished node sees them in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeList<T> {
    items: Vec<T>,
}

impl<T> NodeList<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn append(&mut self, node: T) {
        self.items.push(node);
    }

    /// Flip the order once
    pub fn reverse(mut self) -> Self {
        self.items.reverse();
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for NodeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut list = NodeList::new();
        for n in 1..=3 {
            list.append(n);
        }
        assert_eq!(list.len(), 3);
        assert_eq!(list.into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_reverse_restores_source_order() {
        // Children collected back-to-front, as when walking a chain from its end
        let mut list = NodeList::new();
        for n in (1..=3).rev() {
            list.append(n);
        }
        assert_eq!(list.clone().into_vec(), vec![3, 2, 1]);
        assert_eq!(list.reverse().into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty() {
        let list: NodeList<u8> = NodeList::default();
        assert!(list.is_empty());
        assert!(list.reverse().into_vec().is_empty());
    }
}
