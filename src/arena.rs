use bumpalo::Bump;

/// Typed bump arena. Every AST node family gets its own arena, so nodes
/// can reference each other freely for the whole compilation of one
/// source file and are freed together when the phase finishes.
pub struct Arena<T> {
    bump: Bump,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena {
            bump: Bump::new(),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn alloc(&self, value: T) -> &T {
        self.bump.alloc(value)
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_stable_references() {
        let arena: Arena<i32> = Arena::new();
        let a = arena.alloc(42);
        let b = arena.alloc(100);
        assert_eq!(*a, 42);
        assert_eq!(*b, 100);
    }

    #[test]
    fn references_survive_many_allocations() {
        let arena: Arena<usize> = Arena::new();
        let refs: Vec<&usize> = (0..10000).map(|i| arena.alloc(i)).collect();
        for (i, r) in refs.iter().enumerate() {
            assert_eq!(**r, i);
        }
    }

    #[test]
    fn nodes_can_reference_earlier_nodes() {
        struct Node<'a> {
            value: i32,
            prev: Option<&'a Node<'a>>,
        }

        let arena: Arena<Node> = Arena::new();
        let first = arena.alloc(Node {
            value: 1,
            prev: None,
        });
        let second = arena.alloc(Node {
            value: 2,
            prev: Some(first),
        });
        assert_eq!(second.prev.unwrap().value, 1);
    }
}
