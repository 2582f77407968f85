//! A binary min-heap ordered by a caller-supplied score function.
//!
//! Unlike [std::collections::BinaryHeap], elements are not required to implement [Ord]: the heap
//! is built from a `score` closure that maps an element to any [PartialOrd] key and an `equals`
//! closure used to find an element again for [MinHeap::decrease_key]. This is what the router
//! needs to reposition an open node after a cheaper route to it was found.
use core::fmt;
use std::marker::PhantomData;

/// Binary min-heap over elements of type `T` ordered by `score(&T) -> K`.
///
/// # Example
/// ```rust
/// use grid_router::MinHeap;
/// let mut heap = MinHeap::new(
///     |e: &(char, i32)| e.1,
///     |a: &(char, i32), b: &(char, i32)| a.0 == b.0,
/// );
/// heap.push(('a', 50));
/// heap.push(('b', 10));
/// heap.push(('c', 20));
/// heap.decrease_key(('a', 5));
/// assert_eq!(heap.pop(), ('a', 5));
/// assert_eq!(heap.pop(), ('b', 10));
/// ```
pub struct MinHeap<T, K, S, E> {
    content: Vec<T>,
    score: S,
    equals: E,
    _key: PhantomData<fn() -> K>,
}

impl<T, K, S, E> MinHeap<T, K, S, E>
where
    K: PartialOrd,
    S: Fn(&T) -> K,
    E: Fn(&T, &T) -> bool,
{
    pub fn new(score: S, equals: E) -> Self {
        Self::with_capacity(0, score, equals)
    }

    pub fn with_capacity(capacity: usize, score: S, equals: E) -> Self {
        MinHeap {
            content: Vec::with_capacity(capacity),
            score,
            equals,
            _key: PhantomData,
        }
    }

    /// Inserts an element and sifts it up to its place.
    pub fn push(&mut self, element: T) {
        self.content.push(element);
        self.sift_up(self.content.len() - 1);
    }

    /// Removes and returns the element with the smallest score.
    ///
    /// # Panics
    /// Panics if the heap is empty. Check [is_empty](Self::is_empty) first or use
    /// [try_pop](Self::try_pop).
    pub fn pop(&mut self) -> T {
        match self.try_pop() {
            Some(element) => element,
            None => panic!("MinHeap::pop called on an empty heap"),
        }
    }

    /// Removes and returns the element with the smallest score, or [None] if the heap is empty.
    pub fn try_pop(&mut self) -> Option<T> {
        if self.content.is_empty() {
            return None;
        }
        let element = self.content.swap_remove(0);
        if !self.content.is_empty() {
            self.sift_down(0);
        }
        Some(element)
    }

    pub fn peek(&self) -> Option<&T> {
        self.content.first()
    }

    /// Replaces the stored element that `equals` the given one by the given one and moves it
    /// towards the root. The new score must not exceed the old one.
    ///
    /// Returns [false] without touching the heap if no equal element is stored.
    pub fn decrease_key(&mut self, element: T) -> bool {
        let Some(ix) = self
            .content
            .iter()
            .position(|stored| (self.equals)(stored, &element))
        else {
            return false;
        };
        debug_assert!(
            !((self.score)(&element) > (self.score)(&self.content[ix])),
            "decrease_key called with an increased score"
        );
        self.content[ix] = element;
        self.sift_up(ix);
        true
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Alias of [len](Self::len).
    pub fn size(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }

    fn less(&self, a: usize, b: usize) -> bool {
        (self.score)(&self.content[a]) < (self.score)(&self.content[b])
    }

    fn sift_up(&mut self, mut ix: usize) {
        while ix > 0 {
            let parent = (ix - 1) / 2;
            if !self.less(ix, parent) {
                break;
            }
            self.content.swap(ix, parent);
            ix = parent;
        }
    }

    fn sift_down(&mut self, mut ix: usize) {
        let len = self.content.len();
        loop {
            let left = 2 * ix + 1;
            let right = left + 1;
            let mut smallest = ix;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == ix {
                break;
            }
            self.content.swap(ix, smallest);
            ix = smallest;
        }
    }
}

impl<T: fmt::Debug, K, S, E> fmt::Debug for MinHeap<T, K, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MinHeap")
            .field("content", &self.content)
            .finish()
    }
}
