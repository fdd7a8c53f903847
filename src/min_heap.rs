//! Binary min-heap used as the merge queue during tree construction.
//!
//! The builder only ever needs "remove the two smallest, insert one back",
//! so this stays deliberately small. Ordering comes from the element's `Ord`
//! impl; with a total order the pop sequence is fully deterministic.

#[derive(Debug, Clone, Default)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T: Ord> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap { elements: Vec::new() }
    }

    /// Heapifies `source` in place, bottom-up.
    pub fn build(source: Vec<T>) -> Self {
        let mut heap = MinHeap { elements: source };
        let n = heap.len();
        for i in (0..n / 2).rev() {
            heap.sift_down(i);
        }
        heap
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        self.sift_up(self.elements.len() - 1);
    }

    pub fn extract_min(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.elements.len() - 1;
        self.elements.swap(0, last);
        let min = self.elements.pop();
        if !self.elements.is_empty() {
            self.sift_down(0);
        }
        min
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[i] < self.elements[p] {
                self.elements.swap(i, p);
                i = p;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < self.elements.len() && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < self.elements.len() && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }

            if smallest == i {
                break;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }
}
