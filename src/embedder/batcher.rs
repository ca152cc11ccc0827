// batcher.rs - groups embedding requests for prefetching

/// Splits an ordered list into consecutive batches
#[derive(Debug, Clone, Copy)]
pub struct Batcher {
    pub batch_size: usize,
}

impl Batcher {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Batches in order, each paired with the index of its first item
    pub fn batches<'a, T>(&self, items: &'a [T]) -> impl Iterator<Item = (usize, &'a [T])> + 'a {
        let size = self.batch_size;
        items
            .chunks(size)
            .enumerate()
            .map(move |(i, batch)| (i * size, batch))
    }
}
