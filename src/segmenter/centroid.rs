/// Running mean of the embeddings folded into the open chunk.
///
/// Keeps an element-wise sum in arrival order and divides on demand, which
/// gives the same bits as summing the whole membership and dividing once.
#[derive(Debug, Clone, Default)]
pub struct CentroidTracker {
    sum: Vec<f32>,
    count: usize,
}

impl CentroidTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all members and start over from a single embedding
    pub fn seed(&mut self, embedding: &[f32]) {
        self.sum.clear();
        self.sum.extend_from_slice(embedding);
        self.count = 1;
    }

    /// Add one more member
    pub fn fold(&mut self, embedding: &[f32]) {
        if self.count == 0 {
            self.seed(embedding);
            return;
        }

        for (acc, x) in self.sum.iter_mut().zip(embedding) {
            *acc += x;
        }
        self.count += 1;
    }

    pub fn reset(&mut self) {
        self.sum.clear();
        self.count = 0;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Element-wise mean of all members, or `None` with no members
    pub fn mean(&self) -> Option<Vec<f32>> {
        if self.count == 0 {
            return None;
        }

        let n = self.count as f32;
        Some(self.sum.iter().map(|x| x / n).collect())
    }
}
