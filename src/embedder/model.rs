// model.rs - the embedding model a segmentation run depends on
use serde::{Deserialize, Serialize};

use super::EmbedError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub dim: usize,
    pub max_batch: usize,
}

impl EmbeddingModelInfo {
    pub fn new(name: impl Into<String>, dim: usize, max_batch: usize) -> Self {
        Self {
            name: name.into(),
            dim,
            max_batch,
        }
    }

    /// Sentence model the chat pipeline was tuned against
    pub fn minilm_l6_v2() -> Self {
        Self::new("sentence-transformers/all-MiniLM-L6-v2", 384, 32)
    }

    /// Name recorded in a run's manifest, e.g. `all-MiniLM-L6-v2@384`
    pub fn label(&self) -> String {
        let short = self.name.rsplit('/').next().unwrap_or(&self.name);
        format!("{}@{}", short, self.dim)
    }

    /// Reject a vector this model could not have produced: wrong width or
    /// a NaN/infinite component
    pub fn check_vector(&self, vector: &[f32]) -> Result<(), EmbedError> {
        if vector.len() != self.dim {
            return Err(EmbedError::DimensionMismatch {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        match vector.iter().position(|x| !x.is_finite()) {
            Some(component) => Err(EmbedError::NonFinite { component }),
            None => Ok(()),
        }
    }
}

impl Default for EmbeddingModelInfo {
    fn default() -> Self {
        Self::minilm_l6_v2()
    }
}
