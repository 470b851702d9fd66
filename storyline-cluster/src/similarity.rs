//! Cosine similarity over term-weight vectors

use ndarray::ArrayView1;

/// Guards the denominator against empty or zero vectors
const EPSILON: f32 = 1e-9;

/// Calculate cosine similarity between two weight vectors
///
/// Formula: cos(θ) = (A · B) / (||A|| ||B|| + ε)
///
/// The ε term means zero vectors (out-of-vocabulary text) score 0.0 instead
/// of dividing by zero. Vectors of different dimensionality never compare
/// meaningfully and also score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let a_view = ArrayView1::from(a);
    let b_view = ArrayView1::from(b);

    let dot = a_view.dot(&b_view);
    let norm_a = a_view.dot(&a_view).sqrt();
    let norm_b = b_view.dot(&b_view).sqrt();

    dot / (norm_a * norm_b + EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let a = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-5, "identical vectors should score ~1.0");
    }

    #[test]
    fn test_orthogonal_vectors() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_empty_vectors_score_zero() {
        let a: Vec<f32> = Vec::new();
        assert_eq!(cosine_similarity(&a, &a), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_scores_zero() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }
}
