/// Scale `v` to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 { for x in v.iter_mut() { *x /= norm; } }
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredIdx {
    pub idx: usize,
    pub score: f32,
}

/// Exact inner-product search. Returns at most `top_k` positions in
/// descending score order; equal scores keep the lower position first.
pub fn top_k_inner_product(haystack: &[Vec<f32>], query: &[f32], top_k: usize) -> Vec<ScoredIdx> {
    if top_k == 0 || haystack.is_empty() { return Vec::new(); }
    let mut scored: Vec<ScoredIdx> = haystack
        .iter()
        .enumerate()
        .map(|(idx, v)| {
            let score = dot(v, query);
            ScoredIdx { idx, score: if score.is_nan() { f32::NEG_INFINITY } else { score } }
        })
        .collect();
    // stable: ties stay in insertion order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);
    scored
}
