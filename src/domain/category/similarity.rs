/// 두 벡터의 코사인 유사도.
///
/// 어느 한쪽의 크기가 0이거나 차원이 다르면 0을 반환합니다.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// 가장 유사도가 높은 후보를 고릅니다.
///
/// 동점이면 먼저 나온 후보가 남습니다. NaN 점수는 무시합니다.
pub fn best_match<'a, I>(query: &[f32], candidates: I) -> Option<(&'a str, f32)>
where
    I: IntoIterator<Item = (&'a str, &'a [f32])>,
{
    let mut best: Option<(&'a str, f32)> = None;
    for (name, vector) in candidates {
        let score = cosine_similarity(query, vector);
        if score.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((name, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_should_score_one() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_should_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn opposite_vectors_should_score_minus_one() {
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_magnitude_should_score_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn dimension_mismatch_should_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn best_match_should_pick_highest_score() {
        let joy = [1.0, 0.0];
        let sadness = [0.0, 1.0];
        let candidates = vec![("기쁨", &joy[..]), ("슬픔", &sadness[..])];

        let (name, score) = best_match(&[0.2, 0.9], candidates).unwrap();

        assert_eq!(name, "슬픔");
        assert!(score > 0.9);
    }

    #[test]
    fn best_match_should_keep_first_on_tie() {
        let a = [1.0, 0.0];
        let b = [1.0, 0.0];
        let candidates = vec![("a", &a[..]), ("b", &b[..])];

        assert_eq!(best_match(&[1.0, 0.0], candidates).map(|(n, _)| n), Some("a"));
    }

    #[test]
    fn best_match_should_skip_nan_scores() {
        let broken = [f32::NAN, 0.0];
        let fine = [0.0, 1.0];
        let candidates = vec![("broken", &broken[..]), ("fine", &fine[..])];

        assert_eq!(best_match(&[0.0, 1.0], candidates).map(|(n, _)| n), Some("fine"));
    }

    #[test]
    fn best_match_should_return_none_without_candidates() {
        let candidates: Vec<(&str, &[f32])> = vec![];
        assert!(best_match(&[1.0], candidates).is_none());
    }
}
