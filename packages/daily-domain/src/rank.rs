#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Scored<T> {
	pub item: T,
	pub score: u32,
}

/// Drops non-positive scores, orders by score descending and keeps the first `limit`.
///
/// Equal scores keep their input order, which is the fetch order of the source.
pub fn rank<T>(candidates: Vec<(T, u32)>, limit: usize) -> Vec<T> {
	rank_scored(candidates, limit).into_iter().map(|scored| scored.item).collect()
}

pub fn rank_scored<T>(candidates: Vec<(T, u32)>, limit: usize) -> Vec<Scored<T>> {
	let mut kept: Vec<Scored<T>> = candidates
		.into_iter()
		.filter(|(_, score)| *score > 0)
		.map(|(item, score)| Scored { item, score })
		.collect();

	// `sort_by` is stable.
	kept.sort_by(|a, b| b.score.cmp(&a.score));
	kept.truncate(limit);

	kept
}
