use crate::query::QueryContext;

pub const EXACT_QUERY: u32 = 220;
pub const PREFIX_QUERY: u32 = 120;
pub const CONTAINS_QUERY: u32 = 70;
pub const EXACT_TOKEN: u32 = 35;
pub const PREFIX_TOKEN: u32 = 22;
pub const CONTAINS_TOKEN: u32 = 12;

/// Scores one text field against the query.
///
/// The whole-query checks are cumulative, so an exact match also collects the prefix and
/// substring bonuses. Each token (repeats included) then earns at most one tier.
pub fn score_text(field: Option<&str>, ctx: &QueryContext) -> u32 {
	let Some(field) = field else { return 0 };

	if field.is_empty() {
		return 0;
	}

	let value = field.to_lowercase();
	let mut score = 0;

	if value == ctx.lower {
		score += EXACT_QUERY;
	}
	if value.starts_with(ctx.lower.as_str()) {
		score += PREFIX_QUERY;
	}
	if value.contains(ctx.lower.as_str()) {
		score += CONTAINS_QUERY;
	}

	for token in &ctx.tokens {
		if value == *token {
			score += EXACT_TOKEN;
		} else if value.starts_with(token.as_str()) {
			score += PREFIX_TOKEN;
		} else if value.contains(token.as_str()) {
			score += CONTAINS_TOKEN;
		}
	}

	score
}
