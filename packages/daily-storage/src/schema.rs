pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_profiles.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_profiles.sql")),
				"tables/002_daily_games.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_daily_games.sql")),
				"tables/003_forum_threads.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_forum_threads.sql")),
				"tables/004_forum_posts.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_forum_posts.sql")),
				"tables/005_comments.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_comments.sql")),
				"tables/006_badges.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_badges.sql")),
				"tables/007_user_badges.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_user_badges.sql")),
				"tables/008_anomalies.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_anomalies.sql")),
				"tables/009_daily_plays.sql" =>
					out.push_str(include_str!("../../../sql/tables/009_daily_plays.sql")),
				"tables/010_user_stats.sql" =>
					out.push_str(include_str!("../../../sql/tables/010_user_stats.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
