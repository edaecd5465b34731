use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = daily_api::Args::parse();

	daily_api::run(args).await
}
