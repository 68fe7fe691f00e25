use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = agent_search_api::Args::parse();

	agent_search_api::run(args).await
}
