use clap::Parser;

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = agent_rank::Args::parse();

	agent_rank::run(args)
}
