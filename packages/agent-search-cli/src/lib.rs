//! Shared command-line presentation for the agent-search binaries.

use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects, Style},
};

/// `<crate version> (<git sha>, <target triple>)`, as printed by `--version`.
pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	" (",
	env!("VERGEN_GIT_SHA"),
	", ",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
	")",
);

const HEADING: Style =
	AnsiColor::Yellow.on_default().effects(Effects::BOLD.insert(Effects::UNDERLINE));
const FLAG: Style = AnsiColor::Green.on_default().effects(Effects::BOLD);

pub fn styles() -> Styles {
	Styles::styled()
		.header(HEADING)
		.usage(HEADING)
		.literal(FLAG)
		.placeholder(AnsiColor::Magenta.on_default())
		.error(AnsiColor::Red.on_default().effects(Effects::BOLD))
		.valid(FLAG)
		.invalid(AnsiColor::Red.on_default().effects(Effects::UNDERLINE))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_names_the_crate_release_and_build() {
		assert!(VERSION.starts_with(concat!(env!("CARGO_PKG_VERSION"), " (")));
		assert!(VERSION.ends_with(')'));
	}

	#[test]
	fn headings_stand_out_from_flags() {
		let styles = styles();

		assert_eq!(*styles.get_header(), HEADING);
		assert_ne!(*styles.get_header(), *styles.get_literal());
	}
}
