use clap::Parser;

fn main() -> miette::Result<()> {
    bfgo::cli::Cli::parse().run()
}
