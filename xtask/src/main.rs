use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for vitrine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests, and doc in sequence
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
}

fn cargo(what: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{what} failed");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let steps: &[Commands] = match cli.command {
        Commands::Check => &[Commands::Fmt, Commands::Clippy, Commands::Test, Commands::Doc],
        ref single => std::slice::from_ref(single),
    };

    for step in steps {
        match step {
            Commands::Fmt => cargo("fmt", &["fmt", "--all", "--", "--check"])?,
            Commands::Clippy => cargo(
                "clippy",
                &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            )?,
            Commands::Test => cargo("test", &["test", "--workspace"])?,
            Commands::Doc => cargo("doc", &["doc", "--workspace", "--no-deps"])?,
            Commands::Build => cargo("build", &["build", "--workspace"])?,
            Commands::Check => unreachable!("check expands to its steps"),
        }
    }

    Ok(())
}
