mod adapters;
mod cli;
mod config;
mod core;
#[cfg(test)]
mod test_support;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::commands;
use cli::context::{CommandContext, ContextOptions};
use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();

    // RUST_LOG wins; --verbose only raises the default
    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if let Err(e) = run(&args) {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

fn run(args: &Cli) -> crate::core::errors::Result<()> {
    let ctx = CommandContext::new(&ContextOptions {
        config: args.config.as_deref(),
        plugins_config: args.plugins_config.as_deref(),
        account_sid: args.account_sid.as_deref(),
        auth_token: args.auth_token.as_deref(),
        json: args.json,
        quiet: args.quiet,
    })?;

    match &args.command {
        Commands::Build => commands::build::execute(&ctx),
        Commands::Test => commands::test::execute(&ctx),
        Commands::Start {
            names,
            include_remote,
        } => commands::start::execute(names, *include_remote, &ctx),
        Commands::Deploy {
            major,
            minor,
            patch: _,
            version,
            public,
            changelog,
            description,
        } => commands::deploy::execute(
            &commands::deploy::DeployArgs {
                bump: cli::bump_from_flags(*major, *minor),
                version: version.clone(),
                public: *public,
                changelog: changelog.clone(),
                description: description.clone(),
            },
            &ctx,
        ),
        Commands::CreateConfiguration { args } => {
            commands::create_configuration::execute(&args.into(), &ctx)
        }
        Commands::Release {
            configuration_sid,
            plugins,
            new,
            name,
            description,
        } => commands::release::execute(
            &cli::release_target(
                configuration_sid.as_deref(),
                plugins,
                *new,
                name.as_deref(),
                description.as_deref(),
            ),
            &ctx,
        ),
        Commands::Archive { target } => commands::archive::execute(&target.into(), &ctx),
        Commands::List { target } => commands::list::execute(&target.into(), &ctx),
        Commands::Diff { old_id, new_id } => commands::diff::execute(old_id, new_id, &ctx),
    }
}
