//! Shellbox CLI - reproducible containerized shell environments

use std::path::Path;

use shellbox::cli::{Args, ImageCommand, SubCommand};
use shellbox::{init_project, BuildOutcome, Client, ShellboxError, WrapperGenerator, VERSION};

fn main() {
    let args = Args::parse_cli();

    if let Err(e) = run(args) {
        // A failing in-container command already printed its own output;
        // only its exit code is carried through.
        if let ShellboxError::CommandExited(code) = e {
            std::process::exit(code);
        }
        eprintln!("Error: {}", e);
        if matches!(e, ShellboxError::ConfigNotFound(_)) {
            eprintln!("Run 'shellbox init' to create one.");
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> shellbox::Result<()> {
    let Args { command, config } = args;

    match command {
        SubCommand::Init { dockerfile } => {
            init_project(&config, dockerfile)?;
            println!("Created {}", config.display());
            if dockerfile {
                println!("Created Dockerfile");
            }
            println!("Run 'shellbox open' to enter your environment.");
            Ok(())
        }

        SubCommand::Build { force } => build(&config, force),

        SubCommand::Run { args: run_args } => {
            let client = Client::new(&config)?;
            client.run(&run_args)
        }

        SubCommand::Open => {
            let client = Client::new(&config)?;
            client.open(&WrapperGenerator::new(VERSION))
        }

        SubCommand::Image { command } => match command {
            ImageCommand::Build { force } => build(&config, force),
            ImageCommand::List => list_images(&config),
            ImageCommand::Clean { all } => clean_images(&config, all),
            ImageCommand::Info { reference } => image_info(&config, reference.as_deref()),
            ImageCommand::Prune { force } => prune_images(&config, force),
        },

        SubCommand::Version => {
            println!("shellbox version {}", VERSION);
            Ok(())
        }
    }
}

fn build(config: &Path, force: bool) -> shellbox::Result<()> {
    let client = Client::new(config)?;
    println!("Building image...");
    match client.build(force)? {
        BuildOutcome::Built(tag) => println!("Successfully built image: {}", tag),
        BuildOutcome::UpToDate(tag) => {
            println!("Image {} is up to date (use --force to rebuild)", tag)
        }
    }
    Ok(())
}

fn list_images(config: &Path) -> shellbox::Result<()> {
    let client = Client::new(config)?;
    let images = client.list_images()?;

    if images.is_empty() {
        println!("No shellbox images found.");
        return Ok(());
    }

    println!(
        "{:<30} {:<15} {:<15} {}",
        "REPOSITORY:TAG", "IMAGE ID", "SIZE", "CREATED"
    );
    for image in images {
        println!(
            "{:<30} {:<15} {:<15} {}",
            image.reference(),
            image.id,
            image.size,
            image.created_at
        );
    }
    Ok(())
}

fn clean_images(config: &Path, all: bool) -> shellbox::Result<()> {
    let client = Client::new(config)?;
    let removed = client.clean_images(all)?;

    if removed.is_empty() {
        println!("Nothing to remove.");
        return Ok(());
    }
    for reference in &removed {
        println!("Removed {}", reference);
    }
    println!("Removed {} image(s).", removed.len());
    Ok(())
}

fn image_info(config: &Path, reference: Option<&str>) -> shellbox::Result<()> {
    let client = Client::new(config)?;
    let info = client.image_info(reference)?;

    println!("ID:           {}", info.id);
    if !info.repo_tags.is_empty() {
        println!("Tags:         {}", info.repo_tags.join(", "));
    }
    if let Some(created) = info.created {
        println!("Created:      {}", created.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("Size:         {:.1} MB", info.size as f64 / 1_000_000.0);
    if !info.os.is_empty() {
        println!("Platform:     {}/{}", info.os, info.architecture);
    }
    Ok(())
}

fn prune_images(config: &Path, force: bool) -> shellbox::Result<()> {
    let client = Client::new(config)?;

    if !force {
        let candidates = client.prune_candidates()?;
        if candidates.is_empty() {
            println!("No dangling shellbox images.");
        } else {
            for image in &candidates {
                println!("Would remove {} ({})", image.id, image.size);
            }
            println!("Run with --force to remove {} image(s).", candidates.len());
        }
        return Ok(());
    }

    let removed = client.prune_images()?;
    if removed.is_empty() {
        println!("No dangling shellbox images.");
    } else {
        println!("Removed {} image(s).", removed.len());
    }
    Ok(())
}
