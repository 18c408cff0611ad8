use clap::Parser;
use colored::*;
use resumegen::api::{init_project, CmdMessage, CmdResult, MessageLevel, ResumeApi};
use resumegen::commands::render::renderer_config;
use resumegen::config::ResumegenConfig;
use resumegen::error::{ResumeError, Result};
use resumegen::output::OutputWriter;
use resumegen::source::yaml::YamlSource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns false when the command ran but some role failed.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let project_dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    match cli.command {
        Commands::Init { force } => handle_init(&project_dir, force),
        Commands::Build { roles, every } => handle_build(&init_api(&project_dir)?, roles, every),
        Commands::Render { role } => handle_render(&init_api(&project_dir)?, &role),
        Commands::Check => handle_check(&init_api(&project_dir)?),
        Commands::Roles => handle_roles(&init_api(&project_dir)?),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn init_api(project_dir: &Path) -> Result<ResumeApi<YamlSource>> {
    let config = ResumegenConfig::load(project_dir)?;
    debug!(dir = %project_dir.display(), ?config, "loaded config");

    let source = YamlSource::open(config.data_path_in(project_dir), &config.roles)?;
    let template_path = config.template_path_in(project_dir);
    let template = fs::read_to_string(&template_path).map_err(ResumeError::Io)?;
    let writer = OutputWriter::new(config.output_dir_in(project_dir))
        .with_prefix(&config.file_prefix)
        .with_ext(&config.file_ext);

    ResumeApi::new(source, &template, renderer_config(config.undefined), writer)
}

fn handle_build(api: &ResumeApi<YamlSource>, roles: Vec<String>, every: bool) -> Result<bool> {
    let result = if every {
        api.build_all()?
    } else {
        api.build(&roles)?
    };
    print_messages(&result.messages);
    Ok(result.is_success())
}

fn handle_render(api: &ResumeApi<YamlSource>, role: &str) -> Result<bool> {
    let result = api.render(role)?;
    if let Some(rendered) = &result.rendered {
        print!("{}", rendered);
    }
    Ok(true)
}

fn handle_check(api: &ResumeApi<YamlSource>) -> Result<bool> {
    let result = api.check()?;
    print_messages(&result.messages);
    Ok(result.is_success())
}

fn handle_roles(api: &ResumeApi<YamlSource>) -> Result<bool> {
    let result = api.roles()?;
    print_roles(&result);
    Ok(true)
}

fn handle_init(project_dir: &Path, force: bool) -> Result<bool> {
    let result = init_project(project_dir, force)?;
    print_messages(&result.messages);
    Ok(true)
}

fn print_roles(result: &CmdResult) {
    for role in &result.roles {
        println!("{}", role);
    }
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}
