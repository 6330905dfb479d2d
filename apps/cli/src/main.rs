mod args;
mod config;
mod logging;
mod report;

use std::io::{self, Read};

use app_api::{AppContext, CommandResponse, FailurePolicy, config_failure, handle_command};
use clap::Parser;
use llmsh_app::{AppPaths, AppState, LlmshConfig};
use llmsh_core::UsageMethod;
use tracing::{error, warn};

use crate::args::{CacheAction, Cli, Commands, ConfigAction};

/// Every path exits 0 so a failing backend never disturbs the interactive shell.
fn main() {
    let cli = Cli::parse();
    let paths = match AppPaths::from_home() {
        Ok(paths) => paths.with_config_file(cli.config.clone()),
        Err(err) => {
            eprintln!("{}", err);
            return;
        }
    };
    let data_dir = llmsh_app::ensure_data_dir(&paths);
    logging::init(&paths.log_file);
    if let Err(err) = data_dir {
        warn!(path = %paths.data_dir.display(), error = %err, "create data dir failed");
    }
    run(cli, paths);
}

fn run(cli: Cli, paths: AppPaths) {
    let policy = if cli.report_errors {
        FailurePolicy::Report
    } else {
        FailurePolicy::Silent
    };

    if let Some(method) = cli.command.method() {
        run_request(paths, method, policy);
        return;
    }

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Init => config::init(&paths.config_file),
            ConfigAction::Show => config::show(&paths.config_file),
        },
        command => {
            let Some(ctx) = load_context(paths) else {
                return;
            };
            match command {
                Commands::Stats { json } => stats(&ctx, json),
                Commands::Cache { action } => cache(&ctx, action),
                Commands::Clean { all } => {
                    eprint!("{}", report::render_clean(&app_api::clean(&ctx, all)));
                }
                Commands::Predict | Commands::Complete | Commands::Nl2cmd | Commands::Config { .. } => {}
            }
        }
    }
}

fn run_request(paths: AppPaths, method: UsageMethod, policy: FailurePolicy) {
    let mut raw = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut raw) {
        error!(error = %err, "read request from stdin failed");
        write_response(&CommandResponse::failure(format!("read request: {}", err)));
        return;
    }
    let ctx = match LlmshConfig::load(&paths.config_file) {
        Ok(config) => context(config, paths),
        Err(err) => {
            error!(error = %err, "load config failed");
            write_response(&config_failure(&err));
            return;
        }
    };
    if let Some(response) = handle_command(&ctx, method, &raw, policy) {
        write_response(&response);
    }
}

fn load_context(paths: AppPaths) -> Option<AppContext> {
    match LlmshConfig::load(&paths.config_file) {
        Ok(config) => Some(context(config, paths)),
        Err(err) => {
            error!(error = %err, "load config failed");
            eprintln!("load config: {}", err);
            None
        }
    }
}

fn context(config: LlmshConfig, paths: AppPaths) -> AppContext {
    AppContext {
        app_state: AppState::with_openai(config),
        paths,
    }
}

fn stats(ctx: &AppContext, json: bool) {
    let report = match app_api::usage_report(ctx) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("Error loading records: {}", err);
            return;
        }
    };
    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(err) => eprintln!("Error encoding report: {}", err),
        }
    } else {
        print!("{}", report::render_usage(&report));
    }
}

fn cache(ctx: &AppContext, action: CacheAction) {
    match action {
        CacheAction::Prune => match app_api::cache_prune(ctx) {
            Ok(stats) => eprintln!(
                "Pruned {} expired and {} excess cache entries",
                stats.expired, stats.evicted
            ),
            Err(err) => eprintln!("Error pruning cache: {}", err),
        },
        CacheAction::Clear => match app_api::cache_clear(ctx) {
            Ok(removed) => eprintln!("Removed {} cache entries", removed),
            Err(err) => eprintln!("Error clearing cache: {}", err),
        },
    }
}

fn write_response(response: &CommandResponse) {
    match serde_json::to_string(response) {
        Ok(line) => println!("{}", line),
        Err(err) => error!(error = %err, "encode response failed"),
    }
}
