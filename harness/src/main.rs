use code_runner::{ExecutionConfig, TestRunner, run_group};
use colored::Colorize;
use db::models::test_block::TestResult;
use log::{error, info};
use sea_orm::DatabaseConnection;
use services::ServiceError;
use services::execution_service::ExecutionService;
use services::report_service::ReportService;
use services::test_block_service::TestBlockService;
use services::test_group_service::TestGroupService;
use std::{env, fs, path::Path, process};
use util::config;
use util::valgrind_report::ReportFilters;

const USAGE: &str = "\
Usage: harness <command> [args]

  list                          List test groups
  create-group <name>           Create a test group
  blocks <group_id>             List a group's test blocks and their results
  add <group_id> <commands>     Add one test block
  upload <group_id> <file.txt>  Add blocks from a file, split on blank lines
  run <group_id> [--restart]    Run pending blocks (all blocks with --restart)
  run-block <block_id>          Run a single block
  report <block_id>             Print a block's parsed report as JSON";

#[tokio::main]
async fn main() {
    common::logger::init_logger(&config::log_level(), &config::log_file());

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        println!("{USAGE}");
        process::exit(2);
    };

    info!(
        "{} ({}) using database {}",
        config::project_name(),
        config::app_env(),
        config::database_path()
    );

    let db = db::connect().await;
    if let Err(e) = db::migrate(&db).await {
        error!("Failed to apply migrations: {}", e);
        process::exit(1);
    }

    let code = match command {
        "list" => list_groups(&db).await,
        "create-group" => match args.get(1) {
            Some(name) => report(TestGroupService::create(&db, name).await.map(|g| {
                println!("Created group {} ({})", g.id, g.name);
            })),
            None => usage_error(),
        },
        "blocks" => match parse_id(args.get(1)) {
            Some(group_id) => list_blocks(&db, group_id).await,
            None => usage_error(),
        },
        "add" => match (parse_id(args.get(1)), args.get(2)) {
            (Some(group_id), Some(commands)) => report(
                TestBlockService::add_manual(&db, group_id, commands)
                    .await
                    .map(|b| println!("Added block {}", b.id)),
            ),
            _ => usage_error(),
        },
        "upload" => match (parse_id(args.get(1)), args.get(2)) {
            (Some(group_id), Some(file)) => upload(&db, group_id, file).await,
            _ => usage_error(),
        },
        "run" => match parse_id(args.get(1)) {
            Some(group_id) => {
                let restart_all = args.iter().any(|a| a == "--restart");
                run(&db, group_id, restart_all).await
            }
            None => usage_error(),
        },
        "run-block" => match parse_id(args.get(1)) {
            Some(block_id) => run_block(&db, block_id).await,
            None => usage_error(),
        },
        "report" => match parse_id(args.get(1)) {
            Some(block_id) => show_report(&db, block_id).await,
            None => usage_error(),
        },
        _ => usage_error(),
    };

    process::exit(code);
}

fn parse_id(arg: Option<&String>) -> Option<i64> {
    let parsed = arg.and_then(|a| a.trim().parse().ok());
    if parsed.is_none() {
        eprintln!("Invalid input. Please enter a valid numeric ID.");
    }
    parsed
}

fn usage_error() -> i32 {
    eprintln!("{USAGE}");
    2
}

fn report(result: Result<(), ServiceError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", "error:".red(), e);
            1
        }
    }
}

fn runner() -> Result<TestRunner, i32> {
    ExecutionConfig::from_app_config()
        .map(TestRunner::new)
        .map_err(|e| {
            eprintln!("{} {}", "error:".red(), e);
            2
        })
}

async fn list_groups(db: &DatabaseConnection) -> i32 {
    match TestGroupService::list(db).await {
        Ok(groups) if groups.is_empty() => {
            println!("No test groups found.");
            0
        }
        Ok(groups) => {
            println!("Available Test Groups:");
            for group in groups {
                println!("ID: {}, Name: {}", group.id, group.name);
            }
            0
        }
        Err(e) => report(Err(e)),
    }
}

async fn list_blocks(db: &DatabaseConnection, group_id: i64) -> i32 {
    match TestBlockService::list(db, group_id).await {
        Ok(blocks) => {
            for block in blocks {
                let status = match block.result {
                    Some(TestResult::Pass) => "PASS".green(),
                    Some(TestResult::Fail) => "FAIL".red(),
                    None => "----".dimmed(),
                };
                let first_line = block.commands.lines().next().unwrap_or_default();
                println!("[{}] {:>5}  {}", status, block.id, first_line);
            }
            0
        }
        Err(e) => report(Err(e)),
    }
}

async fn upload(db: &DatabaseConnection, group_id: i64, file: &str) -> i32 {
    let path = Path::new(file);
    if path.extension().and_then(|e| e.to_str()) != Some("txt") {
        return report(Err(ServiceError::InvalidInput(
            "Only .txt files can be uploaded.".into(),
        )));
    }
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return report(Err(e.into())),
    };
    report(
        TestBlockService::add_from_upload(db, group_id, &bytes)
            .await
            .map(|blocks| println!("Tests successfully added ({} blocks).", blocks.len())),
    )
}

async fn run(db: &DatabaseConnection, group_id: i64, restart_all: bool) -> i32 {
    let runner = match runner() {
        Ok(runner) => runner,
        Err(code) => return code,
    };
    let group = match TestGroupService::get(db, group_id).await {
        Ok(group) => group,
        Err(e) => return report(Err(e)),
    };

    println!("Starting tests for group '{}'...", group.name);
    match run_group(db, &runner, group_id, restart_all).await {
        Ok(summary) if summary.is_empty() => {
            println!("No pending tests found for the selected group.");
            0
        }
        Ok(summary) => {
            println!(
                "Test execution finished: {} run, {} {}, {} {}",
                summary.executed.len(),
                summary.passed,
                "passed".green(),
                summary.failed,
                "failed".red()
            );
            0
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red(), e);
            1
        }
    }
}

async fn run_block(db: &DatabaseConnection, block_id: i64) -> i32 {
    let runner = match runner() {
        Ok(runner) => runner,
        Err(code) => return code,
    };
    match ExecutionService::run_single_block(db, &runner, block_id).await {
        Ok(view) => {
            println!("{}", "--- commands ---".bold());
            print!("{}", view.outcome.script);
            println!("{}", "--- stdout ---".bold());
            print!("{}", view.outcome.stdout);
            println!("{}", "--- stderr ---".bold());
            print!("{}", view.outcome.stderr);
            println!(
                "Result: {}  (report: {})",
                view.outcome.verdict,
                view.outcome.report_path.display()
            );
            if let Some(next) = view.next_block_id {
                println!("Next block: {}", next);
            }
            0
        }
        Err(e) => report(Err(e)),
    }
}

async fn show_report(db: &DatabaseConnection, block_id: i64) -> i32 {
    match ReportService::load(db, block_id, &ReportFilters::from_config()).await {
        Ok(view) => match serde_json::to_string_pretty(&view) {
            Ok(json) => {
                println!("{json}");
                0
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red(), e);
                1
            }
        },
        Err(e) => report(Err(e)),
    }
}
