mod commands;

use std::io::Write as _;

use clap::{CommandFactory, Parser, Subcommand};

use bumper_lanes::git::Repository;
use bumper_lanes::hook_io::{self, HookRequest};

/// Exit code the host treats as "route stderr to the assistant as context"
/// without blocking the tool result (spec §6).
const STDERR_TO_ASSISTANT_EXIT: i32 = 2;

#[derive(Parser)]
#[command(
    name = "bumper",
    about = "A code-review circuit breaker for AI coding assistants",
    long_about = "A code-review circuit breaker for AI coding assistants.\n\n\
The status line's fuel gauge:\n\n\
  ▂ under 70%\n\
  ▄ 70–89%\n\
  █ 90%+\n\
  * dirty working tree"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// C5: establish a session baseline.
    SessionStart,
    /// C6: decide allow/deny for a file-modifying tool call.
    PreToolUse,
    /// C7: refresh score, emit tier warnings, detect commits.
    PostToolUse,
    /// C8: decide whether to block the end-of-turn stop.
    Stop,
    /// C9: intercept reserved slash-commands.
    PromptSubmit,
    /// C10: render the status line.
    StatusLine {
        #[arg(long, default_value = "all")]
        widget: String,
    },
    /// Direct-invocation diagnostic: print the current session's score breakdown.
    Score {
        #[arg(long)]
        session: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    // clap prints --help and exits before Cli::parse() returns, so the
    // markdown-rendering pass has to intercept the raw args first.
    if matches!(std::env::args().nth(1).as_deref(), Some("--help") | Some("-h")) {
        let help = Cli::command().render_long_help().to_string();
        print!("{}", bumper_lanes::md_help::render_markdown_in_help(&help));
        return;
    }

    let cli = Cli::parse();

    match cli.command {
        Command::SessionStart => run_session_start(),
        Command::PreToolUse => run_pre_tool_use(),
        Command::PostToolUse => run_post_tool_use(),
        Command::Stop => run_stop(),
        Command::PromptSubmit => run_prompt_submit(),
        Command::StatusLine { widget } => run_status_line(&widget),
        Command::Score { session } => run_score(session),
    }
}

fn read_request() -> Option<HookRequest> {
    match hook_io::read_request() {
        Ok(req) => Some(req),
        Err(e) => {
            log::warn!("could not parse hook request, fail open: {e}");
            None
        }
    }
}

fn print_json(value: &serde_json::Value) {
    if let Ok(text) = serde_json::to_string(value) {
        println!("{text}");
    }
}

fn run_session_start() {
    if let Some(request) = read_request() {
        commands::session_start::run(&request);
    }
}

fn run_pre_tool_use() {
    let Some(request) = read_request() else {
        return;
    };
    if let Some(reply) = commands::pre_tool_use::run(&request) {
        print_json(&reply);
    }
}

fn run_post_tool_use() {
    let Some(request) = read_request() else {
        return;
    };
    if let Some(message) = commands::post_tool_use::run(&request) {
        eprintln!("{message}");
        std::io::stderr().flush().ok();
        std::process::exit(STDERR_TO_ASSISTANT_EXIT);
    }
}

fn run_stop() {
    let Some(request) = read_request() else {
        return;
    };
    if let Some(reply) = commands::stop::run(&request) {
        print_json(&reply);
    }
}

fn run_prompt_submit() {
    let Some(request) = read_request() else {
        return;
    };
    if let Some(reply) = commands::prompt_submit::run(&request) {
        print_json(&reply);
    }
}

fn run_status_line(widget: &str) {
    let Some(request) = read_request() else {
        return;
    };
    let line = commands::status_line::run(&request, commands::status_line::WidgetMode::parse(widget));
    println!("{line}");
}

fn run_score(session: Option<String>) {
    let session_id = session
        .or_else(|| std::env::var("BUMPER_SESSION_ID").ok())
        .unwrap_or_default();

    if session_id.is_empty() {
        bumper_lanes::styled_eprintln!("<red>no session id given (pass --session or set BUMPER_SESSION_ID)</>");
        std::process::exit(1);
    }

    let repo = Repository::current();
    let Some(record) = bumper_lanes::session::load(&repo, &session_id).ok().flatten() else {
        bumper_lanes::styled_eprintln!("<yellow>no session record for {}</>", session_id);
        std::process::exit(1);
    };

    match bumper_lanes::score::score(&repo, &record.baseline_tree) {
        Ok(breakdown) => {
            bumper_lanes::styled_println!(
                "<bold>score</> {} / {} (N={} E={} F={} scatter={})",
                breakdown.score,
                record.threshold_limit,
                breakdown.new_additions,
                breakdown.edit_additions,
                breakdown.files_touched,
                breakdown.scatter_penalty,
            );
            for (path, added) in &breakdown.per_file_additions {
                println!(
                    "  {}+{added}{} {path}",
                    bumper_lanes::styling::ADDITION.render(),
                    bumper_lanes::styling::ADDITION.render_reset(),
                );
            }
        }
        Err(e) => {
            eprintln!("{}", e.styled());
            std::process::exit(1);
        }
    }
}
