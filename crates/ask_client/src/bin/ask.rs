//! ask: one-shot question from the command line.
//! Reads config, sends the question (argument or first stdin line) to the
//! answering service and prints the answer to stdout.

use ask_client::{config, logging, QuestionForm};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "ask", version, about = "Ask the answering service one question")]
struct Args {
    /// Config file (default: $ASK_CONFIG, then ~/.ask/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Question text; read from stdin when omitted
    question: Option<String>,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn read_question_from_stdin() -> String {
    let mut line = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut line) {
        fail(format!("failed to read stdin: {}", e));
    }
    line.trim_end_matches(['\r', '\n']).to_string()
}

fn main() {
    let args = Args::parse();

    let config_path = config::resolve_config_path(args.config.as_deref()).unwrap_or_else(|e| fail(e));
    let cfg = config::load_or_default(&config_path).unwrap_or_else(|e| {
        fail(format!(
            "failed to load config from {}: {}",
            config_path.display(),
            e
        ))
    });
    logging::init_stderr(cfg.log.filter.as_deref().unwrap_or("warn"));

    let question = args.question.unwrap_or_else(read_question_from_stdin);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| fail(format!("failed to create runtime: {}", e)));

    rt.block_on(async {
        let answerer = ask_client::connect_answerer(&cfg.endpoint)
            .await
            .unwrap_or_else(|e| fail(format!("connection failed: {}", e)));

        let mut form = QuestionForm::new();
        form.update_text(question);
        form.ask_with(answerer.as_ref()).await;

        if let Some(e) = form.error() {
            fail(format!("question failed: {}", e));
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();
        let _ = writeln!(out, "{}", form.answer().unwrap_or_default());
        let _ = out.flush();
    });
}
