use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cliclack::{input, intro, outro, spinner};
use console::style;

use codechat::context::PromptTemplate;
use codechat::providers::configs::{
    OpenAiProviderConfig, OPENAI_DEFAULT_HOST, OPENAI_DEFAULT_MODEL,
};
use codechat::providers::openai::OpenAiProvider;
use codechat::session::{Session, TurnRequest};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// OpenAI API key (can also be set via OPENAI_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Chat-completion endpoint host
    #[arg(long, default_value = OPENAI_DEFAULT_HOST)]
    host: String,

    /// Model to use
    #[arg(short, long, default_value = OPENAI_DEFAULT_MODEL)]
    model: String,

    /// Prompt template JSON file: {"prefix": "..."}
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Source file standing in for the editor selection, sent with every question
    #[arg(short, long)]
    code: Option<PathBuf>,

    /// Extra context file to include (repeatable)
    #[arg(short, long)]
    file: Vec<PathBuf>,

    /// Directory for the rendered HTML responses
    #[arg(short, long, default_value = "responses")]
    out_dir: PathBuf,
}

fn get_provider(cli: &Cli) -> Result<OpenAiProvider> {
    let api_key = cli
        .api_key
        .clone()
        .or_else(|| env::var("OPENAI_API_KEY").ok())
        .context("OPENAI_API_KEY not set and --api-key not provided")?;

    OpenAiProvider::new(OpenAiProviderConfig::new(
        cli.host.clone(),
        api_key,
        cli.model.clone(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // Everything that can abort the session is resolved before the first
    // question: credential, template, selection file.
    let provider = get_provider(&cli)?;
    let template = cli
        .template
        .as_deref()
        .map(PromptTemplate::load)
        .transpose()?;
    let code = match &cli.code {
        Some(path) => Some(fs::read_to_string(path).with_context(|| {
            format!("Failed to read code file {}", path.display())
        })?),
        None => None,
    };

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Failed to create {}", cli.out_dir.display()))?;

    let mut session = Session::new(Box::new(provider), template);

    intro(style(" codechat ").on_cyan().black())?;
    println!(
        "{}",
        style("Ask about your code. /clear resets the conversation, /exit quits.").dim()
    );

    let mut turn = 0usize;
    loop {
        let question: String = input("What do you want to ask?")
            .placeholder("e.g. Explain this code...")
            .interact()?;

        match question.trim() {
            "/exit" | "/quit" => break,
            "/clear" => {
                session.clear();
                println!("{}", style("Conversation history cleared.").yellow());
                continue;
            }
            _ => {}
        }

        let request = TurnRequest {
            question,
            code: code.clone(),
            file_paths: cli.file.clone(),
        };

        let spin = spinner();
        spin.start("Waiting for the model...");
        match session.ask(request).await {
            Ok(outcome) => {
                spin.stop("Reply received");
                for error in &outcome.file_errors {
                    println!("{}", style(format!("Warning: {}", error)).yellow());
                }

                turn += 1;
                let out_path = cli.out_dir.join(format!(
                    "response-{}-{:03}.html",
                    chrono::Local::now().format("%Y%m%d-%H%M%S"),
                    turn
                ));
                fs::write(&out_path, &outcome.html)
                    .with_context(|| format!("Failed to write {}", out_path.display()))?;
                println!(
                    "{} {}",
                    style("Rendered:").green().bold(),
                    out_path.display()
                );
            }
            Err(e) => {
                spin.stop("Request failed");
                // The turn failed but the session stays usable.
                println!("{}", style(format!("Error: {}", e)).red());
            }
        }
    }

    outro("Bye")?;
    Ok(())
}
