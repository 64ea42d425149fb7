//! CLI interface for fankygpt

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::classifier::Classifier;
use crate::config::Config;
use crate::web;

#[derive(Parser)]
#[command(name = "fankygpt")]
#[command(about = "Local chat brain: incrementally trained naive-Bayes model with a math fast path", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the local model a question (math expressions are evaluated directly)
    Ask {
        /// The question or expression
        text: Vec<String>,
    },
    /// Train the model on one input/output pair
    Train {
        /// Input text
        input: String,
        /// Expected reply
        output: String,
    },
    /// Train the model from an article URL (title + first paragraphs)
    TrainUrl {
        /// Page to extract text from
        url: String,
    },
    /// Interactive chat loop against the local model
    Chat,
    /// Delete local state
    Reset {
        /// Delete the training data log
        #[arg(long)]
        data: bool,
        /// Delete the model artifact
        #[arg(long)]
        model: bool,
    },
    /// Download the model artifact from remote storage
    Pull,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let classifier = Classifier::from_config(&config)?;

    match cli.command {
        Commands::Ask { text } => {
            let input = text.join(" ");
            if input.trim().is_empty() {
                bail!("Nothing to ask");
            }
            classifier.ensure_artifact().await;
            println!("{}", answer(&classifier, &input));
        }
        Commands::Train { input, output } => {
            classifier.train(&input, &output).await?;
            println!("Trained on 1 example ({} total)", classifier.store().load_all()?.len());
        }
        Commands::TrainUrl { url } => {
            let text = web::extract_text_from_url(&url).await?;
            if text.is_empty() {
                bail!("No text could be extracted from {}", url);
            }
            classifier.train("article", &text).await?;
            println!("Trained on article text from {}", url);
        }
        Commands::Chat => {
            classifier.ensure_artifact().await;
            chat_loop(&classifier)?;
        }
        Commands::Reset { data, model } => {
            if !data && !model {
                bail!("Specify --data and/or --model");
            }
            if data {
                let existed = classifier.reset_data()?;
                println!(
                    "Training data {}",
                    if existed { "deleted" } else { "was already empty" }
                );
            }
            if model {
                let existed = classifier.reset_model()?;
                println!(
                    "Model artifact {}",
                    if existed { "deleted" } else { "was not present" }
                );
            }
        }
        Commands::Pull => {
            classifier.pull().await?;
            println!("Model artifact downloaded to {}", classifier.artifact_path().display());
        }
    }
    Ok(())
}

/// Render a prediction or its typed error as the reply text.
fn answer(classifier: &Classifier, input: &str) -> String {
    match classifier.predict(input) {
        Ok(reply) => reply,
        Err(e) => e.to_string(),
    }
}

fn chat_loop(classifier: &Classifier) -> Result<()> {
    println!("FankyGPT local chat. Type 'exit' to quit.");
    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    break;
                }
                editor.add_history_entry(line)?;
                println!("bot> {}", answer(classifier, line));
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
