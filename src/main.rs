use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use debias::llm::parse_key_value;
use debias::{
    all_biases, get_biases, AnthropicClient, AnthropicConfig, DebiasChain, DebiasReport,
    HumanReport, Inputs, LanguageModel, PromptTemplate, QueryChain,
};

#[derive(Parser)]
#[command(name = "debias")]
#[command(author, version, about = "Critique and revise LLM answers for human language biases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question, then remove bias from the answer one category at a time
    Run {
        /// Prompt template for the initial query, with {name} placeholders
        #[arg(short, long, default_value = "Q: {question} A:")]
        template: String,

        /// Shorthand for --input question=<QUESTION>
        #[arg(short, long)]
        question: Option<String>,

        /// Template value as key=value (repeatable)
        #[arg(short, long = "input", value_name = "KEY=VALUE")]
        inputs: Vec<String>,

        /// Bias category to apply (repeatable, default: all, in table order)
        #[arg(short, long = "bias", value_name = "NAME")]
        biases: Vec<String>,

        /// Include the initial answer and every critique/revision in the output
        #[arg(long)]
        intermediate_steps: bool,

        /// Output file for the machine-readable report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for the human-readable report (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Model to use (overrides DEBIAS_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f64>,

        /// Maximum tokens per completion
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the built-in bias categories
    Biases {
        /// Also print the critique and revision requests
        #[arg(short, long)]
        long: bool,
    },
}

struct RunOptions {
    template: String,
    inputs: Inputs,
    biases: Vec<String>,
    intermediate_steps: bool,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
    model: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            template,
            question,
            inputs,
            biases,
            intermediate_steps,
            output,
            human_readable,
            model,
            temperature,
            max_tokens,
            verbose,
        } => {
            setup_logging(verbose);
            let inputs = collect_inputs(question, &inputs)?;
            run_debias(RunOptions {
                template,
                inputs,
                biases,
                intermediate_steps,
                output,
                human_readable,
                model,
                temperature,
                max_tokens,
            })
            .await
        }
        Commands::Biases { long } => {
            list_biases(long);
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn collect_inputs(question: Option<String>, pairs: &[String]) -> Result<Inputs> {
    let mut inputs = Inputs::new();
    for pair in pairs {
        let (key, value) = parse_key_value(pair)?;
        inputs.insert(key, value);
    }
    if let Some(question) = question {
        inputs.insert("question".to_string(), question);
    }
    Ok(inputs)
}

async fn run_debias(options: RunOptions) -> Result<()> {
    let debiases = if options.biases.is_empty() {
        all_biases()
    } else {
        get_biases(Some(options.biases.as_slice()))?
    };
    let bias_names: Vec<String> = debiases.iter().map(|d| d.name.clone()).collect();

    let mut config = AnthropicConfig::from_env()?;
    if let Some(model) = options.model {
        config.model = model;
    }
    if let Some(temperature) = options.temperature {
        config.temperature = temperature;
    }
    if let Some(max_tokens) = options.max_tokens {
        config.max_tokens = max_tokens;
    }
    let model: Arc<dyn LanguageModel> = Arc::new(AnthropicClient::new(config));

    let prompt = PromptTemplate::new(options.template).context("Invalid --template")?;
    let query = QueryChain::new(model.clone(), prompt);
    let input_prompt = query.prompt_text(&options.inputs)?;

    // Report files always carry the full trace
    let want_steps =
        options.intermediate_steps || options.output.is_some() || options.human_readable.is_some();
    let chain = DebiasChain::from_model(model.clone(), query, debiases)?
        .with_intermediate_steps(want_steps);

    info!(
        "Running {} bias categories with {}: {}",
        bias_names.len(),
        model.name(),
        bias_names.join(", ")
    );

    let result = chain.run(&options.inputs).await?;

    if options.intermediate_steps {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.output);
    }

    let report = DebiasReport::new(
        model.name(),
        bias_names,
        options.inputs,
        input_prompt,
        result,
    );

    if let Some(path) = &options.output {
        report.write_json(path)?;
        info!("Report written to {:?}", path);
    }
    if let Some(path) = &options.human_readable {
        HumanReport::new(&report).write_file(path)?;
        info!("Human-readable report written to {:?}", path);
    }

    info!(
        "Complete: {} categories revised the response",
        report.result.revision_count()
    );

    Ok(())
}

fn list_biases(long: bool) {
    for bias in all_biases() {
        if long {
            println!("{}", bias.name);
            println!("  critique: {}", bias.critique_request);
            println!("  revision: {}", bias.revision_request);
            println!();
        } else {
            println!("{}", bias.name);
        }
    }
}
