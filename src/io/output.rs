use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::llm::Inputs;
use crate::models::DebiasOutput;

/// Machine-readable record of one debias run
#[derive(Debug, Clone, Serialize)]
pub struct DebiasReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    /// Category names, in application order
    pub biases: Vec<String>,
    pub inputs: Inputs,
    /// The wrapped chain's rendered prompt
    pub input_prompt: String,
    #[serde(flatten)]
    pub result: DebiasOutput,
}

impl DebiasReport {
    pub fn new(
        model: &str,
        biases: Vec<String>,
        inputs: Inputs,
        input_prompt: String,
        result: DebiasOutput,
    ) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            model: model.to_string(),
            biases,
            inputs,
            input_prompt,
            result,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable rendering of a report
pub struct HumanReport<'a> {
    report: &'a DebiasReport,
}

impl<'a> HumanReport<'a> {
    pub fn new(report: &'a DebiasReport) -> Self {
        Self { report }
    }

    pub fn format(&self) -> String {
        let report = self.report;
        let mut output = String::new();

        output.push_str(&format!("Debias run {}\n", report.run_id));
        output.push_str(&format!(
            "Model: {}  Generated: {}\n",
            report.model,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("Biases: {}\n\n", report.biases.join(", ")));

        push_section(&mut output, "Prompt", &report.input_prompt);

        if let Some(initial) = &report.result.initial_output {
            push_section(&mut output, "Initial response", initial);
        }

        if let Some(steps) = &report.result.critiques_and_revisions {
            for step in steps {
                let status = if step.was_revised() { "revised" } else { "unchanged" };
                output.push_str(&format!("[{}] {}\n", step.bias, status));
                output.push_str(&indent(&wrap_text(&step.critique, 76)));
                output.push('\n');
                if step.was_revised() {
                    output.push_str("  ->\n");
                    output.push_str(&indent(&wrap_text(&step.revision, 76)));
                    output.push('\n');
                }
                output.push('\n');
            }
        }

        push_section(&mut output, "Final response", &report.result.output);
        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

fn push_section(output: &mut String, title: &str, body: &str) {
    output.push_str(title);
    output.push_str(":\n");
    output.push_str(&wrap_text(body, 80));
    output.push_str("\n\n");
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap text at approximately the given width, keeping paragraph breaks
fn wrap_text(text: &str, width: usize) -> String {
    text.split("\n\n")
        .map(|paragraph| wrap_paragraph(paragraph, width))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn wrap_paragraph(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len + word_len + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word_len;
    }

    result
}
