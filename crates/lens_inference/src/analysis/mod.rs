use chrono::{DateTime, SecondsFormat, Utc};
use lens_core::{AnalysisModel, Result};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// One pass over the article, phrased as a persona with a single job.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisTask {
    pub heading: &'static str,
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
    pub instruction: &'static str,
    pub expected_output: &'static str,
}

impl AnalysisTask {
    fn system_prompt(&self) -> String {
        format!("You are the {}. {}\nYour goal: {}", self.role, self.backstory, self.goal)
    }

    fn prompt(&self, url: &str, title: Option<&str>, content: &str) -> String {
        format!(
            "{}\n\nTitle: {}\nURL: {}\n\n{}\n\nExpected output: {}",
            self.instruction,
            title.unwrap_or("(untitled)"),
            url,
            content,
            self.expected_output
        )
    }
}

pub const TASKS: [AnalysisTask; 3] = [
    AnalysisTask {
        heading: "Summary",
        role: "Article Summarizer",
        goal: "Summarize the key points of an article.",
        backstory: "You are an expert in summarizing articles, able to extract the most important information and present it in a concise and easy-to-understand format.",
        instruction: "Summarize the following article:",
        expected_output: "A concise summary of the article's key points in markdown format.",
    },
    AnalysisTask {
        heading: "Underlying Assumptions",
        role: "Assumption Identifier",
        goal: "Identify the underlying assumptions in an article.",
        backstory: "You have a keen eye for identifying hidden assumptions and biases in written content. You can uncover the author's underlying beliefs and perspectives.",
        instruction: "Identify the underlying assumptions in the following article:",
        expected_output: "A list of the author's underlying assumptions in markdown format.",
    },
    AnalysisTask {
        heading: "Errors and Bias",
        role: "Error and Bias Detector",
        goal: "Identify potential factual errors, logical fallacies, and biases in an article.",
        backstory: "You are a meticulous fact-checker and critical thinker, able to spot inconsistencies, logical flaws, and biased language in any text.",
        instruction: "Identify potential factual errors, logical fallacies, and biases in the following article:",
        expected_output: "A list of potential errors and biases in the article, with explanations, in markdown format.",
    },
];

/// A finished report and where it was written.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub markdown: String,
    pub output_path: PathBuf,
    pub model_provider: String,
    pub model_name: String,
    pub created_at: DateTime<Utc>,
}

/// Runs every task in `TASKS` in order and writes one markdown report.
pub struct ArticleAnalyzer {
    model: Arc<dyn AnalysisModel>,
    output_dir: PathBuf,
}

impl fmt::Debug for ArticleAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleAnalyzer")
            .field("model", &self.model)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl ArticleAnalyzer {
    pub fn new(model: Arc<dyn AnalysisModel>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            model,
            output_dir: output_dir.into(),
        }
    }

    pub async fn analyze(
        &self,
        url: &str,
        title: Option<&str>,
        content: &str,
    ) -> Result<AnalysisReport> {
        let mut sections = Vec::with_capacity(TASKS.len());
        for task in &TASKS {
            info!("🔎 {} working on {}", task.role, url);
            let output = self
                .model
                .complete(&task.system_prompt(), &task.prompt(url, title, content))
                .await?;
            sections.push((task.heading, output));
        }

        let created_at = Utc::now();
        let markdown = render_report(
            url,
            title,
            self.model.provider(),
            self.model.model_name(),
            &created_at,
            &sections,
        );

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let output_path = self.output_dir.join(report_file_name(url, title, &created_at));
        tokio::fs::write(&output_path, &markdown).await?;
        info!("📝 Report written to {}", output_path.display());

        Ok(AnalysisReport {
            markdown,
            output_path,
            model_provider: self.model.provider().to_string(),
            model_name: self.model.model_name().to_string(),
            created_at,
        })
    }
}

fn render_report(
    url: &str,
    title: Option<&str>,
    provider: &str,
    model: &str,
    created_at: &DateTime<Utc>,
    sections: &[(&str, String)],
) -> String {
    let mut report = format!(
        "# Article Analysis: {}\n\n- URL: {}\n- Model: {}/{}\n- Generated: {}\n",
        title.unwrap_or(url),
        url,
        provider,
        model,
        created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    for (heading, body) in sections {
        report.push_str(&format!("\n## {}\n\n{}\n", heading, body.trim()));
    }
    report
}

fn report_file_name(url: &str, title: Option<&str>, created_at: &DateTime<Utc>) -> String {
    let source = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| url.split_once("://").map_or(url, |(_, rest)| rest));
    format!("{}-{}.md", slugify(source), created_at.format("%Y%m%dT%H%M%S%3fZ"))
}

fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
        if slug.len() >= 60 {
            break;
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "article".to_string()
    } else {
        slug.to_string()
    }
}
