//! Narrative composition: a generated obituary when a text-generation
//! client is available, the fixed template otherwise.
//!
//! The generative path never fails from the caller's point of view. Any
//! transport error, provider error or empty answer is logged and replaced
//! by the template narrative.

use std::fmt::Write as _;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::extract::{describe_file_type, extension, Extraction};
use crate::ports::llm::{CompletionRequest, LlmClient};

const MAX_TOKENS: u32 = 300;
const PREVIEW_CHARS: usize = 2000;
const LAST_WORDS_CHARS: usize = 80;
const MEMORIAL_SYMBOLS: usize = 3;

/// Everything the composer knows about the deceased.
#[derive(Debug, Clone, Copy)]
pub struct ComposeInput<'a> {
    /// Repository-relative path.
    pub path: &'a str,
    /// Final content of the file.
    pub content: &'a str,
    /// Symbols and line count extracted from `content`.
    pub extraction: &'a Extraction,
    /// Human-supplied cause of death.
    pub reason: Option<&'a str>,
    /// First-commit date.
    pub born: Option<NaiveDate>,
    /// Deletion date.
    pub died: Option<NaiveDate>,
}

/// How the narrative was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeMode {
    /// Written by the text-generation service.
    Generated,
    /// Filled from the template because no client was configured.
    Template,
    /// Filled from the template because the generative call failed.
    Fallback {
        /// Why the generative call was abandoned.
        reason: String,
    },
}

/// The composer's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    /// Obituary body, 3 to 5 sentences.
    pub narrative: String,
    /// Excerpt of the file's first meaningful line.
    pub last_words: String,
    /// Which strategy produced `narrative`.
    pub mode: ComposeMode,
}

/// Composes an obituary, trying `llm` first when one is given.
pub async fn compose(llm: Option<&dyn LlmClient>, model: &str, input: &ComposeInput<'_>) -> Composition {
    let last_words = last_words(input.content);

    let Some(llm) = llm else {
        return Composition { narrative: template_narrative(input), last_words, mode: ComposeMode::Template };
    };

    let request =
        CompletionRequest { model: model.to_string(), prompt: build_prompt(input), max_tokens: MAX_TOKENS };

    let failure = match llm.complete(&request).await {
        Ok(response) => {
            let text = response.text.trim();
            if !text.is_empty() {
                info!(
                    path = input.path,
                    prompt_tokens = response.prompt_tokens,
                    completion_tokens = response.completion_tokens,
                    "generated obituary"
                );
                return Composition {
                    narrative: text.to_string(),
                    last_words,
                    mode: ComposeMode::Generated,
                };
            }
            "empty response from text-generation service".to_string()
        }
        Err(e) => e.to_string(),
    };

    warn!(path = input.path, error = %failure, "generated obituary unavailable, using template");
    Composition {
        narrative: template_narrative(input),
        last_words,
        mode: ComposeMode::Fallback { reason: failure },
    }
}

/// Days from `born` to `died`, when both are known.
#[must_use]
pub fn lifespan_days(born: Option<NaiveDate>, died: Option<NaiveDate>) -> Option<i64> {
    Some((died? - born?).num_days())
}

/// First meaningful line of `content`, truncated.
///
/// Comment-only lines are skipped unless nothing else is left.
#[must_use]
pub fn last_words(content: &str) -> String {
    const COMMENT_MARKERS: &[&str] = &["#", "//", "--", "/*", "*"];

    let mut non_blank = content.lines().map(str::trim).filter(|line| !line.is_empty());
    let first = non_blank.clone().next();
    let line = non_blank
        .find(|line| !COMMENT_MARKERS.iter().any(|marker| line.starts_with(marker)))
        .or(first)
        .unwrap_or_default();
    line.chars().take(LAST_WORDS_CHARS).collect()
}

fn plural(count: impl Into<i64>, word: &str) -> String {
    let count = count.into();
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

fn role(path: &str) -> &'static str {
    match extension(path).as_deref() {
        Some("py") => "faithfully served the Python runtime",
        Some("js" | "jsx" | "mjs" | "cjs") => "brought interactivity to the browser",
        Some("ts" | "tsx") => "kept types honest across the codebase",
        Some("java" | "kt") => "upheld the grand tradition of the virtual machine",
        Some("rb") => "embraced the principle of programmer happiness",
        Some("go") => "kept concurrency simple and efficient",
        Some("rs") => "compiled without fear of memory errors",
        Some("sh" | "bash" | "zsh") => "automated the mundane so humans didn't have to",
        Some("sql") => "guarded the sanctity of relational data",
        Some("css") => "kept the interface beautiful and consistent",
        Some("html") => "gave structure to content for the world to see",
        _ => "contributed quietly to the project",
    }
}

/// Fills the fixed narrative template. Pure and deterministic.
#[must_use]
pub fn template_narrative(input: &ComposeInput<'_>) -> String {
    let lines = i64::try_from(input.extraction.line_count).unwrap_or(i64::MAX);
    let mut narrative = format!(
        "{} was a {} of {} that {}.",
        input.path,
        describe_file_type(input.path),
        plural(lines, "line"),
        role(input.path)
    );

    match (input.born, input.died, lifespan_days(input.born, input.died)) {
        (Some(born), Some(died), Some(days)) => {
            let _ = write!(narrative, " It lived from {born} to {died}, a span of {}.", plural(days, "day"));
        }
        (_, Some(died), _) => {
            let _ = write!(narrative, " It passed on {died}; the date of its birth is lost to history.");
        }
        _ => narrative.push_str(" The dates of its life are lost to history."),
    }

    match input.reason.map(str::trim).filter(|r| !r.is_empty()) {
        Some(reason) => {
            let _ = write!(narrative, " It was deleted due to: {}.", reason.trim_end_matches('.'));
        }
        None => narrative.push_str(" It was deleted in the natural course of refactoring."),
    }

    let symbols = &input.extraction.symbols;
    if symbols.is_empty() {
        narrative.push_str(" It left no named functions or classes behind.");
    } else {
        let names: Vec<String> =
            symbols.iter().take(MEMORIAL_SYMBOLS).map(|s| format!("`{s}`")).collect();
        let _ = write!(narrative, " It is survived by the memories of {}.", names.join(", "));
    }

    narrative
}

/// Builds the prompt for the generative composer.
#[must_use]
pub fn build_prompt(input: &ComposeInput<'_>) -> String {
    let mut prompt = String::from(
        "You are writing a poetic, brief obituary for a deleted piece of code.\n\
         Write 3-5 sentences in a respectful, slightly melancholy tone, like a newspaper obituary.\n\
         Mention what the code did, how long it lived (\"lived from ...\") and what caused its deletion,\n\
         and what it is survived by. Plain prose only, no markdown headers.\n\n",
    );

    let _ = writeln!(prompt, "File: {}", input.path);
    let _ = writeln!(prompt, "Lines of code: {}", input.extraction.line_count);
    match (input.born, input.died) {
        (Some(born), Some(died)) => {
            let _ = writeln!(prompt, "It was created on {born} and deleted on {died}.");
        }
        (None, Some(died)) => {
            let _ = writeln!(prompt, "It was deleted on {died}.");
        }
        _ => {}
    }
    match input.reason.map(str::trim).filter(|r| !r.is_empty()) {
        Some(reason) => {
            let _ = writeln!(prompt, "Cause of death: {reason}");
        }
        None => prompt.push_str("Cause of death: unknown (likely refactoring or replacement).\n"),
    }
    if !input.extraction.symbols.is_empty() {
        let _ = writeln!(prompt, "Symbols: {}", input.extraction.symbols.join(", "));
    }

    let preview: String = input.content.chars().take(PREVIEW_CHARS).collect();
    let _ = write!(prompt, "\nCode content (preview):\n```\n{preview}\n```\n\nWrite the obituary now:");
    prompt
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::obituary::extract::extract;
    use crate::ports::llm::{CompletionResponse, LlmFuture};
    use crate::ports::PortError;

    const CONTENT: &str = "# OAuth 1.0a helpers\n\ndef get_oauth_token(consumer_key, consumer_secret):\n    pass\n\nclass Signer:\n    pass\n";

    /// Answers every request with a fixed result and remembers the prompts.
    struct StubLlm {
        answer: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubLlm {
        fn new(answer: Result<&str, &str>) -> Self {
            Self {
                answer: answer.map(String::from).map_err(String::from),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl LlmClient for StubLlm {
        fn complete(&self, request: &CompletionRequest) -> LlmFuture<'_> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            let answer = self.answer.clone();
            Box::pin(async move {
                answer
                    .map(|text| CompletionResponse { text, prompt_tokens: 1, completion_tokens: 1 })
                    .map_err(|e| -> PortError { e.into() })
            })
        }
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn input<'a>(extraction: &'a Extraction, reason: Option<&'a str>) -> ComposeInput<'a> {
        ComposeInput {
            path: "legacy_oauth.py",
            content: CONTENT,
            extraction,
            reason,
            born: date(2022, 3, 14),
            died: date(2024, 11, 1),
        }
    }

    #[tokio::test]
    async fn template_is_deterministic_without_client() {
        let extraction = extract(CONTENT, "legacy_oauth.py");
        let input = input(&extraction, Some("Twitter API v1 deprecated"));

        let first = compose(None, "m", &input).await;
        let second = compose(None, "m", &input).await;

        assert_eq!(first, second);
        assert_eq!(first.mode, ComposeMode::Template);
        assert_eq!(
            first.narrative,
            "legacy_oauth.py was a Python module of 7 lines that faithfully served the Python runtime. \
             It lived from 2022-03-14 to 2024-11-01, a span of 963 days. \
             It was deleted due to: Twitter API v1 deprecated. \
             It is survived by the memories of `get_oauth_token`, `Signer`."
        );
        assert_eq!(first.last_words, "def get_oauth_token(consumer_key, consumer_secret):");
    }

    #[tokio::test]
    async fn failed_call_falls_back_to_template() {
        let extraction = extract(CONTENT, "legacy_oauth.py");
        let input = input(&extraction, None);
        let llm = StubLlm::new(Err("Anthropic API request failed: connection refused"));

        let composition = compose(Some(&llm as &dyn LlmClient), "m", &input).await;

        assert!(!composition.narrative.is_empty());
        assert_eq!(composition.narrative, template_narrative(&input));
        assert!(matches!(
            composition.mode,
            ComposeMode::Fallback { ref reason } if reason.contains("connection refused")
        ));
    }

    #[tokio::test]
    async fn blank_answer_falls_back_to_template() {
        let extraction = extract(CONTENT, "legacy_oauth.py");
        let input = input(&extraction, None);
        let llm = StubLlm::new(Ok("  \n "));

        let composition = compose(Some(&llm as &dyn LlmClient), "m", &input).await;
        assert!(matches!(composition.mode, ComposeMode::Fallback { .. }));
        assert!(composition.narrative.contains("natural course of refactoring"));
    }

    #[tokio::test]
    async fn generated_answer_is_trimmed_and_prompt_carries_facts() {
        let extraction = extract(CONTENT, "legacy_oauth.py");
        let input = input(&extraction, Some("Twitter API v1 deprecated"));
        let llm = StubLlm::new(Ok("\nHere lies legacy_oauth.py. It lived from 2022 to 2024.\n"));

        let composition = compose(Some(&llm as &dyn LlmClient), "m", &input).await;

        assert_eq!(composition.mode, ComposeMode::Generated);
        assert_eq!(composition.narrative, "Here lies legacy_oauth.py. It lived from 2022 to 2024.");

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];
        assert!(prompt.contains("File: legacy_oauth.py"));
        assert!(prompt.contains("Lines of code: 7"));
        assert!(prompt.contains("created on 2022-03-14 and deleted on 2024-11-01"));
        assert!(prompt.contains("Cause of death: Twitter API v1 deprecated"));
        assert!(prompt.contains("Symbols: get_oauth_token, Signer"));
    }

    #[test]
    fn template_handles_unknown_birth_and_no_symbols() {
        let extraction = extract("SELECT 1;\n", "report.sql");
        let input = ComposeInput {
            path: "report.sql",
            content: "SELECT 1;\n",
            extraction: &extraction,
            reason: Some("  "),
            born: None,
            died: date(2024, 1, 2),
        };
        assert_eq!(
            template_narrative(&input),
            "report.sql was a SQL script of 1 line that guarded the sanctity of relational data. \
             It passed on 2024-01-02; the date of its birth is lost to history. \
             It was deleted in the natural course of refactoring. \
             It left no named functions or classes behind."
        );
    }

    #[test]
    fn prompt_preview_is_bounded() {
        let content = "x".repeat(5000);
        let extraction = extract(&content, "big.txt");
        let input = ComposeInput {
            path: "big.txt",
            content: &content,
            extraction: &extraction,
            reason: None,
            born: None,
            died: None,
        };
        let prompt = build_prompt(&input);
        assert!(prompt.contains(&"x".repeat(PREVIEW_CHARS)));
        assert!(!prompt.contains(&"x".repeat(PREVIEW_CHARS + 1)));
    }

    #[test]
    fn last_words_skips_comments_and_truncates() {
        assert_eq!(last_words("#!/bin/sh\n# helper\n\necho hi\n"), "echo hi");
        assert_eq!(last_words("// only a comment\n"), "// only a comment");
        assert_eq!(last_words(""), "");
        assert_eq!(last_words("\n   \n"), "");

        let long = format!("    let name = \"{}\";", "é".repeat(200));
        let words = last_words(&long);
        assert_eq!(words.chars().count(), LAST_WORDS_CHARS);
        assert!(words.starts_with("let name"));
    }

    #[test]
    fn lifespan_days_counts_calendar_days() {
        assert_eq!(lifespan_days(date(2024, 1, 1), date(2024, 1, 2)), Some(1));
        assert_eq!(lifespan_days(None, date(2024, 1, 2)), None);
    }
}
