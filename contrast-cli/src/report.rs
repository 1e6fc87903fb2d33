//! Report rendering for search outcomes.
//!
//! Read-only consumer of the iteration log and the final result: a plain
//! text summary for the terminal and a standalone HTML report with an
//! inline word diff of original vs contrastive prompt plus per-attempt
//! score bars.

use contrast_core::SearchOutcome;
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;

/// Render a terminal summary of the outcome and its iteration log.
pub fn render_summary(outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    match outcome {
        SearchOutcome::Found(explanation) => {
            let _ = writeln!(out, "Contrastive explanation found");
            let _ = writeln!(out, "  original prompt:      {}", explanation.original_prompt);
            let _ = writeln!(
                out,
                "  original response:    {}",
                explanation.original_response
            );
            let _ = writeln!(
                out,
                "  contrastive prompt:   {}",
                explanation.contrastive_prompt
            );
            let _ = writeln!(
                out,
                "  contrastive response: {}",
                explanation.contrastive_response
            );
            let _ = writeln!(out, "  contrast score:       {:.3}", explanation.contrast_score);
        }
        SearchOutcome::Exhausted { .. } => {
            let _ = writeln!(
                out,
                "No contrastive explanation found at this granularity and threshold"
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:>5}  {:>5}  {:>6}  prompt", "round", "index", "score");
    for attempt in outcome.iterations() {
        let index = attempt
            .mask_index
            .map_or("-".to_string(), |i| i.to_string());
        let score = attempt
            .score
            .map_or("-".to_string(), |s| format!("{s:.3}"));
        let _ = writeln!(
            out,
            "{:>5}  {:>5}  {:>6}  {}",
            attempt.round, index, score, attempt.prompt
        );
    }
    out
}

/// Render a standalone HTML report.
pub fn render_html(outcome: &SearchOutcome) -> String {
    let mut body = String::new();

    match outcome {
        SearchOutcome::Found(explanation) => {
            let _ = writeln!(body, "<h1>Contrastive explanation</h1>");
            let _ = writeln!(
                body,
                "<p>Contrast score: <strong>{:.3}</strong></p>",
                explanation.contrast_score
            );
            let _ = writeln!(body, "<h2>Prompt perturbation</h2>");
            let _ = writeln!(
                body,
                "<p class=\"diff\">{}</p>",
                word_diff_html(&explanation.original_prompt, &explanation.contrastive_prompt)
            );
            let _ = writeln!(body, "<h2>Response change</h2>");
            let _ = writeln!(
                body,
                "<p class=\"diff\">{}</p>",
                word_diff_html(
                    &explanation.original_response,
                    &explanation.contrastive_response
                )
            );
        }
        SearchOutcome::Exhausted { .. } => {
            let _ = writeln!(body, "<h1>No contrastive explanation found</h1>");
            let _ = writeln!(
                body,
                "<p>Every chunk was tried without meeting the threshold.</p>"
            );
        }
    }

    let _ = writeln!(body, "<h2>Attempts</h2>");
    let _ = writeln!(
        body,
        "<table><tr><th>round</th><th>index</th><th>score</th><th>prompt</th></tr>"
    );
    for attempt in outcome.iterations() {
        let index = attempt
            .mask_index
            .map_or("&ndash;".to_string(), |i| i.to_string());
        let score_cell = match attempt.score {
            Some(score) => format!(
                "<div class=\"bar\" style=\"width:{:.0}%\"></div>{score:.3}",
                score * 100.0
            ),
            None => "&ndash;".to_string(),
        };
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td class=\"score\">{}</td><td>{}</td></tr>",
            attempt.round,
            index,
            score_cell,
            html_escape(&attempt.prompt)
        );
    }
    let _ = writeln!(body, "</table>");

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>contrast report</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n{body}</body>\n</html>\n"
    )
}

const STYLE: &str = "body{font-family:sans-serif;margin:2em;max-width:60em}\
table{border-collapse:collapse;width:100%}\
td,th{border:1px solid #ccc;padding:0.3em 0.6em;text-align:left}\
.score{position:relative;min-width:6em}\
.bar{position:absolute;left:0;top:0;bottom:0;background:#fdd;z-index:-1}\
del{background:#fdd;text-decoration:line-through}\
ins{background:#dfd;text-decoration:none}";

/// Inline word-level diff as HTML, deletions struck through, insertions
/// highlighted.
fn word_diff_html(old: &str, new: &str) -> String {
    let diff = TextDiff::from_words(old, new);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let text = html_escape(change.value());
        match change.tag() {
            ChangeTag::Delete => {
                let _ = write!(out, "<del>{text}</del>");
            }
            ChangeTag::Insert => {
                let _ = write!(out, "<ins>{text}</ins>");
            }
            ChangeTag::Equal => out.push_str(&text),
        }
    }
    out
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use contrast_core::{Attempt, ContrastiveExplanation, IterationLog};

    fn found_outcome() -> SearchOutcome {
        let mut iterations = IterationLog::new();
        iterations.push(Attempt {
            round: 0,
            mask_index: None,
            prompt: "a b c".to_string(),
            response: "R0".to_string(),
            score: None,
        });
        iterations.push(Attempt {
            round: 1,
            mask_index: Some(0),
            prompt: "X b c".to_string(),
            response: "R1 <tag>".to_string(),
            score: Some(0.75),
        });
        SearchOutcome::Found(ContrastiveExplanation {
            original_prompt: "a b c".to_string(),
            original_response: "R0".to_string(),
            contrastive_prompt: "X b c".to_string(),
            contrastive_response: "R1 <tag>".to_string(),
            contrast_score: 0.75,
            iterations,
        })
    }

    #[test]
    fn test_summary_lists_every_attempt() {
        let summary = render_summary(&found_outcome());
        assert!(summary.contains("Contrastive explanation found"));
        assert!(summary.contains("0.750"));
        // Baseline row has no index or score.
        assert!(summary.lines().any(|l| l.contains('-') && l.contains("a b c")));
    }

    #[test]
    fn test_html_escapes_model_output() {
        let html = render_html(&found_outcome());
        assert!(html.contains("&lt;tag&gt;"));
        assert!(!html.contains("R1 <tag>"));
    }

    #[test]
    fn test_word_diff_marks_replacement() {
        let diff = word_diff_html("a b c", "X b c");
        assert!(diff.contains("<del>a</del>"));
        assert!(diff.contains("<ins>X</ins>"));
        assert!(diff.contains('b'));
    }
}
