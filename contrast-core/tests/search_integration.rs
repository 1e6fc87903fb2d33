//! End-to-end search tests running the full pipeline: instruction-based
//! infilling over a mock generator, greedy search, and JSON export of the
//! outcome.

use contrast_core::{
    ContrastSearch, InstructionInfiller, MASK_TOKEN, MockGenerator, SearchOutcome, SearchParams,
};
use std::sync::Arc;

/// A model stub for a capital-city question: the answer is "Paris" as long
/// as the prompt still mentions France, "Berlin" otherwise. Infill
/// instructions are answered by substituting a fixed filler for the marker.
fn capital_city_model() -> Arc<MockGenerator> {
    Arc::new(MockGenerator::from_fn(|prompt| {
        if prompt.contains(MASK_TOKEN) {
            // Infill instruction: the masked text follows the blank line.
            let masked = prompt.rsplit("\n\n").next().unwrap_or(prompt);
            Ok(masked.replace(MASK_TOKEN, "Germany"))
        } else if prompt.contains("France") {
            Ok("Paris".to_string())
        } else {
            Ok("Berlin".to_string())
        }
    }))
}

#[tokio::test]
async fn finds_the_chunk_that_drives_the_response() {
    let generator = capital_city_model();
    let infiller = Arc::new(InstructionInfiller::new(generator.clone()));
    let search = ContrastSearch::new(generator, infiller);

    let outcome = search
        .run(
            "name the capital of France",
            &SearchParams {
                split_k: 2,
                delta: 0.2,
            },
        )
        .await
        .unwrap();

    let SearchOutcome::Found(explanation) = outcome else {
        panic!("expected Found");
    };
    assert_eq!(explanation.original_response, "Paris");
    assert_eq!(explanation.contrastive_response, "Berlin");
    // Only the chunk holding "France" flips the answer.
    assert!(explanation.contrastive_prompt.contains("Germany"));
    assert!(explanation.contrast_score >= 0.2);
}

#[tokio::test]
async fn exhausts_when_no_perturbation_moves_the_response() {
    // Every prompt keeps mentioning France, so the answer never changes.
    let generator = Arc::new(MockGenerator::from_fn(|prompt| {
        if prompt.contains(MASK_TOKEN) {
            let masked = prompt.rsplit("\n\n").next().unwrap_or(prompt);
            Ok(masked.replace(MASK_TOKEN, "France"))
        } else {
            Ok("Paris".to_string())
        }
    }));
    let infiller = Arc::new(InstructionInfiller::new(generator.clone()));
    let search = ContrastSearch::new(generator, infiller);

    let outcome = search
        .run("France France France", &SearchParams::default())
        .await
        .unwrap();

    let SearchOutcome::Exhausted { iterations } = outcome else {
        panic!("expected Exhausted");
    };
    // Baseline plus 3 + 2 + 1 attempts across three rounds.
    assert_eq!(iterations.len(), 7);
}

#[tokio::test]
async fn outcome_round_trips_through_json() {
    let generator = capital_city_model();
    let infiller = Arc::new(InstructionInfiller::new(generator.clone()));
    let search = ContrastSearch::new(generator, infiller);

    let outcome = search
        .run("name the capital of France", &SearchParams::default())
        .await
        .unwrap();

    let json = serde_json::to_string_pretty(&outcome).unwrap();
    let back: SearchOutcome = serde_json::from_str(&json).unwrap();
    assert_eq!(back, outcome);
    assert_eq!(back.iterations().len(), outcome.iterations().len());
}
