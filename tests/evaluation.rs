//! End-to-end tests for corpus evaluation.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::float_cmp)]

use std::io::Write;

use lyrics_eval::alignment::{align, unit_cost};
use lyrics_eval::error::Error;
use lyrics_eval::manifest::load_manifest;
use lyrics_eval::types::{SymbolCategory, TokenKind};
use lyrics_eval::visualize::{render_text, DiffClass};
use lyrics_eval::{
    compute_metrics, evaluate_pair, normalize_lyrics, tokenize, visualize, EvalOptions, Languages,
    SymbolAlignment,
};

const VERSE: &str = "Oh, I wanna dance with somebody\n\
                     I wanna feel the heat with somebody\n\
                     \n\
                     (Yeah) don't you wanna dance?";

fn eval(references: &[&str], hypotheses: &[&str]) -> lyrics_eval::Evaluation {
    compute_metrics(references, hypotheses, &Languages::default(), &EvalOptions::default()).unwrap()
}

#[test]
fn test_micro_average_is_not_mean_of_rates() {
    let evaluation = eval(&["a b c d", "e"], &["a b c x", "y"]);
    let metrics = evaluation.metrics;
    assert_eq!(metrics.per_example[0].wer, 0.25);
    assert_eq!(metrics.per_example[1].wer, 1.0);
    assert!((metrics.overall.wer - 0.4).abs() < 1e-12);
    assert!((metrics.overall.wer - 0.625).abs() > 0.1);
}

#[test]
fn test_identical_verse_scores_perfectly() {
    let evaluation = eval(&[VERSE], &[VERSE]);
    let overall = evaluation.metrics.overall;
    assert_eq!(overall.wer, 0.0);
    assert_eq!(overall.case_error_rate, 0.0);
    let symbols = overall.symbols.unwrap();
    for &category in SymbolCategory::all() {
        let scores = symbols.get(category);
        assert_eq!(scores.precision, 1.0, "{}", category.name());
        assert_eq!(scores.recall, 1.0, "{}", category.name());
    }
}

#[test]
fn test_self_alignment_is_all_matches() {
    let tokens = tokenize(VERSE, "en");
    let alignment = align(tokens.as_slice(), tokens.as_slice(), |a, b| unit_cost(a.folded(), b.folded()));
    let counts = alignment.counts();
    assert_eq!(counts.hits, tokens.len());
    assert_eq!(counts.errors(), 0);
}

#[test]
fn test_swapping_inputs_swaps_insertions_and_deletions() {
    let reference = "I got a feeling that tonight's gonna be a good night";
    let hypothesis = "got a feeling tonight is gonna be a good good night";
    let forward = eval(&[reference], &[hypothesis]).metrics.counts.words;
    let backward = eval(&[hypothesis], &[reference]).metrics.counts.words;
    assert_eq!(forward.substitutions, backward.substitutions);
    assert_eq!(forward.insertions, backward.deletions);
    assert_eq!(forward.deletions, backward.insertions);
}

#[test]
fn test_apostrophes_stay_inside_words() {
    let tokens = tokenize("don't", "en");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens.as_slice()[0].text(), "don't");
    assert_eq!(tokens.as_slice()[0].kind(), TokenKind::Word);
}

#[test]
fn test_cjk_characters_are_words() {
    let tokens = tokenize("愛してる", "ja");
    assert_eq!(tokens.texts(), vec!["愛", "し", "て", "る"]);
    let tokens = tokenize("我爱你", "zh");
    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|t| t.kind() == TokenKind::Word));
}

#[test]
fn test_case_only_difference() {
    let result = evaluate_pair("Hello", "hello", "en", &EvalOptions::default()).unwrap();
    assert_eq!(result.wer, 0.0);
    assert_eq!(result.case_error_rate, 1.0);
}

#[test]
fn test_missing_section_break() {
    for mode in [SymbolAlignment::Hybrid, SymbolAlignment::Global, SymbolAlignment::PerCategory] {
        let options = EvalOptions { symbol_alignment: mode, ..EvalOptions::default() };
        let result = evaluate_pair("line1\n\nline2", "line1\nline2", "en", &options).unwrap();
        let symbols = result.symbols.unwrap();
        assert_eq!(symbols.section_break.recall, 0.0);
        assert_eq!(symbols.section_break.f_score, 0.0);
        assert_eq!(symbols.line_break.precision, 1.0);
        assert_eq!(symbols.line_break.recall, 1.0);
        assert_eq!(result.wer, 0.0);
    }
}

#[test]
fn test_punctuation_content_is_not_scored_by_default() {
    let result = evaluate_pair("stop, go", "stop. go", "en", &EvalOptions::default()).unwrap();
    let punctuation = result.symbols.unwrap().punctuation;
    assert_eq!(punctuation.precision, 1.0);
    assert_eq!(punctuation.recall, 1.0);
    assert_eq!(punctuation.f_score, 1.0);
}

#[test]
fn test_unbalanced_parentheses_score() {
    let result = evaluate_pair("(oh yeah\nla) la)", "(oh yeah la) la", "en", &EvalOptions::default()).unwrap();
    let parenthesis = result.symbols.unwrap().parenthesis;
    assert_eq!(parenthesis.precision, 1.0);
    assert!((parenthesis.recall - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_symbol_scores_stay_in_unit_interval() {
    let hypothesis = "oh I wanna dance with somebody.\ni wanna feel the heat, with somebody (yeah)\ndon't you";
    for mode in [SymbolAlignment::Hybrid, SymbolAlignment::Global, SymbolAlignment::PerCategory] {
        let options = EvalOptions { symbol_alignment: mode, ..EvalOptions::default() };
        let result = evaluate_pair(VERSE, hypothesis, "en", &options).unwrap();
        let symbols = result.symbols.unwrap();
        for &category in SymbolCategory::all() {
            let s = symbols.get(category);
            for value in [s.precision, s.recall, s.f_score] {
                assert!((0.0..=1.0).contains(&value));
            }
            assert_eq!(s.f_score == 0.0, s.precision == 0.0 && s.recall == 0.0);
        }
    }
}

#[test]
fn test_input_shape_errors() {
    let err = compute_metrics(&["a"], &["a", "b"], &Languages::default(), &EvalOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { .. }));
    let languages = Languages::PerExample(vec![]);
    let err = compute_metrics(&["a"], &["a"], &languages, &EvalOptions::default()).unwrap_err();
    assert!(matches!(err, Error::LanguageCountMismatch { .. }));
}

#[test]
fn test_corrective_normalization_before_scoring() {
    let reference = "Oh, I wanna dance\nWith somebody";
    let hypothesis = "oh, i wanna dance,\nwith somebody.";
    let raw = evaluate_pair(reference, hypothesis, "en", &EvalOptions::default()).unwrap();
    let fixed = evaluate_pair(reference, &normalize_lyrics(hypothesis), "en", &EvalOptions::default()).unwrap();
    assert_eq!(raw.wer, fixed.wer);
    assert!(fixed.case_error_rate < raw.case_error_rate);
    let raw_punct = raw.symbols.unwrap().punctuation;
    let fixed_punct = fixed.symbols.unwrap().punctuation;
    assert!(fixed_punct.precision > raw_punct.precision);
}

#[test]
fn test_visualization_matches_word_errors() {
    let spans = visualize("We will rock you", "we will roll you now", "en");
    let classes: Vec<_> = spans.iter().map(|s| s.class).collect();
    assert_eq!(
        classes,
        vec![
            DiffClass::CaseMismatch,
            DiffClass::Hit,
            DiffClass::Substitution,
            DiffClass::Hit,
            DiffClass::Insertion
        ]
    );
    assert_eq!(render_text(&spans), "[~We~]{~we~} will [-rock-]{+roll+} you {+now+}");
}

#[test]
fn test_manifest_round_trip_through_evaluation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"reference": "Je t'aime", "hypothesis": "je t'aime", "language": "fr"}}"#).unwrap();
    writeln!(file, r#"{{"reference": "Ich liebe dich", "hypothesis": "ich lieb dich"}}"#).unwrap();
    let dataset = load_manifest(file.path()).unwrap();
    let evaluation = compute_metrics(
        &dataset.references,
        &dataset.hypotheses,
        &dataset.languages("de"),
        &EvalOptions { visualize_errors: true, ..EvalOptions::default() },
    )
    .unwrap();
    let metrics = evaluation.metrics;
    assert_eq!(metrics.examples, 2);
    assert_eq!(metrics.per_example[0].wer, 0.0);
    assert!((metrics.per_example[1].wer - 1.0 / 3.0).abs() < 1e-12);
    assert!((metrics.overall.wer - 1.0 / 5.0).abs() < 1e-12);
    assert_eq!(evaluation.visualizations.unwrap().len(), 2);
}
