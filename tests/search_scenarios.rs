//! Integration tests for morphological phrase search.

use std::sync::Arc;

use morphmark::analysis::morphology::{LemmaTable, MorphologyService, SnowballMorphology};
use morphmark::analysis::*;
use morphmark::error::Result;
use morphmark::search::*;
use morphmark::stats::Stats;

fn free_text(analyzer: &MorphAnalyzer, terms: &[&str]) -> PhraseSet {
    PhraseSet::from_terms(analyzer, terms, Provenance::FreeText)
}

#[test]
fn test_tokens_reproduce_text() {
    let analyzer = MorphAnalyzer::default();
    for text in [
        "The quick Fox jumps.",
        "  «Кот» — не пёс!\n\tИ… всё?",
        "",
        "émoji 🦊 и ёжик",
    ] {
        let tokens = analyzer.analyze(text);
        assert_eq!(join_text(&tokens), text);
        for token in tokens.iter().filter(|t| t.is_word()) {
            assert!(token.lemma.as_deref().is_some_and(|l| !l.is_empty()));
            assert!(token.stem.as_deref().is_some_and(|s| !s.is_empty()));
        }
    }
}

#[test]
fn test_unrelated_term_matches_nothing() {
    let analyzer = MorphAnalyzer::default();
    let phrases = free_text(&analyzer, &["лиса"]);

    let result = Searcher::new(analyzer).search_text("The quick Fox jumps.", &phrases, &[]);

    assert!(result.matches.is_empty());
}

#[test]
fn test_phrase_matches_surface_form() {
    let analyzer = MorphAnalyzer::default();
    let phrases = free_text(&analyzer, &["quick fox"]);

    let result = Searcher::new(analyzer).search_text("The quick Fox jumps.", &phrases, &[]);

    assert_eq!(result.matches.len(), 1);
    let found = &result.matches[0];
    assert_eq!(found.kind, MatchKind::Phrase);
    assert_eq!(found.found_text, "quick Fox");
    assert_eq!(found.search_text, "quick fox");
    assert_eq!(found.end_token_idx - found.start_token_idx, 2);
    assert_eq!((found.start, found.end), (4, 13));
}

#[test]
fn test_lemma_match_with_table() -> Result<()> {
    let table = LemmaTable::from_tsv_str("# word\tlemma\tpos\nбежит\tбежать\tv\nбежал\tбежать\tv\n")?;
    let service = MorphologyService::new(SnowballMorphology::with_lemmas(table));
    let analyzer = MorphAnalyzer::new(service);
    let phrases = free_text(&analyzer, &["бежит"]);

    let result = Searcher::new(analyzer).search_text("Он бежал домой.", &phrases, &[]);

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].found_text, "бежал");
    assert_eq!(result.matches[0].matched_by, Some(MatchedBy::Lemma));

    Ok(())
}

#[test]
fn test_stem_match_without_table() {
    let analyzer = MorphAnalyzer::default();
    let phrases = free_text(&analyzer, &["кот"]);

    let result = Searcher::new(analyzer).search_text("Играл с котами.", &phrases, &[]);

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].found_text, "котами");
    assert_eq!(result.matches[0].matched_by, Some(MatchedBy::Stem));
}

#[test]
fn test_statistics_by_term() {
    let analyzer = MorphAnalyzer::default();
    let phrases = free_text(&analyzer, &["кот"]);

    let result = Searcher::new(analyzer).search_text("кот и кот, а рядом коты", &phrases, &[]);
    let mut stats = Stats::new();
    for found in &result.matches {
        stats.record(found);
    }

    let item = stats.get("кот", MatchKind::Word).expect("term recorded");
    assert_eq!(item.total, 3);
    assert_eq!(item.forms.len(), 2);
    assert_eq!(item.form_count("кот"), 2);
    assert_eq!(item.form_count("коты"), 1);
}

#[test]
fn test_strict_and_tolerant_strategies() {
    let analyzer = MorphAnalyzer::default();
    let phrases = free_text(&analyzer, &["A B"]);

    let strict = Searcher::with_strategy(analyzer.clone(), StrategyKind::Strict.build());
    let tolerant = Searcher::with_strategy(analyzer, StrategyKind::PunctuationTolerant.build());

    assert!(strict.search_text("A, B", &phrases, &[]).matches.is_empty());

    let matches = tolerant.search_text("A, B", &phrases, &[]).matches;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].found_text, "A, B");

    assert_eq!(strict.search_text("x A B y", &phrases, &[]).matches.len(), 1);
}

#[test]
fn test_stop_word_only_inside_phrases() {
    let analyzer = MorphAnalyzer::default();
    let searcher = Searcher::new(analyzer.clone());
    let text = "Кот и пёс спят";

    let alone = free_text(&analyzer, &["и"]);
    assert!(searcher.search_text(text, &alone, &[]).matches.is_empty());

    let phrase = free_text(&analyzer, &["кот и пёс"]);
    let matches = searcher.search_text(text, &phrase, &[]).matches;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].found_text, "Кот и пёс");
}

#[test]
fn test_document_filter_drops_absent_phrases() {
    let analyzer = MorphAnalyzer::default();
    let searcher = Searcher::new(analyzer.clone());
    let phrases = free_text(&analyzer, &["quick fox", "quick wolf", "jumps"]);

    let source = SearchSource::new(analyzer.analyze("The quick Fox jumps."));
    let filtered = searcher.filter_phrases(&source.dictionary, &phrases);

    let kept: Vec<_> = filtered.iter().map(|p| p.original_text.as_str()).collect();
    assert_eq!(kept, vec!["quick fox", "jumps"]);
    assert_eq!(searcher.search(&source, &filtered, &[]).len(), 2);
}

#[test]
fn test_matches_ordered_and_deduplicated() -> Result<()> {
    let analyzer = MorphAnalyzer::default();
    let phrases = free_text(&analyzer, &["jumps", "fox", "Fox", "quick fox"]);
    let pattern = Arc::new(RegexPattern::new("animal", r"(?i)fox")?);

    let result = Searcher::new(analyzer).search_text(
        "The quick Fox jumps.",
        &phrases,
        &[pattern],
    );

    let found: Vec<_> = result
        .matches
        .iter()
        .map(|m| (m.start_token_idx, m.kind, m.search_text.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (2, MatchKind::Phrase, "quick fox"),
            (4, MatchKind::Word, "fox"),
            (6, MatchKind::Word, "jumps"),
        ]
    );

    let kept: Vec<_> = resolve_overlaps(&result.matches)
        .into_iter()
        .map(|m| m.found_text.as_str())
        .collect();
    assert_eq!(kept, vec!["quick Fox", "jumps"]);

    Ok(())
}
