//! Search orchestration over an immutable, indexed catalog.
//!
//! Two paths share one candidate score:
//!
//! - **indexed**: score only keys the inverted index names for the query.
//! - **full**: score every key in parallel chunks, keeping a bounded top-K.
//!
//! [`SearchEngine::search`] takes the indexed path and falls back to the full
//! one when the index yields nothing.

pub mod candidates;
pub mod explain;
pub mod scan;
pub mod topk;
pub mod tuning;

use std::sync::Arc;

use eqs_protocol::{Catalog, CatalogEntry, SearchResult};
use rayon::ThreadPool;

pub use candidates::{ALARM_DESCRIPTION, ALARM_FIELDS, ALARM_TABLE};
pub use topk::{Scored, TopK};
pub use tuning::SearchTuning;

use crate::error::EngineResult;
use crate::rules::{ClauseExtractor, RuleTables};
use crate::scoring::{ScoreBreakdown, Scorer, ScoringWeights};
use crate::settings::EngineSettings;
use crate::tokenizer::{QueryTerms, Tokenizer};

/// Tables and tuning shared by every engine built from the same settings.
#[derive(Debug)]
struct Shared {
    tokenizer: Tokenizer,
    extractor: ClauseExtractor,
    weights: ScoringWeights,
    tuning: SearchTuning,
    pool: Option<ThreadPool>,
}

/// Ranks catalog entries against natural-language queries.
///
/// Cheap to clone. The catalog is never mutated; to search a rebuilt catalog
/// create a new engine with [`SearchEngine::with_catalog`].
#[derive(Debug, Clone)]
pub struct SearchEngine {
    catalog: Arc<Catalog>,
    shared: Arc<Shared>,
    sros_catalog: bool,
}

impl SearchEngine {
    /// Validate `settings` and build an engine over `catalog`.
    ///
    /// Fails only on invalid configured rules or tuning; never per query.
    pub fn new(catalog: Arc<Catalog>, settings: &EngineSettings) -> EngineResult<Self> {
        settings.search.validate()?;
        let extractor = ClauseExtractor::new(RuleTables::with_overrides(&settings.rules)?);

        let shared = Shared {
            tokenizer: Tokenizer::new(),
            extractor,
            weights: settings.scoring.clone(),
            tuning: settings.search.clone(),
            pool: scan::build_pool(settings.search.max_workers),
        };

        Ok(Self::from_parts(catalog, Arc::new(shared)))
    }

    pub fn with_defaults(catalog: Arc<Catalog>) -> EngineResult<Self> {
        Self::new(catalog, &EngineSettings::default())
    }

    /// Same tables and tuning over a different catalog.
    pub fn with_catalog(&self, catalog: Arc<Catalog>) -> Self {
        Self::from_parts(catalog, Arc::clone(&self.shared))
    }

    fn from_parts(catalog: Arc<Catalog>, shared: Arc<Shared>) -> Self {
        if !catalog.is_indexed() && !catalog.is_empty() {
            tracing::warn!(
                entries = catalog.len(),
                "catalog has no inverted index; every search will scan"
            );
        }
        let sros_catalog = catalog.is_sros();
        Self {
            catalog,
            shared,
            sros_catalog,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.shared.tokenizer
    }

    pub fn extractor(&self) -> &ClauseExtractor {
        &self.shared.extractor
    }

    pub fn tuning(&self) -> &SearchTuning {
        &self.shared.tuning
    }

    pub fn scorer(&self) -> Scorer<'_> {
        Scorer::new(
            &self.shared.weights,
            &self.shared.tokenizer,
            &self.shared.extractor,
        )
    }

    /// Per-heuristic score of one catalog key, or `None` for an unknown key.
    pub fn breakdown(&self, query: &str, key: &str) -> Option<ScoreBreakdown> {
        let terms = self.tokenizer().query_terms(query);
        let entry = self.entry_for(key)?;
        Some(self.scorer().breakdown(key, &entry, &terms))
    }

    // ── Search paths ──────────────────────────────────────────

    /// Indexed search, falling back to a full scan when the index has no
    /// candidates for the query.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let terms = self.tokenizer().query_terms(query);
        if terms.tokens.is_empty() {
            return Vec::new();
        }

        let hits = candidates::index_hits(&self.catalog, &terms, self.sros_catalog);
        if hits.is_empty() {
            tracing::debug!(query, "no index candidates; falling back to full scan");
            return self.scan(&terms);
        }

        let tuning = self.tuning();
        let mut ranked: Vec<Scored> = hits
            .iter()
            .filter_map(|(key, count)| {
                let entry = self.catalog.get(key)?;
                let score = self.candidate_score(key, entry, *count, &terms);
                (score > tuning.threshold_for(key)).then(|| Scored::new(*key, score))
            })
            .collect();

        tracing::debug!(
            query,
            candidates = hits.len(),
            admitted = ranked.len(),
            "indexed search"
        );

        self.add_alarm(&terms, &mut ranked);
        topk::rank(&mut ranked);
        ranked.truncate(tuning.max_results);
        self.assemble(ranked, &terms)
    }

    /// Exhaustive search over every catalog entry.
    pub fn search_full(&self, query: &str) -> Vec<SearchResult> {
        let terms = self.tokenizer().query_terms(query);
        if terms.tokens.is_empty() {
            return Vec::new();
        }
        self.scan(&terms)
    }

    fn scan(&self, terms: &QueryTerms) -> Vec<SearchResult> {
        let tuning = self.tuning();
        let hits = candidates::index_hits(&self.catalog, terms, self.sros_catalog);
        let keys: Vec<&str> = self.catalog.table.keys().map(String::as_str).collect();

        let mut ranked = scan::top_k(
            &keys,
            tuning.scan_chunk_size,
            tuning.max_candidates,
            self.shared.pool.as_ref(),
            |key| {
                let entry = self.catalog.get(key)?;
                let count = hits.get(key).copied().unwrap_or(0);
                let score = self.candidate_score(key, entry, count, terms);
                (score > tuning.scan_score_threshold).then_some(score)
            },
        );

        tracing::debug!(
            entries = keys.len(),
            retained = ranked.len(),
            "full scan"
        );

        self.add_alarm(terms, &mut ranked);
        topk::rank(&mut ranked);
        ranked.truncate(tuning.max_results);
        self.assemble(ranked, terms)
    }

    // ── Scoring and assembly ──────────────────────────────────

    /// Index hits, the all-tokens-in-key bonus, then the entry score.
    fn candidate_score(&self, key: &str, entry: &CatalogEntry, hits: u32, terms: &QueryTerms) -> f64 {
        let tuning = self.tuning();
        let mut base = f64::from(hits) * tuning.index_hit_score;

        let key_lower = key.to_lowercase();
        if terms.tokens.iter().all(|t| key_lower.contains(t.as_str())) {
            base += terms.tokens.len() as f64 * tuning.all_tokens_bonus;
        }

        base + self.scorer().score_entry(key, entry, terms)
    }

    fn add_alarm(&self, terms: &QueryTerms, ranked: &mut Vec<Scored>) {
        let score = candidates::alarm_score(&terms.tokens, self.tuning());
        if score > 0.0 && !ranked.iter().any(|s| s.key == ALARM_TABLE) {
            ranked.push(Scored::new(ALARM_TABLE, score));
        }
    }

    fn entry_for(&self, key: &str) -> Option<CatalogEntry> {
        match self.catalog.get(key) {
            Some(entry) => Some(entry.clone()),
            None if key == ALARM_TABLE => Some(candidates::alarm_entry()),
            None => None,
        }
    }

    fn assemble(&self, ranked: Vec<Scored>, terms: &QueryTerms) -> Vec<SearchResult> {
        let validate = self.tuning().validate_conditions;
        ranked
            .into_iter()
            .filter_map(|Scored { key, score }| {
                let info = self.entry_for(&key)?.info();
                let query =
                    self.extractor()
                        .structured_query(&terms.raw, &key, &info.fields, validate);
                let explanation = explain::explanation(&terms.literal, &key, score);
                Some(SearchResult {
                    key,
                    score,
                    query,
                    description: info.description,
                    available_fields: info.fields,
                    explanation,
                })
            })
            .collect()
    }
}
