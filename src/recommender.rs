//! End-to-end recommendation pipeline
//!
//! [`Recommender::fit`] derives every vector of the candidate pool once and
//! returns an immutable [`FittedPool`]. Queries then run against that pool:
//! an external listening history ([`Recommender::recommend_for_profile`]) or
//! a pool member ([`Recommender::recommend_for_member`]).
//!
//! The scaler is fit once on the whole candidate pool and shared by every
//! query. External listening profiles are only ever transformed.

use crate::config::RecommenderConfig;
use tunerank_core::text::TfidfVectorizer;
use tunerank_core::{
    record::join_documents, Error, FeatureExtractor, FittedScaler, FittedTfidf, Item, Result,
    SparseVector, TrackRecord, Vector,
};
use tunerank_similarity::{
    BlendedScores, CosineSignal, HybridScorer, QueryContext, QuerySummary, Ranker,
    Recommendations, SignalProducer, Vibe, FEATURE_SIGNAL, TEXT_SIGNAL,
};
use tracing::{info, warn};

/// Candidate pool with every derived vector, fixed after fitting
#[derive(Debug, Clone)]
pub struct FittedPool {
    items: Vec<Item>,
    raw: Vec<Vector>,
    scaled: Vec<Vector>,
    scaler: FittedScaler,
    tfidf: Option<FittedTfidf>,
    text: Vec<SparseVector>,
}

impl FittedPool {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Unscaled feature vectors, one per item
    pub fn raw_features(&self) -> &[Vector] {
        &self.raw
    }

    /// Feature vectors after scaling with the pool scaler
    pub fn scaled_features(&self) -> &[Vector] {
        &self.scaled
    }

    pub fn scaler(&self) -> &FittedScaler {
        &self.scaler
    }

    pub fn tfidf(&self) -> Option<&FittedTfidf> {
        self.tfidf.as_ref()
    }

    /// TF-IDF rows, empty when the text signal is not used
    pub fn text_vectors(&self) -> &[SparseVector] {
        &self.text
    }
}

/// Recommendation pipeline for one configuration
#[derive(Debug, Clone)]
pub struct Recommender {
    config: RecommenderConfig,
    extractor: FeatureExtractor,
    scorer: HybridScorer,
    ranker: Ranker,
}

impl Recommender {
    /// Create a recommender; the configuration is validated first
    pub fn new(config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        let scorer = HybridScorer::new(config.weights()?)?;
        let ranker = Ranker::new(config.top_k)
            .with_discovery(config.discovery)
            .with_rule(config.eligibility.clone());
        Ok(Self {
            extractor: FeatureExtractor::new(config.feature_set),
            scorer,
            ranker,
            config,
        })
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Pool members that may act as queries
    pub fn query_indices(&self, pool: &FittedPool) -> Vec<usize> {
        (0..pool.len())
            .filter(|&i| self.is_query_eligible(&pool.items[i]))
            .collect()
    }

    fn is_query_eligible(&self, item: &Item) -> bool {
        self.config
            .eligibility
            .as_ref()
            .map_or(true, |rule| rule.is_query(item))
    }

    /// Derive feature and text vectors for the pool and fit the scaler
    pub fn fit(&self, items: Vec<Item>) -> Result<FittedPool> {
        if items.is_empty() {
            return Err(Error::MissingInput("candidate pool is empty".to_string()));
        }

        let raw: Vec<Vector> = items
            .iter()
            .map(|item| self.extractor.extract_item(item))
            .collect();

        let scaler = self.config.scaler.fit(&raw, self.extractor.dim())?;
        let scaled = scaler.transform_all(&raw)?;

        let (tfidf, text) = if self.config.signals.uses_text() {
            let documents: Vec<String> = items.iter().map(Item::document).collect();
            let tfidf = TfidfVectorizer::new(self.config.max_text_features).fit(&documents)?;
            let text = tfidf.transform_all(&documents);
            (Some(tfidf), text)
        } else {
            (None, Vec::new())
        };

        info!(
            items = items.len(),
            degenerate_columns = scaler.degenerate_columns(),
            vocabulary = tfidf.as_ref().map_or(0, FittedTfidf::dim),
            "fitted candidate pool"
        );

        Ok(FittedPool {
            items,
            raw,
            scaled,
            scaler,
            tfidf,
            text,
        })
    }

    /// Recommend pool items for an external listening history
    pub fn recommend_for_profile(
        &self,
        pool: &FittedPool,
        history: &[TrackRecord],
    ) -> Result<Recommendations> {
        if history.is_empty() {
            return Err(Error::MissingInput("listening history is empty".to_string()));
        }

        let raw_query = self.extractor.aggregate(history);
        let query_features = [pool.scaler.transform(&raw_query)?];
        let query_text = match &pool.tfidf {
            Some(tfidf) => vec![tfidf.transform(&join_documents(history))],
            None => Vec::new(),
        };

        let blended = self.blend(pool, &query_text, &query_features, &pool.scaled)?;
        let ctx = QueryContext::profile(history.iter().filter_map(TrackRecord::id));
        let ranking = self.ranker.rank(&pool.items, &blended.row(0), &ctx)?;

        info!(
            history = history.len(),
            known = ctx.known_ids.len(),
            candidates = pool.len(),
            results = ranking.results.len(),
            "recommended for listening profile"
        );

        let query = QuerySummary {
            id: None,
            title: None,
            tracks: history.len(),
            vibe: Vibe::from_vector(self.config.feature_set, &raw_query),
        };
        Ok(Recommendations::build(
            query,
            &ranking,
            &pool.items,
            &pool.raw,
            self.config.feature_set,
        )?)
    }

    /// Recommend pool items for the pool member at `index`
    pub fn recommend_for_member(&self, pool: &FittedPool, index: usize) -> Result<Recommendations> {
        let item = pool.items.get(index).ok_or_else(|| {
            Error::MissingInput(format!(
                "query index {} out of range for pool of {}",
                index,
                pool.len()
            ))
        })?;

        let query_features = [pool.scaled[index].clone()];
        let query_text: Vec<SparseVector> = pool.text.get(index).cloned().into_iter().collect();

        let blended = self.blend(pool, &query_text, &query_features, &pool.scaled)?;
        let ctx = QueryContext::member(index, item);
        let ranking = self.ranker.rank(&pool.items, &blended.row(0), &ctx)?;

        info!(
            query = index,
            title = item.title().as_deref().unwrap_or("Unknown"),
            results = ranking.results.len(),
            "recommended for pool member"
        );

        let query = QuerySummary {
            id: item.id(),
            title: item.title(),
            tracks: item.tracks().len(),
            vibe: Vibe::from_vector(self.config.feature_set, &pool.raw[index]),
        };
        Ok(Recommendations::build(
            query,
            &ranking,
            &pool.items,
            &pool.raw,
            self.config.feature_set,
        )?)
    }

    /// Recommend for every query-eligible pool member, in pool order
    pub fn recommend_all(&self, pool: &FittedPool) -> Result<Vec<Recommendations>> {
        let queries = self.query_indices(pool);
        if queries.is_empty() {
            warn!("no query-eligible items in the pool");
        }
        queries
            .into_iter()
            .map(|index| self.recommend_for_member(pool, index))
            .collect()
    }

    fn blend(
        &self,
        pool: &FittedPool,
        query_text: &[SparseVector],
        query_features: &[Vector],
        candidate_features: &[Vector],
    ) -> Result<BlendedScores> {
        let weights = self.scorer.weights();
        if weights.contains(TEXT_SIGNAL) && pool.tfidf.is_none() {
            return Err(Error::InvalidConfig(
                "pool was fitted without the text signal".to_string(),
            ));
        }

        let text = CosineSignal::new(TEXT_SIGNAL, query_text, &pool.text);
        let features = CosineSignal::new(FEATURE_SIGNAL, query_features, candidate_features);

        let mut signals: Vec<&dyn SignalProducer> = Vec::with_capacity(2);
        if weights.contains(TEXT_SIGNAL) {
            signals.push(&text);
        }
        if weights.contains(FEATURE_SIGNAL) {
            signals.push(&features);
        }
        Ok(self.scorer.score(&signals)?)
    }
}
