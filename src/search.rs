//! Fluent search request builder.
//!
//! Every method takes `&self` and returns a new [`Search`], so a partially
//! built search can be shared and extended in several directions without
//! one branch observing another's clauses.
//!
//! ```
//! use std::sync::Arc;
//! use solrq::{Criteria, Schema, Search};
//! use solrq::schema::field::FieldType;
//!
//! # fn main() -> solrq::Result<()> {
//! let schema = Schema::builder()
//!     .add_typed_field("text_field", FieldType::Text)
//!     .add_typed_field("int_field", FieldType::Int)
//!     .default_field("text_field")
//!     .build()?;
//! let search = Search::new(Arc::new(schema));
//! let params = search
//!     .query("hello world")?
//!     .filter(Criteria::new().gt("int_field", 3))?
//!     .params();
//! assert_eq!(
//!     params,
//!     vec![
//!         ("fq".to_string(), "int_field:{3 TO *}".to_string()),
//!         ("q".to_string(), "hello\\ world".to_string()),
//!     ]
//! );
//! # Ok(())
//! # }
//! ```

pub mod mlt;

use std::sync::Arc;

use log::{debug, trace};

use crate::error::{Result, SolrqError};
use crate::options::{
    FacetOptions, FieldLimitOptions, GroupOptions, HighlightOptions, MoreLikeThisOptions,
    OptionFamily, PaginateOptions, Settings, SortOptions,
};
use crate::params::{self, ParamMap, ParamValue, Params};
use crate::query::{Criteria, MATCH_ALL, QueryNode, TermMode};
use crate::schema::FieldRegistry;

/// A search request under construction.
#[derive(Debug, Clone)]
pub struct Search {
    registry: Arc<dyn FieldRegistry>,
    query: QueryNode,
    filter: QueryNode,
    /// Boosted clauses, ORed together.
    boosts: QueryNode,
    paginate: PaginateOptions,
    sort: SortOptions,
    facet: FacetOptions,
    highlight: HighlightOptions,
    more_like_this: MoreLikeThisOptions,
    field_limit: FieldLimitOptions,
    group: GroupOptions,
}

impl Search {
    pub fn new(registry: Arc<dyn FieldRegistry>) -> Self {
        Search {
            paginate: PaginateOptions::new(registry.clone()),
            sort: SortOptions::new(registry.clone()),
            facet: FacetOptions::new(registry.clone()),
            highlight: HighlightOptions::new(registry.clone()),
            more_like_this: MoreLikeThisOptions::new(registry.clone()),
            field_limit: FieldLimitOptions::new(registry.clone()),
            group: GroupOptions::new(registry.clone()),
            query: QueryNode::Empty,
            filter: QueryNode::Empty,
            boosts: QueryNode::Empty,
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<dyn FieldRegistry> {
        &self.registry
    }

    /// Build a sub-expression against this search's registry, for use with
    /// the node combinators.
    pub fn q(&self, criteria: impl Into<Criteria>) -> Result<QueryNode> {
        criteria.into().build(self.registry.as_ref(), TermMode::Term)
    }

    /// Like [`Search::q`], but textual values become phrases.
    pub fn q_phrase(&self, criteria: impl Into<Criteria>) -> Result<QueryNode> {
        criteria.into().build(self.registry.as_ref(), TermMode::Phrase)
    }

    /// AND `criteria` into the main query.
    pub fn query(&self, criteria: impl Into<Criteria>) -> Result<Self> {
        let node = self.q(criteria)?;
        Ok(self.with(|s| s.query = s.query.and_with(&node)))
    }

    /// AND `criteria` into the main query, textual values as phrases.
    pub fn query_by_phrase(&self, criteria: impl Into<Criteria>) -> Result<Self> {
        let node = self.q_phrase(criteria)?;
        Ok(self.with(|s| s.query = s.query.and_with(&node)))
    }

    /// AND the negation of `criteria` into the main query.
    pub fn query_exclude(&self, criteria: impl Into<Criteria>) -> Result<Self> {
        let node = self.q(criteria)?.negate();
        Ok(self.with(|s| s.query = s.query.and_with(&node)))
    }

    /// AND `criteria` into the filter query.
    pub fn filter(&self, criteria: impl Into<Criteria>) -> Result<Self> {
        let node = self.q(criteria)?;
        Ok(self.with(|s| s.filter = s.filter.and_with(&node)))
    }

    /// AND `criteria` into the filter query, textual values as phrases.
    pub fn filter_by_phrase(&self, criteria: impl Into<Criteria>) -> Result<Self> {
        let node = self.q_phrase(criteria)?;
        Ok(self.with(|s| s.filter = s.filter.and_with(&node)))
    }

    /// AND the negation of `criteria` into the filter query.
    pub fn exclude(&self, criteria: impl Into<Criteria>) -> Result<Self> {
        let node = self.q(criteria)?.negate();
        Ok(self.with(|s| s.filter = s.filter.and_with(&node)))
    }

    /// Rank documents matching `criteria` higher without requiring them to
    /// match: the main query becomes `q OR (q AND criteria^factor)`.
    ///
    /// Needs a main query to boost. Repeated calls OR their boosted clauses.
    pub fn boost_relevancy(&self, factor: f64, criteria: impl Into<Criteria>) -> Result<Self> {
        if self.query.is_empty() {
            return Err(SolrqError::invalid_argument(
                "boost_relevancy needs a main query to boost",
            ));
        }
        let node = self.q(criteria)?.boosted_by(factor)?;
        Ok(self.with(|s| s.boosts = s.boosts.or_with(&node)))
    }

    /// Set `start` and `rows`. `None` leaves the parameter out.
    pub fn paginate(&self, start: Option<i64>, rows: Option<i64>) -> Result<Self> {
        let settings = Settings::new().set("start", start).set("rows", rows);
        self.update_with(settings, |s| &mut s.paginate)
    }

    /// Add a sort clause; `-field` sorts descending.
    pub fn sort_by(&self, field: &str) -> Result<Self> {
        self.update_with(Settings::new().set("field", field), |s| &mut s.sort)
    }

    pub fn facet_by(&self, settings: Settings) -> Result<Self> {
        self.update_with(settings, |s| &mut s.facet)
    }

    /// Report the match count of `criteria` as a facet.
    pub fn facet_query(&self, criteria: impl Into<Criteria>) -> Result<Self> {
        let rendered = self.q(criteria)?.render();
        if rendered.is_empty() {
            return Err(SolrqError::invalid_argument("facet query is empty"));
        }
        Ok(self.with(move |s| s.facet.add_query(rendered)))
    }

    pub fn highlight(&self, settings: Settings) -> Result<Self> {
        self.update_with(settings, |s| &mut s.highlight)
    }

    pub fn mlt(&self, settings: Settings) -> Result<Self> {
        self.update_with(settings, |s| &mut s.more_like_this)
    }

    pub fn field_limit(&self, settings: Settings) -> Result<Self> {
        self.update_with(settings, |s| &mut s.field_limit)
    }

    pub fn group_by(&self, settings: Settings) -> Result<Self> {
        self.update_with(settings, |s| &mut s.group)
    }

    /// The main query with relevancy boosts applied, or `None` when no
    /// query clause was set.
    pub fn query_node(&self) -> Option<QueryNode> {
        if self.query.is_empty() {
            return None;
        }
        if self.boosts.is_empty() {
            return Some(self.query.clone());
        }
        Some(self.query.or_with(&self.query.and_with(&self.boosts)))
    }

    pub fn filter_node(&self) -> Option<&QueryNode> {
        (!self.filter.is_empty()).then_some(&self.filter)
    }

    /// All request parameters as an unordered mapping.
    ///
    /// `q` falls back to the match-all query when no query clause was set.
    pub fn params_map(&self) -> ParamMap {
        let mut map = ParamMap::new();
        self.insert_clauses(&mut map);
        let q = self
            .query_node()
            .map(|node| node.render())
            .unwrap_or_else(|| MATCH_ALL.to_string());
        trace!("q={}", q);
        map.insert("q".into(), ParamValue::Str(q));
        self.insert_options(&mut map, true);
        map
    }

    /// Encoded request parameters, sorted by name.
    pub fn params(&self) -> Params {
        let params = params::encode(&self.params_map());
        debug!("built {} search parameters", params.len());
        params
    }

    /// Insert `fq` when a filter is set.
    pub(crate) fn insert_clauses(&self, map: &mut ParamMap) {
        if let Some(filter) = self.filter_node() {
            let fq = filter.render();
            trace!("fq={}", fq);
            map.insert("fq".into(), ParamValue::Str(fq));
        }
    }

    /// Insert every option family's parameters. The more-like-this family
    /// carries its `mlt` switch only when `mlt_switch` is set.
    pub(crate) fn insert_options(&self, map: &mut ParamMap, mlt_switch: bool) {
        map.extend(self.paginate.options());
        map.extend(self.sort.options());
        map.extend(self.facet.options());
        map.extend(self.highlight.options());
        if mlt_switch {
            map.extend(self.more_like_this.options());
        } else {
            map.extend(self.more_like_this.handler_options());
        }
        map.extend(self.field_limit.options());
        map.extend(self.group.options());
    }

    pub(crate) fn more_like_this(&self) -> &MoreLikeThisOptions {
        &self.more_like_this
    }

    fn with(&self, change: impl FnOnce(&mut Search)) -> Self {
        let mut next = self.clone();
        change(&mut next);
        next
    }

    fn update_with<O: OptionFamily>(
        &self,
        settings: Settings,
        family: impl FnOnce(&mut Search) -> &mut O,
    ) -> Result<Self> {
        let mut next = self.clone();
        family(&mut next).update(settings)?;
        Ok(next)
    }
}
