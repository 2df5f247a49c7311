//! Requests to a dedicated more-like-this handler.
//!
//! The handler finds documents similar to a posted body or to the content
//! behind a URL. It takes the `mlt.*` parameters without the `mlt` switch,
//! and a main query is optional.

use std::sync::Arc;

use log::debug;

use crate::error::{Result, SolrqError};
use crate::options::Settings;
use crate::params::{self, ParamMap, ParamValue, Params};
use crate::query::Criteria;
use crate::schema::FieldRegistry;
use crate::search::Search;

/// Where the handler reads the reference document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MltSource {
    /// Posted as the request body.
    Content(String),
    /// Fetched by the backend from a URL, sent as `stream.url`.
    Url(String),
}

#[derive(Debug, Clone)]
pub struct MltSearch {
    search: Search,
    source: MltSource,
}

impl MltSearch {
    pub fn new(registry: Arc<dyn FieldRegistry>, source: MltSource) -> Self {
        MltSearch {
            search: Search::new(registry),
            source,
        }
    }

    /// Similar documents to a posted body.
    pub fn with_content(registry: Arc<dyn FieldRegistry>, content: impl Into<String>) -> Self {
        Self::new(registry, MltSource::Content(content.into()))
    }

    /// Similar documents to the content behind `url`.
    pub fn with_url(registry: Arc<dyn FieldRegistry>, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(SolrqError::invalid_argument("stream URL is empty"));
        }
        Ok(Self::new(registry, MltSource::Url(url)))
    }

    pub fn source(&self) -> &MltSource {
        &self.source
    }

    /// The request body, when the reference document is posted.
    pub fn body(&self) -> Option<&str> {
        match &self.source {
            MltSource::Content(content) => Some(content),
            MltSource::Url(_) => None,
        }
    }

    /// Set the similarity fields and tuning knobs. `fields` must end up
    /// non-empty.
    pub fn mlt(&self, settings: Settings) -> Result<Self> {
        let search = self.search.mlt(settings)?;
        if !search.more_like_this().has_fields() {
            return Err(SolrqError::config(
                "a more-like-this request needs at least one field",
            ));
        }
        Ok(self.with_search(search))
    }

    pub fn query(&self, criteria: impl Into<Criteria>) -> Result<Self> {
        Ok(self.with_search(self.search.query(criteria)?))
    }

    pub fn filter(&self, criteria: impl Into<Criteria>) -> Result<Self> {
        Ok(self.with_search(self.search.filter(criteria)?))
    }

    pub fn exclude(&self, criteria: impl Into<Criteria>) -> Result<Self> {
        Ok(self.with_search(self.search.exclude(criteria)?))
    }

    pub fn paginate(&self, start: Option<i64>, rows: Option<i64>) -> Result<Self> {
        Ok(self.with_search(self.search.paginate(start, rows)?))
    }

    pub fn sort_by(&self, field: &str) -> Result<Self> {
        Ok(self.with_search(self.search.sort_by(field)?))
    }

    pub fn field_limit(&self, settings: Settings) -> Result<Self> {
        Ok(self.with_search(self.search.field_limit(settings)?))
    }

    /// All request parameters. `q` is present only when a query was set.
    pub fn params_map(&self) -> ParamMap {
        let mut map = ParamMap::new();
        self.search.insert_clauses(&mut map);
        if let Some(node) = self.search.query_node() {
            map.insert("q".into(), ParamValue::Str(node.render()));
        }
        self.search.insert_options(&mut map, false);
        if let MltSource::Url(url) = &self.source {
            map.insert("stream.url".into(), ParamValue::Str(url.clone()));
        }
        map
    }

    pub fn params(&self) -> Params {
        let params = params::encode(&self.params_map());
        debug!("built {} more-like-this parameters", params.len());
        params
    }

    fn with_search(&self, search: Search) -> Self {
        MltSearch {
            search,
            source: self.source.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::testing::registry;

    fn content_search() -> MltSearch {
        MltSearch::with_content(registry(), "This is the posted content.")
    }

    fn pairs(entries: &[(&str, &str)]) -> Params {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_handler_params_have_no_switch() {
        let s = content_search()
            .mlt(Settings::new().set("fields", "text_field"))
            .unwrap();
        assert_eq!(s.params(), pairs(&[("mlt.fl", "text_field")]));
        assert_eq!(s.body(), Some("This is the posted content."));
    }

    #[test]
    fn test_query_fields_and_knobs() {
        let s = content_search()
            .mlt(
                Settings::new()
                    .set("fields", vec!["string_field", "text_field"])
                    .query_field("string_field", 3.0),
            )
            .unwrap();
        assert_eq!(
            s.params(),
            pairs(&[("mlt.fl", "string_field,text_field"), ("mlt.qf", "string_field^3.0")])
        );

        let s = content_search()
            .mlt(
                Settings::new()
                    .set("fields", "text_field")
                    .set("mindf", 3)
                    .set("interestingTerms", "details"),
            )
            .unwrap();
        assert_eq!(
            s.params(),
            pairs(&[
                ("mlt.fl", "text_field"),
                ("mlt.interestingTerms", "details"),
                ("mlt.mindf", "3"),
            ])
        );
    }

    #[test]
    fn test_fields_required() {
        let err = content_search()
            .mlt(Settings::new().set("count", 3))
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_url_source() {
        let s = MltSearch::with_url(registry(), "http://example.com/doc")
            .unwrap()
            .mlt(Settings::new().set("fields", "text_field"))
            .unwrap()
            .query("hello")
            .unwrap();
        assert_eq!(s.body(), None);
        assert_eq!(
            s.params(),
            pairs(&[
                ("mlt.fl", "text_field"),
                ("q", "hello"),
                ("stream.url", "http://example.com/doc"),
            ])
        );
        assert!(MltSearch::with_url(registry(), " ").is_err());
    }
}
