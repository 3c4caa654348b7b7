//! SQL composition for facet counts
//!
//! [`build_query`] turns an immutable [`FilterSet`] into the filtered record
//! universe, leaving out the facet-id predicate of at most one dimension.
//! [`FacetQuery`] adds that dimension's join, grouping and ordering on top.
//! Both are plain values: nothing here touches the database, so every
//! per-dimension build can run concurrently and be inspected in tests.

use crate::dimension::FacetDimension;
use crate::filters::{text, FilterSet, RangeType};
use catalog_common::catalog::{
    taxonomy, PUBLICATION_STATUS_PUBLISHED_ID, PUBLICATION_STATUS_TYPE_ID, ROOT_OBJECT_ID,
};
use chrono::NaiveDate;

/// Positional bind value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Text(value.format("%Y-%m-%d").to_string())
    }
}

/// SQL text with `?` placeholders and the values bound to them, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            binds: Vec::new(),
        }
    }

    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.binds.push(value.into());
        self
    }
}

const LIKE_ESCAPE: &str = "ESCAPE '\\'";

/// `%value%` with LIKE wildcards in `value` escaped
pub(crate) fn like_contains(value: &str) -> String {
    format!("%{}%", escape_like(value))
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Filtered record universe: joins and conditions over `information_object io`
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    applied_facets: Vec<FacetDimension>,
    joins: Vec<Fragment>,
    conditions: Vec<Fragment>,
}

impl FilterQuery {
    /// Dimensions whose facet-id predicate is part of this query
    pub fn applied_facets(&self) -> &[FacetDimension] {
        &self.applied_facets
    }

    pub fn applies_facet(&self, dimension: FacetDimension) -> bool {
        self.applied_facets.contains(&dimension)
    }

    pub fn joins(&self) -> &[Fragment] {
        &self.joins
    }

    pub fn conditions(&self) -> &[Fragment] {
        &self.conditions
    }

    /// `SELECT COUNT(DISTINCT io.id)` over the filtered universe
    pub fn count_sql(&self) -> (String, Vec<SqlValue>) {
        let mut sql = String::from("SELECT COUNT(DISTINCT io.id) AS hit_count");
        let mut binds = Vec::new();
        self.write_from(&mut sql, &mut binds, &[]);
        self.write_where(&mut sql, &mut binds, &[]);
        (sql, binds)
    }

    fn write_from(&self, sql: &mut String, binds: &mut Vec<SqlValue>, extra_joins: &[Fragment]) {
        sql.push_str(
            "\nFROM information_object io\nLEFT JOIN display_object_config doc ON io.id = doc.object_id",
        );
        for join in self.joins.iter().chain(extra_joins) {
            sql.push('\n');
            sql.push_str(&join.sql);
            binds.extend(join.binds.iter().cloned());
        }
    }

    fn write_where(&self, sql: &mut String, binds: &mut Vec<SqlValue>, extra: &[Fragment]) {
        let mut first = true;
        for condition in self.conditions.iter().chain(extra) {
            sql.push_str(if first { "\nWHERE " } else { "\n  AND " });
            first = false;
            sql.push_str(&condition.sql);
            binds.extend(condition.binds.iter().cloned());
        }
    }
}

/// Build the filtered universe for a request
///
/// Structural, free-text and date filters are always applied. Every facet-id
/// filter is applied except the one belonging to `excluded`; pass `None` for the
/// full result query.
pub fn build_query(
    filters: &FilterSet,
    excluded: Option<FacetDimension>,
    culture: &str,
) -> FilterQuery {
    let mut query = FilterQuery {
        applied_facets: Vec::new(),
        joins: Vec::new(),
        conditions: vec![Fragment::new("io.id > ?").bind(ROOT_OBJECT_ID)],
    };

    // Anonymous users only ever see published records
    if !filters.is_authenticated {
        query.joins.push(
            Fragment::new(
                "JOIN status pub_st ON pub_st.object_id = io.id \
                 AND pub_st.type_id = ? AND pub_st.status_id = ?",
            )
            .bind(PUBLICATION_STATUS_TYPE_ID)
            .bind(PUBLICATION_STATUS_PUBLISHED_ID),
        );
    }

    push_structural(&mut query.conditions, filters);

    for dimension in FacetDimension::ALL {
        if Some(dimension) == excluded {
            continue;
        }
        if let Some(condition) = facet_condition(filters, dimension) {
            query.conditions.push(condition);
            query.applied_facets.push(dimension);
        }
    }

    push_text_filters(&mut query.conditions, filters, culture);

    if let Some(condition) = date_condition(filters) {
        query.conditions.push(condition);
    }

    query
}

fn push_structural(conditions: &mut Vec<Fragment>, filters: &FilterSet) {
    if let Some(parent_id) = filters.parent_id {
        conditions.push(Fragment::new("io.parent_id = ?").bind(parent_id));
    } else if filters.top_level_only {
        conditions.push(Fragment::new("io.parent_id = ?").bind(ROOT_OBJECT_ID));
    }

    if filters.has_digital_object {
        conditions.push(Fragment::new(
            "EXISTS (SELECT 1 FROM digital_object d_has \
             WHERE d_has.object_id = io.id AND d_has.parent_id IS NULL)",
        ));
    }
}

/// Predicate of one dimension's facet-id filter, if that filter is active
fn facet_condition(filters: &FilterSet, dimension: FacetDimension) -> Option<Fragment> {
    const TERM_EXISTS: &str = "EXISTS (SELECT 1 FROM object_term_relation otr_f \
         WHERE otr_f.object_id = io.id AND otr_f.term_id = ?)";

    match dimension {
        FacetDimension::GlamType => text(&filters.collection_type)
            .map(|value| Fragment::new("doc.object_type = ?").bind(value)),
        FacetDimension::Creator => filters.creator.map(|actor_id| {
            Fragment::new(
                "EXISTS (SELECT 1 FROM event ev_f \
                 WHERE ev_f.object_id = io.id AND ev_f.actor_id = ?)",
            )
            .bind(actor_id)
        }),
        FacetDimension::Subject => filters
            .subject
            .map(|term_id| Fragment::new(TERM_EXISTS).bind(term_id)),
        FacetDimension::Place => filters
            .place
            .map(|term_id| Fragment::new(TERM_EXISTS).bind(term_id)),
        FacetDimension::Genre => filters
            .genre
            .map(|term_id| Fragment::new(TERM_EXISTS).bind(term_id)),
        FacetDimension::Level => filters
            .level
            .map(|level_id| Fragment::new("io.level_of_description_id = ?").bind(level_id)),
        FacetDimension::MediaType => text(&filters.media_type).map(|prefix| {
            Fragment::new(format!(
                "EXISTS (SELECT 1 FROM digital_object d_media \
                 WHERE d_media.object_id = io.id AND d_media.parent_id IS NULL \
                 AND {} = lower(?))",
                media_prefix("d_media")
            ))
            .bind(prefix)
        }),
        FacetDimension::Repository => filters
            .repository
            .map(|repository_id| Fragment::new("io.repository_id = ?").bind(repository_id)),
    }
}

fn i18n_like(column: &str, value: &str) -> Fragment {
    Fragment::new(format!(
        "EXISTS (SELECT 1 FROM information_object_i18n ioi \
         WHERE ioi.id = io.id AND ioi.{} LIKE ? {})",
        column, LIKE_ESCAPE
    ))
    .bind(like_contains(value))
}

fn term_search(taxonomy_id: i64, value: &str, culture: &str) -> Fragment {
    Fragment::new(format!(
        "EXISTS (SELECT 1 FROM object_term_relation otr_s \
         JOIN term t_s ON otr_s.term_id = t_s.id \
         JOIN term_i18n ti_s ON t_s.id = ti_s.id AND ti_s.culture = ? \
         WHERE otr_s.object_id = io.id AND t_s.taxonomy_id = ? AND ti_s.name LIKE ? {})",
        LIKE_ESCAPE
    ))
    .bind(culture)
    .bind(taxonomy_id)
    .bind(like_contains(value))
}

fn push_text_filters(conditions: &mut Vec<Fragment>, filters: &FilterSet, culture: &str) {
    let terms = filters.search_terms();
    if !terms.is_empty() {
        let mut sql = String::from("(");
        let mut binds = Vec::with_capacity(terms.len() * 3);
        for (i, term) in terms.iter().enumerate() {
            if i > 0 {
                sql.push_str(" OR ");
            }
            sql.push_str(&format!(
                "(EXISTS (SELECT 1 FROM information_object_i18n ioi_q \
                 WHERE ioi_q.id = io.id \
                 AND (ioi_q.title LIKE ? {esc} OR ioi_q.scope_and_content LIKE ? {esc})) \
                 OR io.identifier LIKE ? {esc})",
                esc = LIKE_ESCAPE
            ));
            let pattern = like_contains(term);
            binds.push(SqlValue::Text(pattern.clone()));
            binds.push(SqlValue::Text(pattern.clone()));
            binds.push(SqlValue::Text(pattern));
        }
        sql.push(')');
        conditions.push(Fragment { sql, binds });
    }

    if let Some(value) = text(&filters.title) {
        conditions.push(i18n_like("title", value));
    }

    for value in [text(&filters.identifier), text(&filters.reference_code)]
        .into_iter()
        .flatten()
    {
        conditions.push(
            Fragment::new(format!("io.identifier LIKE ? {}", LIKE_ESCAPE))
                .bind(like_contains(value)),
        );
    }

    if let Some(value) = text(&filters.scope_and_content) {
        conditions.push(i18n_like("scope_and_content", value));
    }
    if let Some(value) = text(&filters.extent_and_medium) {
        conditions.push(i18n_like("extent_and_medium", value));
    }
    if let Some(value) = text(&filters.archival_history) {
        conditions.push(i18n_like("archival_history", value));
    }
    if let Some(value) = text(&filters.acquisition) {
        conditions.push(i18n_like("acquisition", value));
    }

    if let Some(value) = text(&filters.creator_search) {
        conditions.push(
            Fragment::new(format!(
                "EXISTS (SELECT 1 FROM event ev_s \
                 JOIN actor_i18n ai_s ON ev_s.actor_id = ai_s.id AND ai_s.culture = ? \
                 WHERE ev_s.object_id = io.id AND ai_s.authorized_form_of_name LIKE ? {})",
                LIKE_ESCAPE
            ))
            .bind(culture)
            .bind(like_contains(value)),
        );
    }

    if let Some(value) = text(&filters.subject_search) {
        conditions.push(term_search(taxonomy::SUBJECT, value, culture));
    }
    if let Some(value) = text(&filters.place_search) {
        conditions.push(term_search(taxonomy::PLACE, value, culture));
    }
    if let Some(value) = text(&filters.genre_search) {
        conditions.push(term_search(taxonomy::GENRE, value, culture));
    }
}

/// Date-range predicate against the record's events
fn date_condition(filters: &FilterSet) -> Option<Fragment> {
    if !filters.has_date_filters() {
        return None;
    }

    let mut sql = String::from(
        "EXISTS (SELECT 1 FROM event evt_date WHERE evt_date.object_id = io.id",
    );
    let mut binds = Vec::new();

    match filters.range_type {
        RangeType::Exact => {
            if let Some(start) = filters.start_date {
                sql.push_str(" AND evt_date.start_date >= ?");
                binds.push(start.into());
            }
            if let Some(end) = filters.end_date {
                sql.push_str(" AND evt_date.end_date <= ?");
                binds.push(end.into());
            }
        }
        RangeType::Inclusive => {
            if let Some(start) = filters.start_date {
                sql.push_str(" AND (evt_date.end_date >= ? OR evt_date.end_date IS NULL)");
                binds.push(start.into());
            }
            if let Some(end) = filters.end_date {
                sql.push_str(" AND (evt_date.start_date <= ? OR evt_date.start_date IS NULL)");
                binds.push(end.into());
            }
        }
    }

    sql.push(')');
    Some(Fragment { sql, binds })
}

/// Lower-cased mime type up to the first `/`, or the whole mime type without one
///
/// The facet groups by this expression and the media filter compares against it,
/// so a listed value always selects exactly the records it counted.
fn media_prefix(alias: &str) -> String {
    format!(
        "lower(CASE WHEN instr({a}.mime_type, '/') > 0 \
         THEN substr({a}.mime_type, 1, instr({a}.mime_type, '/') - 1) \
         ELSE {a}.mime_type END)",
        a = alias
    )
}

/// Per-dimension count query
#[derive(Debug, Clone, PartialEq)]
pub struct FacetQuery {
    dimension: FacetDimension,
    filter: FilterQuery,
    limit: usize,
    culture: String,
}

struct DimensionShape {
    joins: Vec<Fragment>,
    conditions: Vec<Fragment>,
    value: String,
    label: String,
    group_by: String,
}

impl FacetQuery {
    /// Compose the count query of `dimension` from the filter set
    pub fn new(filters: &FilterSet, dimension: FacetDimension, limit: usize, culture: &str) -> Self {
        Self {
            dimension,
            filter: build_query(filters, Some(dimension), culture),
            limit,
            culture: culture.to_string(),
        }
    }

    pub fn dimension(&self) -> FacetDimension {
        self.dimension
    }

    pub fn filter(&self) -> &FilterQuery {
        &self.filter
    }

    /// Render SQL and binds: join the dimension's table, group by its natural key
    /// and count distinct records per group
    pub fn to_sql(&self) -> (String, Vec<SqlValue>) {
        let shape = self.shape();
        let mut binds = Vec::new();
        let mut sql = format!(
            "SELECT {} AS value_id, {} AS label, COUNT(DISTINCT io.id) AS hit_count",
            shape.value, shape.label
        );

        self.filter.write_from(&mut sql, &mut binds, &shape.joins);
        self.filter.write_where(&mut sql, &mut binds, &shape.conditions);

        sql.push_str(&format!(
            "\nGROUP BY {}\nORDER BY hit_count DESC, label ASC, value_id ASC\nLIMIT ?",
            shape.group_by
        ));
        binds.push(SqlValue::Int(self.limit as i64));

        (sql, binds)
    }

    fn shape(&self) -> DimensionShape {
        let culture = self.culture.as_str();
        match self.dimension {
            FacetDimension::Creator => DimensionShape {
                joins: vec![
                    Fragment::new("JOIN event ev ON io.id = ev.object_id"),
                    Fragment::new("JOIN actor_i18n ai ON ev.actor_id = ai.id AND ai.culture = ?")
                        .bind(culture),
                ],
                conditions: vec![Fragment::new("ev.actor_id IS NOT NULL")],
                value: "ev.actor_id".to_string(),
                label: "ai.authorized_form_of_name".to_string(),
                group_by: "ev.actor_id, ai.authorized_form_of_name".to_string(),
            },
            FacetDimension::Subject | FacetDimension::Place | FacetDimension::Genre => {
                let taxonomy_id = self.dimension.taxonomy_id().unwrap_or_default();
                DimensionShape {
                    joins: vec![
                        Fragment::new("JOIN object_term_relation otr ON io.id = otr.object_id"),
                        Fragment::new("JOIN term t ON otr.term_id = t.id AND t.taxonomy_id = ?")
                            .bind(taxonomy_id),
                        Fragment::new("JOIN term_i18n ti ON t.id = ti.id AND ti.culture = ?")
                            .bind(culture),
                    ],
                    conditions: Vec::new(),
                    value: "t.id".to_string(),
                    label: "ti.name".to_string(),
                    group_by: "t.id, ti.name".to_string(),
                }
            }
            FacetDimension::Level => DimensionShape {
                joins: vec![Fragment::new(
                    "JOIN term_i18n lvl ON io.level_of_description_id = lvl.id AND lvl.culture = ?",
                )
                .bind(culture)],
                conditions: vec![Fragment::new("io.level_of_description_id IS NOT NULL")],
                value: "io.level_of_description_id".to_string(),
                label: "lvl.name".to_string(),
                group_by: "io.level_of_description_id, lvl.name".to_string(),
            },
            FacetDimension::Repository => DimensionShape {
                joins: vec![
                    Fragment::new("JOIN repository r ON io.repository_id = r.id"),
                    Fragment::new("JOIN actor_i18n rai ON r.id = rai.id AND rai.culture = ?")
                        .bind(culture),
                ],
                conditions: vec![Fragment::new("io.repository_id IS NOT NULL")],
                value: "r.id".to_string(),
                label: "rai.authorized_form_of_name".to_string(),
                group_by: "r.id, rai.authorized_form_of_name".to_string(),
            },
            FacetDimension::GlamType => DimensionShape {
                joins: Vec::new(),
                conditions: vec![Fragment::new("doc.object_type IS NOT NULL")],
                value: "doc.object_type".to_string(),
                label: "doc.object_type".to_string(),
                group_by: "doc.object_type".to_string(),
            },
            // Derivatives have a parent digital object and are not counted
            FacetDimension::MediaType => DimensionShape {
                joins: vec![Fragment::new(
                    "JOIN digital_object dobj ON io.id = dobj.object_id AND dobj.parent_id IS NULL",
                )],
                conditions: vec![Fragment::new("dobj.mime_type IS NOT NULL")],
                value: media_prefix("dobj"),
                label: media_prefix("dobj"),
                group_by: media_prefix("dobj"),
            },
        }
    }
}
