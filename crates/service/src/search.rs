//! Case-insensitive substring search across posts, business profiles,
//! skillset profiles and catalog services.

use std::str::FromStr;

use sea_orm::{
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use tracing::debug;

use models::{business_profile, personal_post, service, skillset_profile};

use crate::errors::ServiceError;
use crate::posts::hydrate;
use crate::views::{BusinessProfileView, FeedItem, ServiceView, SkillsetProfileView};

pub const MAX_QUERY_CHARS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    All,
    Posts,
    Profiles,
    Skillsets,
    Services,
}

impl SearchScope {
    fn includes(self, other: SearchScope) -> bool { self == SearchScope::All || self == other }
}

impl FromStr for SearchScope {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "posts" => Ok(Self::Posts),
            "profiles" | "businesses" => Ok(Self::Profiles),
            "skillsets" | "skillset-profiles" => Ok(Self::Skillsets),
            "services" => Ok(Self::Services),
            other => Err(ServiceError::Validation(format!("unknown search scope '{other}'"))),
        }
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub posts: Vec<FeedItem>,
    pub profiles: Vec<BusinessProfileView>,
    pub skillsets: Vec<SkillsetProfileView>,
    pub services: Vec<ServiceView>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.posts.len() + self.profiles.len() + self.skillsets.len() + self.services.len()
    }
}

/// `%needle%` with LIKE metacharacters escaped by `\`.
fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn contains_ci<C: ColumnTrait>(col: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(pattern).escape('\\'))
}

fn any_contains<C: ColumnTrait>(cols: &[C], pattern: &str) -> Condition {
    cols.iter().fold(Condition::any(), |cond, c| cond.add(contains_ci(*c, pattern)))
}

/// Run the search. Blank queries are rejected; each result group holds at
/// most `limit` rows.
pub async fn search(db: &DatabaseConnection, raw_query: Option<&str>, scope: SearchScope, limit: u64) -> Result<SearchResults, ServiceError> {
    let query = models::validate::required_text("q", raw_query)?;
    models::validate::max_len("q", &query, MAX_QUERY_CHARS)?;
    let pattern = like_pattern(&query);
    let mut out = SearchResults { query: query.clone(), ..Default::default() };

    if scope.includes(SearchScope::Posts) {
        let rows = personal_post::Entity::find()
            .filter(any_contains(&[personal_post::Column::Content, personal_post::Column::Location], &pattern))
            .order_by_desc(personal_post::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await?;
        out.posts = hydrate(db, rows).await?;
    }
    if scope.includes(SearchScope::Profiles) {
        out.profiles = business_profile::Entity::find()
            .filter(any_contains(
                &[
                    business_profile::Column::BusinessName,
                    business_profile::Column::Description,
                    business_profile::Column::Category,
                ],
                &pattern,
            ))
            .order_by_desc(business_profile::Column::Rating)
            .limit(limit)
            .all(db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    }
    if scope.includes(SearchScope::Skillsets) {
        out.skillsets = skillset_profile::Entity::find()
            .filter(any_contains(
                &[skillset_profile::Column::FullName, skillset_profile::Column::Headline],
                &pattern,
            ))
            .order_by_desc(skillset_profile::Column::Rating)
            .limit(limit)
            .all(db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    }
    if scope.includes(SearchScope::Services) {
        out.services = service::Entity::find()
            .filter(any_contains(&[service::Column::Name, service::Column::Description], &pattern))
            .order_by_asc(service::Column::Name)
            .limit(limit)
            .all(db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    }
    debug!(query = %query, ?scope, total = out.total(), "search finished");
    Ok(out)
}
