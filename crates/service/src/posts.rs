//! Personal posts and everything hanging off them: tags, comments,
//! recommendations, plus the feed and recommended-post views built on top.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use common::pagination::Pagination;
use models::{
    personal_post, personal_post_comment as comment, personal_post_recommendation as recommendation,
    personal_post_tag as tag, validate,
};

use crate::errors::ServiceError;
use crate::views::{CommentView, FeedItem, RecommendationView, RecommendedPost};

#[derive(Debug, Default, Deserialize)]
pub struct NewPost {
    pub user_id: Option<Uuid>,
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostUpdate {
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewComment {
    pub user_id: Option<Uuid>,
    pub body: Option<String>,
}

fn post_content(raw: Option<&str>) -> Result<String, ServiceError> {
    let content = validate::required_text("content", raw)?;
    validate::max_len("content", &content, personal_post::MAX_CONTENT_CHARS)?;
    Ok(content)
}

fn media_url(raw: Option<&str>) -> Result<Option<String>, ServiceError> {
    let url = validate::optional_text(raw);
    if let Some(u) = url.as_deref() {
        validate::url("media_url", u)?;
    }
    Ok(url)
}

async fn find_post(db: &DatabaseConnection, id: Uuid) -> Result<personal_post::Model, ServiceError> {
    personal_post::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("post"))
}

/// Count child rows per post for the given ids.
async fn counts_by_post<E>(db: &DatabaseConnection, post_col: E::Column, id_col: E::Column, ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, ServiceError>
where
    E: EntityTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, i64)> = E::find()
        .select_only()
        .column(post_col)
        .column_as(Expr::col(id_col).count(), "cnt")
        .filter(post_col.is_in(ids.iter().copied()))
        .group_by(post_col)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|(id, n)| (id, n.max(0) as u64)).collect())
}

/// Attach tags and engagement counts to a batch of posts, preserving order.
pub(crate) async fn hydrate(db: &DatabaseConnection, posts: Vec<personal_post::Model>) -> Result<Vec<FeedItem>, ServiceError> {
    let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let mut tags: HashMap<Uuid, Vec<String>> = HashMap::new();
    if !ids.is_empty() {
        let rows = tag::Entity::find()
            .filter(tag::Column::PostId.is_in(ids.iter().copied()))
            .order_by_asc(tag::Column::Tag)
            .all(db)
            .await?;
        for t in rows {
            tags.entry(t.post_id).or_default().push(t.tag);
        }
    }
    let comments = counts_by_post::<comment::Entity>(db, comment::Column::PostId, comment::Column::Id, &ids).await?;
    let recs = counts_by_post::<recommendation::Entity>(db, recommendation::Column::PostId, recommendation::Column::Id, &ids).await?;

    Ok(posts
        .into_iter()
        .map(|p| {
            let id = p.id;
            FeedItem::from_post(
                p,
                tags.remove(&id).unwrap_or_default(),
                comments.get(&id).copied().unwrap_or(0),
                recs.get(&id).copied().unwrap_or(0),
            )
        })
        .collect())
}

/// Create a post together with its tags in one transaction.
#[instrument(skip(db, input))]
pub async fn create_post(db: &DatabaseConnection, input: NewPost) -> Result<FeedItem, ServiceError> {
    let user_id = validate::required("user_id", input.user_id)?;
    let content = post_content(input.content.as_deref())?;
    let media_url = media_url(input.media_url.as_deref())?;
    let now = Utc::now();

    let txn = db.begin().await?;
    let post = personal_post::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        content: Set(content),
        media_url: Set(media_url),
        location: Set(validate::optional_text(input.location.as_deref())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;
    for raw in &input.tags {
        tag::attach(&txn, post.id, raw).await?;
    }
    txn.commit().await?;

    info!(id = %post.id, user_id = %user_id, tags = input.tags.len(), event = "post_created", "created post");
    let mut items = hydrate(db, vec![post]).await?;
    items.pop().ok_or_else(|| ServiceError::Db("created post vanished".into()))
}

/// Get a single post as a feed item.
pub async fn get_post(db: &DatabaseConnection, id: Uuid) -> Result<Option<FeedItem>, ServiceError> {
    match personal_post::Entity::find_by_id(id).one(db).await? {
        Some(p) => Ok(hydrate(db, vec![p]).await?.pop()),
        None => Ok(None),
    }
}

/// List posts newest first, optionally for a single author.
pub async fn list_posts(db: &DatabaseConnection, user_id: Option<Uuid>, opts: Pagination) -> Result<Vec<FeedItem>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut q = personal_post::Entity::find();
    if let Some(uid) = user_id {
        q = q.filter(personal_post::Column::UserId.eq(uid));
    }
    let rows = q
        .order_by_desc(personal_post::Column::CreatedAt)
        .order_by_desc(personal_post::Column::Id)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?;
    hydrate(db, rows).await
}

/// The public feed: every post, newest first.
pub async fn feed(db: &DatabaseConnection, opts: Pagination) -> Result<Vec<FeedItem>, ServiceError> {
    list_posts(db, None, opts).await
}

/// Posts ranked by recommendation count, topped up with the newest
/// unrecommended posts when fewer than `limit` have any recommendations.
pub async fn recommended_posts(db: &DatabaseConnection, limit: u64) -> Result<Vec<RecommendedPost>, ServiceError> {
    let ranked: Vec<(Uuid, i64)> = recommendation::Entity::find()
        .select_only()
        .column(recommendation::Column::PostId)
        .column_as(Expr::col((recommendation::Entity, recommendation::Column::Id)).count(), "cnt")
        .join(JoinType::InnerJoin, recommendation::Relation::Post.def())
        .group_by(recommendation::Column::PostId)
        .group_by(personal_post::Column::CreatedAt)
        .order_by_desc(Expr::col((recommendation::Entity, recommendation::Column::Id)).count())
        .order_by_desc(personal_post::Column::CreatedAt)
        .order_by_desc(recommendation::Column::PostId)
        .limit(limit)
        .into_tuple()
        .all(db)
        .await?;
    let ranked_ids: Vec<Uuid> = ranked.iter().map(|(id, _)| *id).collect();

    let mut posts = if ranked_ids.is_empty() {
        Vec::new()
    } else {
        personal_post::Entity::find()
            .filter(personal_post::Column::Id.is_in(ranked_ids.iter().copied()))
            .all(db)
            .await?
    };
    let remaining = limit.saturating_sub(posts.len() as u64);
    if remaining > 0 {
        let mut q = personal_post::Entity::find();
        if !ranked_ids.is_empty() {
            q = q.filter(personal_post::Column::Id.is_not_in(ranked_ids.iter().copied()));
        }
        let fill = q
            .order_by_desc(personal_post::Column::CreatedAt)
            .order_by_desc(personal_post::Column::Id)
            .limit(remaining)
            .all(db)
            .await?;
        posts.extend(fill);
    }

    let mut items = hydrate(db, posts).await?;
    items.sort_by(|a, b| {
        b.recommendation_count
            .cmp(&a.recommendation_count)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    });
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, post)| RecommendedPost { rank: i + 1, post })
        .collect())
}

/// Partially update a post's text fields.
#[instrument(skip(db, input))]
pub async fn update_post(db: &DatabaseConnection, id: Uuid, input: PostUpdate) -> Result<FeedItem, ServiceError> {
    let mut am: personal_post::ActiveModel = find_post(db, id).await?.into();
    if let Some(c) = input.content.as_deref() {
        am.content = Set(post_content(Some(c))?);
    }
    if let Some(u) = input.media_url.as_deref() {
        am.media_url = Set(media_url(Some(u))?);
    }
    if let Some(l) = input.location.as_deref() {
        am.location = Set(validate::optional_text(Some(l)));
    }
    am.updated_at = Set(Utc::now().into());
    let m = am.update(db).await?;
    info!(id = %m.id, event = "post_updated", "updated post");
    hydrate(db, vec![m]).await?.pop().ok_or_else(|| ServiceError::not_found("post"))
}

/// Delete a post; children go with it. Returns whether it existed.
pub async fn delete_post(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = personal_post::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected > 0 {
        info!(id = %id, event = "post_deleted", "deleted post");
    }
    Ok(res.rows_affected > 0)
}

/// Tags on a post, alphabetical.
pub async fn list_tags(db: &DatabaseConnection, post_id: Uuid) -> Result<Vec<String>, ServiceError> {
    find_post(db, post_id).await?;
    Ok(tag::list_for_post(db, post_id).await?.into_iter().map(|t| t.tag).collect())
}

/// Add one tag; re-adding an existing tag is a no-op.
pub async fn add_tag(db: &DatabaseConnection, post_id: Uuid, raw: Option<&str>) -> Result<Vec<String>, ServiceError> {
    let raw = validate::required_text("tag", raw)?;
    find_post(db, post_id).await?;
    tag::attach(db, post_id, &raw).await?;
    list_tags(db, post_id).await
}

/// Remove a tag; returns whether it was present.
pub async fn remove_tag(db: &DatabaseConnection, post_id: Uuid, raw: &str) -> Result<bool, ServiceError> {
    let t = validate::normalize_tag(raw)?;
    let res = tag::Entity::delete_many()
        .filter(tag::Column::PostId.eq(post_id))
        .filter(tag::Column::Tag.eq(t))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

/// Comments oldest first.
pub async fn list_comments(db: &DatabaseConnection, post_id: Uuid) -> Result<Vec<CommentView>, ServiceError> {
    let post = find_post(db, post_id).await?;
    let rows = post
        .find_related(comment::Entity)
        .order_by_asc(comment::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

#[instrument(skip(db, input))]
pub async fn add_comment(db: &DatabaseConnection, post_id: Uuid, input: NewComment) -> Result<CommentView, ServiceError> {
    let user_id = validate::required("user_id", input.user_id)?;
    let body = validate::required_text("body", input.body.as_deref())?;
    validate::max_len("body", &body, comment::MAX_BODY_CHARS)?;
    find_post(db, post_id).await?;
    let m = comment::ActiveModel {
        id: Set(Uuid::new_v4()),
        post_id: Set(post_id),
        user_id: Set(user_id),
        body: Set(body),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;
    info!(id = %m.id, post_id = %post_id, event = "comment_created", "created comment");
    Ok(m.into())
}

pub async fn list_recommendations(db: &DatabaseConnection, post_id: Uuid) -> Result<Vec<RecommendationView>, ServiceError> {
    let post = find_post(db, post_id).await?;
    let rows = post
        .find_related(recommendation::Entity)
        .order_by_asc(recommendation::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Record that a user recommends a post. Recommending twice returns the
/// existing row.
pub async fn recommend(db: &DatabaseConnection, post_id: Uuid, user_id: Option<Uuid>) -> Result<RecommendationView, ServiceError> {
    let user_id = validate::required("user_id", user_id)?;
    find_post(db, post_id).await?;
    if let Some(existing) = find_recommendation(db, post_id, user_id).await? {
        return Ok(existing.into());
    }
    insert_recommendation(db, post_id, user_id).await
}

async fn find_recommendation(db: &DatabaseConnection, post_id: Uuid, user_id: Uuid) -> Result<Option<recommendation::Model>, DbErr> {
    recommendation::Entity::find()
        .filter(recommendation::Column::PostId.eq(post_id))
        .filter(recommendation::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// A unique violation means a concurrent request already stored the row.
async fn insert_recommendation(db: &DatabaseConnection, post_id: Uuid, user_id: Uuid) -> Result<RecommendationView, ServiceError> {
    let am = recommendation::ActiveModel {
        id: Set(Uuid::new_v4()),
        post_id: Set(post_id),
        user_id: Set(user_id),
        created_at: Set(Utc::now().into()),
    };
    match am.insert(db).await {
        Ok(m) => {
            info!(post_id = %post_id, user_id = %user_id, event = "post_recommended", "recommended post");
            Ok(m.into())
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            match find_recommendation(db, post_id, user_id).await? {
                Some(existing) => Ok(existing.into()),
                None => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// Withdraw a recommendation; returns whether one existed.
pub async fn unrecommend(db: &DatabaseConnection, post_id: Uuid, user_id: Uuid) -> Result<bool, ServiceError> {
    let res = recommendation::Entity::delete_many()
        .filter(recommendation::Column::PostId.eq(post_id))
        .filter(recommendation::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}
