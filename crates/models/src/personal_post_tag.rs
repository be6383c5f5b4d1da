use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryFilter, QueryOrder, SqlErr};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{errors, personal_post, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "personal_post_tag")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub tag: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Post }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Post => Entity::belongs_to(personal_post::Entity)
                .from(Column::PostId)
                .to(personal_post::Column::Id)
                .into(),
        }
    }
}

impl Related<personal_post::Entity> for Entity {
    fn to() -> RelationDef { Relation::Post.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Attach a tag unless the post already carries it; returns the stored row.
pub async fn attach<C: ConnectionTrait>(db: &C, post_id: Uuid, raw: &str) -> Result<Model, errors::ModelError> {
    let tag = validate::normalize_tag(raw)?;
    if let Some(existing) = find_tag(db, post_id, &tag).await? {
        return Ok(existing);
    }
    insert_or_existing(db, post_id, tag).await
}

async fn find_tag<C: ConnectionTrait>(db: &C, post_id: Uuid, tag: &str) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::PostId.eq(post_id))
        .filter(Column::Tag.eq(tag))
        .one(db)
        .await
}

/// Insert the row; a concurrent insert of the same tag wins and its row is returned.
pub(crate) async fn insert_or_existing<C: ConnectionTrait>(db: &C, post_id: Uuid, tag: String) -> Result<Model, errors::ModelError> {
    let am = ActiveModel { id: Set(Uuid::new_v4()), post_id: Set(post_id), tag: Set(tag.clone()) };
    match am.insert(db).await {
        Ok(m) => Ok(m),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => find_tag(db, post_id, &tag)
            .await?
            .ok_or_else(|| errors::ModelError::Db(e.to_string())),
        Err(e) => Err(errors::ModelError::Db(e.to_string())),
    }
}

pub async fn list_for_post(db: &DatabaseConnection, post_id: Uuid) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::PostId.eq(post_id))
        .order_by_asc(Column::Tag)
        .all(db)
        .await?)
}
