use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{personal_post_comment, personal_post_recommendation, personal_post_tag};

pub const MAX_CONTENT_CHARS: usize = 5000;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "personal_post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub media_url: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Tag, Comment, Recommendation }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Tag => Entity::has_many(personal_post_tag::Entity).into(),
            Relation::Comment => Entity::has_many(personal_post_comment::Entity).into(),
            Relation::Recommendation => Entity::has_many(personal_post_recommendation::Entity).into(),
        }
    }
}

impl Related<personal_post_tag::Entity> for Entity {
    fn to() -> RelationDef { Relation::Tag.def() }
}

impl Related<personal_post_comment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Comment.def() }
}

impl Related<personal_post_recommendation::Entity> for Entity {
    fn to() -> RelationDef { Relation::Recommendation.def() }
}

impl ActiveModelBehavior for ActiveModel {}
