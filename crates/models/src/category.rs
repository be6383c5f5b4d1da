use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::has_many(crate::service::Entity).into(),
        }
    }
}

impl Related<crate::service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Slugs are lowercase ASCII words joined by `-`.
pub fn validate_slug(slug: &str) -> Result<String, errors::ModelError> {
    let s = slug.trim().to_ascii_lowercase();
    let ok = !s.is_empty()
        && !s.starts_with('-')
        && !s.ends_with('-')
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !ok {
        return Err(errors::ModelError::Validation("slug must be lowercase letters, digits and '-'".into()));
    }
    Ok(s)
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    slug: &str,
    icon: Option<&str>,
    sort_order: i32,
) -> Result<Model, errors::ModelError> {
    let name = validate::required_text("name", Some(name))?;
    validate::max_len("name", &name, 128)?;
    let slug = validate_slug(slug)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug),
        icon: Set(validate::optional_text(icon)),
        sort_order: Set(sort_order),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
