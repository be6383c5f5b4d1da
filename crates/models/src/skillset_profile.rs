use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "skillset_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub full_name: String,
    pub headline: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    /// JSON array of strings
    pub skills: Json,
    /// JSON array of strings
    pub portfolio_urls: Json,
    pub hourly_rate_cents: Option<i64>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub review_count: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn skill_list(&self) -> Vec<String> { string_array(&self.skills) }
    pub fn portfolio_list(&self) -> Vec<String> { string_array(&self.portfolio_urls) }
}

/// Read a JSON string array, skipping anything that is not a string.
pub fn string_array(v: &Json) -> Vec<String> {
    v.as_array()
        .map(|arr| arr.iter().filter_map(|x| x.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::string_array;

    #[test]
    fn string_array_ignores_non_strings() {
        let v = serde_json::json!(["plumbing", 3, null, "tiling"]);
        assert_eq!(string_array(&v), vec!["plumbing".to_string(), "tiling".to_string()]);
        assert!(string_array(&serde_json::json!({"a": 1})).is_empty());
    }
}
