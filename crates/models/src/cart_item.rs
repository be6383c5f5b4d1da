use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub cart_kind: String,
    pub service_id: Option<Uuid>,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

/// Which cart a line lives in; also classifies catalog services.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartKind {
    Shop,
    Food,
}

impl CartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CartKind::Shop => "shop",
            CartKind::Food => "food",
        }
    }
}

impl fmt::Display for CartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for CartKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shop" | "shopping" => Ok(CartKind::Shop),
            "food" => Ok(CartKind::Food),
            other => Err(ModelError::Validation(format!("unknown cart kind '{other}'"))),
        }
    }
}

pub fn validate_quantity(q: i32) -> Result<i32, ModelError> {
    if !(1..=999).contains(&q) {
        return Err(ModelError::Validation("quantity must be between 1 and 999".into()));
    }
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parsing() {
        assert_eq!("Food".parse::<CartKind>().unwrap(), CartKind::Food);
        assert_eq!("shopping".parse::<CartKind>().unwrap(), CartKind::Shop);
        assert!("rides".parse::<CartKind>().is_err());
        assert_eq!(CartKind::Shop.to_string(), "shop");
    }

    #[test]
    fn quantity_bounds() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1000).is_err());
    }
}
