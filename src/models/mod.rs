// API request/response models

use serde::{Deserialize, Serialize};

use crate::entity::items;

/// Longest accepted item name, in characters
pub const MAX_NAME_LENGTH: usize = 255;

fn default_skip() -> u64 {
    0
}

fn default_limit() -> u64 {
    100
}

fn default_is_active() -> bool {
    true
}

/// Pagination parameters for GET /items
#[derive(Debug, Deserialize, Default)]
pub struct PaginationQuery {
    #[serde(default = "default_skip")]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Request body for POST /items
#[derive(Debug, Clone, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

impl ItemCreate {
    /// Validates field constraints, returning a message on the first violation
    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)?;
        validate_price(self.price)
    }
}

/// Request body for PUT /items/{id}
///
/// Every field is optional; only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}

impl ItemUpdate {
    /// Validates the fields that are present
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name must not be empty".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        ));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), String> {
    if !price.is_finite() || price <= 0.0 {
        return Err("price must be a positive number".to_string());
    }
    Ok(())
}

/// Item representation returned by the API
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<items::Model> for ItemResponse {
    fn from(model: items::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ItemCreate {
        ItemCreate {
            name: "widget".to_string(),
            description: None,
            price: 9.99,
            is_active: true,
        }
    }

    #[test]
    fn accepts_valid_payload() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        let mut item = payload();
        item.name = String::new();
        assert!(item.validate().is_err());
    }

    #[test]
    fn rejects_overlong_name() {
        let mut item = payload();
        item.name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(item.validate().is_err());

        item.name = "x".repeat(MAX_NAME_LENGTH);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_price() {
        let mut item = payload();
        item.price = 0.0;
        assert!(item.validate().is_err());

        item.price = -1.5;
        assert!(item.validate().is_err());

        item.price = f64::NAN;
        assert!(item.validate().is_err());
    }

    #[test]
    fn update_validates_only_present_fields() {
        let update = ItemUpdate::default();
        assert!(update.validate().is_ok());

        let update = ItemUpdate {
            price: Some(-2.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn is_active_defaults_to_true() {
        let item: ItemCreate =
            serde_json::from_str(r#"{"name": "widget", "price": 1.0}"#).expect("valid payload");
        assert!(item.is_active);
    }
}
