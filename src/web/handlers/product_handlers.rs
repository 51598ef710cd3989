use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::product::{Product, PRODUCT_COLUMNS};
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct CreateProductPayload {
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i32,
  pub image_url: Option<String>,
  pub category: Option<String>,
  pub stock_quantity: i32,
  pub unit: Option<String>,
  pub supplier_id: Uuid,
}

impl CreateProductPayload {
  fn validate(&self) -> Result<(), AppError> {
    if self.name.trim().is_empty() {
      return Err(AppError::Validation("Product name must not be empty.".to_string()));
    }
    if self.price_cents < 0 {
      return Err(AppError::Validation("Product price must not be negative.".to_string()));
    }
    if self.stock_quantity < 0 {
      return Err(AppError::Validation("Stock quantity must not be negative.".to_string()));
    }
    Ok(())
  }
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateProductPayload {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price_cents: Option<i32>,
  pub image_url: Option<String>,
  pub category: Option<String>,
  pub stock_quantity: Option<i32>,
  pub unit: Option<String>,
}

impl UpdateProductPayload {
  fn validate(&self) -> Result<(), AppError> {
    if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
      return Err(AppError::Validation("Product name must not be empty.".to_string()));
    }
    if self.price_cents.is_some_and(|price| price < 0) {
      return Err(AppError::Validation("Product price must not be negative.".to_string()));
    }
    if self.stock_quantity.is_some_and(|stock| stock < 0) {
      return Err(AppError::Validation("Stock quantity must not be negative.".to_string()));
    }
    Ok(())
  }
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products: Vec<Product> = sqlx::query_as(&format!(
    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
  ))
  .fetch_all(&app_state.db_pool)
  .await?;

  info!("Fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::list_products_by_supplier", skip(app_state, path), fields(supplier_id = %path.as_ref()))]
pub async fn list_products_by_supplier_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let supplier_id = path.into_inner();

  let products: Vec<Product> = sqlx::query_as(&format!(
    "SELECT {PRODUCT_COLUMNS} FROM products WHERE supplier_id = $1 ORDER BY created_at DESC"
  ))
  .bind(supplier_id)
  .fetch_all(&app_state.db_pool)
  .await?;

  info!("Fetched {} products for supplier {}.", products.len(), supplier_id);
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let product_opt: Option<Product> = sqlx::query_as(&format!(
    "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
  ))
  .bind(product_id)
  .fetch_optional(&app_state.db_pool)
  .await?;

  match product_opt {
    Some(product) => Ok(HttpResponse::Ok().json(product)),
    None => {
      warn!("Product with ID {} not found.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}

#[instrument(name = "handler::create_product", skip(app_state, payload), fields(supplier_id = %payload.supplier_id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateProductPayload>,
) -> Result<HttpResponse, AppError> {
  payload.validate()?;

  let product: Product = sqlx::query_as(&format!(
    "INSERT INTO products (name, description, price_cents, image_url, category, stock_quantity, unit, supplier_id) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
     RETURNING {PRODUCT_COLUMNS}"
  ))
  .bind(payload.name.trim())
  .bind(payload.description.as_deref())
  .bind(payload.price_cents)
  .bind(payload.image_url.as_deref())
  .bind(payload.category.as_deref())
  .bind(payload.stock_quantity)
  .bind(payload.unit.as_deref())
  .bind(payload.supplier_id)
  .fetch_one(&app_state.db_pool)
  .await?;

  info!("Created product {} for supplier {}.", product.id, product.supplier_id);
  Ok(HttpResponse::Created().json(product))
}

// Partial update: absent fields keep their current value. A field cannot be
// cleared back to NULL through this endpoint.
#[instrument(name = "handler::update_product", skip(app_state, path, payload), fields(product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateProductPayload>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  payload.validate()?;

  let product_opt: Option<Product> = sqlx::query_as(&format!(
    "UPDATE products SET \
       name = COALESCE($2, name), \
       description = COALESCE($3, description), \
       price_cents = COALESCE($4, price_cents), \
       image_url = COALESCE($5, image_url), \
       category = COALESCE($6, category), \
       stock_quantity = COALESCE($7, stock_quantity), \
       unit = COALESCE($8, unit), \
       updated_at = NOW() \
     WHERE id = $1 \
     RETURNING {PRODUCT_COLUMNS}"
  ))
  .bind(product_id)
  .bind(payload.name.as_deref().map(str::trim))
  .bind(payload.description.as_deref())
  .bind(payload.price_cents)
  .bind(payload.image_url.as_deref())
  .bind(payload.category.as_deref())
  .bind(payload.stock_quantity)
  .bind(payload.unit.as_deref())
  .fetch_optional(&app_state.db_pool)
  .await?;

  match product_opt {
    Some(product) => {
      info!("Updated product {}.", product.id);
      Ok(HttpResponse::Ok().json(product))
    }
    None => {
      warn!("Cannot update product {}: not found.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}

#[instrument(name = "handler::delete_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let deleted_opt: Option<Product> = sqlx::query_as(&format!(
    "DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
  ))
  .bind(product_id)
  .fetch_optional(&app_state.db_pool)
  .await?;

  match deleted_opt {
    Some(product) => {
      info!("Deleted product {}.", product.id);
      Ok(HttpResponse::Ok().json(product))
    }
    None => {
      warn!("Cannot delete product {}: not found.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn create_payload() -> CreateProductPayload {
    CreateProductPayload {
      name: "Organic Carrots".to_string(),
      description: None,
      price_cents: 350,
      image_url: None,
      category: Some("vegetables".to_string()),
      stock_quantity: 40,
      unit: Some("kg".to_string()),
      supplier_id: Uuid::new_v4(),
    }
  }

  #[test]
  fn create_payload_rejects_blank_name() {
    let payload = CreateProductPayload {
      name: "   ".to_string(),
      ..create_payload()
    };
    assert!(matches!(payload.validate(), Err(AppError::Validation(_))));
  }

  #[test]
  fn create_payload_rejects_negative_price_and_stock() {
    let negative_price = CreateProductPayload {
      price_cents: -1,
      ..create_payload()
    };
    assert!(negative_price.validate().is_err());

    let negative_stock = CreateProductPayload {
      stock_quantity: -5,
      ..create_payload()
    };
    assert!(negative_stock.validate().is_err());
  }

  #[test]
  fn update_payload_allows_absent_fields() {
    assert!(UpdateProductPayload::default().validate().is_ok());
  }

  #[test]
  fn update_payload_rejects_blank_name_when_present() {
    let payload = UpdateProductPayload {
      name: Some(String::new()),
      ..Default::default()
    };
    assert!(payload.validate().is_err());
  }
}
