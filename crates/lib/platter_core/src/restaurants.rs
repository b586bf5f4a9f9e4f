//! Restaurant reference data: queries and row normalization.
//!
//! The `restaurants` table is populated by an external pipeline and is
//! read-only here. Rows carry a JSON-encoded `menus` text column whose item
//! prices may be stored as strings or numbers; normalization coerces them to
//! integers.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

/// Errors from restaurant lookup and normalization.
#[derive(Debug, Error)]
pub enum RestaurantError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("malformed menu JSON for restaurant {id}: {source}")]
    Menu {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw row as stored in the `restaurants` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RestaurantRow {
    pub id: i64,
    pub name: String,
    pub main_category: String,
    pub sub_category: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub url: String,
    pub thumbnail: Option<String>,
    pub menus: Option<String>,
}

/// One menu line item. The stored price may be a JSON number or a numeric
/// string; it always deserializes to an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(deserialize_with = "price_as_int")]
    pub price: i64,
}

/// Normalized restaurant record, serialized in the API's wire shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub main_category: String,
    pub sub_category: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub url: String,
    pub thumbnail: Option<String>,
    pub menu: Vec<MenuItem>,
}

impl TryFrom<RestaurantRow> for Restaurant {
    type Error = RestaurantError;

    fn try_from(row: RestaurantRow) -> Result<Self, Self::Error> {
        let menu = decode_menu(row.menus.as_deref())
            .map_err(|source| RestaurantError::Menu { id: row.id, source })?;
        Ok(Restaurant {
            id: row.id,
            name: row.name,
            main_category: row.main_category,
            sub_category: row.sub_category,
            latitude: row.latitude,
            longitude: row.longitude,
            url: row.url,
            thumbnail: row.thumbnail,
            menu,
        })
    }
}

/// Decode the JSON-encoded menu column. An absent or empty column means an
/// empty menu, not an error.
pub fn decode_menu(raw: Option<&str>) -> Result<Vec<MenuItem>, serde_json::Error> {
    match raw {
        None => Ok(Vec::new()),
        Some(s) if s.trim().is_empty() => Ok(Vec::new()),
        Some(s) => serde_json::from_str(s),
    }
}

/// Fetch and normalize restaurants for a list of identifiers.
///
/// Returns the rows in the order of `ids`; identifiers with no matching row
/// are silently skipped. An empty `ids` list skips the query entirely.
pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Restaurant>, RestaurantError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, RestaurantRow>(
        r#"
        SELECT id, name, main_category, sub_category,
               latitude, longitude, url, thumbnail, menus
        FROM restaurants
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    // ANY($1) does not preserve the requested order; restore it so the
    // recommender's ranking survives into the response.
    let mut restaurants = rows
        .into_iter()
        .map(Restaurant::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    restaurants.sort_by_key(|r| ids.iter().position(|&id| id == r.id).unwrap_or(usize::MAX));

    Ok(restaurants)
}

fn price_as_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| de::Error::custom(format!("price is not an integer: {n}"))),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("price is not numeric: {s:?}"))),
        other => Err(de::Error::custom(format!(
            "price must be a number or numeric string, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(menus: Option<&str>) -> RestaurantRow {
        RestaurantRow {
            id: 10,
            name: "Sunrise Diner".into(),
            main_category: "Korean".into(),
            sub_category: "Stew".into(),
            latitude: None,
            longitude: None,
            url: "https://example.com/place/10".into(),
            thumbnail: None,
            menus: menus.map(str::to_string),
        }
    }

    #[test]
    fn menu_decodes_string_prices_to_integers() {
        let menu = decode_menu(Some(r#"[{"name":"Kimchi stew","price":"8000"}]"#)).unwrap();
        assert_eq!(
            vec![MenuItem {
                name: "Kimchi stew".into(),
                price: 8000
            }],
            menu
        );
    }

    #[test]
    fn menu_accepts_numeric_prices() {
        let menu = decode_menu(Some(r#"[{"name":"Bibimbap","price":9500}]"#)).unwrap();
        assert_eq!(9500, menu[0].price);
    }

    #[test]
    fn menu_preserves_item_order() {
        let menu = decode_menu(Some(
            r#"[{"name":"A","price":1},{"name":"B","price":"2"},{"name":"C","price":3}]"#,
        ))
        .unwrap();
        let names: Vec<_> = menu.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(vec!["A", "B", "C"], names);
    }

    #[test]
    fn absent_or_empty_menu_is_empty_not_error() {
        assert!(decode_menu(None).unwrap().is_empty());
        assert!(decode_menu(Some("")).unwrap().is_empty());
        assert!(decode_menu(Some("   ")).unwrap().is_empty());
    }

    #[test]
    fn malformed_menu_json_is_an_error() {
        assert!(decode_menu(Some("not json")).is_err());
        assert!(decode_menu(Some(r#"[{"name":"X","price":"cheap"}]"#)).is_err());
    }

    #[test]
    fn row_with_null_geo_normalizes_to_absent() {
        let restaurant = Restaurant::try_from(row(None)).unwrap();
        assert!(restaurant.latitude.is_none());
        assert!(restaurant.longitude.is_none());
        assert!(restaurant.menu.is_empty());
    }

    #[test]
    fn restaurant_serializes_in_wire_shape() {
        let restaurant =
            Restaurant::try_from(row(Some(r#"[{"name":"Kimchi stew","price":"8000"}]"#))).unwrap();
        let json = serde_json::to_value(&restaurant).unwrap();
        assert_eq!(json["mainCategory"], "Korean");
        assert_eq!(json["subCategory"], "Stew");
        assert!(json["latitude"].is_null());
        assert_eq!(json["menu"][0]["price"], 8000);
    }
}
