use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::grocery::constants::{DEFAULT_QTY, DEFAULT_UNIT};

/// Generate a fresh, stable identifier for a new record.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Coerce a loosely-typed quantity into a positive, finite number.
///
/// Numbers, numeric strings and anything else all end up here; whatever
/// cannot be read as a quantity greater than zero becomes 1.
pub fn coerce_qty(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(q) if q.is_finite() && q > 0.0 => q,
        _ => DEFAULT_QTY,
    }
}

/// Same as [`coerce_qty`] for an already-numeric value.
pub fn sanitize_qty(qty: f64) -> f64 {
    if qty.is_finite() && qty > 0.0 {
        qty
    } else {
        DEFAULT_QTY
    }
}

fn coerce_id(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn clean(text: Option<String>) -> String {
    text.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn clean_unit(text: Option<String>) -> String {
    let unit = clean(text);
    if unit.is_empty() {
        DEFAULT_UNIT.to_string()
    } else {
        unit
    }
}

/// An ingredient record exactly as it appears in stored or imported JSON.
///
/// Every field is optional; hand-edited files routinely miss some of them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIngredient {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub qty: Option<Value>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub is_default: Option<bool>,
}

/// A fully validated ingredient belonging to a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawIngredient")]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub qty: f64,
    pub unit: String,
    pub store: String,
    /// Substitute group name; empty when the ingredient is not substitutable.
    pub group: String,
    pub is_default: bool,
}

impl Ingredient {
    /// Create a new ungrouped ingredient with a fresh id.
    pub fn new(name: &str, qty: f64, unit: &str, store: &str) -> Self {
        Self {
            id: new_id(),
            name: name.trim().to_string(),
            qty: sanitize_qty(qty),
            unit: clean_unit(Some(unit.to_string())),
            store: store.trim().to_string(),
            group: String::new(),
            is_default: false,
        }
    }

    /// Builder-style helper to place the ingredient in a substitute group.
    pub fn in_group(mut self, group: &str, is_default: bool) -> Self {
        self.group = group.trim().to_string();
        self.is_default = is_default && !self.group.is_empty();
        self
    }

    /// Validate a raw record.
    ///
    /// Returns `None` for records without a usable id; those are treated as
    /// corrupt and dropped by callers.
    pub fn from_raw(raw: RawIngredient) -> Option<Self> {
        let id = coerce_id(raw.id.as_ref())?;
        let group = clean(raw.group);
        Some(Self {
            id,
            name: clean(raw.name),
            qty: coerce_qty(raw.qty.as_ref()),
            unit: clean_unit(raw.unit),
            store: clean(raw.store),
            is_default: raw.is_default.unwrap_or(false) && !group.is_empty(),
            group,
        })
    }

    /// Whether the ingredient belongs to a substitute group.
    #[inline]
    pub fn is_grouped(&self) -> bool {
        !self.group.is_empty()
    }
}

impl TryFrom<RawIngredient> for Ingredient {
    type Error = String;

    fn try_from(raw: RawIngredient) -> Result<Self, Self::Error> {
        Ingredient::from_raw(raw).ok_or_else(|| "ingredient is missing an id".to_string())
    }
}

/// A manually entered shopping-list item not derived from any meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawIngredient")]
pub struct ExtraItem {
    pub id: String,
    pub name: String,
    pub qty: f64,
    pub unit: String,
    pub store: String,
}

impl ExtraItem {
    pub fn new(name: &str, qty: f64, unit: &str, store: &str) -> Self {
        Self {
            id: new_id(),
            name: name.trim().to_string(),
            qty: sanitize_qty(qty),
            unit: clean_unit(Some(unit.to_string())),
            store: store.trim().to_string(),
        }
    }
}

impl From<RawIngredient> for ExtraItem {
    /// Older files stored extras without ids; they get a fresh one.
    fn from(raw: RawIngredient) -> Self {
        Self {
            id: coerce_id(raw.id.as_ref()).unwrap_or_else(new_id),
            name: clean(raw.name),
            qty: coerce_qty(raw.qty.as_ref()),
            unit: clean_unit(raw.unit),
            store: clean(raw.store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw_fills_defaults() {
        let raw: RawIngredient = serde_json::from_value(json!({
            "id": "a1",
            "name": "  Onion ",
        }))
        .unwrap();

        let ing = Ingredient::from_raw(raw).unwrap();
        assert_eq!(ing.name, "Onion");
        assert_eq!(ing.qty, 1.0);
        assert_eq!(ing.unit, "CT");
        assert_eq!(ing.group, "");
        assert!(!ing.is_default);
    }

    #[test]
    fn test_from_raw_drops_missing_id() {
        let raw: RawIngredient = serde_json::from_value(json!({"name": "Salt"})).unwrap();
        assert!(Ingredient::from_raw(raw).is_none());

        let blank: RawIngredient =
            serde_json::from_value(json!({"id": "  ", "name": "Salt"})).unwrap();
        assert!(Ingredient::from_raw(blank).is_none());
    }

    #[test]
    fn test_qty_coercion() {
        assert_eq!(coerce_qty(Some(&json!(2.5))), 2.5);
        assert_eq!(coerce_qty(Some(&json!("3"))), 3.0);
        assert_eq!(coerce_qty(Some(&json!("lots"))), 1.0);
        assert_eq!(coerce_qty(Some(&json!(0))), 1.0);
        assert_eq!(coerce_qty(Some(&json!(-4))), 1.0);
        assert_eq!(coerce_qty(Some(&json!(null))), 1.0);
        assert_eq!(coerce_qty(None), 1.0);
        assert_eq!(sanitize_qty(f64::NAN), 1.0);
    }

    #[test]
    fn test_default_flag_requires_group() {
        let raw: RawIngredient =
            serde_json::from_value(json!({"id": "x", "name": "Rice", "isDefault": true})).unwrap();
        let ing = Ingredient::from_raw(raw).unwrap();
        assert!(!ing.is_default);
    }

    #[test]
    fn test_extra_without_id_gets_one() {
        let extra: ExtraItem =
            serde_json::from_value(json!({"name": "Paper Towels", "qty": "2"})).unwrap();
        assert!(!extra.id.is_empty());
        assert_eq!(extra.qty, 2.0);
        assert_eq!(extra.unit, "CT");
    }
}
