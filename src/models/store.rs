use serde::{Deserialize, Serialize};

/// A place to shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_home_url: Option<String>,
}

impl Store {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            store_home_url: None,
        }
    }
}

/// A delivery service that can search for a store by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryService {
    pub name: &'static str,
    /// Search URL with a `{STORE}` placeholder.
    pub store_url: &'static str,
}

impl DeliveryService {
    /// Search link for a store, with the name URL-encoded.
    pub fn store_search_url(&self, store_name: &str) -> String {
        self.store_url
            .replace("{STORE}", &urlencoding::encode(store_name.trim()))
    }
}

pub const DELIVERY_SERVICES: [DeliveryService; 2] = [
    DeliveryService {
        name: "Instacart",
        store_url: "https://www.instacart.com/store/search?q={STORE}",
    },
    DeliveryService {
        name: "DoorDash",
        store_url: "https://www.doordash.com/search/store/{STORE}",
    },
];

/// Built-in stores offered to every user.
pub fn global_stores() -> Vec<Store> {
    [
        ("aldi", "Aldi", "https://www.aldi.us/"),
        ("walmart", "Walmart", "https://www.walmart.com/"),
        ("amazon", "Amazon", "https://www.amazon.com/"),
    ]
    .into_iter()
    .map(|(id, name, url)| Store {
        id: id.to_string(),
        name: name.to_string(),
        store_home_url: Some(url.to_string()),
    })
    .collect()
}
