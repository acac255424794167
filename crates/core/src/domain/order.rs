use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_desc: String,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub order_date: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Payload of an action-result turn. Field order is part of the wire form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub results_for: String,
    pub lookup_by: String,
    pub orders: Vec<OrderRecord>,
}

impl LookupResult {
    pub fn new(
        results_for: impl Into<String>,
        lookup_by: impl Into<String>,
        orders: Vec<OrderRecord>,
    ) -> Self {
        Self { results_for: results_for.into(), lookup_by: lookup_by.into(), orders }
    }

    /// Two-space indented JSON, the text carried by the result turn.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{LookupResult, OrderItem, OrderRecord};

    #[test]
    fn lookup_result_serializes_with_stable_field_order() {
        let result = LookupResult::new(
            "lookup_order_by_order_number",
            "654321",
            vec![OrderRecord {
                order_number: "654321".to_string(),
                items: vec![OrderItem { product_desc: "Red socks".to_string(), quantity: 1 }],
                order_date: "2023-04-10".to_string(),
            }],
        );

        let json = result.to_pretty_json().expect("serialize");
        let expected = r#"{
  "results_for": "lookup_order_by_order_number",
  "lookup_by": "654321",
  "orders": [
    {
      "order_number": "654321",
      "items": [
        {
          "product_desc": "Red socks",
          "quantity": 1
        }
      ],
      "order_date": "2023-04-10"
    }
  ]
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn empty_lookup_keeps_orders_array() {
        let json = LookupResult::new("lookup_orders_by_email", "000000", Vec::new())
            .to_pretty_json()
            .expect("serialize");
        assert!(json.contains("\"orders\": []"));
    }
}
