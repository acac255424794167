use async_trait::async_trait;
use clichat_core::{CustomerProfile, OrderItem, OrderRecord};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("order directory unavailable: {0}")]
    Unavailable(String),
}

/// Read-only order data keyed by exact string match.
#[async_trait]
pub trait OrderDirectory: Send + Sync {
    async fn orders_by_email(&self, email: &str) -> Result<Vec<OrderRecord>, LookupError>;
    async fn orders_by_phone(&self, phone: &str) -> Result<Vec<OrderRecord>, LookupError>;
    async fn order_by_number(&self, order_number: &str)
        -> Result<Option<OrderRecord>, LookupError>;
    async fn is_returnable(&self, order_number: &str) -> Result<bool, LookupError>;
}

/// In-memory directory for a single known customer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureOrderDirectory {
    customer: CustomerProfile,
    orders: Vec<OrderRecord>,
    returnable: Vec<String>,
}

impl FixtureOrderDirectory {
    pub fn new(customer: CustomerProfile, orders: Vec<OrderRecord>, returnable: Vec<String>) -> Self {
        Self { customer, orders, returnable }
    }

    /// The demo customer and their two orders; only `123456` can be returned.
    pub fn demo() -> Self {
        Self::new(
            CustomerProfile {
                first_name: "James".to_string(),
                last_name: "Pozdena".to_string(),
                email: "jpozdena@gmail.com".to_string(),
                phone: "5033480170".to_string(),
            },
            vec![
                order("123456", "2021-01-01", &[("Brown Pants", 1), ("Purple shirt", 1)]),
                order("654321", "2023-04-10", &[("Green underwear", 1), ("Red socks", 1)]),
            ],
            vec!["123456".to_string()],
        )
    }
}

fn order(order_number: &str, order_date: &str, items: &[(&str, u32)]) -> OrderRecord {
    OrderRecord {
        order_number: order_number.to_string(),
        items: items
            .iter()
            .map(|(product_desc, quantity)| OrderItem {
                product_desc: (*product_desc).to_string(),
                quantity: *quantity,
            })
            .collect(),
        order_date: order_date.to_string(),
    }
}

#[async_trait]
impl OrderDirectory for FixtureOrderDirectory {
    async fn orders_by_email(&self, email: &str) -> Result<Vec<OrderRecord>, LookupError> {
        if email == self.customer.email {
            return Ok(self.orders.clone());
        }
        Ok(Vec::new())
    }

    async fn orders_by_phone(&self, phone: &str) -> Result<Vec<OrderRecord>, LookupError> {
        if phone == self.customer.phone {
            return Ok(self.orders.clone());
        }
        Ok(Vec::new())
    }

    async fn order_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<OrderRecord>, LookupError> {
        Ok(self.orders.iter().find(|order| order.order_number == order_number).cloned())
    }

    async fn is_returnable(&self, order_number: &str) -> Result<bool, LookupError> {
        Ok(self.returnable.iter().any(|candidate| candidate == order_number))
    }
}

#[cfg(test)]
mod tests {
    use super::{FixtureOrderDirectory, OrderDirectory};

    #[tokio::test]
    async fn email_and_phone_match_exactly() {
        let directory = FixtureOrderDirectory::demo();

        assert_eq!(directory.orders_by_email("jpozdena@gmail.com").await.map(|o| o.len()), Ok(2));
        assert_eq!(directory.orders_by_email("JPOZDENA@gmail.com").await.map(|o| o.len()), Ok(0));
        assert_eq!(directory.orders_by_phone("5033480170").await.map(|o| o.len()), Ok(2));
        assert_eq!(directory.orders_by_phone("503-348-0170").await.map(|o| o.len()), Ok(0));
    }

    #[tokio::test]
    async fn order_number_lookup_returns_single_record() {
        let directory = FixtureOrderDirectory::demo();

        let found = directory.order_by_number("654321").await.expect("lookup");
        let record = found.expect("order 654321 exists");
        assert_eq!(record.order_date, "2023-04-10");
        assert_eq!(record.items.len(), 2);
        assert_eq!(directory.order_by_number("000000").await, Ok(None));
    }

    #[tokio::test]
    async fn only_listed_orders_are_returnable() {
        let directory = FixtureOrderDirectory::demo();

        assert_eq!(directory.is_returnable("123456").await, Ok(true));
        assert_eq!(directory.is_returnable("654321").await, Ok(false));
    }
}
