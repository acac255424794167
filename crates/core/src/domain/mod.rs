pub mod order;
pub mod turn;
