pub mod weather;
pub mod weatherapi;
