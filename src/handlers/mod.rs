pub mod system;
pub mod users;
pub mod weather;
