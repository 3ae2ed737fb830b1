pub mod system;
pub mod tariff;
pub mod weather;
