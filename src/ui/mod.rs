pub mod account;
pub mod analysis;
pub mod panels;
pub mod plot;
pub mod table;
pub mod trend;
