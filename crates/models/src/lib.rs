pub mod errors;
pub mod db;
pub mod command;
pub mod service;
pub mod on_demand_macro;

#[cfg(test)]
mod tests;
