pub mod aid;
pub mod claim;
