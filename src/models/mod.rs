pub mod logistics;
pub mod material;
pub mod order;
pub mod project;
pub mod report;
