pub mod inventory;
pub mod location;
pub mod product;
pub mod response;
pub mod supplier;
