pub mod address;
pub mod delivery;
pub mod order;
pub mod package;
pub mod task;
