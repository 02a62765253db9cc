pub mod audio;
pub mod fetch;
pub mod identity;
pub mod observability;
pub mod payments;
pub mod persistence;
