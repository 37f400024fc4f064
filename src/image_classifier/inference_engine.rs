pub mod engine;
pub mod impl_fake;
pub mod impl_tract;
pub mod interface;
