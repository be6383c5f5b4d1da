//! Service layer providing the Bucks resource operations on top of `models`.
//! - One module per resource; each operation is a validated call into the store.
//! - View models in `views` carry the camelCase field renaming used on the wire.
//! - Object storage and the LLM sit behind traits so tests can swap them.

pub mod errors;
pub mod views;
pub mod catalog;
pub mod posts;
pub mod profiles;
pub mod skillsets;
pub mod vehicles;
pub mod carts;
pub mod search;
pub mod storage;
pub mod uploads;
pub mod ai;
#[cfg(test)]
pub mod test_support;
