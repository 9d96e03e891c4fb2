pub mod actor;

pub use actor::{AccessRight, AccessRule, Actor};
