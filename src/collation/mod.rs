//! View collation for docview
//!
//! Defines the single total order used for every key comparison in the
//! query pipeline: sorting view rows, locating range boundaries, and
//! detecting group boundaries during reduction.
//!
//! # Ordering
//!
//! 1. `null < false < true < number < string < array < object`
//! 2. Numbers compare numerically
//! 3. Strings compare by Unicode code point
//! 4. Arrays compare element-wise; a prefix sorts first
//! 5. Objects compare by key-sorted entries, key then value; a prefix sorts first

mod collator;

pub use collator::{collate, number_value, JsonCollator};
