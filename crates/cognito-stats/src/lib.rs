//! Summary statistics for training and evaluation reports.
//!
//! - [`descriptive`]: min, max, mean, median and population standard deviation
//! - [`ranking`]: values at a rank taken from the top of a descending ranking
//!
//! # Examples
//!
//! ```
//! use cognito_stats::{descriptive::DescriptiveStats, ranking::top_fraction};
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(stats.mean, 2.5);
//! assert_eq!(stats.median, 2.5);
//!
//! let scores = [40.0, 30.0, 20.0, 10.0];
//! assert_eq!(top_fraction(&scores, 0.1), Some(40.0));
//! ```

pub mod descriptive;
pub mod ranking;
