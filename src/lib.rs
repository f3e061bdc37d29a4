//! A dynamic chained linear hashing table — an associative container that
//! grows and shrinks one bucket at a time instead of rehashing the whole
//! map, keeping the average chain length bounded by a load-factor band.
//!
//! This implements linear hashing as described by Witold Litwin: keys are
//! addressed with a family of hash functions `h_i(k) = H(k) mod (M0 * 2^i)`,
//! and exactly one logical bucket is split (or merged) per triggering
//! `insert`/`remove`, instead of the "stop the world and rehash everything"
//! approach of a conventional growable hash map.
//!
//! # Example
//!
//! ```rust
//! use linearhash::Table;
//!
//! let mut table: Table<String, u32> = Table::new();
//! table.insert("a".to_string(), 1).unwrap();
//! table.insert("b".to_string(), 2).unwrap();
//!
//! assert_eq!(table.get(&"a".to_string()), Ok(&1));
//! assert!(table.contains(&"b".to_string()));
//! assert_eq!(table.size(), 2);
//! ```
//!
//! The shape of the table (initial bucket count, load-factor band, hash
//! function) is configurable through [`Builder`]:
//!
//! ```rust
//! use linearhash::Builder;
//!
//! let table = Builder::default()
//!     .with_initial_buckets(8)
//!     .with_max_fill_factor(0.8)
//!     .with_lower_bound(0.3)
//!     .build::<String, u32>();
//! assert_eq!(table.bucket_count(), 8);
//! ```
//!
//! This crate also ships the embedder this table was built to serve: a
//! token-to-session HTTP facade (see [`session`] and [`http`]), and the CSV
//! ingestion this table was exercised against (see [`csv`]).

//   Copyright 2021 Dominic Dwyer (dom@itsallbroken.com)
//
//   Licensed under the Apache License, Version 2.0 (the "License");
//   you may not use this file except in compliance with the License.
//   You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
//   Unless required by applicable law or agreed to in writing, software
//   distributed under the License is distributed on an "AS IS" BASIS,
//   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//   See the License for the specific language governing permissions and
//   limitations under the License.

#![deny(rust_2018_idioms, missing_debug_implementations, unreachable_pub)]
#![warn(clippy::todo, clippy::dbg_macro)]

mod node;

mod error;
pub use error::{Error, Result};

mod builder;
pub use builder::Builder;

mod iter;
pub use iter::BucketIter;

mod table;
pub use table::Table;

pub mod csv;
pub mod session;

#[cfg(feature = "http")]
pub mod http;
