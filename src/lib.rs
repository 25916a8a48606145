//! Evaluation engine for hierarchical qualitative multi-criteria decision
//! models built with the DEX method.
//!
//! A model is a tree of attributes: basic attributes take input values,
//! aggregate attributes combine their children through decision tables or
//! discretizations, and linked attributes mirror an equal-named attribute
//! elsewhere in the tree. Alternatives assign values to basic attributes
//! and are evaluated bottom-up:
//!
//! - **scale**: discrete and continuous value scales, interpretation and
//!   parsing of raw values.
//! - **value**: the value union (indices, sets, distributions, unknown) and
//!   its canonical reduction.
//! - **function**: decision tables and continuous-input discretizations.
//! - **model**: the attribute arena, alternatives and validation.
//! - **eval**: evaluation order and the engine, under crisp set,
//!   probabilistic and two fuzzy aggregation semantics.
//! - **display**: textual rendering of values, alternatives and models.
//! - **loader**: decoding models from a JSON description.
//!
//! # Example
//!
//! ```
//! use dexeval::eval::{evaluate, EvalMethod, EvalOptions};
//! use dexeval::loader::from_json;
//!
//! let model = from_json(r#"{
//!     "name": "COMFORT",
//!     "alternatives": ["Small", "Roomy"],
//!     "attributes": [{
//!         "name": "COMFORT",
//!         "scale": {"values": [{"name": "low"}, {"name": "high"}]},
//!         "function": {"low": "0001"},
//!         "attributes": [
//!             {"name": "SPACE",
//!              "scale": {"values": [{"name": "small"}, {"name": "big"}]},
//!              "values": ["small", "big"]},
//!             {"name": "SEATS",
//!              "scale": {"values": [{"name": "few"}, {"name": "many"}]},
//!              "values": ["many", "many"]}
//!         ]
//!     }]
//! }"#).unwrap();
//!
//! let out = evaluate(&model, &model.alternatives, &EvalOptions::new(EvalMethod::Set)).unwrap();
//! assert_eq!(out[0].get("COMFORT"), dexeval::value::Value::Index(0));
//! assert_eq!(out[1].get("COMFORT"), dexeval::value::Value::Index(1));
//! ```

pub mod display;
pub mod eval;
pub mod function;
pub mod loader;
pub mod model;
pub mod scale;
pub mod value;

#[cfg(test)]
pub(crate) mod testdata;
