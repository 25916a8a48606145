//! Model evaluation: ordering, aggregation methods and the engine.

mod engine;
mod methods;
mod order;

#[cfg(feature = "parallel")]
pub use engine::evaluate_parallel;
pub use engine::{
    evaluate, evaluate_as_distribution, evaluate_as_set, evaluate_in_place, EvalError,
    EvalOptions,
};
pub use methods::{EvalMethod, EvalParameters, Normalization, Operator};
pub use order::evaluation_order;
