mod builtins;
mod evaluator;
mod registry;
mod roller;
mod value;

pub use evaluator::{DefaultRoller, Evaluator};
pub use registry::{Arity, Function, Registry};
pub use roller::Roller;
pub use value::Value;
