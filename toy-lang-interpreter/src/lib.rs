pub mod environment;
pub mod evaluator;
pub mod object;

pub use environment::Environment;
pub use evaluator::{Interpreter, OutputSink};
pub use object::{Completion, EvaluationError, Object};
