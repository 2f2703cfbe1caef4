use std::rc::Rc;

use toy_lang_interpreter::object::Object;
use toy_lang_interpreter::Interpreter;

use crate::runner::{self, RunError, Stdout};

pub trait Evaluator {
    type Object;

    fn evaluate(&mut self, line: &str) -> Self::Object;
}

/// Keeps one interpreter alive so definitions carry over between lines.
pub struct InterpreterEvaluator {
    interpreter: Interpreter<Stdout>,
}

impl InterpreterEvaluator {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(Stdout),
        }
    }
}

impl Evaluator for InterpreterEvaluator {
    type Object = Result<Rc<Object>, RunError>;

    fn evaluate(&mut self, line: &str) -> Self::Object {
        runner::execute(line, &mut self.interpreter)
    }
}

pub struct DumpEvaluator {
    render: fn(&str) -> Result<String, RunError>,
}

impl DumpEvaluator {
    pub fn new(render: fn(&str) -> Result<String, RunError>) -> Self {
        Self { render }
    }
}

impl Evaluator for DumpEvaluator {
    type Object = Result<String, RunError>;

    fn evaluate(&mut self, line: &str) -> Self::Object {
        (self.render)(line)
    }
}
