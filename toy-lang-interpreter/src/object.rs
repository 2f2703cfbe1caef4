use std::fmt::Display;
use std::rc::Rc;

use crate::environment::Environment;
use toy_lang_core::ast;

use gc::{Finalize, Trace};
use thiserror::Error;

#[derive(Debug, PartialEq, Clone, Trace, Finalize)]
pub enum Object {
    Number(f64),
    Boolean(bool),
    Function(Function),
    Null,
}

thread_local! {
    static NULL: Rc<Object> = Rc::new(Object::Null);
    static TRUE: Rc<Object> = Rc::new(Object::Boolean(true));
    static FALSE: Rc<Object> = Rc::new(Object::Boolean(false));
}

impl Object {
    pub fn null() -> Rc<Object> {
        NULL.with(|x| x.clone())
    }
    pub fn boolean(value: bool) -> Rc<Object> {
        if value {
            TRUE.with(|x| x.clone())
        } else {
            FALSE.with(|x| x.clone())
        }
    }
    pub fn number(value: f64) -> Rc<Object> {
        Rc::new(Object::Number(value))
    }
    pub fn function(declaration: Rc<ast::FunctionDeclaration>, closure: Environment) -> Rc<Object> {
        Rc::new(Object::Function(Function {
            declaration,
            closure,
        }))
    }
    pub fn literal(literal: &ast::Literal) -> Rc<Object> {
        match literal {
            ast::Literal::Number(value) => Object::number(*value),
            ast::Literal::Boolean(value) => Object::boolean(*value),
            ast::Literal::Null => Object::null(),
        }
    }

    /// `null`, `false` and `0` are falsy. Every other value is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Object::Null => false,
            Object::Boolean(value) => *value,
            Object::Number(value) => *value != 0.0,
            Object::Function(_) => true,
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Number(value) => ast::write_number(f, *value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::Function(function) => write!(f, "<fn {}>", function.name()),
            Object::Null => write!(f, "null"),
        }
    }
}

/// A user function together with the scope it was declared in.
#[derive(Clone, Trace, Finalize)]
pub struct Function {
    // The AST holds no garbage-collected pointers.
    #[unsafe_ignore_trace]
    pub declaration: Rc<ast::FunctionDeclaration>,
    pub closure: Environment,
}

impl Function {
    pub fn name(&self) -> &Rc<str> {
        &self.declaration.name.name
    }

    pub fn arity(&self) -> usize {
        self.declaration.parameters.len()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration) && self.closure.ptr_eq(&other.closure)
    }
}

// The closure can reach the function itself, so it is left out.
impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", self.name())
            .field("arity", &self.arity())
            .finish()
    }
}

/// How a statement finished. `Return` carries the value of a `return`
/// up to the nearest function call, or to the top of the program.
#[derive(Debug, PartialEq)]
pub enum Completion {
    Normal,
    Return(Rc<Object>),
}

#[derive(Debug, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(Rc<str>),
    #[error("Variable '{0}' is already defined in this scope")]
    DuplicateDefinition(Rc<str>),
    #[error("Operands of '{}' must be numbers, got {left} and {right}", .operator.to_str())]
    TypeMismatch {
        operator: ast::BinaryOperator,
        left: Rc<Object>,
        right: Rc<Object>,
    },
    #[error("Operand of '{}' must be a number, got {operand}", .operator.to_str())]
    InvalidOperand {
        operator: ast::UnaryOperator,
        operand: Rc<Object>,
    },
    #[error("Can only call functions, got {0}")]
    NotCallable(Rc<Object>),
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    WrongArgumentCount {
        function: Rc<str>,
        expected: usize,
        actual: usize,
    },
    #[error("No match for value {0}")]
    NoMatch(Rc<Object>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        let tests = vec![
            (Object::null(), false),
            (Object::boolean(false), false),
            (Object::boolean(true), true),
            (Object::number(0.0), false),
            (Object::number(-0.0), false),
            (Object::number(0.5), true),
            (Object::number(-3.0), true),
            (Object::number(f64::NAN), true),
        ];

        for (object, expected) in tests {
            assert_eq!(object.is_truthy(), expected, "{}", object);
        }
    }

    #[test]
    fn test_display() {
        let tests = vec![
            (Object::number(0.0), "0.0"),
            (Object::number(11.0), "11.0"),
            (Object::number(2.5), "2.5"),
            (Object::number(-4.0), "-4.0"),
            (Object::number(1e16), "10000000000000000.0"),
            (Object::number(1e21), "1000000000000000000000.0"),
            (Object::number(1e-7), "0.0000001"),
            (Object::number(-0.0), "-0.0"),
            (Object::number(f64::NEG_INFINITY), "-inf"),
            (Object::number(f64::INFINITY), "inf"),
            (Object::number(f64::NAN), "NaN"),
            (Object::boolean(true), "true"),
            (Object::boolean(false), "false"),
            (Object::null(), "null"),
        ];

        for (object, expected) in tests {
            assert_eq!(object.to_string(), expected);
        }
    }

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(Object::number(1.0), Object::number(1.0));
        assert_ne!(Object::number(1.0), Object::boolean(true));
        assert_ne!(Object::number(0.0), Object::null());
        assert_ne!(Object::boolean(false), Object::null());
        assert_ne!(Object::number(f64::NAN), Object::number(f64::NAN));
    }

    #[test]
    fn test_function_equality_is_identity() {
        let declaration = Rc::new(ast::FunctionDeclaration {
            name: "f".into(),
            parameters: vec!["a".into()],
            body: ast::BlockStatement::default(),
        });
        let environment = Environment::new();

        let function = Object::function(declaration.clone(), environment.clone());
        let same = Object::function(declaration.clone(), environment.clone());
        let other_closure = Object::function(declaration.clone(), Environment::new());
        let other_declaration =
            Object::function(Rc::new(declaration.as_ref().clone()), environment);

        assert_eq!(function, same);
        assert_ne!(function, other_closure);
        assert_ne!(function, other_declaration);
        assert_eq!(function.to_string(), "<fn f>");
    }

    #[test]
    fn test_error_messages() {
        let tests = vec![
            (
                EvaluationError::UndefinedVariable("c".into()),
                "Undefined variable 'c'",
            ),
            (
                EvaluationError::TypeMismatch {
                    operator: ast::BinaryOperator::Plus,
                    left: Object::number(1.0),
                    right: Object::boolean(true),
                },
                "Operands of '+' must be numbers, got 1.0 and true",
            ),
            (
                EvaluationError::InvalidOperand {
                    operator: ast::UnaryOperator::Minus,
                    operand: Object::null(),
                },
                "Operand of '-' must be a number, got null",
            ),
            (
                EvaluationError::WrongArgumentCount {
                    function: "add".into(),
                    expected: 2,
                    actual: 1,
                },
                "Wrong number of arguments for add: expected 2, got 1",
            ),
            (
                EvaluationError::NoMatch(Object::number(5.0)),
                "No match for value 5.0",
            ),
        ];

        for (error, expected) in tests {
            assert_eq!(error.to_string(), expected);
        }
    }
}
