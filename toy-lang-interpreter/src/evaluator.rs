use std::rc::Rc;

use crate::environment::Environment;
use crate::object::{Completion, EvaluationError, Function, Object};
use toy_lang_core::ast::{BinaryOperator, Expression, Program, Statement, UnaryOperator};

/// Receives the value of every `print` statement.
pub trait OutputSink {
    fn emit(&mut self, value: &Object);
}

/// Collects printed values as their display strings.
impl OutputSink for Vec<String> {
    fn emit(&mut self, value: &Object) {
        self.push(value.to_string());
    }
}

/// Tree-walking evaluator. The current environment starts out as the
/// global scope and is swapped while blocks and function bodies run.
pub struct Interpreter<S: OutputSink> {
    globals: Environment,
    environment: Environment,
    output: S,
}

impl<S: OutputSink> Interpreter<S> {
    pub fn new(output: S) -> Self {
        let globals = Environment::new();
        Interpreter {
            environment: globals.clone(),
            globals,
            output,
        }
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn output(&self) -> &S {
        &self.output
    }

    /// Runs the program and returns the value of its last top-level
    /// expression statement, or `null` if there is none. A top-level
    /// `return` ends the run early with its value.
    pub fn interpret(&mut self, program: &Program) -> Result<Rc<Object>, EvaluationError> {
        let mut output = Object::null();
        for statement in &program.statements {
            match statement {
                Statement::Expression(expression) => output = self.evaluate(expression)?,
                statement => {
                    if let Completion::Return(value) = self.execute(statement)? {
                        return Ok(value);
                    }
                }
            }
        }
        Ok(output)
    }

    pub fn execute(&mut self, statement: &Statement) -> Result<Completion, EvaluationError> {
        match statement {
            Statement::Expression(expression) => {
                self.evaluate(expression)?;
                Ok(Completion::Normal)
            }
            Statement::Var(var) => {
                let value = match &var.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Object::null(),
                };
                self.environment.define(var.identifier.name.clone(), value)?;
                Ok(Completion::Normal)
            }
            Statement::Print(expression) => {
                let value = self.evaluate(expression)?;
                self.output.emit(&value);
                Ok(Completion::Normal)
            }
            Statement::If {
                condition,
                consequence,
                alternative,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(consequence)
                } else if let Some(alternative) = alternative {
                    self.execute(alternative)
                } else {
                    Ok(Completion::Normal)
                }
            }
            Statement::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Completion::Return(value) = self.execute(body)? {
                        return Ok(Completion::Return(value));
                    }
                }
                Ok(Completion::Normal)
            }
            Statement::Block(block) => {
                let environment = Environment::new_enclosed(self.environment.clone());
                self.execute_block(&block.statements, environment)
            }
            Statement::Function(declaration) => {
                // The closure is a fresh child of the declaring scope.
                let closure = Environment::new_enclosed(self.environment.clone());
                let function = Object::function(declaration.clone(), closure);
                self.environment.define(declaration.name.name.clone(), function)?;
                Ok(Completion::Normal)
            }
            Statement::Return(value) => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Object::null(),
                };
                Ok(Completion::Return(value))
            }
        }
    }

    /// Runs `statements` with `environment` as the current scope. The
    /// previous scope is restored whether the block completes, returns or
    /// fails.
    fn execute_block(
        &mut self,
        statements: &[Statement],
        environment: Environment,
    ) -> Result<Completion, EvaluationError> {
        tracing::trace!(statements = statements.len(), "entering block");
        let previous = std::mem::replace(&mut self.environment, environment);
        let result = self.execute_statements(statements);
        self.environment = previous;
        result
    }

    fn execute_statements(
        &mut self,
        statements: &[Statement],
    ) -> Result<Completion, EvaluationError> {
        for statement in statements {
            if let Completion::Return(value) = self.execute(statement)? {
                return Ok(Completion::Return(value));
            }
        }
        Ok(Completion::Normal)
    }

    pub fn evaluate(&mut self, expression: &Expression) -> Result<Rc<Object>, EvaluationError> {
        match expression {
            Expression::Literal(literal) => Ok(Object::literal(literal)),
            Expression::Binary(operator, left, right) => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                eval_binary_operation(*operator, left, right)
            }
            Expression::Unary(operator, right) => {
                let right = self.evaluate(right)?;
                eval_unary_operation(*operator, right)
            }
            Expression::Variable(identifier) => self.environment.get(&identifier.name),
            Expression::Assignment { identifier, value } => {
                let value = self.evaluate(value)?;
                self.environment.assign(&identifier.name, value)
            }
            Expression::Call { callee, arguments } => {
                let callee = self.evaluate(callee)?;
                let function = match callee.as_ref() {
                    Object::Function(function) => function,
                    _ => return Err(EvaluationError::NotCallable(callee)),
                };
                let arguments = self.eval_expressions(arguments)?;
                self.call_function(function, arguments)
            }
            Expression::Match { subject, cases } => {
                let subject = self.evaluate(subject)?;
                for case in cases {
                    if self.evaluate(&case.pattern)? == subject {
                        return self.evaluate(&case.body);
                    }
                }
                Err(EvaluationError::NoMatch(subject))
            }
        }
    }

    fn eval_expressions(
        &mut self,
        expressions: &[Expression],
    ) -> Result<Vec<Rc<Object>>, EvaluationError> {
        let mut values = Vec::with_capacity(expressions.len());
        for expression in expressions {
            values.push(self.evaluate(expression)?);
        }
        Ok(values)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(function = %function.name()))]
    fn call_function(
        &mut self,
        function: &Function,
        arguments: Vec<Rc<Object>>,
    ) -> Result<Rc<Object>, EvaluationError> {
        if function.arity() != arguments.len() {
            return Err(EvaluationError::WrongArgumentCount {
                function: function.name().clone(),
                expected: function.arity(),
                actual: arguments.len(),
            });
        }

        let environment = Environment::new_enclosed(function.closure.clone());
        for (parameter, argument) in function.declaration.parameters.iter().zip(arguments) {
            environment.define(parameter.name.clone(), argument)?;
        }

        match self.execute_block(&function.declaration.body.statements, environment)? {
            Completion::Return(value) => Ok(value),
            Completion::Normal => Ok(Object::null()),
        }
    }
}

fn eval_binary_operation(
    operator: BinaryOperator,
    left: Rc<Object>,
    right: Rc<Object>,
) -> Result<Rc<Object>, EvaluationError> {
    use BinaryOperator::*;
    match (operator, left.as_ref(), right.as_ref()) {
        (Equal, _, _) => Ok(Object::boolean(left == right)),
        (NotEqual, _, _) => Ok(Object::boolean(left != right)),
        (Plus, Object::Number(l), Object::Number(r)) => Ok(Object::number(l + r)),
        (Minus, Object::Number(l), Object::Number(r)) => Ok(Object::number(l - r)),
        (Multiply, Object::Number(l), Object::Number(r)) => Ok(Object::number(l * r)),
        // IEEE semantics: dividing by zero gives an infinity or NaN.
        (Divide, Object::Number(l), Object::Number(r)) => Ok(Object::number(l / r)),
        (GreaterThan, Object::Number(l), Object::Number(r)) => Ok(Object::boolean(l > r)),
        (GreaterEqual, Object::Number(l), Object::Number(r)) => Ok(Object::boolean(l >= r)),
        (LessThan, Object::Number(l), Object::Number(r)) => Ok(Object::boolean(l < r)),
        (LessEqual, Object::Number(l), Object::Number(r)) => Ok(Object::boolean(l <= r)),
        _ => Err(EvaluationError::TypeMismatch {
            operator,
            left,
            right,
        }),
    }
}

fn eval_unary_operation(
    operator: UnaryOperator,
    right: Rc<Object>,
) -> Result<Rc<Object>, EvaluationError> {
    match (operator, right.as_ref()) {
        (UnaryOperator::Bang, _) => Ok(Object::boolean(!right.is_truthy())),
        (UnaryOperator::Minus, Object::Number(value)) => Ok(Object::number(-value)),
        (UnaryOperator::Minus, _) => Err(EvaluationError::InvalidOperand {
            operator,
            operand: right,
        }),
    }
}
