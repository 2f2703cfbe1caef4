use std::fmt::Display;
use std::rc::Rc;

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Expression(Expression),
    Var(VarStatement),
    Print(Expression),
    If {
        condition: Expression,
        consequence: Box<Statement>,
        alternative: Option<Box<Statement>>,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    Block(BlockStatement),
    Function(Rc<FunctionDeclaration>),
    Return(Option<Expression>),
}

#[derive(Debug, PartialEq, Clone)]
pub struct VarStatement {
    pub identifier: Identifier,
    pub initializer: Option<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionDeclaration {
    pub name: Identifier,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Literal(Literal),
    Binary(BinaryOperator, Box<Expression>, Box<Expression>),
    Unary(UnaryOperator, Box<Expression>),
    Variable(Identifier),
    Assignment {
        identifier: Identifier,
        value: Box<Expression>,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Match {
        subject: Box<Expression>,
        cases: Vec<MatchCase>,
    },
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Literal {
    Number(f64),
    Boolean(bool),
    Null,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MatchCase {
    pub pattern: Expression,
    pub body: Expression,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,
    Equal,
    NotEqual,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Minus,
    Bang,
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Identifier {
    pub name: Rc<str>,
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Identifier { name: name.into() }
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for statement in &self.statements {
            write!(f, " {}", statement)?;
        }
        write!(f, " }}")
    }
}

impl Display for FunctionDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "fn {}({}) {}",
            self.name.name,
            self.parameters
                .iter()
                .map(|id| id.name.as_ref())
                .collect::<Box<[&str]>>()
                .join(", "),
            self.body
        )
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;
        match self {
            Expression(expression) => write!(f, "{};", expression),
            Var(VarStatement {
                identifier,
                initializer: Some(initializer),
            }) => write!(f, "var {} = {};", identifier.name, initializer),
            Var(VarStatement {
                identifier,
                initializer: None,
            }) => write!(f, "var {};", identifier.name),
            Print(expression) => write!(f, "print {};", expression),
            If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            While { condition, body } => write!(f, "while {} {}", condition, body),
            Block(block) => write!(f, "{}", block),
            Function(declaration) => write!(f, "{}", declaration),
            Return(Some(value)) => write!(f, "return {};", value),
            Return(None) => write!(f, "return;"),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expression::*;
        match self {
            Literal(literal) => write!(f, "{}", literal),
            Binary(operator, left, right) => {
                write!(f, "({} {} {})", left, operator.to_str(), right)
            }
            Unary(operator, right) => write!(f, "({}{})", operator.to_str(), right),
            Variable(identifier) => write!(f, "{}", identifier.name),
            Assignment { identifier, value } => write!(f, "({} = {})", identifier.name, value),
            Call { callee, arguments } => {
                write!(
                    f,
                    "{}({})",
                    callee,
                    arguments
                        .iter()
                        .map(|arg| arg.to_string())
                        .collect::<Vec<String>>()
                        .join(", ")
                )
            }
            Match { subject, cases } => {
                write!(f, "match {} {{", subject)?;
                for (i, case) in cases.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}", case)?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Number(value) => write_number(f, *value),
            Literal::Boolean(value) => write!(f, "{}", value),
            Literal::Null => write!(f, "null"),
        }
    }
}

/// Writes a number in plain decimal notation. Integral values keep a `.0`
/// suffix, so `11` renders as `11.0` and `1e16` as `10000000000000000.0`.
pub fn write_number(f: &mut std::fmt::Formatter<'_>, value: f64) -> std::fmt::Result {
    if value.is_finite() && value.fract() == 0.0 {
        write!(f, "{:.1}", value)
    } else {
        write!(f, "{}", value)
    }
}

impl Display for MatchCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "case {} => {}", self.pattern, self.body)
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl UnaryOperator {
    pub fn to_str(self) -> &'static str {
        use UnaryOperator::*;
        match self {
            Minus => "-",
            Bang => "!",
        }
    }
}

impl BinaryOperator {
    pub fn to_str(self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            GreaterThan => ">",
            GreaterEqual => ">=",
            LessThan => "<",
            LessEqual => "<=",
            Equal => "==",
            NotEqual => "!=",
        }
    }
}
