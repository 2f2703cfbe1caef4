use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustyline::error::ReadlineError;
use thiserror::Error;
use toy_lang_core::ast::Program;
use toy_lang_core::lexer::{self, LexError};
use toy_lang_core::parser::{ParseError, Parser};
use toy_lang_interpreter::object::{EvaluationError, Object};
use toy_lang_interpreter::{Interpreter, OutputSink};

use crate::Mode;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not read input: {0}")]
    Readline(#[from] ReadlineError),
}

/// Writes every printed value to standard output on its own line.
pub struct Stdout;

impl OutputSink for Stdout {
    fn emit(&mut self, value: &Object) {
        println!("{}", value);
    }
}

pub fn parse(source: &str) -> Result<Program, RunError> {
    let tokens = lexer::tokenize(source)?;
    Ok(Parser::new(tokens).parse_program()?)
}

pub fn execute<S: OutputSink>(
    source: &str,
    interpreter: &mut Interpreter<S>,
) -> Result<Rc<Object>, RunError> {
    let program = parse(source)?;
    Ok(interpreter.interpret(&program)?)
}

pub fn dump_tokens(source: &str) -> Result<String, RunError> {
    let tokens = lexer::tokenize(source)?;
    Ok(tokens
        .iter()
        .map(|token| format!("{:>4} {:?} {}\n", token.line, token.kind, token))
        .collect())
}

pub fn dump_ast(source: &str) -> Result<String, RunError> {
    Ok(parse(source)?.to_string())
}

pub fn run_file(path: &Path, mode: Mode) -> Result<(), RunError> {
    let source = std::fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "running file");

    match mode {
        Mode::Run => {
            execute(&source, &mut Interpreter::new(Stdout))?;
        }
        Mode::Tokens => print!("{}", dump_tokens(&source)?),
        Mode::Ast => print!("{}", dump_ast(&source)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_execute_collects_output() {
        let mut interpreter = Interpreter::new(Vec::new());
        let result = execute("var a = 1; print a + 2; a;", &mut interpreter).unwrap();

        assert_eq!(result, Object::number(1.0));
        assert_eq!(interpreter.output(), &vec!["3.0".to_string()]);
    }

    #[test]
    fn test_error_messages() {
        let tests = vec![
            ("var a = 1 $", "Unexpected character '$' at line 1"),
            ("var a = 1\nprint a;", "Expected ';', got 'print' at line 2"),
            ("print c;", "Undefined variable 'c'"),
            ("match 5 { case 1 => 1 };", "No match for value 5.0"),
        ];

        for (source, expected) in tests {
            let mut interpreter = Interpreter::new(Vec::new());
            let error = execute(source, &mut interpreter).unwrap_err();
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_dump_tokens() {
        assert_eq!(
            dump_tokens("var x = 1;\nx;").unwrap(),
            concat!(
                "   1 Var 'var'\n",
                "   1 Ident 'x'\n",
                "   1 Assign '='\n",
                "   1 Number '1'\n",
                "   1 SemiColon ';'\n",
                "   2 Ident 'x'\n",
                "   2 SemiColon ';'\n",
                "   2 Eof end of input\n",
            )
        );
    }

    #[test]
    fn test_dump_ast_desugars_for() {
        assert_eq!(
            dump_ast("for (var i = 0; i < 2; i = i + 1) print i;").unwrap(),
            "{ var i = 0.0; while (i < 2.0) { print i; (i = (i + 1.0)); } }\n"
        );
    }

    #[test]
    fn test_missing_file() {
        let error = run_file(Path::new("does/not/exist.toy"), Mode::Run).unwrap_err();

        assert!(matches!(error, RunError::Io { .. }));
        assert!(error.to_string().starts_with("Could not read does/not/exist.toy"));
    }
}
