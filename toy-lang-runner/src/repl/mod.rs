mod evaluator;
mod printer;
mod reader;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use evaluator::{DumpEvaluator, Evaluator, InterpreterEvaluator};
use printer::{DumpPrinter, InterpreterPrinter, Printer};
use reader::{ReadOutput, Reader};

use crate::runner;
use crate::Mode;

struct Repl<E: Evaluator, P: Printer> {
    reader: Reader,
    evaluator: E,
    printer: P,
}

impl<O, E: Evaluator<Object = O>, P: Printer<Object = O>> Repl<E, P> {
    fn run(mut self) -> Result<(), ReadlineError> {
        loop {
            match self.reader.read()? {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Value(line) => {
                    let result = self.evaluator.evaluate(&line);
                    self.printer.print(result)
                }
            }
        }
        Ok(())
    }
}

pub fn start(mode: Mode) -> Result<(), ReadlineError> {
    let rl = DefaultEditor::new()?;
    let reader = Reader::new(rl);

    match mode {
        Mode::Run => Repl {
            reader,
            evaluator: InterpreterEvaluator::new(),
            printer: InterpreterPrinter {},
        }
        .run(),
        Mode::Tokens => Repl {
            reader,
            evaluator: DumpEvaluator::new(runner::dump_tokens),
            printer: DumpPrinter {},
        }
        .run(),
        Mode::Ast => Repl {
            reader,
            evaluator: DumpEvaluator::new(runner::dump_ast),
            printer: DumpPrinter {},
        }
        .run(),
    }
}
