use std::rc::Rc;

use toy_lang_interpreter::object::Object;

use crate::runner::RunError;

pub trait Printer {
    type Object;

    fn print(&mut self, object: Self::Object);
}

pub struct InterpreterPrinter {}

impl Printer for InterpreterPrinter {
    type Object = Result<Rc<Object>, RunError>;

    fn print(&mut self, object: Self::Object) {
        match object {
            Ok(obj) if *obj == Object::Null => {}
            Ok(obj) => println!("{}", obj),
            Err(err) => println!("Error: {}", err),
        }
    }
}

pub struct DumpPrinter {}

impl Printer for DumpPrinter {
    type Object = Result<String, RunError>;

    fn print(&mut self, object: Self::Object) {
        match object {
            Ok(text) => print!("{}", text),
            Err(err) => println!("Error: {}", err),
        }
    }
}
