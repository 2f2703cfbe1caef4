use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

const PROMPT: &str = ">> ";
const EXIT_COMMAND: &str = "exit";

pub enum ReadOutput {
    Exit,
    Clear,
    Value(String),
}

pub struct Reader {
    rl: Editor<(), DefaultHistory>,
}

impl Reader {
    pub fn new(rl: Editor<(), DefaultHistory>) -> Self {
        Self { rl }
    }

    pub fn read(&mut self) -> Result<ReadOutput, ReadlineError> {
        let line = match self.rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                return Ok(ReadOutput::Clear);
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                return Ok(ReadOutput::Exit);
            }
            Err(err) => return Err(err),
            Ok(line) => line,
        };

        match line.trim() {
            "" => Ok(ReadOutput::Clear),
            EXIT_COMMAND => Ok(ReadOutput::Exit),
            _ => {
                self.rl.add_history_entry(line.as_str())?;
                Ok(ReadOutput::Value(line))
            }
        }
    }
}
