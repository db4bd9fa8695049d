use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use saru_core::lexer::Tokenizer;
use saru_core::parser::Parser;
use saru_interpreter::environment::Environment;
use saru_interpreter::evaluator;
use saru_interpreter::macro_expansion;
use saru_interpreter::object::Object;

const PROMPT: &str = ">> ";
const CONTINUATION_PROMPT: &str = ".. ";

enum ReadOutput {
    Exit,
    Clear,
    Input(String),
}

/// Reads one evaluation unit. A trailing backslash continues the unit on
/// the next line, with the backslash itself dropped.
fn read_unit(rl: &mut DefaultEditor) -> ReadOutput {
    let mut buffer = String::new();
    let mut prompt = PROMPT;

    loop {
        let line = match rl.readline(prompt) {
            Err(ReadlineError::Interrupted) => return ReadOutput::Clear,
            Err(ReadlineError::Eof) => return ReadOutput::Exit,
            Err(err) => {
                println!("Error: {:?}", err);
                return ReadOutput::Exit;
            }
            Ok(line) => line,
        };
        match line.strip_suffix('\\') {
            Some(stripped) => {
                buffer.push_str(stripped);
                prompt = CONTINUATION_PROMPT;
            }
            None => {
                buffer.push_str(&line);
                break;
            }
        }
    }

    if !buffer.is_empty() {
        let _ = rl.add_history_entry(&buffer);
    }
    ReadOutput::Input(buffer)
}

pub fn start() -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut environment = Environment::new();
    let mut macro_environment = Environment::new();

    loop {
        let input = match read_unit(&mut rl) {
            ReadOutput::Exit => break,
            ReadOutput::Clear => continue,
            ReadOutput::Input(input) => input,
        };

        let tokenizer = Tokenizer::new(&input);
        let program = match Parser::new(tokenizer).parse_program() {
            Ok(program) => program,
            Err(errors) => {
                for error in errors {
                    println!("\t{}", error);
                }
                continue;
            }
        };

        let program = macro_expansion::collect_macros(program, &mut macro_environment);
        let program = macro_expansion::expand_macros(program, &mut macro_environment);

        match evaluator::eval_program(&program, &mut environment) {
            Ok(object) => {
                if !matches!(object.as_ref(), Object::Null) {
                    println!("{}", object);
                }
            }
            Err(error) => println!("ERROR: {}", error),
        }
    }
    Ok(())
}
