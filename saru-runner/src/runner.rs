use saru_core::lexer::Tokenizer;
use saru_core::parser::{ParseError, Parser};
use saru_interpreter::environment::Environment;
use saru_interpreter::evaluator;
use saru_interpreter::macro_expansion;
use saru_interpreter::object::Object;

pub fn execute(source: &str) -> Result<(), Vec<ParseError>> {
    let tokenizer = Tokenizer::new(source);
    let mut parser = Parser::new(tokenizer);
    let program = parser.parse_program()?;

    let mut macro_environment = Environment::new();
    let program = macro_expansion::collect_macros(program, &mut macro_environment);
    let program = macro_expansion::expand_macros(program, &mut macro_environment);

    let mut environment = Environment::new();
    match evaluator::eval_program(&program, &mut environment) {
        Ok(object) => {
            if !matches!(object.as_ref(), Object::Null) {
                println!("{}", object);
            }
        }
        Err(error) => println!("ERROR: {}", error),
    }
    Ok(())
}
