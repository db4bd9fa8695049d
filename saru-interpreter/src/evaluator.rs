use std::collections::HashMap;
use std::rc::Rc;

use crate::environment::Environment;
use crate::object::{object_to_key, EvaluationError, Function, Macro, Object, Signal};
use saru_core::ast;
use saru_core::ast::{BlockStatement, Expression, InfixOperationKind, PrefixOperationKind, Statement};

pub fn eval_program(
    program: &ast::Program,
    environment: &mut Environment,
) -> Result<Rc<Object>, EvaluationError> {
    let mut output = Object::null();
    for statement in &program.statements {
        match eval_statement(statement, environment) {
            Ok(object) => output = object,
            Err(Signal::Return(value)) => return Ok(value),
            Err(Signal::Error(error)) => return Err(error),
        }
    }
    Ok(output)
}

fn eval_statement(
    statement: &Statement,
    environment: &mut Environment,
) -> Result<Rc<Object>, Signal> {
    match statement {
        Statement::Expression(expression) => eval_expression(expression, environment),
        Statement::Return(statement) => eval_return_statement(statement, environment),
        Statement::Let(statement) => eval_let_statement(statement, environment),
    }
}

fn eval_let_statement(
    statement: &ast::LetStatement,
    environment: &mut Environment,
) -> Result<Rc<Object>, Signal> {
    let value = eval_expression(&statement.value, environment)?;
    environment.set(statement.identifier.name.clone(), value);
    Ok(Object::null())
}

fn eval_return_statement(
    statement: &ast::ReturnStatement,
    environment: &mut Environment,
) -> Result<Rc<Object>, Signal> {
    let value = eval_expression(&statement.value, environment)?;
    Err(Signal::Return(value))
}

fn eval_expression(
    expression: &Expression,
    environment: &mut Environment,
) -> Result<Rc<Object>, Signal> {
    match expression {
        Expression::IntegerLiteral(value) => Ok(Object::integer(*value)),
        Expression::BooleanLiteral(value) => Ok(Object::boolean(*value)),
        Expression::StringLiteral(value) => Ok(Object::string(value.clone())),
        Expression::Identifier(identifier) => environment
            .get(&identifier.name)
            .or_else(|| crate::builtins::lookup(&identifier.name))
            .ok_or_else(|| {
                Signal::Error(EvaluationError::IdentifierNotFound(identifier.name.clone()))
            }),
        Expression::ArrayLiteral(elements) => Ok(Object::array(
            elements
                .iter()
                .map(|element| eval_expression(element, environment))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        Expression::HashLiteral(literal) => {
            let mut pairs = HashMap::new();
            for (key_expression, value_expression) in literal {
                let key = eval_expression(key_expression, environment)?;
                let value = eval_expression(value_expression, environment)?;
                let hashed_key = object_to_key(&key).map_err(Signal::Error)?;
                // A later duplicate key overwrites the earlier pair.
                pairs.insert(hashed_key, (key, value));
            }
            Ok(Object::hash(pairs))
        }
        Expression::PrefixOperation(kind, operand) => {
            let right = eval_expression(operand, environment)?;
            eval_prefix_operation(kind, right)
        }
        Expression::InfixOperation(kind, left, right) => {
            let left = eval_expression(left, environment)?;
            let right = eval_expression(right, environment)?;
            eval_infix_operation(kind, left, right)
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, environment)?;
            if is_truthy(&condition) {
                eval_block_statement(consequence, environment)
            } else if let Some(alternative) = alternative {
                eval_block_statement(alternative, environment)
            } else {
                Ok(Object::null())
            }
        }
        Expression::FunctionLiteral { parameters, body } => Ok(Object::function(
            parameters.clone(),
            body.clone(),
            environment.clone(),
        )),
        Expression::MacroLiteral { parameters, body } => Ok(Rc::new(Object::Macro(Macro {
            parameters: parameters.clone(),
            body: body.clone(),
            env: environment.clone(),
        }))),
        Expression::CallExpression {
            function,
            arguments,
        } => {
            if is_quote_call(function) {
                return eval_quote(arguments, environment);
            }
            let function = eval_expression(function, environment)?;
            let arguments = eval_expressions(arguments, environment)?;
            match function.as_ref() {
                Object::Function(function) => apply_function(function, arguments),
                Object::Builtin(builtin) => (builtin.func)(arguments),
                _ => Err(Signal::Error(EvaluationError::NotAFunction(
                    function.kind(),
                ))),
            }
        }
        Expression::IndexExpression { left, index } => {
            let left = eval_expression(left, environment)?;
            let index = eval_expression(index, environment)?;
            eval_index_expression(left, index)
        }
    }
}

fn eval_expressions(
    expressions: &[Expression],
    environment: &mut Environment,
) -> Result<Vec<Rc<Object>>, Signal> {
    let mut result = Vec::with_capacity(expressions.len());
    for expression in expressions {
        result.push(eval_expression(expression, environment)?);
    }
    Ok(result)
}

fn apply_function(
    function: &Function,
    arguments: Vec<Rc<Object>>,
) -> Result<Rc<Object>, Signal> {
    if function.parameters.len() != arguments.len() {
        return Err(Signal::Error(EvaluationError::WrongArgumentCount {
            expected: function.parameters.len(),
            actual: arguments.len(),
        }));
    }
    // Parameters bind in a fresh scope chained to the environment captured
    // at the definition site, never the caller's.
    let mut environment = Environment::new_enclosed(&function.env);
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        environment.set(parameter.name.clone(), argument);
    }
    match eval_block_statement(&function.body, &mut environment) {
        Err(Signal::Return(value)) => Ok(value),
        other => other,
    }
}

pub(crate) fn eval_block_statement(
    block: &BlockStatement,
    environment: &mut Environment,
) -> Result<Rc<Object>, Signal> {
    let mut result = Object::null();
    for statement in &block.statements {
        result = eval_statement(statement, environment)?;
    }
    Ok(result)
}

/// False only for `false` and `null`; everything else, zero included, is
/// truthy.
fn is_truthy(object: &Rc<Object>) -> bool {
    !matches!(object.as_ref(), Object::Null | Object::Boolean(false))
}

fn eval_prefix_operation(
    kind: &PrefixOperationKind,
    right: Rc<Object>,
) -> Result<Rc<Object>, Signal> {
    match (kind, right.as_ref()) {
        (PrefixOperationKind::Bang, _) => Ok(Object::boolean(!is_truthy(&right))),
        (PrefixOperationKind::Minus, Object::Integer(value)) => Ok(Object::integer(-value)),
        (PrefixOperationKind::Minus, _) => {
            Err(Signal::Error(EvaluationError::UnknownPrefixOperator {
                operator: kind.to_str(),
                right: right.kind(),
            }))
        }
    }
}

fn eval_infix_operation(
    kind: &InfixOperationKind,
    left: Rc<Object>,
    right: Rc<Object>,
) -> Result<Rc<Object>, Signal> {
    use saru_core::ast::InfixOperationKind::*;
    match (kind, left.as_ref(), right.as_ref()) {
        (Plus, Object::Integer(left), Object::Integer(right)) => Ok(Object::integer(left + right)),
        (Minus, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::integer(left - right))
        }
        (Multiply, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::integer(left * right))
        }
        (Divide, Object::Integer(left), Object::Integer(right)) => {
            if *right == 0 {
                Err(Signal::Error(EvaluationError::DivisionByZero {
                    left: *left,
                }))
            } else {
                Ok(Object::integer(left / right))
            }
        }
        (LessThan, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::boolean(left < right))
        }
        (GreaterThan, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::boolean(left > right))
        }
        (Equal, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::boolean(left == right))
        }
        (NotEqual, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::boolean(left != right))
        }
        (Plus, Object::String(left), Object::String(right)) => {
            Ok(Object::string(format!("{}{}", left, right)))
        }
        (Equal, Object::String(left), Object::String(right)) => Ok(Object::boolean(left == right)),
        (NotEqual, Object::String(left), Object::String(right)) => {
            Ok(Object::boolean(left != right))
        }
        // Anything not covered above compares by identity, which the
        // boolean and null singletons make meaningful. Two structurally
        // equal arrays are distinct values and compare unequal.
        (Equal, _, _) => Ok(Object::boolean(Rc::ptr_eq(&left, &right))),
        (NotEqual, _, _) => Ok(Object::boolean(!Rc::ptr_eq(&left, &right))),
        _ if left.kind() != right.kind() => Err(Signal::Error(EvaluationError::TypeMismatch {
            left: left.kind(),
            operator: kind.to_str(),
            right: right.kind(),
        })),
        _ => Err(Signal::Error(EvaluationError::UnknownInfixOperator {
            left: left.kind(),
            operator: kind.to_str(),
            right: right.kind(),
        })),
    }
}

fn eval_index_expression(left: Rc<Object>, index: Rc<Object>) -> Result<Rc<Object>, Signal> {
    match (left.as_ref(), index.as_ref()) {
        (Object::Array(elements), Object::Integer(idx)) => {
            if *idx < 0 {
                return Ok(Object::null());
            }
            Ok(elements
                .get(*idx as usize)
                .cloned()
                .unwrap_or_else(Object::null))
        }
        (Object::Array(_), _) => Err(Signal::Error(EvaluationError::NonIntegerIndex(
            index.kind(),
        ))),
        (Object::Hash(pairs), _) => {
            let key = object_to_key(&index).map_err(Signal::Error)?;
            Ok(pairs
                .get(&key)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(Object::null))
        }
        _ => Err(Signal::Error(EvaluationError::IndexNotSupported(
            left.kind(),
        ))),
    }
}

fn is_quote_call(function: &Expression) -> bool {
    matches!(function, Expression::Identifier(identifier) if identifier.name.as_ref() == "quote")
}

fn is_unquote_call(function: &Expression, arguments: &[Expression]) -> bool {
    matches!(function, Expression::Identifier(identifier) if identifier.name.as_ref() == "unquote")
        && arguments.len() == 1
}

/// `quote(expr)` wraps its argument unevaluated, after resolving every
/// nested `unquote(..)` back into syntax.
fn eval_quote(
    arguments: &[Expression],
    environment: &mut Environment,
) -> Result<Rc<Object>, Signal> {
    if arguments.len() != 1 {
        return Err(Signal::Error(EvaluationError::BuiltinArgumentCount {
            name: "quote",
            expected: 1,
            actual: arguments.len(),
        }));
    }
    let node = process_unquotes(arguments[0].clone(), environment)?;
    Ok(Object::quote(node))
}

fn process_unquotes(
    expression: Expression,
    environment: &mut Environment,
) -> Result<Expression, Signal> {
    use saru_core::ast::Expression::*;
    match expression {
        CallExpression {
            function,
            arguments,
        } => {
            let function = Box::new(process_unquotes(*function, environment)?);
            let arguments = arguments
                .into_iter()
                .map(|argument| process_unquotes(argument, environment))
                .collect::<Result<Vec<_>, _>>()?;
            if is_unquote_call(&function, &arguments) {
                let value = eval_expression(&arguments[0], environment)?;
                return Ok(object_to_expression(value));
            }
            Ok(CallExpression {
                function,
                arguments,
            })
        }
        PrefixOperation(kind, operand) => Ok(PrefixOperation(
            kind,
            Box::new(process_unquotes(*operand, environment)?),
        )),
        InfixOperation(kind, left, right) => Ok(InfixOperation(
            kind,
            Box::new(process_unquotes(*left, environment)?),
            Box::new(process_unquotes(*right, environment)?),
        )),
        ArrayLiteral(elements) => Ok(ArrayLiteral(
            elements
                .into_iter()
                .map(|element| process_unquotes(element, environment))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        HashLiteral(pairs) => Ok(HashLiteral(
            pairs
                .into_iter()
                .map(|(key, value)| {
                    Ok((
                        process_unquotes(key, environment)?,
                        process_unquotes(value, environment)?,
                    ))
                })
                .collect::<Result<Vec<_>, Signal>>()?,
        )),
        IndexExpression { left, index } => Ok(IndexExpression {
            left: Box::new(process_unquotes(*left, environment)?),
            index: Box::new(process_unquotes(*index, environment)?),
        }),
        IfExpression {
            condition,
            consequence,
            alternative,
        } => Ok(IfExpression {
            condition: Box::new(process_unquotes(*condition, environment)?),
            consequence: process_unquotes_block(consequence, environment)?,
            alternative: alternative
                .map(|block| process_unquotes_block(block, environment))
                .transpose()?,
        }),
        FunctionLiteral { parameters, body } => Ok(FunctionLiteral {
            parameters,
            body: process_unquotes_block(body, environment)?,
        }),
        MacroLiteral { parameters, body } => Ok(MacroLiteral {
            parameters,
            body: process_unquotes_block(body, environment)?,
        }),
        leaf @ (Identifier(_) | IntegerLiteral(_) | StringLiteral(_) | BooleanLiteral(_)) => {
            Ok(leaf)
        }
    }
}

fn process_unquotes_block(
    block: BlockStatement,
    environment: &mut Environment,
) -> Result<BlockStatement, Signal> {
    let statements = block
        .statements
        .into_iter()
        .map(|statement| process_unquotes_statement(statement, environment))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BlockStatement { statements })
}

fn process_unquotes_statement(
    statement: Statement,
    environment: &mut Environment,
) -> Result<Statement, Signal> {
    match statement {
        Statement::Let(statement) => Ok(Statement::Let(ast::LetStatement {
            identifier: statement.identifier,
            value: process_unquotes(statement.value, environment)?,
        })),
        Statement::Return(statement) => Ok(Statement::Return(ast::ReturnStatement {
            value: process_unquotes(statement.value, environment)?,
        })),
        Statement::Expression(expression) => Ok(Statement::Expression(process_unquotes(
            expression,
            environment,
        )?)),
    }
}

/// Turns a value computed by `unquote` back into the syntax that denotes
/// it. Only integers, booleans, and already-quoted syntax convert; anything
/// else cannot appear in a tree and aborts.
fn object_to_expression(object: Rc<Object>) -> Expression {
    match object.as_ref() {
        Object::Integer(value) => Expression::IntegerLiteral(*value),
        Object::Boolean(value) => Expression::BooleanLiteral(*value),
        Object::Quote(node) => node.clone(),
        _ => panic!("cannot convert {} back into syntax", object.kind()),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use crate::environment::Environment;
    use crate::object::{EvaluationError, Object};
    use saru_core::lexer::Tokenizer;
    use saru_core::parser::Parser;

    fn evaluate(input: &str) -> Result<Rc<Object>, EvaluationError> {
        let tokenizer = Tokenizer::new(input);
        let mut parser = Parser::new(tokenizer);
        let program = parser.parse_program().unwrap();
        super::eval_program(&program, &mut Environment::new())
    }

    fn test_evaluation(inputs: Vec<(&str, Result<Rc<Object>, EvaluationError>)>) {
        for (input, expected) in inputs {
            assert_eq!(evaluate(input), expected, "input: {}", input);
        }
    }

    #[test]
    fn literals() {
        let inputs = vec![
            ("5;", Ok(Object::integer(5))),
            ("true;", Ok(Object::boolean(true))),
            ("false;", Ok(Object::boolean(false))),
            ("\"hello\";", Ok(Object::string("hello".to_owned()))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn prefix_operations() {
        let inputs = vec![
            ("-10;", Ok(Object::integer(-10))),
            ("--5;", Ok(Object::integer(5))),
            ("!true;", Ok(Object::boolean(false))),
            ("!!true;", Ok(Object::boolean(true))),
            ("!false;", Ok(Object::boolean(true))),
            // zero is truthy
            ("!0;", Ok(Object::boolean(false))),
            ("!5;", Ok(Object::boolean(false))),
            ("!\"\";", Ok(Object::boolean(false))),
            (
                "-true;",
                Err(EvaluationError::UnknownPrefixOperator {
                    operator: "-",
                    right: "BOOLEAN",
                }),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn integer_arithmetic() {
        let inputs = vec![
            ("5 + 5 + 5 + 5 - 10", Ok(Object::integer(10))),
            ("2 * 2 * 2 * 2 * 2", Ok(Object::integer(32))),
            ("50 / 2 * 2 + 10", Ok(Object::integer(60))),
            ("3 * (3 * 3) + 10", Ok(Object::integer(37))),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", Ok(Object::integer(50))),
            // truncating division
            ("7 / 2", Ok(Object::integer(3))),
            ("-7 / 2", Ok(Object::integer(-3))),
            (
                "5 / 0",
                Err(EvaluationError::DivisionByZero { left: 5 }),
            ),
            (
                "(1 + 2) / (2 - 2)",
                Err(EvaluationError::DivisionByZero { left: 3 }),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn comparisons() {
        let inputs = vec![
            ("1 < 2", Ok(Object::boolean(true))),
            ("1 > 2", Ok(Object::boolean(false))),
            ("1 == 1", Ok(Object::boolean(true))),
            ("1 != 1", Ok(Object::boolean(false))),
            ("1 == 2", Ok(Object::boolean(false))),
            ("true == true", Ok(Object::boolean(true))),
            ("false == false", Ok(Object::boolean(true))),
            ("true == false", Ok(Object::boolean(false))),
            ("true != false", Ok(Object::boolean(true))),
            ("(1 < 2) == true", Ok(Object::boolean(true))),
            ("(1 > 2) == true", Ok(Object::boolean(false))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn strings() {
        let inputs = vec![
            (
                "\"Hello\" + \" \" + \"World!\"",
                Ok(Object::string("Hello World!".to_owned())),
            ),
            ("\"a\" == \"a\"", Ok(Object::boolean(true))),
            ("\"a\" == \"b\"", Ok(Object::boolean(false))),
            ("\"a\" != \"b\"", Ok(Object::boolean(true))),
            (
                "\"a\" - \"b\"",
                Err(EvaluationError::UnknownInfixOperator {
                    left: "STRING",
                    operator: "-",
                    right: "STRING",
                }),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn equality_of_composites_is_identity() {
        let inputs = vec![
            ("[1, 2] == [1, 2]", Ok(Object::boolean(false))),
            ("[1, 2] != [1, 2]", Ok(Object::boolean(true))),
            ("let a = [1, 2]; a == a", Ok(Object::boolean(true))),
            ("5 == \"5\"", Ok(Object::boolean(false))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn type_errors() {
        let inputs = vec![
            (
                "5 + true;",
                Err(EvaluationError::TypeMismatch {
                    left: "INTEGER",
                    operator: "+",
                    right: "BOOLEAN",
                }),
            ),
            (
                "5 + true; 5;",
                Err(EvaluationError::TypeMismatch {
                    left: "INTEGER",
                    operator: "+",
                    right: "BOOLEAN",
                }),
            ),
            (
                "true + false;",
                Err(EvaluationError::UnknownInfixOperator {
                    left: "BOOLEAN",
                    operator: "+",
                    right: "BOOLEAN",
                }),
            ),
            (
                "if (10 > 1) { true + false; };",
                Err(EvaluationError::UnknownInfixOperator {
                    left: "BOOLEAN",
                    operator: "+",
                    right: "BOOLEAN",
                }),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn conditionals() {
        let inputs = vec![
            ("if (true) { 10 }", Ok(Object::integer(10))),
            ("if (false) { 10 }", Ok(Object::null())),
            ("if (1) { 10 }", Ok(Object::integer(10))),
            ("if (1 < 2) { 10 }", Ok(Object::integer(10))),
            ("if (1 > 2) { 10 }", Ok(Object::null())),
            ("if (1 > 2) { 10 } else { 20 }", Ok(Object::integer(20))),
            ("if (1 < 2) { 10 } else { 20 }", Ok(Object::integer(10))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn return_statements() {
        let inputs = vec![
            ("return 10;", Ok(Object::integer(10))),
            ("return 10; 9;", Ok(Object::integer(10))),
            ("return 2 * 5; 9;", Ok(Object::integer(10))),
            ("9; return 2 * 5; 9;", Ok(Object::integer(10))),
            (
                "if (10 > 1) { if (10 > 1) { return 10; }; return 1; }",
                Ok(Object::integer(10)),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn let_statements() {
        let inputs = vec![
            ("let a = 5; a;", Ok(Object::integer(5))),
            ("let a = 5 * 5; a;", Ok(Object::integer(25))),
            ("let a = 5; let b = a; b;", Ok(Object::integer(5))),
            (
                "let a = 5; let b = a; let c = a + b + 5; c;",
                Ok(Object::integer(15)),
            ),
            // rebinding `a` later does not touch what `b` holds
            ("let a = 5; let b = a; let a = 6; b;", Ok(Object::integer(5))),
            // a let statement is not itself a value
            ("let a = 5;", Ok(Object::null())),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn unknown_identifier() {
        let inputs = vec![(
            "foobar",
            Err(EvaluationError::IdentifierNotFound("foobar".into())),
        )];

        test_evaluation(inputs);
    }

    #[test]
    fn function_application() {
        let inputs = vec![
            (
                "let identity = fn(x) { x }; identity(5)",
                Ok(Object::integer(5)),
            ),
            (
                "let identity = fn(x) { return x; }; identity(5)",
                Ok(Object::integer(5)),
            ),
            (
                "let double = fn(x) { x * 2 }; double(5)",
                Ok(Object::integer(10)),
            ),
            (
                "let add = fn(x, y) { x + y }; add(5 + 5, add(5, 5))",
                Ok(Object::integer(20)),
            ),
            ("fn(x) { x }(5)", Ok(Object::integer(5))),
            (
                "
                let factorial = fn(n) {
                    if (n < 2) { 1 }
                    else { factorial(n - 1) * n }
                };
                factorial(5)",
                Ok(Object::integer(120)),
            ),
            (
                "fn(x) { x }()",
                Err(EvaluationError::WrongArgumentCount {
                    expected: 1,
                    actual: 0,
                }),
            ),
            ("5(1)", Err(EvaluationError::NotAFunction("INTEGER"))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn closures() {
        let inputs = vec![
            (
                "
                let newAdder = fn(x) { fn(y) { x + y } };
                let addTwo = newAdder(2);
                addTwo(3)",
                Ok(Object::integer(5)),
            ),
            // each call gets a fresh frame; the shadowing `let c` inside
            // the counter never leaks into the captured scope
            (
                "
                let makeCounter = fn() {
                    let c = 0;
                    fn() { let c = c + 1; c }
                };
                let inc = makeCounter();
                inc();
                inc()",
                Ok(Object::integer(1)),
            ),
            // definitions after the closure are visible through the shared
            // scope
            (
                "
                let f = fn() { g() };
                let g = fn() { 2 };
                f()",
                Ok(Object::integer(2)),
            ),
            (
                "
                let fa = fn() {
                    let x = 5;
                    fn() { x }
                };
                let fb = fa();
                fb()",
                Ok(Object::integer(5)),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn arrays_and_indexing() {
        let inputs = vec![
            (
                "[1, 2 * 2, 3 + 3]",
                Ok(Object::array(vec![
                    Object::integer(1),
                    Object::integer(4),
                    Object::integer(6),
                ])),
            ),
            ("[1, 2, 3][0]", Ok(Object::integer(1))),
            ("[1, 2, 3][2]", Ok(Object::integer(3))),
            ("let i = 0; [1][i]", Ok(Object::integer(1))),
            ("let myArray = [1, 2, 3]; myArray[1 + 1]", Ok(Object::integer(3))),
            ("[1, 2, 3][3]", Ok(Object::null())),
            ("[1, 2, 3][-1]", Ok(Object::null())),
            (
                "[1][\"a\"]",
                Err(EvaluationError::NonIntegerIndex("STRING")),
            ),
            ("5[0]", Err(EvaluationError::IndexNotSupported("INTEGER"))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn hashes_and_indexing() {
        let inputs = vec![
            ("{\"foo\": 5}[\"foo\"]", Ok(Object::integer(5))),
            ("{\"foo\": 5}[\"bar\"]", Ok(Object::null())),
            ("let key = \"foo\"; {\"foo\": 5}[key]", Ok(Object::integer(5))),
            ("{}[\"foo\"]", Ok(Object::null())),
            ("{5: 5}[5]", Ok(Object::integer(5))),
            ("{true: 5}[true]", Ok(Object::integer(5))),
            ("{false: 5}[false]", Ok(Object::integer(5))),
            ("{1: \"a\", 1: \"b\"}[1]", Ok(Object::string("b".to_owned()))),
            (
                "{\"name\": \"saru\"}[fn(x) { x }]",
                Err(EvaluationError::UnhashableKey("FUNCTION")),
            ),
            (
                "{\"a\": 1}[[1, 2]]",
                Err(EvaluationError::UnhashableKey("ARRAY")),
            ),
            (
                "{[1, 2]: 1}",
                Err(EvaluationError::UnhashableKey("ARRAY")),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn builtins() {
        let inputs = vec![
            ("len(\"\")", Ok(Object::integer(0))),
            ("len(\"hello\")", Ok(Object::integer(5))),
            ("len([1, 2, 3])", Ok(Object::integer(3))),
            (
                "len(1)",
                Err(EvaluationError::BuiltinArgumentType {
                    name: "len",
                    got: "INTEGER",
                }),
            ),
            (
                "len(\"one\", \"two\")",
                Err(EvaluationError::BuiltinArgumentCount {
                    name: "len",
                    expected: 1,
                    actual: 2,
                }),
            ),
            ("first([1, 2])", Ok(Object::integer(1))),
            ("last([1, 2])", Ok(Object::integer(2))),
            ("first([])", Ok(Object::null())),
            (
                "rest([1, 2, 3])",
                Ok(Object::array(vec![Object::integer(2), Object::integer(3)])),
            ),
            ("rest([])", Ok(Object::null())),
            (
                "push([1], 2)",
                Ok(Object::array(vec![Object::integer(1), Object::integer(2)])),
            ),
            ("puts(\"covered\")", Ok(Object::null())),
            ("to_string(42)", Ok(Object::string("42".to_owned()))),
            // a binding shadows the builtin of the same name
            ("let len = fn(x) { 0 }; len(\"hello\")", Ok(Object::integer(0))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn bare_macro_literal_is_not_callable() {
        let result = evaluate("let m = macro(x) { x }; m(1)");
        assert_eq!(result, Err(EvaluationError::NotAFunction("MACRO")));
    }

    fn test_quote(inputs: Vec<(&str, &str)>) {
        for (input, expected) in inputs {
            let result = evaluate(input).unwrap();
            match result.as_ref() {
                Object::Quote(node) => {
                    assert_eq!(node.to_string(), expected, "input: {}", input)
                }
                other => panic!("expected a quote for input {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn quote_wraps_unevaluated_syntax() {
        let inputs = vec![
            ("quote(5)", "5"),
            ("quote(5 + 8)", "(5 + 8)"),
            ("quote(foobar)", "foobar"),
            ("quote(foobar + barfoo)", "(foobar + barfoo)"),
            // the bound value is irrelevant; the name itself is quoted
            ("let foobar = 8; quote(foobar)", "foobar"),
        ];

        test_quote(inputs);
    }

    #[test]
    fn unquote_splices_evaluated_values() {
        let inputs = vec![
            ("quote(unquote(4))", "4"),
            ("quote(unquote(4 + 4))", "8"),
            ("quote(8 + unquote(4 + 4))", "(8 + 8)"),
            ("quote(unquote(4 + 4) + 8)", "(8 + 8)"),
            ("let foobar = 8; quote(unquote(foobar))", "8"),
            ("quote(unquote(true))", "true"),
            ("quote(unquote(true == false))", "false"),
            ("quote(unquote(quote(4 + 4)))", "(4 + 4)"),
            (
                "let quotedInfixExpression = quote(4 + 4);
                 quote(unquote(4 + 4) + unquote(quotedInfixExpression))",
                "(8 + (4 + 4))",
            ),
            ("quote([1, unquote(2 + 2)])", "[1, 4]"),
        ];

        test_quote(inputs);
    }

    #[test]
    fn errors_inside_unquote_propagate() {
        let result = evaluate("quote(unquote(missing))");
        assert_eq!(
            result,
            Err(EvaluationError::IdentifierNotFound("missing".into()))
        );
    }

    #[test]
    fn quote_requires_one_argument() {
        let result = evaluate("quote(1, 2)");
        assert_eq!(
            result,
            Err(EvaluationError::BuiltinArgumentCount {
                name: "quote",
                expected: 1,
                actual: 2,
            })
        );
    }
}
