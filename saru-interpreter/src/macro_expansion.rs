use std::rc::Rc;

use crate::environment::Environment;
use crate::evaluator;
use crate::object::{Macro, Object, Signal};
use saru_core::ast::{
    BlockStatement, Expression, LetStatement, Program, ReturnStatement, Statement,
};

/// First phase: pull every top-level `let <name> = macro(..) {..};` out of
/// the program and register it in the macro environment. Everything else
/// passes through in order. Only top-level definitions count.
pub fn collect_macros(program: Program, macro_env: &mut Environment) -> Program {
    let mut statements = Vec::with_capacity(program.statements.len());
    for statement in program.statements {
        match statement {
            Statement::Let(LetStatement {
                identifier,
                value: Expression::MacroLiteral { parameters, body },
            }) => {
                let macro_object = Macro {
                    parameters,
                    body,
                    env: macro_env.clone(),
                };
                macro_env.set(identifier.name, Rc::new(Object::Macro(macro_object)));
            }
            other => statements.push(other),
        }
    }
    Program { statements }
}

/// Second phase: rebuild the tree, replacing every call to a registered
/// macro with the syntax its body produces. Children are rewritten before
/// their parents; spliced output is not rewritten again, so running the
/// pass over an already-expanded program changes nothing.
pub fn expand_macros(program: Program, macro_env: &mut Environment) -> Program {
    let statements = program
        .statements
        .into_iter()
        .map(|statement| expand_statement(statement, macro_env))
        .collect();
    Program { statements }
}

fn expand_statement(statement: Statement, macro_env: &mut Environment) -> Statement {
    match statement {
        Statement::Let(statement) => Statement::Let(LetStatement {
            identifier: statement.identifier,
            value: expand_expression(statement.value, macro_env),
        }),
        Statement::Return(statement) => Statement::Return(ReturnStatement {
            value: expand_expression(statement.value, macro_env),
        }),
        Statement::Expression(expression) => {
            Statement::Expression(expand_expression(expression, macro_env))
        }
    }
}

fn expand_block(block: BlockStatement, macro_env: &mut Environment) -> BlockStatement {
    let statements = block
        .statements
        .into_iter()
        .map(|statement| expand_statement(statement, macro_env))
        .collect();
    BlockStatement { statements }
}

fn expand_expression(expression: Expression, macro_env: &mut Environment) -> Expression {
    use saru_core::ast::Expression::*;
    match expression {
        CallExpression {
            function,
            arguments,
        } => {
            let function = Box::new(expand_expression(*function, macro_env));
            let arguments: Vec<Expression> = arguments
                .into_iter()
                .map(|argument| expand_expression(argument, macro_env))
                .collect();
            match lookup_macro(&function, macro_env) {
                Some(macro_object) => expand_call(&macro_object, arguments),
                None => CallExpression {
                    function,
                    arguments,
                },
            }
        }
        PrefixOperation(kind, operand) => {
            PrefixOperation(kind, Box::new(expand_expression(*operand, macro_env)))
        }
        InfixOperation(kind, left, right) => InfixOperation(
            kind,
            Box::new(expand_expression(*left, macro_env)),
            Box::new(expand_expression(*right, macro_env)),
        ),
        ArrayLiteral(elements) => ArrayLiteral(
            elements
                .into_iter()
                .map(|element| expand_expression(element, macro_env))
                .collect(),
        ),
        HashLiteral(pairs) => HashLiteral(
            pairs
                .into_iter()
                .map(|(key, value)| {
                    (
                        expand_expression(key, macro_env),
                        expand_expression(value, macro_env),
                    )
                })
                .collect(),
        ),
        IndexExpression { left, index } => IndexExpression {
            left: Box::new(expand_expression(*left, macro_env)),
            index: Box::new(expand_expression(*index, macro_env)),
        },
        IfExpression {
            condition,
            consequence,
            alternative,
        } => IfExpression {
            condition: Box::new(expand_expression(*condition, macro_env)),
            consequence: expand_block(consequence, macro_env),
            alternative: alternative.map(|block| expand_block(block, macro_env)),
        },
        FunctionLiteral { parameters, body } => FunctionLiteral {
            parameters,
            body: expand_block(body, macro_env),
        },
        MacroLiteral { parameters, body } => MacroLiteral {
            parameters,
            body: expand_block(body, macro_env),
        },
        leaf @ (Identifier(_) | IntegerLiteral(_) | StringLiteral(_) | BooleanLiteral(_)) => leaf,
    }
}

fn lookup_macro(function: &Expression, macro_env: &Environment) -> Option<Macro> {
    let Expression::Identifier(identifier) = function else {
        return None;
    };
    let object = macro_env.get(&identifier.name)?;
    match object.as_ref() {
        Object::Macro(macro_object) => Some(macro_object.clone()),
        _ => None,
    }
}

/// The arguments reach the macro body as quoted syntax, unevaluated. The
/// body runs against the macro's captured environment and must hand back a
/// Quote; anything else is a bug in the macro, not a runtime condition the
/// language can recover from.
fn expand_call(macro_object: &Macro, arguments: Vec<Expression>) -> Expression {
    assert_eq!(
        macro_object.parameters.len(),
        arguments.len(),
        "macro called with wrong number of arguments: expected {}, got {}",
        macro_object.parameters.len(),
        arguments.len()
    );

    let mut environment = Environment::new_enclosed(&macro_object.env);
    for (parameter, argument) in macro_object.parameters.iter().zip(arguments) {
        environment.set(parameter.name.clone(), Object::quote(argument));
    }

    let result = match evaluator::eval_block_statement(&macro_object.body, &mut environment) {
        Ok(object) | Err(Signal::Return(object)) => object,
        Err(Signal::Error(error)) => panic!("macro expansion failed: {}", error),
    };
    match result.as_ref() {
        Object::Quote(node) => node.clone(),
        _ => panic!("macros must return quoted syntax, got {}", result.kind()),
    }
}
