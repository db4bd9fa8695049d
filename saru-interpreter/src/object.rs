use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use crate::environment::Environment;
use saru_core::ast;

use thiserror::Error;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Vec<Rc<Object>>),
    Hash(HashMap<HashKey, (Rc<Object>, Rc<Object>)>),
    Function(Function),
    Builtin(Builtin),
    Quote(ast::Expression),
    Macro(Macro),
    Null,
}

thread_local! {
    static NULL: Rc<Object> = Rc::new(Object::Null);
    static TRUE: Rc<Object> = Rc::new(Object::Boolean(true));
    static FALSE: Rc<Object> = Rc::new(Object::Boolean(false));
}

impl Object {
    pub fn null() -> Rc<Object> {
        NULL.with(|x| x.clone())
    }
    pub fn boolean(value: bool) -> Rc<Object> {
        if value {
            TRUE.with(|x| x.clone())
        } else {
            FALSE.with(|x| x.clone())
        }
    }
    pub fn integer(value: i64) -> Rc<Object> {
        Rc::new(Object::Integer(value))
    }
    pub fn string(value: String) -> Rc<Object> {
        Rc::new(Object::String(value))
    }
    pub fn array(elements: Vec<Rc<Object>>) -> Rc<Object> {
        Rc::new(Object::Array(elements))
    }
    pub fn hash(pairs: HashMap<HashKey, (Rc<Object>, Rc<Object>)>) -> Rc<Object> {
        Rc::new(Object::Hash(pairs))
    }
    pub fn function(
        parameters: Vec<ast::Identifier>,
        body: ast::BlockStatement,
        env: Environment,
    ) -> Rc<Object> {
        Rc::new(Object::Function(Function {
            parameters,
            body,
            env,
        }))
    }
    pub fn quote(node: ast::Expression) -> Rc<Object> {
        Rc::new(Object::Quote(node))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function(_) => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::Quote(_) => "QUOTE",
            Object::Macro(_) => "MACRO",
            Object::Null => "NULL",
        }
    }
}

/// Key derived from a hashable object: the variant is the kind tag, the
/// payload the hashed value. Anything outside these three kinds cannot be
/// used as a hash key.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

pub fn object_to_key(object: &Rc<Object>) -> Result<HashKey, EvaluationError> {
    match object.as_ref() {
        Object::Integer(value) => Ok(HashKey::Integer(*value)),
        Object::Boolean(value) => Ok(HashKey::Boolean(*value)),
        Object::String(value) => Ok(HashKey::String(value.clone())),
        _ => Err(EvaluationError::UnhashableKey(object.kind())),
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Function {
    pub parameters: Vec<ast::Identifier>,
    pub body: ast::BlockStatement,
    pub env: Environment,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Macro {
    pub parameters: Vec<ast::Identifier>,
    pub body: ast::BlockStatement,
    pub env: Environment,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub func: fn(Vec<Rc<Object>>) -> Result<Rc<Object>, Signal>,
}

/// Control-flow signal riding the `Err` channel: a `return` travelling up
/// to the enclosing function call, or a runtime error short-circuiting the
/// whole evaluation.
#[derive(Debug, PartialEq)]
pub enum Signal {
    Return(Rc<Object>),
    Error(EvaluationError),
}

impl From<EvaluationError> for Signal {
    fn from(error: EvaluationError) -> Self {
        Signal::Error(error)
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum EvaluationError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(Rc<str>),
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: &'static str,
        operator: &'static str,
        right: &'static str,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operator: &'static str,
        right: &'static str,
    },
    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator {
        operator: &'static str,
        right: &'static str,
    },
    #[error("division by zero: {left} / 0")]
    DivisionByZero { left: i64 },
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("wrong number of arguments: expected {expected}, got {actual}")]
    WrongArgumentCount { expected: usize, actual: usize },
    #[error("wrong number of arguments for `{name}`: expected {expected}, got {actual}")]
    BuiltinArgumentCount {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("argument to `{name}` not supported, got {got}")]
    BuiltinArgumentType {
        name: &'static str,
        got: &'static str,
    },
    #[error("index operator not supported: {0}")]
    IndexNotSupported(&'static str),
    #[error("array index must be an integer, got {0}")]
    NonIntegerIndex(&'static str),
    #[error("unusable as hash key: {0}")]
    UnhashableKey(&'static str),
}

fn join_parameters(parameters: &[ast::Identifier]) -> String {
    parameters
        .iter()
        .map(|parameter| parameter.name.as_ref())
        .collect::<Vec<&str>>()
        .join(", ")
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Object::Hash(pairs) => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Object::Function(function) => {
                write!(
                    f,
                    "fn({}) {}",
                    join_parameters(&function.parameters),
                    function.body
                )
            }
            Object::Macro(macro_object) => {
                write!(
                    f,
                    "macro({}) {}",
                    join_parameters(&macro_object.parameters),
                    macro_object.body
                )
            }
            Object::Builtin(_) => write!(f, "builtin function"),
            Object::Quote(node) => write!(f, "QUOTE({})", node),
        }
    }
}
