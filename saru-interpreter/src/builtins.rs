use std::rc::Rc;

use crate::object::{Builtin, EvaluationError, Object, Signal};

/// Fixed table, consulted only after an identifier misses the whole
/// environment chain. A `let` binding of the same name shadows the builtin.
pub(crate) fn lookup(name: &str) -> Option<Rc<Object>> {
    let builtin = match name {
        "len" => Builtin {
            name: "len",
            func: builtin_len,
        },
        "first" => Builtin {
            name: "first",
            func: builtin_first,
        },
        "last" => Builtin {
            name: "last",
            func: builtin_last,
        },
        "rest" => Builtin {
            name: "rest",
            func: builtin_rest,
        },
        "push" => Builtin {
            name: "push",
            func: builtin_push,
        },
        "puts" => Builtin {
            name: "puts",
            func: builtin_puts,
        },
        "to_string" => Builtin {
            name: "to_string",
            func: builtin_to_string,
        },
        _ => return None,
    };
    Some(Rc::new(Object::Builtin(builtin)))
}

fn wrong_argument_count(name: &'static str, expected: usize, actual: usize) -> Signal {
    Signal::Error(EvaluationError::BuiltinArgumentCount {
        name,
        expected,
        actual,
    })
}

fn wrong_argument_type(name: &'static str, got: &Rc<Object>) -> Signal {
    Signal::Error(EvaluationError::BuiltinArgumentType {
        name,
        got: got.kind(),
    })
}

fn builtin_len(args: Vec<Rc<Object>>) -> Result<Rc<Object>, Signal> {
    if args.len() != 1 {
        return Err(wrong_argument_count("len", 1, args.len()));
    }
    match args[0].as_ref() {
        Object::String(value) => Ok(Object::integer(value.len() as i64)),
        Object::Array(elements) => Ok(Object::integer(elements.len() as i64)),
        _ => Err(wrong_argument_type("len", &args[0])),
    }
}

fn builtin_first(args: Vec<Rc<Object>>) -> Result<Rc<Object>, Signal> {
    if args.len() != 1 {
        return Err(wrong_argument_count("first", 1, args.len()));
    }
    match args[0].as_ref() {
        Object::Array(elements) => Ok(elements.first().cloned().unwrap_or_else(Object::null)),
        _ => Err(wrong_argument_type("first", &args[0])),
    }
}

fn builtin_last(args: Vec<Rc<Object>>) -> Result<Rc<Object>, Signal> {
    if args.len() != 1 {
        return Err(wrong_argument_count("last", 1, args.len()));
    }
    match args[0].as_ref() {
        Object::Array(elements) => Ok(elements.last().cloned().unwrap_or_else(Object::null)),
        _ => Err(wrong_argument_type("last", &args[0])),
    }
}

fn builtin_rest(args: Vec<Rc<Object>>) -> Result<Rc<Object>, Signal> {
    if args.len() != 1 {
        return Err(wrong_argument_count("rest", 1, args.len()));
    }
    match args[0].as_ref() {
        Object::Array(elements) => {
            if elements.is_empty() {
                return Ok(Object::null());
            }
            Ok(Object::array(elements[1..].to_vec()))
        }
        _ => Err(wrong_argument_type("rest", &args[0])),
    }
}

fn builtin_push(args: Vec<Rc<Object>>) -> Result<Rc<Object>, Signal> {
    if args.len() != 2 {
        return Err(wrong_argument_count("push", 2, args.len()));
    }
    match args[0].as_ref() {
        Object::Array(elements) => {
            let mut extended = elements.clone();
            extended.push(args[1].clone());
            Ok(Object::array(extended))
        }
        _ => Err(wrong_argument_type("push", &args[0])),
    }
}

fn builtin_puts(args: Vec<Rc<Object>>) -> Result<Rc<Object>, Signal> {
    for arg in &args {
        println!("{}", arg);
    }
    Ok(Object::null())
}

fn builtin_to_string(args: Vec<Rc<Object>>) -> Result<Rc<Object>, Signal> {
    if args.len() != 1 {
        return Err(wrong_argument_count("to_string", 1, args.len()));
    }
    Ok(Object::string(args[0].to_string()))
}
