//! End-to-end program scenarios.
//!
//! The parser is an external collaborator, so each test builds the tree its
//! source program parses to and checks the output the program prints. The
//! source form appears in a comment above each tree.

use std::rc::Rc;

use anyhow::Result;

use minipy::ast::{
    Add, Assignment, ClassDefinition, Comparison, Compound, Constant, FieldAssignment, IfElse,
    MethodBody, MethodCall, Mult, NewInstance, Or, Print, Return, Stringify, VariableValue,
};
use minipy::interpreter;
use minipy::runtime::{Class, Executable, Method, Value, compare};

fn num(value: i32) -> Box<dyn Executable> {
    Box::new(Constant::number(value))
}

fn text(value: &str) -> Box<dyn Executable> {
    Box::new(Constant::string(value))
}

fn var(name: &str) -> Box<dyn Executable> {
    Box::new(VariableValue::new(name))
}

fn self_field(field: &str) -> Box<dyn Executable> {
    Box::new(VariableValue::dotted(vec![
        "self".to_string(),
        field.to_string(),
    ]))
}

fn method(name: &str, formal_params: Vec<&str>, body: Box<dyn Executable>) -> Method {
    Method {
        name: name.to_string(),
        formal_params: formal_params.into_iter().map(str::to_string).collect(),
        body: Box::new(MethodBody::new(body)),
    }
}

#[test]
fn prints_arithmetic_with_precedence() -> Result<()> {
    // print 1 + 2 * 3
    let program = Print::new(vec![Box::new(Add::new(
        num(1),
        Box::new(Mult::new(num(2), num(3))),
    ))]);
    assert_eq!(interpreter::run_captured(&program)?, "7\n");
    Ok(())
}

#[test]
fn concatenates_strings_from_variables() -> Result<()> {
    // x = "ab"
    // y = "cd"
    // print x + y
    let program = Compound::new(vec![
        Box::new(Assignment::new("x", text("ab"))),
        Box::new(Assignment::new("y", text("cd"))),
        Box::new(Print::new(vec![Box::new(Add::new(var("x"), var("y")))])),
    ]);
    assert_eq!(interpreter::run_captured(&program)?, "abcd\n");
    Ok(())
}

#[test]
fn if_else_prints_the_taken_branch() -> Result<()> {
    // if 1 < 2:
    //   print "yes"
    // else:
    //   print "no"
    let program = IfElse::new(
        Box::new(Comparison::new(compare::less, num(1), num(2))),
        Box::new(Print::new(vec![text("yes")])),
        Some(Box::new(Print::new(vec![text("no")]))),
    );
    assert_eq!(interpreter::run_captured(&program)?, "yes\n");
    Ok(())
}

#[test]
fn instance_prints_through_str_method() -> Result<()> {
    // class Greeter:
    //   def __init__(name):
    //     self.name = name
    //   def __str__():
    //     return "hi " + self.name
    // g = Greeter("world")
    // print g
    let greeter = Rc::new(Class::new(
        "Greeter",
        vec![
            method(
                "__init__",
                vec!["name"],
                Box::new(FieldAssignment::new(
                    VariableValue::new("self"),
                    "name",
                    var("name"),
                )),
            ),
            method(
                "__str__",
                vec![],
                Box::new(Return::new(Box::new(Add::new(
                    text("hi "),
                    self_field("name"),
                )))),
            ),
        ],
        None,
    ));
    let program = Compound::new(vec![
        Box::new(ClassDefinition::new(Value::class(Rc::clone(&greeter)))),
        Box::new(Assignment::new(
            "g",
            Box::new(NewInstance::with_args(greeter, vec![text("world")])),
        )),
        Box::new(Print::variable("g")),
    ]);
    assert_eq!(interpreter::run_captured(&program)?, "hi world\n");
    Ok(())
}

#[test]
fn override_in_derived_class_wins() -> Result<()> {
    // class A:
    //   def f():
    //     return 1
    // class B(A):
    //   def f():
    //     return 2
    // print B().f()
    let base = Rc::new(Class::new(
        "A",
        vec![method("f", vec![], Box::new(Return::new(num(1))))],
        None,
    ));
    let derived = Rc::new(Class::new(
        "B",
        vec![method("f", vec![], Box::new(Return::new(num(2))))],
        Some(Rc::clone(&base)),
    ));
    let program = Compound::new(vec![
        Box::new(ClassDefinition::new(Value::class(base))),
        Box::new(ClassDefinition::new(Value::class(Rc::clone(&derived)))),
        Box::new(Print::new(vec![Box::new(MethodCall::new(
            Box::new(NewInstance::new(derived)),
            "f",
            vec![],
        ))])),
    ]);
    assert_eq!(interpreter::run_captured(&program)?, "2\n");
    Ok(())
}

#[test]
fn inherited_method_is_reachable_from_derived_instances() -> Result<()> {
    // class A:
    //   def tag():
    //     return "base"
    // class B(A):
    //   pass
    // print B().tag()
    let base = Rc::new(Class::new(
        "A",
        vec![method("tag", vec![], Box::new(Return::new(text("base"))))],
        None,
    ));
    let derived = Rc::new(Class::new("B", vec![], Some(Rc::clone(&base))));
    let program = Compound::new(vec![
        Box::new(ClassDefinition::new(Value::class(base))),
        Box::new(ClassDefinition::new(Value::class(Rc::clone(&derived)))),
        Box::new(Print::new(vec![Box::new(MethodCall::new(
            Box::new(NewInstance::new(derived)),
            "tag",
            vec![],
        ))])),
    ]);
    assert_eq!(interpreter::run_captured(&program)?, "base\n");
    Ok(())
}

#[test]
fn or_never_reaches_its_right_operand_when_left_is_truthy() -> Result<()> {
    // print (1 == 1) or undefined_name
    let program = Print::new(vec![Box::new(Or::new(
        Box::new(Comparison::new(compare::equal, num(1), num(1))),
        var("undefined_name"),
    ))]);
    assert_eq!(interpreter::run_captured(&program)?, "True\n");
    Ok(())
}

#[test]
fn method_with_conditional_return_clamps_values() -> Result<()> {
    // class Clamp:
    //   def __init__(limit):
    //     self.limit = limit
    //   def apply(value):
    //     if self.limit < value:
    //       return self.limit
    //     return value
    // print Clamp(10).apply(15), Clamp(10).apply(3)
    let clamp = Rc::new(Class::new(
        "Clamp",
        vec![
            method(
                "__init__",
                vec!["limit"],
                Box::new(FieldAssignment::new(
                    VariableValue::new("self"),
                    "limit",
                    var("limit"),
                )),
            ),
            method(
                "apply",
                vec!["value"],
                Box::new(Compound::new(vec![
                    Box::new(IfElse::new(
                        Box::new(Comparison::new(
                            compare::less,
                            self_field("limit"),
                            var("value"),
                        )),
                        Box::new(Return::new(self_field("limit"))),
                        None,
                    )),
                    Box::new(Return::new(var("value"))),
                ])),
            ),
        ],
        None,
    ));
    let program = Compound::new(vec![
        Box::new(ClassDefinition::new(Value::class(Rc::clone(&clamp)))),
        Box::new(Print::new(vec![
            Box::new(MethodCall::new(
                Box::new(NewInstance::with_args(Rc::clone(&clamp), vec![num(10)])),
                "apply",
                vec![num(15)],
            )),
            Box::new(MethodCall::new(
                Box::new(NewInstance::with_args(clamp, vec![num(10)])),
                "apply",
                vec![num(3)],
            )),
        ])),
    ]);
    assert_eq!(interpreter::run_captured(&program)?, "10 3\n");
    Ok(())
}

#[test]
fn none_prints_and_stringifies_as_the_literal() -> Result<()> {
    // x = None
    // print x, str(x) + '!'
    let program = Compound::new(vec![
        Box::new(Assignment::new("x", Box::new(Constant::none()))),
        Box::new(Print::new(vec![
            var("x"),
            Box::new(Add::new(Box::new(Stringify::new(var("x"))), text("!"))),
        ])),
    ]);
    assert_eq!(interpreter::run_captured(&program)?, "None None!\n");
    Ok(())
}
