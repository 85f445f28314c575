use std::fmt;
use std::rc::Rc;

use crate::runtime::class::{Class, ClassInstance};
use crate::runtime::context::Context;
use crate::runtime::error::RuntimeError;
use crate::runtime::execution::{Closure, ExecResult, Executable, Interrupt};

const STR_METHOD: &str = "__str__";
const SELF_NAME: &str = "self";

/// The object universe of the language.
pub enum Object {
    Number(i32),
    String(String),
    Bool(bool),
    Class(Rc<Class>),
    Instance(ClassInstance),
}

/// A shared handle to a runtime object. The empty handle is the language's
/// `None` value. Cloning shares the referent; dropping the last clone
/// reclaims it.
#[derive(Clone, Default)]
pub struct Value {
    object: Option<Rc<Object>>,
}

impl Value {
    /// Takes ownership of a freshly constructed object.
    pub fn own(object: Object) -> Self {
        Self {
            object: Some(Rc::new(object)),
        }
    }

    /// The null handle.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn number(value: i32) -> Self {
        Self::own(Object::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::own(Object::String(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Self::own(Object::Bool(value))
    }

    pub fn class(class: Rc<Class>) -> Self {
        Self::own(Object::Class(class))
    }

    pub fn instance(instance: ClassInstance) -> Self {
        Self::own(Object::Instance(instance))
    }

    pub fn get(&self) -> Option<&Object> {
        self.object.as_deref()
    }

    pub fn is_null(&self) -> bool {
        self.object.is_none()
    }

    pub fn as_number(&self) -> Option<i32> {
        match self.get() {
            Some(Object::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self.get() {
            Some(Object::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.get() {
            Some(Object::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Rc<Class>> {
        match self.get() {
            Some(Object::Class(class)) => Some(class),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&ClassInstance> {
        match self.get() {
            Some(Object::Instance(instance)) => Some(instance),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.get() {
            Some(Object::Number(_)) => "number",
            Some(Object::String(_)) => "string",
            Some(Object::Bool(_)) => "bool",
            Some(Object::Class(_)) => "class",
            Some(Object::Instance(_)) => "instance",
            None => "None",
        }
    }

    /// Truth value used by conditions and the logic operators. Only
    /// primitives can be truthy; classes and instances never are.
    pub fn is_truthy(&self) -> bool {
        match self.get() {
            Some(Object::Number(value)) => *value != 0,
            Some(Object::String(value)) => !value.is_empty(),
            Some(Object::Bool(value)) => *value,
            Some(Object::Class(_) | Object::Instance(_)) | None => false,
        }
    }

    /// Invokes `method` on a class instance, with `self` bound to this
    /// handle and the actual arguments bound positionally to the declared
    /// formals in a fresh scope.
    pub fn call_method(
        &self,
        method: &str,
        args: &[Value],
        context: &mut dyn Context,
    ) -> ExecResult {
        let instance = self
            .as_instance()
            .ok_or_else(|| RuntimeError::NotAnInstance {
                type_name: self.type_name(),
            })?;
        let class = instance.class();
        let found = class
            .get_method(method)
            .filter(|found| found.formal_params.len() == args.len())
            .ok_or_else(|| RuntimeError::UnknownMethod {
                class: class.name().to_string(),
                method: method.to_string(),
                arity: args.len(),
            })?;

        let mut scope = Closure::new();
        scope.insert(SELF_NAME.to_string(), self.clone());
        for (param, arg) in found.formal_params.iter().zip(args) {
            scope.insert(param.clone(), arg.clone());
        }
        found.body.execute(&mut scope, context)
    }

    /// Renders the value the way `print` shows it. Instances render through
    /// their `__str__` when they define one, falling back to an opaque
    /// address form. The null handle does not render; `print` and
    /// stringification spell it out as `None` themselves.
    pub fn to_output(&self, context: &mut dyn Context) -> Result<String, Interrupt> {
        match self.get() {
            Some(Object::Number(value)) => Ok(value.to_string()),
            Some(Object::String(value)) => Ok(value.clone()),
            Some(Object::Bool(value)) => Ok(if *value { "True" } else { "False" }.to_string()),
            Some(Object::Class(class)) => Ok(format!("Class {}", class.name())),
            Some(Object::Instance(instance)) => {
                if instance.has_method(STR_METHOD, 0) {
                    let rendered = self.call_method(STR_METHOD, &[], context)?;
                    rendered.to_output(context)
                } else {
                    Ok(format!("{:p}", std::ptr::from_ref(instance)))
                }
            }
            None => Err(RuntimeError::ExpectedValue.into()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Constant, MethodBody, Return, Stringify, VariableValue};
    use crate::runtime::class::Method;
    use crate::runtime::context::BufferedContext;

    fn str_method(body: Box<dyn crate::runtime::Executable>) -> Method {
        Method {
            name: STR_METHOD.to_string(),
            formal_params: vec![],
            body: Box::new(MethodBody::new(body)),
        }
    }

    #[test]
    fn truthiness_follows_payloads_for_primitives() {
        assert!(Value::number(7).is_truthy());
        assert!(!Value::number(0).is_truthy());
        assert!(Value::string("x").is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(Value::boolean(true).is_truthy());
        assert!(!Value::boolean(false).is_truthy());
        assert!(!Value::none().is_truthy());
    }

    #[test]
    fn classes_and_instances_are_never_truthy() {
        let class = Rc::new(Class::new("Thing", vec![], None));
        assert!(!Value::class(Rc::clone(&class)).is_truthy());
        assert!(!Value::instance(ClassInstance::new(class)).is_truthy());
    }

    #[test]
    fn renders_primitives_and_classes() {
        let mut context = BufferedContext::new();
        assert_eq!(
            Value::number(-3).to_output(&mut context).expect("render"),
            "-3"
        );
        assert_eq!(
            Value::string("raw text").to_output(&mut context).expect("render"),
            "raw text"
        );
        assert_eq!(
            Value::boolean(true).to_output(&mut context).expect("render"),
            "True"
        );
        assert_eq!(
            Value::boolean(false).to_output(&mut context).expect("render"),
            "False"
        );
        let class = Rc::new(Class::new("Counter", vec![], None));
        assert_eq!(
            Value::class(class).to_output(&mut context).expect("render"),
            "Class Counter"
        );
    }

    #[test]
    fn null_handle_does_not_render() {
        let mut context = BufferedContext::new();
        let error = Value::none()
            .to_output(&mut context)
            .expect_err("expected render failure");
        assert!(matches!(
            error,
            Interrupt::Error(RuntimeError::ExpectedValue)
        ));
    }

    #[test]
    fn instances_render_through_str_method() {
        let class = Rc::new(Class::new(
            "Named",
            vec![str_method(Box::new(Return::new(Box::new(Constant::string(
                "a named thing",
            )))))],
            None,
        ));
        let value = Value::instance(ClassInstance::new(class));
        let mut context = BufferedContext::new();
        assert_eq!(value.to_output(&mut context).expect("render"), "a named thing");
    }

    #[test]
    fn instances_without_str_render_as_address() {
        let class = Rc::new(Class::new("Opaque", vec![], None));
        let value = Value::instance(ClassInstance::new(class));
        let mut context = BufferedContext::new();
        let rendered = value.to_output(&mut context).expect("render");
        assert!(rendered.starts_with("0x"), "unexpected form: {rendered}");
    }

    #[test]
    fn call_method_binds_self_and_formals() {
        // stamp(suffix): return __str__ of self plus the given suffix; the
        // body reads both bindings from the method scope.
        let class = Rc::new(Class::new(
            "Tag",
            vec![
                str_method(Box::new(Return::new(Box::new(Constant::string("tag"))))),
                Method {
                    name: "stamp".to_string(),
                    formal_params: vec!["suffix".to_string()],
                    body: Box::new(MethodBody::new(Box::new(Return::new(Box::new(
                        crate::ast::Add::new(
                            Box::new(Stringify::new(Box::new(VariableValue::new("self")))),
                            Box::new(VariableValue::new("suffix")),
                        ),
                    ))))),
                },
            ],
            None,
        ));
        let value = Value::instance(ClassInstance::new(class));
        let mut context = BufferedContext::new();
        let result = value
            .call_method("stamp", &[Value::string("!")], &mut context)
            .expect("call should succeed");
        assert_eq!(result.as_string(), Some("tag!"));
    }

    #[test]
    fn call_method_rejects_wrong_arity_and_non_instances() {
        let class = Rc::new(Class::new(
            "Tag",
            vec![str_method(Box::new(Return::new(Box::new(Constant::string("tag")))))],
            None,
        ));
        let value = Value::instance(ClassInstance::new(class));
        let mut context = BufferedContext::new();

        let error = value
            .call_method(STR_METHOD, &[Value::number(1)], &mut context)
            .expect_err("expected arity failure");
        assert!(matches!(
            error,
            Interrupt::Error(RuntimeError::UnknownMethod { arity: 1, .. })
        ));

        let error = Value::number(5)
            .call_method(STR_METHOD, &[], &mut context)
            .expect_err("expected non-instance failure");
        assert!(matches!(
            error,
            Interrupt::Error(RuntimeError::NotAnInstance { type_name: "number" })
        ));
    }
}
