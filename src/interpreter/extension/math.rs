use crate::{
    error::RuntimeError,
    interpreter::{
        extension::registry::{ArgType, Extension},
        value::core::Value,
    },
    util::num::{float_to_int, int_to_float},
};

/// Defines an extension taking one float and returning a float.
///
/// Integer arguments are converted by the registry before the callback runs.
macro_rules! float_extension {
    ($name:literal, $method:ident) => {
        Extension::new($name, 1, Some(1), vec![ArgType::Float], |_, extension, args| {
            Ok(Value::Float(float_arg(extension, args, 0)?.$method()))
        })
    };
}

/// Returns argument `index` as a float.
///
/// # Errors
/// `WrongArgumentType` if the argument is not a number.
pub fn float_arg(extension: &Extension, args: &[Value], index: usize) -> Result<f64, RuntimeError> {
    match args.get(index) {
        Some(Value::Float(f)) => Ok(*f),
        Some(Value::Integer(i)) => Ok(int_to_float(*i)),
        other => Err(RuntimeError::WrongArgumentType { name:     extension.name.clone(),
                                                       position: index + 1,
                                                       expected: ArgType::Float.name(),
                                                       got:      other.map_or("NIL", Value::type_name), }),
    }
}

fn round(extension: &Extension, args: &[Value]) -> Result<Value, RuntimeError> {
    let x = float_arg(extension, args, 0)?;
    float_to_int(x.round()).map(Value::Integer)
                           .ok_or_else(|| RuntimeError::InvalidArgument { name:    extension.name.clone(),
                                                                          details: format!("{x} does not round to an integer"), })
}

fn abs(extension: &Extension, args: &[Value]) -> Result<Value, RuntimeError> {
    match args {
        [Value::Integer(i)] => Ok(Value::Integer(i.wrapping_abs())),
        [Value::Float(f)] => Ok(Value::Float(f.abs())),
        [other] => Err(RuntimeError::WrongArgumentType { name:     extension.name.clone(),
                                                         position: 1,
                                                         expected: "INTEGER or FLOAT",
                                                         got:      other.type_name(), }),
        _ => Ok(Value::Null),
    }
}

/// Math extensions: trigonometry, powers, logarithms and rounding.
///
/// # Example
/// ```
/// use grol::interpreter::extension::math::extensions;
///
/// let names: Vec<String> = extensions().into_iter().map(|e| e.name).collect();
/// assert!(names.contains(&"sqrt".to_string()));
/// assert!(names.contains(&"pow".to_string()));
/// ```
#[must_use]
pub fn extensions() -> Vec<Extension> {
    vec![float_extension!("sin", sin),
         float_extension!("cos", cos),
         float_extension!("tan", tan),
         float_extension!("asin", asin),
         float_extension!("acos", acos),
         float_extension!("atan", atan),
         float_extension!("sqrt", sqrt),
         float_extension!("ln", ln),
         float_extension!("log10", log10),
         float_extension!("exp", exp),
         float_extension!("trunc", trunc),
         float_extension!("floor", floor),
         float_extension!("ceil", ceil),
         Extension::new("round", 1, Some(1), vec![ArgType::Float], |_, extension, args| {
             round(extension, args)
         }),
         Extension::new("abs", 1, Some(1), vec![ArgType::Any], |_, extension, args| {
             abs(extension, args)
         }),
         Extension::new("pow",
                        2,
                        Some(2),
                        vec![ArgType::Float, ArgType::Float],
                        |_, extension, args| {
                            let base = float_arg(extension, args, 0)?;
                            let exp = float_arg(extension, args, 1)?;
                            Ok(Value::Float(base.powf(exp)))
                        }),
         Extension::new("atan2",
                        2,
                        Some(2),
                        vec![ArgType::Float, ArgType::Float],
                        |_, extension, args| {
                            let y = float_arg(extension, args, 0)?;
                            let x = float_arg(extension, args, 1)?;
                            Ok(Value::Float(y.atan2(x)))
                        }),]
}
