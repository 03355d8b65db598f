use std::time::Duration;

use crate::{
    functions::{Function, FunctionError},
    value::Value,
};

fn one_arg(args: &[Value]) -> Result<&Value, FunctionError> {
    match args {
        [arg] => Ok(arg),
        _ => Err(FunctionError::ArgCount {
            expected: 1,
            got: args.len(),
        }),
    }
}

/// Truncates toward zero, failing on NaN, infinities and values outside int64.
fn truncate_float(n: f64) -> Result<i64, FunctionError> {
    let t = n.trunc();
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    if t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Ok(t as i64)
    } else {
        Err(FunctionError::Conversion(format!(
            "float64 {} does not fit in int64",
            n
        )))
    }
}

fn float_arg(args: &[Value]) -> Result<f64, FunctionError> {
    match one_arg(args)? {
        Value::Float(x) => Ok(*x),
        other => Err(FunctionError::ArgType {
            expected: "float64",
            got: other.type_name(),
        }),
    }
}

/// `bool(x)`
#[derive(Debug, Default)]
pub struct BoolCast;

impl Function for BoolCast {
    fn call(&mut self, args: &[Value]) -> Result<Value, FunctionError> {
        let b = match one_arg(args)? {
            Value::Bool(b) => *b,
            Value::Int(0) => false,
            Value::Int(1) => true,
            Value::Float(n) if *n == 0.0 => false,
            Value::Float(n) if *n == 1.0 => true,
            Value::String(s) => match s.as_str() {
                "1" | "t" | "T" | "true" | "TRUE" | "True" => true,
                "0" | "f" | "F" | "false" | "FALSE" | "False" => false,
                _ => {
                    return Err(FunctionError::Conversion(format!(
                        "cannot convert string {:?} to bool",
                        s
                    )));
                }
            },
            other => {
                return Err(FunctionError::Conversion(format!(
                    "cannot convert {} {} to bool",
                    other.type_name(),
                    other
                )));
            }
        };
        Ok(Value::Bool(b))
    }

    fn reset(&mut self) {}
}

/// `int(x)`, floats are truncated and durations become nanoseconds
#[derive(Debug, Default)]
pub struct IntCast;

impl Function for IntCast {
    fn call(&mut self, args: &[Value]) -> Result<Value, FunctionError> {
        let n = match one_arg(args)? {
            Value::Bool(b) => i64::from(*b),
            Value::Int(n) => *n,
            Value::Float(n) => truncate_float(*n)?,
            Value::String(s) => s.parse::<i64>().map_err(|e| {
                FunctionError::Conversion(format!("cannot convert string {:?} to int64: {}", s, e))
            })?,
            Value::Duration(d) => i64::try_from(d.as_nanos()).map_err(|_| {
                FunctionError::Conversion(format!("duration {:?} overflows int64", d))
            })?,
            other => {
                return Err(FunctionError::ArgType {
                    expected: "bool, int64, float64, string or duration",
                    got: other.type_name(),
                });
            }
        };
        Ok(Value::Int(n))
    }

    fn reset(&mut self) {}
}

/// `float(x)`
#[derive(Debug, Default)]
pub struct FloatCast;

impl Function for FloatCast {
    fn call(&mut self, args: &[Value]) -> Result<Value, FunctionError> {
        let n = match one_arg(args)? {
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
            Value::Int(n) => *n as f64,
            Value::Float(n) => *n,
            Value::String(s) => s.parse::<f64>().map_err(|e| {
                FunctionError::Conversion(format!(
                    "cannot convert string {:?} to float64: {}",
                    s, e
                ))
            })?,
            other => {
                return Err(FunctionError::ArgType {
                    expected: "bool, int64, float64 or string",
                    got: other.type_name(),
                });
            }
        };
        Ok(Value::Float(n))
    }

    fn reset(&mut self) {}
}

/// `string(x)`
#[derive(Debug, Default)]
pub struct StringCast;

impl Function for StringCast {
    fn call(&mut self, args: &[Value]) -> Result<Value, FunctionError> {
        let s = match one_arg(args)? {
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Duration(d) => format_duration(*d),
            other => {
                return Err(FunctionError::ArgType {
                    expected: "bool, int64, float64, string or duration",
                    got: other.type_name(),
                });
            }
        };
        Ok(Value::String(s))
    }

    fn reset(&mut self) {}
}

/// Largest unit that divides the duration evenly, e.g. `90s` → `"90s"`, `2h` → `"2h"`.
fn format_duration(d: Duration) -> String {
    const UNITS: [(&str, u128); 7] = [
        ("w", 7 * 24 * 3_600_000_000_000),
        ("d", 24 * 3_600_000_000_000),
        ("h", 3_600_000_000_000),
        ("m", 60_000_000_000),
        ("s", 1_000_000_000),
        ("ms", 1_000_000),
        ("u", 1_000),
    ];

    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    for (suffix, size) in UNITS {
        if nanos % size == 0 {
            return format!("{}{}", nanos / size, suffix);
        }
    }
    format!("{}ns", nanos)
}

/// `abs(x)`
#[derive(Debug, Default)]
pub struct Abs;

impl Function for Abs {
    fn call(&mut self, args: &[Value]) -> Result<Value, FunctionError> {
        match one_arg(args)? {
            Value::Int(n) => Ok(Value::Int(n.wrapping_abs())),
            Value::Float(n) => Ok(Value::Float(n.abs())),
            other => Err(FunctionError::ArgType {
                expected: "int64 or float64",
                got: other.type_name(),
            }),
        }
    }

    fn reset(&mut self) {}
}

/// `count()`, the number of calls since the last reset
#[derive(Debug, Default)]
pub struct Count {
    n: i64,
}

impl Function for Count {
    fn call(&mut self, args: &[Value]) -> Result<Value, FunctionError> {
        if !args.is_empty() {
            return Err(FunctionError::ArgCount {
                expected: 0,
                got: args.len(),
            });
        }
        self.n += 1;
        Ok(Value::Int(self.n))
    }

    fn reset(&mut self) {
        self.n = 0;
    }
}

/// `sigma(x)`, how many standard deviations `x` is from the running mean.
///
/// Uses Welford's online algorithm. Returns `0.0` until two samples were seen.
#[derive(Debug, Default)]
pub struct Sigma {
    n: f64,
    mean: f64,
    m2: f64,
}

impl Function for Sigma {
    fn call(&mut self, args: &[Value]) -> Result<Value, FunctionError> {
        let x = float_arg(args)?;

        self.n += 1.0;
        let delta = x - self.mean;
        self.mean += delta / self.n;
        self.m2 += delta * (x - self.mean);

        if self.n < 2.0 {
            return Ok(Value::Float(0.0));
        }
        let variance = self.m2 / (self.n - 1.0);
        Ok(Value::Float((x - self.mean).abs() / variance.sqrt()))
    }

    fn reset(&mut self) {
        *self = Sigma::default();
    }
}

/// `spread(x)`, running maximum minus running minimum
#[derive(Debug)]
pub struct Spread {
    min: f64,
    max: f64,
}

impl Default for Spread {
    fn default() -> Self {
        Spread {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Function for Spread {
    fn call(&mut self, args: &[Value]) -> Result<Value, FunctionError> {
        let x = float_arg(args)?;
        self.min = self.min.min(x);
        self.max = self.max.max(x);
        Ok(Value::Float(self.max - self.min))
    }

    fn reset(&mut self) {
        *self = Spread::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "90s");
        assert_eq!(format_duration(Duration::from_secs(7200)), "2h");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1500ms");
        assert_eq!(format_duration(Duration::from_nanos(7)), "7ns");
    }

    #[test]
    fn test_sigma_needs_two_samples() {
        let mut sigma = Sigma::default();
        assert_eq!(sigma.call(&[Value::Float(10.0)]), Ok(Value::Float(0.0)));
        // mean 15, sample stddev ~7.07
        let Value::Float(s) = sigma.call(&[Value::Float(20.0)]).unwrap() else {
            panic!("sigma returned a non-float");
        };
        assert!((s - 5.0 / 50f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_int_rejects_unrepresentable_floats() {
        let mut int = IntCast;
        assert_eq!(int.call(&[Value::Float(-2.9)]), Ok(Value::Int(-2)));
        assert_eq!(
            int.call(&[Value::Float(-9_223_372_036_854_775_808.0)]),
            Ok(Value::Int(i64::MIN))
        );

        let out_of_range = [
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
            1e300,
            9_223_372_036_854_775_808.0,
        ];
        for n in out_of_range {
            assert!(
                matches!(int.call(&[Value::Float(n)]), Err(FunctionError::Conversion(_))),
                "{}",
                n
            );
        }
    }
}
