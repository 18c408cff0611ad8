//! Filter registry and the built-in filters.
//!
//! A filter is a pure function from an operand and its arguments to a new
//! value. Filters report misuse as a plain message; the renderer attaches
//! the filter name and line.

use crate::context::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub type FilterResult = std::result::Result<Value, String>;

type FilterFn = dyn Fn(&Value, &[Value]) -> FilterResult + Send + Sync;

/// Undefined-variable policy applied during rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Undefined {
    /// Unresolved names and attributes are errors.
    #[default]
    Strict,
    /// Unresolved names and attributes evaluate to null.
    Lenient,
}

/// Everything a render needs besides the template and the data: the
/// registered filters and the undefined-variable policy.
///
/// # Example
///
/// ```rust
/// use stencil::{render, RendererConfig, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Data { tags: Vec<String> }
///
/// let config = RendererConfig::new().with_filter("shout", |v: &Value, _: &[Value]| {
///     Ok(Value::from(format!("{}!", v)))
/// });
/// let out = render(
///     "{{ tags | join(\"/\") | shout }}",
///     &Data { tags: vec!["a".into(), "b".into()] },
///     &config,
/// ).unwrap();
/// assert_eq!(out, "a/b!");
/// ```
#[derive(Clone)]
pub struct RendererConfig {
    filters: HashMap<String, Arc<FilterFn>>,
    undefined: Undefined,
}

impl RendererConfig {
    /// A strict config with the built-in filters registered.
    pub fn new() -> Self {
        let config = Self {
            filters: HashMap::new(),
            undefined: Undefined::Strict,
        };
        config
            .with_filter("capitalize", capitalize)
            .with_filter("join", join)
            .with_filter("upper", upper)
            .with_filter("lower", lower)
            .with_filter("trim", trim)
            .with_filter("length", length)
            .with_filter("default", default)
    }

    /// Registers a filter, replacing any filter with the same name.
    pub fn with_filter<F>(mut self, name: &str, filter: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> FilterResult + Send + Sync + 'static,
    {
        self.filters.insert(name.to_string(), Arc::new(filter));
        self
    }

    pub fn undefined(mut self, policy: Undefined) -> Self {
        self.undefined = policy;
        self
    }

    pub fn undefined_policy(&self) -> Undefined {
        self.undefined
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    pub(crate) fn apply(&self, name: &str, operand: &Value, args: &[Value]) -> Option<FilterResult> {
        self.filters.get(name).map(|f| f(operand, args))
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn text_operand(value: &Value) -> Result<String, String> {
    value
        .to_text()
        .ok_or_else(|| format!("expected text, got a {}", value.kind()))
}

fn no_args(args: &[Value]) -> Result<(), String> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(format!("takes no arguments, got {}", args.len()))
    }
}

/// Uppercases the first character and leaves the rest untouched.
pub fn capitalize(value: &Value, args: &[Value]) -> FilterResult {
    no_args(args)?;
    let text = text_operand(value)?;
    let mut chars = text.chars();
    Ok(Value::String(match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }))
}

/// Joins a sequence of scalars with an optional separator.
pub fn join(value: &Value, args: &[Value]) -> FilterResult {
    let sep = match args {
        [] => String::new(),
        [Value::String(sep)] => sep.clone(),
        [other] => return Err(format!("separator must be text, got a {}", other.kind())),
        _ => return Err(format!("takes at most one argument, got {}", args.len())),
    };

    let items = match value {
        Value::Seq(items) => items.as_slice(),
        Value::Null => &[],
        other => return Err(format!("expected a sequence, got a {}", other.kind())),
    };

    let parts = items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(_) | Value::Number(_) => Ok(item.to_string()),
            other => Err(format!("item {} is a {}, not text", i, other.kind())),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::String(parts.join(&sep)))
}

pub fn upper(value: &Value, args: &[Value]) -> FilterResult {
    no_args(args)?;
    Ok(Value::String(text_operand(value)?.to_uppercase()))
}

pub fn lower(value: &Value, args: &[Value]) -> FilterResult {
    no_args(args)?;
    Ok(Value::String(text_operand(value)?.to_lowercase()))
}

pub fn trim(value: &Value, args: &[Value]) -> FilterResult {
    no_args(args)?;
    Ok(Value::String(text_operand(value)?.trim().to_string()))
}

pub fn length(value: &Value, args: &[Value]) -> FilterResult {
    no_args(args)?;
    let n = match value {
        Value::Null => 0,
        Value::String(s) => s.chars().count(),
        Value::Seq(items) => items.len(),
        Value::Map(entries) => entries.len(),
        other => return Err(format!("a {} has no length", other.kind())),
    };
    Ok(Value::from(n))
}

/// Falls back to the argument when the operand is null or empty text.
pub fn default(value: &Value, args: &[Value]) -> FilterResult {
    let [fallback] = args else {
        return Err(format!("takes exactly one argument, got {}", args.len()));
    };
    Ok(match value {
        Value::Null => fallback.clone(),
        Value::String(s) if s.is_empty() => fallback.clone(),
        other => other.clone(),
    })
}
