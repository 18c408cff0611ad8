//! Evaluation of a parsed template against a binding context.

use crate::ast::{Conditional, Expr, Loop, MappingLoop, Node};
use crate::context::{Context, Value};
use crate::error::{Error, Result};
use crate::filters::{RendererConfig, Undefined};

pub(crate) struct Evaluator<'c> {
    config: &'c RendererConfig,
}

impl<'c> Evaluator<'c> {
    pub(crate) fn new(config: &'c RendererConfig) -> Self {
        Self { config }
    }

    pub(crate) fn render_nodes(
        &self,
        nodes: &[Node],
        ctx: &mut Context<'_>,
        out: &mut String,
    ) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Output { expr, line } => {
                    let value = self.eval(expr, ctx, *line)?;
                    let text = value.to_text().ok_or(Error::NotPrintable {
                        kind: value.kind(),
                        line: *line,
                    })?;
                    out.push_str(&text);
                }
                Node::Loop(l) => self.render_loop(l, ctx, out)?,
                Node::MappingLoop(l) => self.render_mapping_loop(l, ctx, out)?,
                Node::Conditional(c) => self.render_conditional(c, ctx, out)?,
            }
        }
        Ok(())
    }

    fn render_loop(&self, l: &Loop, ctx: &mut Context<'_>, out: &mut String) -> Result<()> {
        let items = match self.eval(&l.iterable, ctx, l.line)? {
            Value::Seq(items) => items,
            Value::Null if self.config.undefined_policy() == Undefined::Lenient => Vec::new(),
            other => {
                return Err(Error::NotIterable {
                    name: l.iterable.describe(),
                    kind: other.kind(),
                    line: l.line,
                })
            }
        };

        let total = items.len();
        for (i, item) in items.into_iter().enumerate() {
            let frame = vec![(l.var.clone(), item), loop_info(i, total)];
            self.render_in_frame(&l.body, frame, ctx, out)?;
        }
        Ok(())
    }

    fn render_mapping_loop(
        &self,
        l: &MappingLoop,
        ctx: &mut Context<'_>,
        out: &mut String,
    ) -> Result<()> {
        let entries = match self.eval(&l.mapping, ctx, l.line)? {
            Value::Map(entries) => entries,
            Value::Null if self.config.undefined_policy() == Undefined::Lenient => Vec::new(),
            other => {
                return Err(Error::NotAMapping {
                    name: l.mapping.describe(),
                    kind: other.kind(),
                    line: l.line,
                })
            }
        };

        let total = entries.len();
        for (i, (key, value)) in entries.into_iter().enumerate() {
            let frame = vec![
                (l.key_var.clone(), Value::String(key)),
                (l.value_var.clone(), value),
                loop_info(i, total),
            ];
            self.render_in_frame(&l.body, frame, ctx, out)?;
        }
        Ok(())
    }

    /// Renders one iteration body with `frame` bound, popping the frame even
    /// when the body fails.
    fn render_in_frame(
        &self,
        body: &[Node],
        frame: Vec<(String, Value)>,
        ctx: &mut Context<'_>,
        out: &mut String,
    ) -> Result<()> {
        ctx.push_frame(frame);
        let result = self.render_nodes(body, ctx, out);
        ctx.pop_frame();
        result
    }

    fn render_conditional(
        &self,
        c: &Conditional,
        ctx: &mut Context<'_>,
        out: &mut String,
    ) -> Result<()> {
        for (cond, body) in &c.branches {
            if self.eval(cond, ctx, c.line)?.is_truthy() {
                return self.render_nodes(body, ctx, out);
            }
        }
        self.render_nodes(&c.otherwise, ctx, out)
    }

    fn eval(&self, expr: &Expr, ctx: &Context<'_>, line: usize) -> Result<Value> {
        match expr {
            Expr::Literal(s) => Ok(Value::String(s.clone())),
            Expr::Variable { root, attrs } => self.resolve(root, attrs, ctx, line),
            Expr::Not(inner) => Ok(Value::Bool(!self.eval(inner, ctx, line)?.is_truthy())),
            Expr::FilterApply {
                operand,
                name,
                args,
            } => {
                let operand = self.eval(operand, ctx, line)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, ctx, line))
                    .collect::<Result<Vec<_>>>()?;
                match self.config.apply(name, &operand, &args) {
                    Some(Ok(value)) => Ok(value),
                    Some(Err(message)) => Err(Error::Filter {
                        name: name.clone(),
                        line,
                        message,
                    }),
                    None => Err(Error::UnknownFilter {
                        name: name.clone(),
                        line,
                    }),
                }
            }
        }
    }

    fn resolve(&self, root: &str, attrs: &[String], ctx: &Context<'_>, line: usize) -> Result<Value> {
        let mut current = match ctx.lookup(root) {
            Some(value) => value,
            None => return self.undefined(root.to_string(), line),
        };

        let mut path = root.to_string();
        for attr in attrs {
            path.push('.');
            path.push_str(attr);
            current = match current.get(attr) {
                Some(value) => value,
                None => return self.undefined(path, line),
            };
        }
        Ok(current.clone())
    }

    fn undefined(&self, name: String, line: usize) -> Result<Value> {
        match self.config.undefined_policy() {
            Undefined::Strict => Err(Error::Undefined { name, line }),
            Undefined::Lenient => Ok(Value::Null),
        }
    }
}

fn loop_info(index: usize, total: usize) -> (String, Value) {
    (
        "loop".to_string(),
        Value::Map(vec![
            ("index".to_string(), Value::from(index + 1)),
            ("first".to_string(), Value::Bool(index == 0)),
            ("last".to_string(), Value::Bool(index + 1 == total)),
            ("length".to_string(), Value::from(total)),
        ]),
    )
}
