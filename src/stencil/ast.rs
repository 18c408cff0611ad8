//! Parsed template tree.
//!
//! A template is a flat list of [`Node`]s; loops and conditionals own their
//! bodies. Every node that can fail at render time remembers the line of the
//! tag it came from.

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text copied to the output.
    Text(String),
    /// `{{ expr }}`
    Output { expr: Expr, line: usize },
    /// `{% for item in seq %}`
    Loop(Loop),
    /// `{% for key, value in map.items() %}`
    MappingLoop(MappingLoop),
    /// `{% if %}` / `{% elif %}` / `{% else %}`
    Conditional(Conditional),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub var: String,
    pub iterable: Expr,
    pub body: Vec<Node>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingLoop {
    pub key_var: String,
    pub value_var: String,
    pub mapping: Expr,
    pub body: Vec<Node>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub branches: Vec<(Expr, Vec<Node>)>,
    pub otherwise: Vec<Node>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `name.attr.attr`
    Variable { root: String, attrs: Vec<String> },
    /// A quoted string.
    Literal(String),
    /// `operand | name(args)` or `name(operand, args)`
    FilterApply {
        operand: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
    Not(Box<Expr>),
}

impl Expr {
    /// Dotted source form of a variable, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Expr::Variable { root, attrs } => {
                let mut path = root.clone();
                for attr in attrs {
                    path.push('.');
                    path.push_str(attr);
                }
                path
            }
            Expr::Literal(s) => format!("{:?}", s),
            Expr::FilterApply { operand, name, .. } => {
                format!("{} | {}", operand.describe(), name)
            }
            Expr::Not(inner) => format!("not {}", inner.describe()),
        }
    }

    pub(crate) fn collect_filters<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::FilterApply {
                operand,
                name,
                args,
            } => {
                operand.collect_filters(out);
                out.push(name);
                for arg in args {
                    arg.collect_filters(out);
                }
            }
            Expr::Not(inner) => inner.collect_filters(out),
            Expr::Variable { .. } | Expr::Literal(_) => {}
        }
    }
}

/// Names of every filter referenced anywhere in `nodes`, with the line of its tag.
pub(crate) fn filters_used(nodes: &[Node]) -> Vec<(String, usize)> {
    let mut found = Vec::new();
    walk_filters(nodes, &mut found);
    found
}

fn walk_filters(nodes: &[Node], found: &mut Vec<(String, usize)>) {
    let push = |expr: &Expr, line: usize, found: &mut Vec<(String, usize)>| {
        let mut names = Vec::new();
        expr.collect_filters(&mut names);
        found.extend(names.into_iter().map(|n| (n.to_string(), line)));
    };

    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Output { expr, line } => push(expr, *line, found),
            Node::Loop(l) => {
                push(&l.iterable, l.line, found);
                walk_filters(&l.body, found);
            }
            Node::MappingLoop(l) => {
                push(&l.mapping, l.line, found);
                walk_filters(&l.body, found);
            }
            Node::Conditional(c) => {
                for (cond, body) in &c.branches {
                    push(cond, c.line, found);
                    walk_filters(body, found);
                }
                walk_filters(&c.otherwise, found);
            }
        }
    }
}
