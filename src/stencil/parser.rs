//! Template source → [`Node`] tree.
//!
//! Parsing happens in two passes. The source is first cut into text, output
//! and statement segments (applying `-` whitespace control), then each tag's
//! contents are tokenized and parsed by recursive descent.

use crate::ast::{Conditional, Expr, Loop, MappingLoop, Node};
use crate::error::{Error, Result};

#[derive(Debug, PartialEq)]
enum Segment<'s> {
    Text(&'s str),
    Output(&'s str, usize),
    Statement(&'s str, usize),
}

/// Splits the source into segments, dropping comments.
fn segment(source: &str) -> Result<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut pos = 0;
    let mut line = 1;
    let mut trim_next = false;
    let mut search_from = 0;

    while let Some(offset) = source[search_from..].find('{') {
        let start = search_from + offset;
        let close = match source[start + 1..].chars().next() {
            Some('{') => "}}",
            Some('%') => "%}",
            Some('#') => "#}",
            _ => {
                search_from = start + 1;
                continue;
            }
        };

        line += source[pos..start].matches('\n').count();
        let inner_start = start + 2;
        let inner_len = find_close(&source[inner_start..], close)
            .ok_or_else(|| Error::syntax(line, format!("tag is never closed with `{}`", close)))?;
        let mut inner = &source[inner_start..inner_start + inner_len];

        let trim_before = inner.starts_with('-');
        if trim_before {
            inner = &inner[1..];
        }
        let trim_after = inner.ends_with('-');
        if trim_after {
            inner = &inner[..inner.len() - 1];
        }

        let mut text = &source[pos..start];
        if trim_next {
            text = text.trim_start();
        }
        if trim_before {
            text = text.trim_end();
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        match close {
            "}}" => segments.push(Segment::Output(inner.trim(), line)),
            "%}" => segments.push(Segment::Statement(inner.trim(), line)),
            _ => {}
        }

        let end = inner_start + inner_len + close.len();
        line += source[start..end].matches('\n').count();
        pos = end;
        search_from = end;
        trim_next = trim_after;
    }

    let mut rest = &source[pos..];
    if trim_next {
        rest = rest.trim_start();
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    Ok(segments)
}

/// Finds the closing delimiter of a tag. Inside `{{ }}` and `{% %}` quoted
/// strings are skipped, so a literal may contain the delimiter itself.
fn find_close(rest: &str, close: &str) -> Option<usize> {
    if close == "#}" {
        return rest.find(close);
    }
    let bytes = rest.as_bytes();
    let mut quote = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if bytes[i..].starts_with(close.as_bytes()) => return Some(i),
            None => {}
        }
        i += 1;
    }
    None
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Dot,
    Pipe,
    Comma,
    LParen,
    RParen,
}

fn tokenize(src: &str, line: usize) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '"' | '\'' => {
                let quote = c;
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some(ch) if ch == quote => break,
                        Some('\\') => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some(escaped @ ('\\' | '"' | '\'')) => value.push(escaped),
                            Some(other) => {
                                return Err(Error::syntax(
                                    line,
                                    format!("unknown escape `\\{}`", other),
                                ))
                            }
                            None => return Err(Error::syntax(line, "unterminated string")),
                        },
                        Some(ch) => value.push(ch),
                        None => return Err(Error::syntax(line, "unterminated string")),
                    }
                }
                tokens.push(Token::Str(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            other => {
                return Err(Error::syntax(
                    line,
                    format!("unexpected character `{}`", other),
                ))
            }
        }
    }
    Ok(tokens)
}

/// Recursive-descent parser over the tokens of a single tag.
struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
    line: usize,
}

impl ExprParser {
    fn new(tokens: Vec<Token>, line: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            line,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn err(&self, message: impl Into<String>) -> Error {
        Error::syntax(self.line, message)
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            _ => Err(self.err(format!("expected {}", what))),
        }
    }

    fn ident(&mut self, what: &str) -> Result<String> {
        match self.next() {
            Some(Token::Ident(name)) => Ok(name),
            _ => Err(self.err(format!("expected {}", what))),
        }
    }

    fn finish(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(self.err(format!("unexpected {:?} after expression", token))),
        }
    }

    fn expr(&mut self) -> Result<Expr> {
        if matches!(self.peek(), Some(Token::Ident(kw)) if kw == "not") {
            self.next();
            return Ok(Expr::Not(Box::new(self.expr()?)));
        }

        let mut expr = self.primary()?;
        while self.peek() == Some(&Token::Pipe) {
            self.next();
            let name = self.ident("a filter name after `|`")?;
            let args = if self.peek() == Some(&Token::LParen) {
                self.next();
                self.args()?
            } else {
                Vec::new()
            };
            expr = Expr::FilterApply {
                operand: Box::new(expr),
                name,
                args,
            };
        }
        Ok(expr)
    }

    /// Comma-separated arguments up to and including the closing paren.
    fn args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.next();
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                _ => return Err(self.err("expected `,` or `)` in argument list")),
            }
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.next() {
            Some(Token::Str(s)) => Ok(Expr::Literal(s)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(inner)
            }
            Some(Token::Ident(root)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.next();
                    let mut args = self.args()?;
                    if args.is_empty() {
                        return Err(self.err(format!("`{}()` needs a value to apply to", root)));
                    }
                    let operand = args.remove(0);
                    return Ok(Expr::FilterApply {
                        operand: Box::new(operand),
                        name: root,
                        args,
                    });
                }

                let mut attrs = Vec::new();
                while self.peek() == Some(&Token::Dot) {
                    self.next();
                    let attr = self.ident("an attribute name after `.`")?;
                    if attr == "items" && self.peek() == Some(&Token::LParen) {
                        return Err(
                            self.err("`.items()` is only valid in a `for key, value in` loop")
                        );
                    }
                    attrs.push(attr);
                }
                Ok(Expr::Variable { root, attrs })
            }
            Some(other) => Err(self.err(format!("unexpected {:?}", other))),
            None => Err(self.err("expected an expression")),
        }
    }
}

enum Statement {
    For {
        targets: Vec<String>,
        iterable: Expr,
        items: bool,
    },
    EndFor,
    If(Expr),
    Elif(Expr),
    Else,
    EndIf,
}

impl Statement {
    fn keyword(&self) -> &'static str {
        match self {
            Statement::For { .. } => "for",
            Statement::EndFor => "endfor",
            Statement::If(_) => "if",
            Statement::Elif(_) => "elif",
            Statement::Else => "else",
            Statement::EndIf => "endif",
        }
    }
}

fn parse_statement(src: &str, line: usize) -> Result<Statement> {
    let mut tokens = tokenize(src, line)?;
    let keyword = match tokens.first() {
        Some(Token::Ident(kw)) => kw.clone(),
        _ => return Err(Error::syntax(line, "empty statement")),
    };

    match keyword.as_str() {
        "for" => {
            // A trailing `.items()` switches to mapping iteration.
            let items_suffix = [
                Token::Dot,
                Token::Ident("items".to_string()),
                Token::LParen,
                Token::RParen,
            ];
            let items = tokens.ends_with(&items_suffix);
            if items {
                tokens.truncate(tokens.len() - items_suffix.len());
            }

            let mut p = ExprParser::new(tokens, line);
            p.next();
            let mut targets = vec![p.ident("a loop variable after `for`")?];
            if p.peek() == Some(&Token::Comma) {
                p.next();
                targets.push(p.ident("a second loop variable after `,`")?);
            }
            match p.next() {
                Some(Token::Ident(kw)) if kw == "in" => {}
                _ => return Err(Error::syntax(line, "expected `in` in for loop")),
            }
            let iterable = p.expr()?;
            p.finish()?;

            match (targets.len(), items) {
                (1, false) | (2, true) => Ok(Statement::For {
                    targets,
                    iterable,
                    items,
                }),
                (2, false) => Err(Error::syntax(
                    line,
                    "two loop variables need a mapping with `.items()`",
                )),
                _ => Err(Error::syntax(
                    line,
                    "`.items()` loops bind a key and a value: `for key, value in map.items()`",
                )),
            }
        }
        "if" | "elif" => {
            let mut p = ExprParser::new(tokens, line);
            p.next();
            let cond = p.expr()?;
            p.finish()?;
            Ok(if keyword == "if" {
                Statement::If(cond)
            } else {
                Statement::Elif(cond)
            })
        }
        "endfor" | "else" | "endif" => {
            if tokens.len() > 1 {
                return Err(Error::syntax(
                    line,
                    format!("`{}` takes no arguments", keyword),
                ));
            }
            Ok(match keyword.as_str() {
                "endfor" => Statement::EndFor,
                "else" => Statement::Else,
                _ => Statement::EndIf,
            })
        }
        other => Err(Error::syntax(line, format!("unknown statement `{}`", other))),
    }
}

struct BlockParser<'s> {
    segments: std::vec::IntoIter<Segment<'s>>,
}

impl<'s> BlockParser<'s> {
    /// Parses nodes until one of `until` is reached (returned with its line)
    /// or the segments run out (`None`).
    fn block(&mut self, until: &[&str]) -> Result<(Vec<Node>, Option<(Statement, usize)>)> {
        let mut nodes = Vec::new();

        while let Some(segment) = self.segments.next() {
            match segment {
                Segment::Text(text) => nodes.push(Node::Text(text.to_string())),
                Segment::Output(src, line) => {
                    let mut p = ExprParser::new(tokenize(src, line)?, line);
                    let expr = p.expr()?;
                    p.finish()?;
                    nodes.push(Node::Output { expr, line });
                }
                Segment::Statement(src, line) => match parse_statement(src, line)? {
                    Statement::For {
                        mut targets,
                        iterable,
                        items,
                    } => {
                        let body = self.closed_body(&["endfor"], "for", line)?.0;
                        if items {
                            let value_var = targets.pop().unwrap_or_default();
                            let key_var = targets.pop().unwrap_or_default();
                            nodes.push(Node::MappingLoop(MappingLoop {
                                key_var,
                                value_var,
                                mapping: iterable,
                                body,
                                line,
                            }));
                        } else {
                            nodes.push(Node::Loop(Loop {
                                var: targets.remove(0),
                                iterable,
                                body,
                                line,
                            }));
                        }
                    }
                    Statement::If(cond) => {
                        nodes.push(Node::Conditional(self.conditional(cond, line)?));
                    }
                    stmt if until.contains(&stmt.keyword()) => {
                        return Ok((nodes, Some((stmt, line))));
                    }
                    stmt => {
                        return Err(Error::syntax(
                            line,
                            format!("unexpected `{}`", stmt.keyword()),
                        ))
                    }
                },
            }
        }
        Ok((nodes, None))
    }

    fn closed_body(
        &mut self,
        until: &[&str],
        opener: &str,
        line: usize,
    ) -> Result<(Vec<Node>, Statement)> {
        match self.block(until)? {
            (body, Some((stmt, _))) => Ok((body, stmt)),
            (_, None) => Err(Error::syntax(
                line,
                format!("`{}` opened here is never closed", opener),
            )),
        }
    }

    fn conditional(&mut self, first: Expr, line: usize) -> Result<Conditional> {
        let mut branches = Vec::new();
        let mut cond = first;

        loop {
            let (body, stmt) = self.closed_body(&["elif", "else", "endif"], "if", line)?;
            branches.push((cond, body));
            match stmt {
                Statement::Elif(next) => cond = next,
                Statement::Else => {
                    let (otherwise, _) = self.closed_body(&["endif"], "if", line)?;
                    return Ok(Conditional {
                        branches,
                        otherwise,
                        line,
                    });
                }
                _ => {
                    return Ok(Conditional {
                        branches,
                        otherwise: Vec::new(),
                        line,
                    })
                }
            }
        }
    }
}

/// Parses template source into its node tree.
pub fn parse(source: &str) -> Result<Vec<Node>> {
    let mut parser = BlockParser {
        segments: segment(source)?.into_iter(),
    };
    let (nodes, _) = parser.block(&[])?;
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(root: &str) -> Expr {
        Expr::Variable {
            root: root.to_string(),
            attrs: vec![],
        }
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse("hello").unwrap(), vec![Node::Text("hello".into())]);
        assert_eq!(parse("").unwrap(), vec![]);
    }

    #[test]
    fn test_lone_braces_are_text() {
        assert_eq!(
            parse("a { b } c").unwrap(),
            vec![Node::Text("a { b } c".into())]
        );
    }

    #[test]
    fn test_output_with_path() {
        let nodes = parse("Hi {{ user.name }}!").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("Hi ".into()),
                Node::Output {
                    expr: Expr::Variable {
                        root: "user".into(),
                        attrs: vec!["name".into()],
                    },
                    line: 1,
                },
                Node::Text("!".into()),
            ]
        );
    }

    #[test]
    fn test_pipe_and_call_forms_are_equivalent() {
        let piped = parse(r#"{{ items | join(", ") }}"#).unwrap();
        let called = parse(r#"{{ join(items, ", ") }}"#).unwrap();
        assert_eq!(piped, called);
    }

    #[test]
    fn test_chained_filters() {
        let nodes = parse("{{ name | trim | capitalize }}").unwrap();
        match &nodes[0] {
            Node::Output {
                expr: Expr::FilterApply { operand, name, .. },
                ..
            } => {
                assert_eq!(name, "capitalize");
                assert!(matches!(**operand, Expr::FilterApply { ref name, .. } if name == "trim"));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_string_escapes() {
        let nodes = parse(r#"{{ 'it\'s' }}{{ "a\nb" }}"#).unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Output {
                    expr: Expr::Literal("it's".into()),
                    line: 1
                },
                Node::Output {
                    expr: Expr::Literal("a\nb".into()),
                    line: 1
                },
            ]
        );
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(
            parse("a{# note #}b").unwrap(),
            vec![Node::Text("a".into()), Node::Text("b".into())]
        );
    }

    #[test]
    fn test_whitespace_control() {
        let nodes = parse("a  \n  {{- x -}}  \n  b").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("a".into()),
                Node::Output {
                    expr: var("x"),
                    line: 2
                },
                Node::Text("b".into()),
            ]
        );
    }

    #[test]
    fn test_for_loop() {
        let nodes = parse("{% for s in summary %}- {{ s }}\n{% endfor %}").unwrap();
        assert_eq!(
            nodes,
            vec![Node::Loop(Loop {
                var: "s".into(),
                iterable: var("summary"),
                body: vec![
                    Node::Text("- ".into()),
                    Node::Output {
                        expr: var("s"),
                        line: 1
                    },
                    Node::Text("\n".into()),
                ],
                line: 1,
            })]
        );
    }

    #[test]
    fn test_mapping_loop() {
        let nodes = parse("{% for k, v in skills.items() %}{{ k }}{% endfor %}").unwrap();
        match &nodes[0] {
            Node::MappingLoop(l) => {
                assert_eq!(l.key_var, "k");
                assert_eq!(l.value_var, "v");
                assert_eq!(l.mapping, var("skills"));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_if_elif_else() {
        let nodes = parse("{% if a %}A{% elif not b %}B{% else %}C{% endif %}").unwrap();
        match &nodes[0] {
            Node::Conditional(c) => {
                assert_eq!(c.branches.len(), 2);
                assert_eq!(c.branches[1].0, Expr::Not(Box::new(var("b"))));
                assert_eq!(c.otherwise, vec![Node::Text("C".into())]);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_line_numbers() {
        let nodes = parse("one\ntwo\n{{ x }}").unwrap();
        assert!(matches!(nodes[1], Node::Output { line: 3, .. }));
    }

    #[test]
    fn test_unclosed_tag() {
        let err = parse("line\n{{ name").unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_unclosed_for() {
        let err = parse("{% for x in xs %}\nbody").unwrap_err();
        match err {
            Error::Syntax { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("never closed"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_stray_endfor() {
        let err = parse("a\n{% endfor %}").unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_endif_cannot_close_for() {
        assert!(parse("{% for x in xs %}{% endif %}").is_err());
    }

    #[test]
    fn test_unknown_statement() {
        let err = parse("{% include 'x' %}").unwrap_err();
        assert!(err.to_string().contains("unknown statement `include`"));
    }

    #[test]
    fn test_items_outside_pair_loop_rejected() {
        assert!(parse("{{ skills.items() }}").is_err());
        assert!(parse("{% for k in skills.items() %}{% endfor %}").is_err());
        assert!(parse("{% for k, v in skills %}{% endfor %}").is_err());
    }

    #[test]
    fn test_string_literal_may_contain_closing_delimiter() {
        let nodes = parse(r#"a{{ "}}" }}b{{ x | join('%}') }}"#).unwrap();
        assert_eq!(nodes.len(), 4);
        assert!(matches!(
            &nodes[1],
            Node::Output { expr: Expr::Literal(s), .. } if s == "}}"
        ));
        assert_eq!(nodes[2], Node::Text("b".to_string()));
    }

    #[test]
    fn test_comment_ignores_quotes() {
        let nodes = parse("{# don't #}x").unwrap();
        assert_eq!(nodes, vec![Node::Text("x".to_string())]);
    }

    #[test]
    fn test_unterminated_string() {
        assert!(parse(r#"{{ "open }}"#).is_err());
    }

    #[test]
    fn test_call_without_operand() {
        assert!(parse("{{ join() }}").is_err());
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        assert!(parse("{{ a b }}").is_err());
    }
}
