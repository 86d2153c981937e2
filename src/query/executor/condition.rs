//! Condition compilation and evaluation.
//!
//! A condition arrives as a flat infix token list such as
//! `dept = Math or lname = Danson`. It is compiled to postfix with the
//! shunting-yard algorithm and evaluated against the relation's per-field
//! inverted indices, yielding the matching record numbers.

use std::fmt;

use log::debug;

use crate::catalog::Relation;
use crate::common::types::{RecordNo, RowSet};
use crate::index::MultiIndex;
use crate::query::executor::result::{QueryError, QueryResult};
use crate::query::executor::set_ops::{and_rows, or_rows};

/// Comparison between a field and a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Compare(Comparison),
    And,
    Or,
}

impl Operator {
    /// Recognize an operator token. Comparison symbols match exactly,
    /// `and` / `or` in any case.
    pub fn parse(token: &str) -> Option<Self> {
        let op = match token {
            "=" => Operator::Compare(Comparison::Eq),
            "<" => Operator::Compare(Comparison::Lt),
            ">" => Operator::Compare(Comparison::Gt),
            "<=" => Operator::Compare(Comparison::Le),
            ">=" => Operator::Compare(Comparison::Ge),
            _ if token.eq_ignore_ascii_case("and") => Operator::And,
            _ if token.eq_ignore_ascii_case("or") => Operator::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn precedence(self) -> u8 {
        match self {
            Operator::Compare(_) => 5,
            Operator::And => 3,
            Operator::Or => 2,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Compare(Comparison::Eq) => "=",
            Operator::Compare(Comparison::Lt) => "<",
            Operator::Compare(Comparison::Gt) => ">",
            Operator::Compare(Comparison::Le) => "<=",
            Operator::Compare(Comparison::Ge) => ">=",
            Operator::And => "and",
            Operator::Or => "or",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Operand(String),
    Operator(Operator),
    LeftParen,
    RightParen,
}

impl Token {
    pub fn classify(raw: &str) -> Self {
        match raw {
            "(" => Token::LeftParen,
            ")" => Token::RightParen,
            _ => match Operator::parse(raw) {
                Some(op) => Token::Operator(op),
                None => Token::Operand(raw.to_string()),
            },
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Operand(value) => write!(f, "{}", value),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
        }
    }
}

/// Compile infix condition tokens to postfix.
///
/// Operators are left associative: an incoming operator first emits every
/// stacked operator of equal or higher precedence.
pub fn to_postfix(conditions: &[String]) -> QueryResult<Vec<Token>> {
    let mut output = Vec::with_capacity(conditions.len());
    let mut stack: Vec<Token> = Vec::new();

    for raw in conditions {
        match Token::classify(raw) {
            Token::Operand(value) => output.push(Token::Operand(value)),
            Token::LeftParen => stack.push(Token::LeftParen),
            Token::RightParen => loop {
                match stack.pop() {
                    Some(Token::LeftParen) => break,
                    Some(token) => output.push(token),
                    None => return Err(malformed("unbalanced ')'")),
                }
            },
            Token::Operator(op) => {
                while let Some(&Token::Operator(top)) = stack.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push(Token::Operator(top));
                    stack.pop();
                }
                stack.push(Token::Operator(op));
            }
        }
    }

    while let Some(token) = stack.pop() {
        if token == Token::LeftParen {
            return Err(malformed("unbalanced '('"));
        }
        output.push(token);
    }
    Ok(output)
}

/// Evaluation stack entry
enum Value {
    Operand(String),
    Rows(RowSet),
}

/// Evaluate a postfix program against the relation's indices
pub fn evaluate(postfix: &[Token], relation: &Relation) -> QueryResult<RowSet> {
    let mut stack: Vec<Value> = Vec::new();

    for token in postfix {
        match token {
            Token::Operand(value) => stack.push(Value::Operand(value.clone())),
            Token::Operator(Operator::Compare(comparison)) => {
                let literal = pop_operand(&mut stack, token)?;
                let field = pop_operand(&mut stack, token)?;
                let index = relation.field_index(&field).ok_or_else(|| {
                    malformed(&format!("unknown field {} in condition", field))
                })?;
                stack.push(Value::Rows(compare(index, *comparison, &literal)));
            }
            Token::Operator(logical @ (Operator::And | Operator::Or)) => {
                let v2 = pop_rows(&mut stack, token)?;
                let v1 = pop_rows(&mut stack, token)?;
                let rows = if *logical == Operator::And {
                    and_rows(&v1, &v2)
                } else {
                    or_rows(&v1, &v2)
                };
                stack.push(Value::Rows(rows));
            }
            Token::LeftParen | Token::RightParen => {
                return Err(malformed("parenthesis in postfix program"));
            }
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(Value::Rows(rows)), true) => Ok(rows),
        _ => Err(malformed("condition does not reduce to a single row set")),
    }
}

/// Compile and evaluate a condition in one step
pub fn matching_rows(conditions: &[String], relation: &Relation) -> QueryResult<RowSet> {
    let postfix = to_postfix(conditions)?;
    debug!(
        "postfix program: {}",
        postfix.iter().map(Token::to_string).collect::<Vec<_>>().join(" ")
    );
    evaluate(&postfix, relation)
}

fn compare(index: &MultiIndex<String, RecordNo>, comparison: Comparison, literal: &String) -> RowSet {
    match comparison {
        Comparison::Eq => index.get(literal).map(<[RecordNo]>::to_vec).unwrap_or_default(),
        Comparison::Gt => index.collect_values(index.upper_bound(literal), index.end()),
        Comparison::Ge => index.collect_values(index.lower_bound(literal), index.end()),
        Comparison::Lt => index.collect_values(index.begin(), index.lower_bound(literal)),
        Comparison::Le => index.collect_values(index.begin(), index.upper_bound(literal)),
    }
}

fn pop_operand(stack: &mut Vec<Value>, op: &Token) -> QueryResult<String> {
    match stack.pop() {
        Some(Value::Operand(value)) => Ok(value),
        _ => Err(malformed(&format!("'{}' needs a field and a literal", op))),
    }
}

fn pop_rows(stack: &mut Vec<Value>, op: &Token) -> QueryResult<RowSet> {
    match stack.pop() {
        Some(Value::Rows(rows)) => Ok(rows),
        _ => Err(malformed(&format!("'{}' needs two conditions", op))),
    }
}

fn malformed(reason: &str) -> QueryError {
    QueryError::MalformedCommand(reason.to_string())
}
