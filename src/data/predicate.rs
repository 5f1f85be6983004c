//! A minimal filter language for selecting records.
//!
//! A filter is a comma-separated conjunction of comparisons:
//! `category=Wisdom`, `status!=done`, `author=Seneca,status!=skip`.
//! Values compare case-insensitively.

use crate::data::record::QuoteRecord;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Predicate {
    terms: Vec<Term>,
}

#[derive(Debug, Clone)]
struct Term {
    field: String,
    op: Op,
    value: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
}

impl Predicate {
    pub fn from_string(s: &str) -> Result<Self> {
        let mut terms = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (field, op, value) = if let Some((f, v)) = part.split_once("!=") {
                (f, Op::Ne, v)
            } else if let Some((f, v)) = part.split_once('=') {
                (f, Op::Eq, v)
            } else {
                return Err(Error::predicate_syntax(format!(
                    "expected `field=value` or `field!=value`, got `{part}`"
                )));
            };
            let field = field.trim().to_ascii_lowercase();
            match field.as_str() {
                "quote" | "author" | "category" | "status" => {}
                other => {
                    return Err(Error::predicate_syntax(format!("unknown field `{other}`")))
                }
            }
            terms.push(Term {
                field,
                op,
                value: value.trim().to_string(),
            });
        }
        if terms.is_empty() {
            return Err(Error::predicate_syntax("empty filter"));
        }
        Ok(Self { terms })
    }

    pub fn eval(&self, record: &QuoteRecord) -> bool {
        self.terms.iter().all(|t| {
            let actual = record.field(&t.field).unwrap_or_default();
            let matches = actual.eq_ignore_ascii_case(&t.value);
            match t.op {
                Op::Eq => matches,
                Op::Ne => !matches,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Status;

    fn record(category: &str, status: Status) -> QuoteRecord {
        QuoteRecord {
            quote: "q".into(),
            author: "a".into(),
            category: category.into(),
            status,
        }
    }

    #[test]
    fn category_equality() {
        let p = Predicate::from_string("category=Wisdom").unwrap();
        assert!(p.eval(&record("wisdom", Status::Pending)));
        assert!(!p.eval(&record("Humor", Status::Pending)));
    }

    #[test]
    fn conjunction_with_status() {
        let p = Predicate::from_string("category=Wisdom,status!=done").unwrap();
        assert!(p.eval(&record("Wisdom", Status::Pending)));
        assert!(!p.eval(&record("Wisdom", Status::Done)));
    }

    #[test]
    fn rejects_bad_syntax() {
        assert!(Predicate::from_string("category").is_err());
        assert!(Predicate::from_string("rating=5").is_err());
        assert!(Predicate::from_string("").is_err());
    }
}
