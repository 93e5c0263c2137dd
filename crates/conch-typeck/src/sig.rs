//! Reader for the type signatures the bootstrap layer attaches to global
//! bindings, e.g. `"Num a => Pattern a -> Pattern a -> Pattern a"`.
//!
//! Grammar:
//!
//! ```text
//! qual    := [context "=>"] type
//! context := pred | "(" pred {"," pred} ")"
//! pred    := Class atype
//! type    := btype ["->" type]
//! btype   := atype {atype}
//! atype   := Con | var | "(" type ")" | "[" type "]"
//! ```
//!
//! Capitalised names are constructors (or classes), lower-case names are
//! type variables. A variable's kind follows from how many arguments it is
//! applied to.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::pred::{Instance, Pred, Qual};
use crate::scheme::Scheme;
use crate::ty::{HasKind, Kind, Type, ARROW, LIST};

/// Known type constructors and their kinds.
pub type Constructors = FxHashMap<String, Kind>;

/// The constructors every signature may use: `->` and `List`.
pub fn base_constructors() -> Constructors {
    let mut cons = Constructors::default();
    cons.insert(ARROW.to_string(), Kind::of_arity(2));
    cons.insert(LIST.to_string(), Kind::of_arity(1));
    cons
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigError {
    pub message: String,
    /// Byte offset into the signature text.
    pub offset: usize,
}

impl SigError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        SigError {
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for SigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at offset {})", self.message, self.offset)
    }
}

impl std::error::Error for SigError {}

/// Read a qualified type. Variables are left free.
pub fn parse_qual_type(src: &str, cons: &Constructors) -> Result<Qual<Type>, SigError> {
    let (context, head) = SigParser::new(src)?.qual()?;
    let mut resolver = Resolver::new(cons);
    for p in &context {
        resolver.collect_arities(p)?;
    }
    resolver.collect_arities(&head)?;
    let preds = context
        .iter()
        .map(|p| resolver.pred(p))
        .collect::<Result<Vec<_>, _>>()?;
    let ty = resolver.star_type(&head)?;
    Ok(Qual::new(preds, ty))
}

/// Read a signature and quantify every variable in it.
pub fn parse_scheme(src: &str, cons: &Constructors) -> Result<Scheme, SigError> {
    Ok(Scheme::quantify_all(&parse_qual_type(src, cons)?))
}

/// Read an instance declaration such as `Ord a => Ord [a]`.
pub fn parse_instance(src: &str, cons: &Constructors) -> Result<Instance, SigError> {
    let (context, head) = SigParser::new(src)?.qual()?;
    let mut resolver = Resolver::new(cons);
    for p in context.iter().chain(std::iter::once(&head)) {
        resolver.collect_arities(p)?;
    }
    let preds = context
        .iter()
        .map(|p| resolver.pred(p))
        .collect::<Result<Vec<_>, _>>()?;
    let head = resolver.pred(&head)?;
    Ok(Qual::new(preds, head))
}

// ── Lexing ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
enum Tok {
    Name(String),
    Arrow,
    FatArrow,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
}

fn lex(src: &str) -> Result<Vec<(Tok, usize)>, SigError> {
    let mut out = Vec::new();
    let mut chars = src.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let tok = match c {
            c if c.is_whitespace() => continue,
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            '[' => Tok::LBracket,
            ']' => Tok::RBracket,
            ',' => Tok::Comma,
            '-' | '=' => match chars.next() {
                Some((_, '>')) if c == '-' => Tok::Arrow,
                Some((_, '>')) => Tok::FatArrow,
                _ => return Err(SigError::new(format!("expected `{}>`", c), i)),
            },
            c if c.is_alphabetic() || c == '_' => {
                let mut name = c.to_string();
                while let Some(&(_, n)) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' || n == '\'' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Tok::Name(name)
            }
            other => return Err(SigError::new(format!("unexpected character `{}`", other), i)),
        };
        out.push((tok, i));
    }
    Ok(out)
}

// ── Parsing ────────────────────────────────────────────────────────────

/// Unresolved signature syntax. Offsets point at the node's first token.
#[derive(Clone, Debug)]
enum Syn {
    Name(String, usize),
    App(Box<Syn>, Box<Syn>),
    Arrow(Box<Syn>, Box<Syn>),
    List(Box<Syn>, usize),
    Tuple(Vec<Syn>, usize),
}

impl Syn {
    fn offset(&self) -> usize {
        match self {
            Syn::Name(_, o) | Syn::List(_, o) | Syn::Tuple(_, o) => *o,
            Syn::App(l, _) | Syn::Arrow(l, _) => l.offset(),
        }
    }
}

struct SigParser {
    tokens: Vec<(Tok, usize)>,
    pos: usize,
    len: usize,
}

impl SigParser {
    fn new(src: &str) -> Result<Self, SigError> {
        Ok(SigParser {
            tokens: lex(src)?,
            pos: 0,
            len: src.len(),
        })
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map(|(_, o)| *o).unwrap_or(self.len)
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: &Tok, what: &str) -> Result<(), SigError> {
        if self.eat(tok) {
            Ok(())
        } else {
            Err(SigError::new(format!("expected {}", what), self.offset()))
        }
    }

    /// Returns the context predicates (unresolved) and the head.
    fn qual(mut self) -> Result<(Vec<Syn>, Syn), SigError> {
        let first = self.ty()?;
        let result = if self.eat(&Tok::FatArrow) {
            let context = match first {
                Syn::Tuple(items, _) => items,
                single => vec![single],
            };
            (context, self.ty()?)
        } else {
            if let Syn::Tuple(_, offset) = first {
                return Err(SigError::new("tuple types are not supported", offset));
            }
            (Vec::new(), first)
        };
        if self.pos < self.tokens.len() {
            return Err(SigError::new("unexpected input after type", self.offset()));
        }
        Ok(result)
    }

    fn ty(&mut self) -> Result<Syn, SigError> {
        let lhs = self.btype()?;
        if self.eat(&Tok::Arrow) {
            let rhs = self.ty()?;
            return Ok(Syn::Arrow(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn btype(&mut self) -> Result<Syn, SigError> {
        let mut acc = self.atype()?;
        while matches!(
            self.peek(),
            Some(Tok::Name(_)) | Some(Tok::LParen) | Some(Tok::LBracket)
        ) {
            let arg = self.atype()?;
            acc = Syn::App(Box::new(acc), Box::new(arg));
        }
        Ok(acc)
    }

    fn atype(&mut self) -> Result<Syn, SigError> {
        let offset = self.offset();
        match self.peek().cloned() {
            Some(Tok::Name(name)) => {
                self.pos += 1;
                Ok(Syn::Name(name, offset))
            }
            Some(Tok::LParen) => {
                self.pos += 1;
                let first = self.ty()?;
                if self.eat(&Tok::Comma) {
                    let mut items = vec![first, self.ty()?];
                    while self.eat(&Tok::Comma) {
                        items.push(self.ty()?);
                    }
                    self.expect(&Tok::RParen, "`)`")?;
                    return Ok(Syn::Tuple(items, offset));
                }
                self.expect(&Tok::RParen, "`)`")?;
                Ok(first)
            }
            Some(Tok::LBracket) => {
                self.pos += 1;
                let elem = self.ty()?;
                self.expect(&Tok::RBracket, "`]`")?;
                Ok(Syn::List(Box::new(elem), offset))
            }
            _ => Err(SigError::new("expected a type", offset)),
        }
    }
}

// ── Resolution ─────────────────────────────────────────────────────────

fn is_var_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_lowercase() || c == '_')
}

fn syn_spine(syn: &Syn) -> (&Syn, Vec<&Syn>) {
    let mut head = syn;
    let mut args = Vec::new();
    while let Syn::App(l, r) = head {
        args.push(r.as_ref());
        head = l;
    }
    args.reverse();
    (head, args)
}

struct Resolver<'a> {
    cons: &'a Constructors,
    /// Number of arguments each type variable is applied to.
    arities: FxHashMap<String, usize>,
}

impl<'a> Resolver<'a> {
    fn new(cons: &'a Constructors) -> Self {
        Resolver {
            cons,
            arities: FxHashMap::default(),
        }
    }

    fn note_arity(&mut self, name: &str, arity: usize, offset: usize) -> Result<(), SigError> {
        match self.arities.get(name) {
            Some(&known) if known != arity => Err(SigError::new(
                format!(
                    "type variable `{}` is applied to {} argument(s) here but {} elsewhere",
                    name, arity, known
                ),
                offset,
            )),
            _ => {
                self.arities.insert(name.to_string(), arity);
                Ok(())
            }
        }
    }

    fn collect_arities(&mut self, syn: &Syn) -> Result<(), SigError> {
        match syn {
            Syn::Name(name, offset) if is_var_name(name) => self.note_arity(name, 0, *offset),
            Syn::Name(..) => Ok(()),
            Syn::App(..) => {
                let (head, args) = syn_spine(syn);
                if let Syn::Name(name, offset) = head {
                    if is_var_name(name) {
                        self.note_arity(name, args.len(), *offset)?;
                    }
                } else {
                    self.collect_arities(head)?;
                }
                for arg in args {
                    self.collect_arities(arg)?;
                }
                Ok(())
            }
            Syn::Arrow(l, r) => {
                self.collect_arities(l)?;
                self.collect_arities(r)
            }
            Syn::List(elem, _) => self.collect_arities(elem),
            Syn::Tuple(items, _) => items.iter().try_for_each(|i| self.collect_arities(i)),
        }
    }

    fn pred(&self, syn: &Syn) -> Result<Pred, SigError> {
        match syn {
            Syn::App(class, arg) => match class.as_ref() {
                Syn::Name(name, _) if !is_var_name(name) => {
                    Ok(Pred::new(name.clone(), self.ty(arg)?))
                }
                other => Err(SigError::new("expected a class name", other.offset())),
            },
            other => Err(SigError::new(
                "expected a class constraint such as `Num a`",
                other.offset(),
            )),
        }
    }

    fn star_type(&self, syn: &Syn) -> Result<Type, SigError> {
        let ty = self.ty(syn)?;
        if ty.kind() != Kind::Star {
            return Err(SigError::new(
                format!("`{}` has kind `{}`, expected `*`", ty, ty.kind()),
                syn.offset(),
            ));
        }
        Ok(ty)
    }

    fn ty(&self, syn: &Syn) -> Result<Type, SigError> {
        match syn {
            Syn::Name(name, _) if is_var_name(name) => {
                let arity = self.arities.get(name).copied().unwrap_or(0);
                Ok(Type::var(name.clone(), Kind::of_arity(arity)))
            }
            Syn::Name(name, offset) => match self.cons.get(name) {
                Some(kind) => Ok(Type::con(name.clone(), kind.clone())),
                None => Err(SigError::new(
                    format!("unknown type constructor `{}`", name),
                    *offset,
                )),
            },
            Syn::App(l, r) => {
                let lt = self.ty(l)?;
                let rt = self.ty(r)?;
                match lt.kind() {
                    Kind::Fun(arg, _) if *arg == rt.kind() => Ok(Type::app(lt, rt)),
                    Kind::Fun(arg, _) => Err(SigError::new(
                        format!(
                            "`{}` expects an argument of kind `{}`, but `{}` has kind `{}`",
                            lt,
                            arg,
                            rt,
                            rt.kind()
                        ),
                        r.offset(),
                    )),
                    Kind::Star => Err(SigError::new(
                        format!("`{}` is not a type constructor", lt),
                        r.offset(),
                    )),
                }
            }
            Syn::Arrow(l, r) => Ok(Type::fun(self.star_type(l)?, self.star_type(r)?)),
            Syn::List(elem, _) => Ok(Type::list(self.star_type(elem)?)),
            Syn::Tuple(_, offset) => Err(SigError::new("tuple types are not supported", *offset)),
        }
    }
}
