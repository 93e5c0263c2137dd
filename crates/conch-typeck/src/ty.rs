//! Kinds and types.
//!
//! Types are plain values: a type variable is identified by its name, and
//! every operation builds new types rather than mutating shared cells.
//! `Gen` placeholders only ever appear inside a [`Scheme`](crate::scheme::Scheme)
//! body and are replaced with fresh variables before unification sees them.

use serde::Serialize;

/// The kind of a type: `*` for inhabited types, `k1 -> k2` for constructors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    Star,
    Fun(Box<Kind>, Box<Kind>),
}

impl Kind {
    pub fn fun(arg: Kind, ret: Kind) -> Kind {
        Kind::Fun(Box::new(arg), Box::new(ret))
    }

    /// `* -> * -> ... -> *` with `arity` arrows.
    pub fn of_arity(arity: usize) -> Kind {
        (0..arity).fold(Kind::Star, |acc, _| Kind::fun(Kind::Star, acc))
    }
}

/// A type variable. Two variables are the same variable iff their ids match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Tyvar {
    pub id: String,
    pub kind: Kind,
}

impl Tyvar {
    pub fn new(id: impl Into<String>, kind: Kind) -> Self {
        Tyvar {
            id: id.into(),
            kind,
        }
    }
}

/// A named type constructor such as `Number`, `Pattern` or `->`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Tycon {
    pub id: String,
    pub kind: Kind,
}

impl Tycon {
    pub fn new(id: impl Into<String>, kind: Kind) -> Self {
        Tycon {
            id: id.into(),
            kind,
        }
    }
}

pub const ARROW: &str = "->";
pub const LIST: &str = "List";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    Var(Tyvar),
    Con(Tycon),
    /// Curried application; `a -> b` is `App(App(->, a), b)`.
    App(Box<Type>, Box<Type>),
    /// The n-th quantified variable of the enclosing scheme.
    Gen(usize),
}

impl Type {
    pub fn var(id: impl Into<String>, kind: Kind) -> Type {
        Type::Var(Tyvar::new(id, kind))
    }

    pub fn con(id: impl Into<String>, kind: Kind) -> Type {
        Type::Con(Tycon::new(id, kind))
    }

    /// A nullary constructor of kind `*`.
    pub fn star(id: impl Into<String>) -> Type {
        Type::con(id, Kind::Star)
    }

    pub fn app(left: Type, right: Type) -> Type {
        Type::App(Box::new(left), Box::new(right))
    }

    pub fn arrow() -> Type {
        Type::con(ARROW, Kind::of_arity(2))
    }

    /// The function type `domain -> codomain`.
    pub fn fun(domain: Type, codomain: Type) -> Type {
        Type::app(Type::app(Type::arrow(), domain), codomain)
    }

    /// `List t`.
    pub fn list(elem: Type) -> Type {
        Type::app(Type::con(LIST, Kind::of_arity(1)), elem)
    }

    /// Split a function type into its domain and codomain.
    pub fn as_fun(&self) -> Option<(&Type, &Type)> {
        match self {
            Type::App(left, codomain) => match left.as_ref() {
                Type::App(arrow, domain) => match arrow.as_ref() {
                    Type::Con(c) if c.id == ARROW => Some((domain, codomain)),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }

    /// Flatten an application spine into its head and arguments.
    pub fn spine(&self) -> (&Type, Vec<&Type>) {
        let mut head = self;
        let mut args = Vec::new();
        while let Type::App(left, right) = head {
            args.push(right.as_ref());
            head = left;
        }
        args.reverse();
        (head, args)
    }

    /// Index of the leftmost `Gen` placeholder anywhere in this type.
    pub fn first_gen(&self) -> Option<usize> {
        match self {
            Type::Gen(n) => Some(*n),
            Type::App(l, r) => l.first_gen().or_else(|| r.first_gen()),
            Type::Var(_) | Type::Con(_) => None,
        }
    }

    /// Whether `var` occurs anywhere in this type.
    pub fn occurs(&self, var: &Tyvar) -> bool {
        match self {
            Type::Var(v) => v.id == var.id,
            Type::App(l, r) => l.occurs(var) || r.occurs(var),
            Type::Con(_) | Type::Gen(_) => false,
        }
    }
}

/// Anything that has a kind.
pub trait HasKind {
    fn kind(&self) -> Kind;
}

impl HasKind for Tyvar {
    fn kind(&self) -> Kind {
        self.kind.clone()
    }
}

impl HasKind for Tycon {
    fn kind(&self) -> Kind {
        self.kind.clone()
    }
}

impl HasKind for Type {
    fn kind(&self) -> Kind {
        match self {
            Type::Var(v) => v.kind(),
            Type::Con(c) => c.kind(),
            // Applications are kind-checked where they are built (the
            // signature reader), so the left side is always a `Fun` here.
            Type::App(left, _) => match left.kind() {
                Kind::Fun(_, ret) => *ret,
                Kind::Star => Kind::Star,
            },
            Type::Gen(_) => Kind::Star,
        }
    }
}

/// Name of the `n`-th fresh type variable of an inference run.
pub fn enum_id(n: u32) -> String {
    format!("t{n}")
}
