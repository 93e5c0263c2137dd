//! The bootstrap layer: type constructors, classes, instances and the
//! signatures of global bindings, read from a TOML document.
//!
//! ```toml
//! defaults = ["Number"]
//!
//! [types]
//! Number = 0
//! Pattern = 1
//!
//! [[classes]]
//! name = "Ord"
//! supers = ["Eq"]
//!
//! [[instances]]
//! instance = "FromNumber a => FromNumber (Pattern a)"
//!
//! [bindings]
//! "+" = "Num a => a -> a -> a"
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use tracing::debug;

use conch_common::ast::{Expr, Program};

use crate::class_env::ClassEnv;
use crate::env::TypeEnv;
use crate::error::{ClassEnvError, TypeError};
use crate::sig::{self, Constructors, SigError};
use crate::ty::{Kind, ARROW, LIST};
use crate::TypeckResult;

/// A parsed prelude document.
#[derive(Debug, Default, Deserialize)]
pub struct PreludeConfig {
    /// Candidate types for ambiguity resolution, most preferred first.
    #[serde(default)]
    pub defaults: Vec<String>,
    /// Constructor name to arity. Every argument has kind `*`.
    #[serde(default)]
    pub types: BTreeMap<String, usize>,
    /// Registered in order, so a superclass must come before its subclasses.
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub instances: Vec<InstanceDecl>,
    /// Binding name to type signature.
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub supers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstanceDecl {
    pub instance: String,
}

/// Everything inference needs: the class environment, the global bindings
/// and the constructor table signatures were read against.
#[derive(Debug, Clone)]
pub struct Prelude {
    pub class_env: ClassEnv,
    pub type_env: TypeEnv,
    pub constructors: Constructors,
}

#[derive(Debug)]
pub enum PreludeError {
    Parse(toml::de::Error),
    /// `->` and `List` are built in and cannot be redeclared.
    ReservedType { name: String },
    ClassEnv(ClassEnvError),
    Instance { instance: String, error: SigError },
    Signature { binding: String, error: SigError },
    Default { ty: String, error: SigError },
}

impl fmt::Display for PreludeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreludeError::Parse(e) => write!(f, "failed to parse prelude: {}", e),
            PreludeError::ReservedType { name } => {
                write!(f, "type `{}` is built in and cannot be redeclared", name)
            }
            PreludeError::ClassEnv(e) => write!(f, "{}", e),
            PreludeError::Instance { instance, error } => {
                write!(f, "in instance `{}`: {}", instance, error)
            }
            PreludeError::Signature { binding, error } => {
                write!(f, "in signature of `{}`: {}", binding, error)
            }
            PreludeError::Default { ty, error } => {
                write!(f, "in default `{}`: {}", ty, error)
            }
        }
    }
}

impl std::error::Error for PreludeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PreludeError::Parse(e) => Some(e),
            PreludeError::ClassEnv(e) => Some(e),
            PreludeError::Instance { error, .. }
            | PreludeError::Signature { error, .. }
            | PreludeError::Default { error, .. } => Some(error),
            PreludeError::ReservedType { .. } => None,
        }
    }
}

impl From<ClassEnvError> for PreludeError {
    fn from(e: ClassEnvError) -> Self {
        PreludeError::ClassEnv(e)
    }
}

impl PreludeConfig {
    /// Parse a prelude document.
    pub fn from_str(content: &str) -> Result<PreludeConfig, PreludeError> {
        toml::from_str(content).map_err(PreludeError::Parse)
    }

    /// Register the constructors, classes, instances and bindings.
    pub fn build(&self) -> Result<Prelude, PreludeError> {
        let mut constructors = sig::base_constructors();
        for (name, &arity) in &self.types {
            if name == ARROW || name == LIST {
                return Err(PreludeError::ReservedType { name: name.clone() });
            }
            constructors.insert(name.clone(), Kind::of_arity(arity));
        }

        let mut class_env = ClassEnv::new();
        for decl in &self.classes {
            class_env.add_class(decl.name.clone(), decl.supers.clone())?;
        }
        for decl in &self.instances {
            let inst = sig::parse_instance(&decl.instance, &constructors).map_err(|error| {
                PreludeError::Instance {
                    instance: decl.instance.clone(),
                    error,
                }
            })?;
            check_classes(&class_env, &inst.preds)?;
            class_env.add_instance(inst.preds, inst.head)?;
        }

        let mut defaults = Vec::with_capacity(self.defaults.len());
        for ty in &self.defaults {
            let qt = sig::parse_qual_type(ty, &constructors).map_err(|error| {
                PreludeError::Default {
                    ty: ty.clone(),
                    error,
                }
            })?;
            if !qt.preds.is_empty() {
                return Err(PreludeError::Default {
                    ty: ty.clone(),
                    error: SigError {
                        message: "a default type cannot have a context".to_string(),
                        offset: 0,
                    },
                });
            }
            defaults.push(qt.head);
        }
        class_env.set_defaults(defaults);

        let mut type_env = TypeEnv::new();
        for (name, signature) in &self.bindings {
            let scheme = sig::parse_scheme(signature, &constructors).map_err(|error| {
                PreludeError::Signature {
                    binding: name.clone(),
                    error,
                }
            })?;
            check_classes(&class_env, &scheme.body.preds)?;
            type_env.insert(name.clone(), scheme);
        }

        debug!(
            types = constructors.len(),
            classes = self.classes.len(),
            instances = self.instances.len(),
            bindings = type_env.len(),
            "prelude built"
        );
        Ok(Prelude {
            class_env,
            type_env,
            constructors,
        })
    }
}

fn check_classes(class_env: &ClassEnv, preds: &[crate::pred::Pred]) -> Result<(), PreludeError> {
    match preds.iter().find(|p| !class_env.is_defined(&p.class)) {
        Some(p) => Err(ClassEnvError::UnknownClass {
            class: p.class.clone(),
        }
        .into()),
        None => Ok(()),
    }
}

impl Prelude {
    pub fn check_expr(&self, expr: &Expr) -> Result<TypeckResult, TypeError> {
        crate::check_expr(&self.class_env, &self.type_env, expr)
    }

    pub fn check_program(&self, program: &Program) -> Vec<Result<TypeckResult, TypeError>> {
        crate::check_program(&self.class_env, &self.type_env, program)
    }
}
