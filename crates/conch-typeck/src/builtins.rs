//! The standard live-coding prelude: literal classes, numeric classes,
//! pattern types and the scheduler bindings.

use crate::prelude::{Prelude, PreludeConfig, PreludeError};

pub const STANDARD_PRELUDE: &str = r##"
defaults = ["Number"]

[types]
Number = 0
String = 0
Bool = 0
Unit = 0
ID = 0
Controls = 0
Pattern = 1
IO = 1

[[classes]]
name = "FromNumber"

[[classes]]
name = "FromString"

[[classes]]
name = "Eq"

[[classes]]
name = "Ord"
supers = ["Eq"]

[[classes]]
name = "Num"

[[classes]]
name = "Fractional"
supers = ["Num"]

[[classes]]
name = "Show"

[[instances]]
instance = "FromNumber Number"

[[instances]]
instance = "FromNumber ID"

[[instances]]
instance = "FromNumber a => FromNumber (Pattern a)"

[[instances]]
instance = "FromString String"

[[instances]]
instance = "FromString ID"

[[instances]]
instance = "FromString a => FromString (Pattern a)"

[[instances]]
instance = "Eq Number"

[[instances]]
instance = "Eq String"

[[instances]]
instance = "Eq Bool"

[[instances]]
instance = "Eq a => Eq [a]"

[[instances]]
instance = "Ord Number"

[[instances]]
instance = "Ord String"

[[instances]]
instance = "Ord a => Ord [a]"

[[instances]]
instance = "Num Number"

[[instances]]
instance = "Num a => Num (Pattern a)"

[[instances]]
instance = "Fractional Number"

[[instances]]
instance = "Fractional a => Fractional (Pattern a)"

[[instances]]
instance = "Show Number"

[[instances]]
instance = "Show String"

[[instances]]
instance = "Show Bool"

[bindings]
"+" = "Num a => a -> a -> a"
"-" = "Num a => a -> a -> a"
"*" = "Num a => a -> a -> a"
"/" = "Fractional a => a -> a -> a"
"==" = "Eq a => a -> a -> Bool"
"<" = "Ord a => a -> a -> Bool"
">" = "Ord a => a -> a -> Bool"
"|+" = "Num a => Pattern a -> Pattern a -> Pattern a"
"|+|" = "Num a => Pattern a -> Pattern a -> Pattern a"
"+|" = "Num a => Pattern a -> Pattern a -> Pattern a"
"|-" = "Num a => Pattern a -> Pattern a -> Pattern a"
"|-|" = "Num a => Pattern a -> Pattern a -> Pattern a"
"-|" = "Num a => Pattern a -> Pattern a -> Pattern a"
"|*" = "Num a => Pattern a -> Pattern a -> Pattern a"
"|*|" = "Num a => Pattern a -> Pattern a -> Pattern a"
"*|" = "Num a => Pattern a -> Pattern a -> Pattern a"
"#" = "Pattern Controls -> Pattern Controls -> Pattern Controls"
show = "Show a => a -> String"
p = "ID -> Pattern Controls -> IO Unit"
d1 = "Pattern Controls -> IO Unit"
d2 = "Pattern Controls -> IO Unit"
d3 = "Pattern Controls -> IO Unit"
d4 = "Pattern Controls -> IO Unit"
d5 = "Pattern Controls -> IO Unit"
d6 = "Pattern Controls -> IO Unit"
d7 = "Pattern Controls -> IO Unit"
d8 = "Pattern Controls -> IO Unit"
d9 = "Pattern Controls -> IO Unit"
d10 = "Pattern Controls -> IO Unit"
d11 = "Pattern Controls -> IO Unit"
d12 = "Pattern Controls -> IO Unit"
hush = "IO Unit"
s = "Pattern String -> Pattern Controls"
n = "Pattern Number -> Pattern Controls"
fast = "Pattern Number -> Pattern a -> Pattern a"
slow = "Pattern Number -> Pattern a -> Pattern a"
rev = "Pattern a -> Pattern a"
silence = "Pattern a"
"##;

/// Build the prelude from [`STANDARD_PRELUDE`].
pub fn standard_prelude() -> Result<Prelude, PreludeError> {
    PreludeConfig::from_str(STANDARD_PRELUDE)?.build()
}
