//! The one extensibility seam over `Value` (spec §2, §6, §9): a trait
//! with one method per variant, dispatched through `Value::accept`.
//! Where the source uses inheritance plus the visitor pattern, this is
//! the tagged-sum-plus-trait translation spec §9 calls for — operator
//! methods like `plus` stay as plain functions on `Value`, and this
//! trait is reserved for genuinely variant-sensitive passes (the
//! serializer, the inspector, structural analyses).

use crate::value::arg_list::ArgList;
use crate::value::calculation::Calculation;
use crate::value::color::Color;
use crate::value::function::{SassFunction, SassMixin};
use crate::value::list::SassList;
use crate::value::map::SassMap;
use crate::value::number::SassNumber;
use crate::value::string::SassString;

/// Implemented by any consumer that needs to branch on a `Value`'s
/// variant — the serializer, an inspector, a variant-sensitive analysis
/// pass. `Output` lets each implementation pick its own return type
/// (e.g. `String` for a serializer, `()` for a pure side-effecting walk).
pub trait Visitor {
    type Output;

    fn visit_number(&mut self, number: &SassNumber) -> Self::Output;
    fn visit_color(&mut self, color: &Color) -> Self::Output;
    fn visit_string(&mut self, string: &SassString) -> Self::Output;
    fn visit_list(&mut self, list: &SassList) -> Self::Output;
    fn visit_map(&mut self, map: &SassMap) -> Self::Output;
    fn visit_argument_list(&mut self, args: &ArgList) -> Self::Output;
    fn visit_boolean(&mut self, value: bool) -> Self::Output;
    fn visit_null(&mut self) -> Self::Output;
    fn visit_function(&mut self, function: &SassFunction) -> Self::Output;
    fn visit_mixin(&mut self, mixin: &SassMixin) -> Self::Output;
    fn visit_calculation(&mut self, calculation: &Calculation) -> Self::Output;
}
