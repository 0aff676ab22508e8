//! Element types and the closed attribute vocabulary.
//!
//! Attribute identifiers are small closed enums keyed by (arity, value
//! type). Each variant declares its key element types and its default; the
//! closed set is what keeps export and import bounded and exhaustively
//! validatable. The [`Attribute`] trait also projects each family onto its
//! storage table and its per-diff pending set, so the store can be written
//! once, generically.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::diff::DiffPending;
use super::key::{AttrKey, Key0, Key1, Key2, QuadKey, SymPair};
use super::map::AttrMap;

/// The kinds of elements a store can hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ElementType {
    Variable,
    LinearConstraint,
    QuadraticConstraint,
    IndicatorConstraint,
    AuxiliaryObjective,
}

impl ElementType {
    pub const COUNT: usize = 5;

    pub const ALL: [ElementType; Self::COUNT] = [
        ElementType::Variable,
        ElementType::LinearConstraint,
        ElementType::QuadraticConstraint,
        ElementType::IndicatorConstraint,
        ElementType::AuxiliaryObjective,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Variable => "variable",
            ElementType::LinearConstraint => "linear_constraint",
            ElementType::QuadraticConstraint => "quadratic_constraint",
            ElementType::IndicatorConstraint => "indicator_constraint",
            ElementType::AuxiliaryObjective => "auxiliary_objective",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            ElementType::Variable => 0,
            ElementType::LinearConstraint => 1,
            ElementType::QuadraticConstraint => 2,
            ElementType::IndicatorConstraint => 3,
            ElementType::AuxiliaryObjective => 4,
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scalar value types attributes can carry.
pub trait AttrValue: Copy + PartialEq + std::fmt::Debug {}

impl AttrValue for bool {}
impl AttrValue for i64 {}
impl AttrValue for f64 {}

/// An attribute identifier: a variant of one of the closed attribute enums.
///
/// Beyond the descriptor methods, the trait projects the attribute's family
/// onto its table in [`AttrTables`] and its pending set in a diff, which
/// lets `set_attr`/`get_attr`/cascade/export be generic over families.
pub trait Attribute: Copy + Ord + std::fmt::Debug + 'static {
    type Key: AttrKey;
    type Value: AttrValue;

    const ALL: &'static [Self];

    /// Element type expected at each key slot.
    fn key_types(self) -> &'static [ElementType];

    fn default_value(self) -> Self::Value;

    fn as_str(self) -> &'static str;

    fn table(tables: &AttrTables) -> &BTreeMap<Self, AttrMap<Self::Key, Self::Value>>;

    fn table_mut(tables: &mut AttrTables) -> &mut BTreeMap<Self, AttrMap<Self::Key, Self::Value>>;

    fn pending(pending: &mut DiffPending) -> &mut BTreeMap<Self, BTreeSet<Self::Key>>;

    fn pending_ref(pending: &DiffPending) -> &BTreeMap<Self, BTreeSet<Self::Key>>;
}

/// One sparse table per attribute family.
#[derive(Debug, Clone, Default)]
pub struct AttrTables {
    pub(crate) bool0: BTreeMap<BoolAttr0, AttrMap<Key0, bool>>,
    pub(crate) double0: BTreeMap<DoubleAttr0, AttrMap<Key0, f64>>,
    pub(crate) bool1: BTreeMap<BoolAttr1, AttrMap<Key1, bool>>,
    pub(crate) int1: BTreeMap<IntAttr1, AttrMap<Key1, i64>>,
    pub(crate) double1: BTreeMap<DoubleAttr1, AttrMap<Key1, f64>>,
    pub(crate) double2: BTreeMap<DoubleAttr2, AttrMap<Key2, f64>>,
    pub(crate) sym_double2: BTreeMap<SymmetricDoubleAttr2, AttrMap<SymPair, f64>>,
    pub(crate) sym_double3: BTreeMap<SymmetricDoubleAttr3, AttrMap<QuadKey, f64>>,
}

macro_rules! attribute_family {
    ($attr:ty, $key:ty, $value:ty, $table:ident, $all:expr) => {
        impl Attribute for $attr {
            type Key = $key;
            type Value = $value;

            const ALL: &'static [Self] = &$all;

            fn key_types(self) -> &'static [ElementType] {
                self.key_types_impl()
            }

            fn default_value(self) -> Self::Value {
                self.default_value_impl()
            }

            fn as_str(self) -> &'static str {
                self.as_str_impl()
            }

            fn table(tables: &AttrTables) -> &BTreeMap<Self, AttrMap<$key, $value>> {
                &tables.$table
            }

            fn table_mut(tables: &mut AttrTables) -> &mut BTreeMap<Self, AttrMap<$key, $value>> {
                &mut tables.$table
            }

            fn pending(pending: &mut DiffPending) -> &mut BTreeMap<Self, BTreeSet<$key>> {
                &mut pending.$table
            }

            fn pending_ref(pending: &DiffPending) -> &BTreeMap<Self, BTreeSet<$key>> {
                &pending.$table
            }
        }
    };
}

// ── Arity 0 ─────────────────────────────────────────────────

/// Model-level booleans.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BoolAttr0 {
    /// Whether the primary objective maximizes (false = minimize).
    Maximize,
}

impl BoolAttr0 {
    fn key_types_impl(self) -> &'static [ElementType] {
        &[]
    }

    fn default_value_impl(self) -> bool {
        false
    }

    fn as_str_impl(self) -> &'static str {
        "maximize"
    }
}

attribute_family!(BoolAttr0, Key0, bool, bool0, [BoolAttr0::Maximize]);

/// Model-level doubles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DoubleAttr0 {
    /// Constant offset of the primary objective.
    ObjectiveOffset,
}

impl DoubleAttr0 {
    fn key_types_impl(self) -> &'static [ElementType] {
        &[]
    }

    fn default_value_impl(self) -> f64 {
        0.0
    }

    fn as_str_impl(self) -> &'static str {
        "objective_offset"
    }
}

attribute_family!(DoubleAttr0, Key0, f64, double0, [DoubleAttr0::ObjectiveOffset]);

// ── Arity 1 ─────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BoolAttr1 {
    /// Whether a variable is integer-valued.
    VariableInteger,
    /// Whether an indicator constraint activates when its indicator is 0.
    IndicatorActivateOnZero,
}

impl BoolAttr1 {
    fn key_types_impl(self) -> &'static [ElementType] {
        match self {
            BoolAttr1::VariableInteger => &[ElementType::Variable],
            BoolAttr1::IndicatorActivateOnZero => &[ElementType::IndicatorConstraint],
        }
    }

    fn default_value_impl(self) -> bool {
        false
    }

    fn as_str_impl(self) -> &'static str {
        match self {
            BoolAttr1::VariableInteger => "variable_integer",
            BoolAttr1::IndicatorActivateOnZero => "indicator_activate_on_zero",
        }
    }
}

attribute_family!(
    BoolAttr1,
    Key1,
    bool,
    bool1,
    [BoolAttr1::VariableInteger, BoolAttr1::IndicatorActivateOnZero]
);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum IntAttr1 {
    /// Priority of an auxiliary objective (lower solves first).
    AuxiliaryObjectivePriority,
    /// Variable id steering an indicator constraint; -1 when unset.
    IndicatorVariable,
}

impl IntAttr1 {
    fn key_types_impl(self) -> &'static [ElementType] {
        match self {
            IntAttr1::AuxiliaryObjectivePriority => &[ElementType::AuxiliaryObjective],
            IntAttr1::IndicatorVariable => &[ElementType::IndicatorConstraint],
        }
    }

    fn default_value_impl(self) -> i64 {
        match self {
            IntAttr1::AuxiliaryObjectivePriority => 0,
            IntAttr1::IndicatorVariable => -1,
        }
    }

    fn as_str_impl(self) -> &'static str {
        match self {
            IntAttr1::AuxiliaryObjectivePriority => "auxiliary_objective_priority",
            IntAttr1::IndicatorVariable => "indicator_variable",
        }
    }
}

attribute_family!(
    IntAttr1,
    Key1,
    i64,
    int1,
    [IntAttr1::AuxiliaryObjectivePriority, IntAttr1::IndicatorVariable]
);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DoubleAttr1 {
    VariableLowerBound,
    VariableUpperBound,
    /// Linear coefficient of a variable in the primary objective.
    ObjectiveLinearCoefficient,
    LinearConstraintLowerBound,
    LinearConstraintUpperBound,
    QuadraticConstraintLowerBound,
    QuadraticConstraintUpperBound,
    IndicatorConstraintLowerBound,
    IndicatorConstraintUpperBound,
    AuxiliaryObjectiveOffset,
}

impl DoubleAttr1 {
    fn key_types_impl(self) -> &'static [ElementType] {
        match self {
            DoubleAttr1::VariableLowerBound
            | DoubleAttr1::VariableUpperBound
            | DoubleAttr1::ObjectiveLinearCoefficient => &[ElementType::Variable],
            DoubleAttr1::LinearConstraintLowerBound
            | DoubleAttr1::LinearConstraintUpperBound => &[ElementType::LinearConstraint],
            DoubleAttr1::QuadraticConstraintLowerBound
            | DoubleAttr1::QuadraticConstraintUpperBound => &[ElementType::QuadraticConstraint],
            DoubleAttr1::IndicatorConstraintLowerBound
            | DoubleAttr1::IndicatorConstraintUpperBound => &[ElementType::IndicatorConstraint],
            DoubleAttr1::AuxiliaryObjectiveOffset => &[ElementType::AuxiliaryObjective],
        }
    }

    fn default_value_impl(self) -> f64 {
        match self {
            DoubleAttr1::VariableLowerBound
            | DoubleAttr1::LinearConstraintLowerBound
            | DoubleAttr1::QuadraticConstraintLowerBound
            | DoubleAttr1::IndicatorConstraintLowerBound => f64::NEG_INFINITY,
            DoubleAttr1::VariableUpperBound
            | DoubleAttr1::LinearConstraintUpperBound
            | DoubleAttr1::QuadraticConstraintUpperBound
            | DoubleAttr1::IndicatorConstraintUpperBound => f64::INFINITY,
            DoubleAttr1::ObjectiveLinearCoefficient | DoubleAttr1::AuxiliaryObjectiveOffset => 0.0,
        }
    }

    fn as_str_impl(self) -> &'static str {
        match self {
            DoubleAttr1::VariableLowerBound => "variable_lower_bound",
            DoubleAttr1::VariableUpperBound => "variable_upper_bound",
            DoubleAttr1::ObjectiveLinearCoefficient => "objective_linear_coefficient",
            DoubleAttr1::LinearConstraintLowerBound => "linear_constraint_lower_bound",
            DoubleAttr1::LinearConstraintUpperBound => "linear_constraint_upper_bound",
            DoubleAttr1::QuadraticConstraintLowerBound => "quadratic_constraint_lower_bound",
            DoubleAttr1::QuadraticConstraintUpperBound => "quadratic_constraint_upper_bound",
            DoubleAttr1::IndicatorConstraintLowerBound => "indicator_constraint_lower_bound",
            DoubleAttr1::IndicatorConstraintUpperBound => "indicator_constraint_upper_bound",
            DoubleAttr1::AuxiliaryObjectiveOffset => "auxiliary_objective_offset",
        }
    }
}

attribute_family!(
    DoubleAttr1,
    Key1,
    f64,
    double1,
    [
        DoubleAttr1::VariableLowerBound,
        DoubleAttr1::VariableUpperBound,
        DoubleAttr1::ObjectiveLinearCoefficient,
        DoubleAttr1::LinearConstraintLowerBound,
        DoubleAttr1::LinearConstraintUpperBound,
        DoubleAttr1::QuadraticConstraintLowerBound,
        DoubleAttr1::QuadraticConstraintUpperBound,
        DoubleAttr1::IndicatorConstraintLowerBound,
        DoubleAttr1::IndicatorConstraintUpperBound,
        DoubleAttr1::AuxiliaryObjectiveOffset,
    ]
);

// ── Arity 2 ─────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DoubleAttr2 {
    /// Coefficient at (linear_constraint, variable).
    LinearConstraintCoefficient,
    /// Linear part at (quadratic_constraint, variable).
    QuadraticConstraintLinearCoefficient,
    /// Linear body at (indicator_constraint, variable).
    IndicatorConstraintLinearCoefficient,
    /// Coefficient at (auxiliary_objective, variable).
    AuxiliaryObjectiveLinearCoefficient,
}

impl DoubleAttr2 {
    fn key_types_impl(self) -> &'static [ElementType] {
        match self {
            DoubleAttr2::LinearConstraintCoefficient => {
                &[ElementType::LinearConstraint, ElementType::Variable]
            }
            DoubleAttr2::QuadraticConstraintLinearCoefficient => {
                &[ElementType::QuadraticConstraint, ElementType::Variable]
            }
            DoubleAttr2::IndicatorConstraintLinearCoefficient => {
                &[ElementType::IndicatorConstraint, ElementType::Variable]
            }
            DoubleAttr2::AuxiliaryObjectiveLinearCoefficient => {
                &[ElementType::AuxiliaryObjective, ElementType::Variable]
            }
        }
    }

    fn default_value_impl(self) -> f64 {
        0.0
    }

    fn as_str_impl(self) -> &'static str {
        match self {
            DoubleAttr2::LinearConstraintCoefficient => "linear_constraint_coefficient",
            DoubleAttr2::QuadraticConstraintLinearCoefficient => {
                "quadratic_constraint_linear_coefficient"
            }
            DoubleAttr2::IndicatorConstraintLinearCoefficient => {
                "indicator_constraint_linear_coefficient"
            }
            DoubleAttr2::AuxiliaryObjectiveLinearCoefficient => {
                "auxiliary_objective_linear_coefficient"
            }
        }
    }
}

attribute_family!(
    DoubleAttr2,
    Key2,
    f64,
    double2,
    [
        DoubleAttr2::LinearConstraintCoefficient,
        DoubleAttr2::QuadraticConstraintLinearCoefficient,
        DoubleAttr2::IndicatorConstraintLinearCoefficient,
        DoubleAttr2::AuxiliaryObjectiveLinearCoefficient,
    ]
);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SymmetricDoubleAttr2 {
    /// Quadratic coefficient of the primary objective at an unordered
    /// variable pair.
    ObjectiveQuadraticCoefficient,
}

impl SymmetricDoubleAttr2 {
    fn key_types_impl(self) -> &'static [ElementType] {
        &[ElementType::Variable, ElementType::Variable]
    }

    fn default_value_impl(self) -> f64 {
        0.0
    }

    fn as_str_impl(self) -> &'static str {
        "objective_quadratic_coefficient"
    }
}

attribute_family!(
    SymmetricDoubleAttr2,
    SymPair,
    f64,
    sym_double2,
    [SymmetricDoubleAttr2::ObjectiveQuadraticCoefficient]
);

// ── Arity 3 ─────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SymmetricDoubleAttr3 {
    /// Quadratic coefficient at (quadratic_constraint, unordered variable
    /// pair).
    QuadraticConstraintQuadraticCoefficient,
}

impl SymmetricDoubleAttr3 {
    fn key_types_impl(self) -> &'static [ElementType] {
        &[
            ElementType::QuadraticConstraint,
            ElementType::Variable,
            ElementType::Variable,
        ]
    }

    fn default_value_impl(self) -> f64 {
        0.0
    }

    fn as_str_impl(self) -> &'static str {
        "quadratic_constraint_quadratic_coefficient"
    }
}

attribute_family!(
    SymmetricDoubleAttr3,
    QuadKey,
    f64,
    sym_double3,
    [SymmetricDoubleAttr3::QuadraticConstraintQuadraticCoefficient]
);

#[cfg(test)]
mod tests {
    use super::{Attribute, BoolAttr1, DoubleAttr1, DoubleAttr2, ElementType, SymmetricDoubleAttr3};

    #[test]
    fn defaults_follow_the_declared_vocabulary() {
        assert_eq!(
            DoubleAttr1::VariableLowerBound.default_value(),
            f64::NEG_INFINITY
        );
        assert_eq!(DoubleAttr1::VariableUpperBound.default_value(), f64::INFINITY);
        assert_eq!(DoubleAttr2::LinearConstraintCoefficient.default_value(), 0.0);
        assert!(!BoolAttr1::VariableInteger.default_value());
    }

    #[test]
    fn key_types_match_arity() {
        assert_eq!(DoubleAttr1::VariableLowerBound.key_types().len(), 1);
        assert_eq!(DoubleAttr2::LinearConstraintCoefficient.key_types().len(), 2);
        assert_eq!(
            SymmetricDoubleAttr3::QuadraticConstraintQuadraticCoefficient
                .key_types()
                .len(),
            3
        );
    }

    #[test]
    fn element_type_indexes_are_dense() {
        for (position, element_type) in ElementType::ALL.iter().enumerate() {
            assert_eq!(element_type.index(), position);
        }
    }

    #[test]
    fn every_variant_is_listed_in_all() {
        assert_eq!(DoubleAttr1::ALL.len(), 10);
        assert_eq!(DoubleAttr2::ALL.len(), 4);
    }
}
