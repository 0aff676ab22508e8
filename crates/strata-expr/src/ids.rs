macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Get the inner i64 value.
            pub fn inner(self) -> i64 {
                self.0
            }

            /// Create an ID from an i64 value.
            pub fn new(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

define_id_type!(VariableId);
define_id_type!(LinearConstraintId);
define_id_type!(QuadraticConstraintId);
define_id_type!(IndicatorConstraintId);
define_id_type!(AuxiliaryObjectiveId);
