//! Macros for ergonomic state machine construction.

/// Generate a state identifier enum together with its `State` implementation.
///
/// The enum derives everything `State` requires, and `name()` returns the
/// variant name.
///
/// # Example
///
/// ```
/// use strata::states;
/// use strata::core::State;
///
/// states! {
///     pub enum Toaster {
///         Root,
///         Heating,
///         Toasting,
///         Baking,
///         DoorOpen,
///     }
/// }
///
/// assert_eq!(Toaster::DoorOpen.name(), "DoorOpen");
/// ```
#[macro_export]
macro_rules! states {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    states! {
        enum TestState {
            Root,
            Idle,
            Busy,
        }
    }

    #[test]
    fn states_macro_generates_trait() {
        assert_eq!(TestState::Root.name(), "Root");
        assert_eq!(TestState::Idle.name(), "Idle");
        assert_eq!(TestState::Busy.name(), "Busy");
    }

    #[test]
    fn states_macro_supports_visibility_and_attributes() {
        states! {
            /// Documented
            pub enum PublicState {
                #[allow(dead_code)]
                A,
                B,
            }
        }

        let state = PublicState::B;
        assert_eq!(state, PublicState::B);
        assert_eq!(state.name(), "B");
    }

    #[test]
    fn generated_enum_is_copy_and_serializable() {
        let state = TestState::Busy;
        let copy = state;
        let json = serde_json::to_string(&copy).unwrap();

        assert_eq!(json, "\"Busy\"");
        assert_eq!(state, copy);
    }
}
