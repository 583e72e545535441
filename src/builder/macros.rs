//! Macros for ergonomic machine construction.

/// Generate a `State` implementation for a fieldless enum.
///
/// # Example
///
/// ```
/// use switchboard::state_enum;
/// use switchboard::core::State;
///
/// state_enum! {
///     pub enum Player {
///         Stopped,
///         Playing,
///         Paused,
///     }
/// }
///
/// assert_eq!(Player::Paused.name(), "Paused");
/// ```
#[macro_export]
macro_rules! state_enum {
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
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
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

/// Build an argument list from serializable expressions.
///
/// Each expression is converted with `serde_json::json!`.
///
/// ```
/// use switchboard::args;
///
/// let empty = args![];
/// assert!(empty.is_empty());
///
/// let args = args![1, "two", [3]];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[1], "two");
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::__private::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::__private::json!($arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;
    use serde_json::json;

    state_enum! {
        enum TestState {
            Idle,
            Running,
            Done,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Idle.name(), "Idle");
        assert_eq!(TestState::Running.name(), "Running");
        assert_eq!(TestState::Done.name(), "Done");
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
        }

        assert_eq!(PublicState::A.name(), "A");
        assert_ne!(PublicState::A, PublicState::B);
    }

    #[test]
    fn state_enum_serializes_by_variant_name() {
        let json = serde_json::to_string(&TestState::Running).unwrap();
        assert_eq!(json, "\"Running\"");
    }

    #[test]
    fn args_macro_converts_values() {
        let value = 5;
        let args = args![value, "x", json!({ "k": true })];
        assert_eq!(args, vec![json!(5), json!("x"), json!({ "k": true })]);
    }

    #[test]
    fn args_macro_accepts_empty_list() {
        let args = args![];
        assert!(args.is_empty());
    }
}
