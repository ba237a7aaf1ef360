//! Macros for declaring state enums.

/// Declare a unit-variant enum and implement [`State`](crate::core::State) for it.
///
/// Besides the trait, the macro generates:
/// - `variants()`: every variant in declaration order
/// - a `Display` impl printing the variant name
///
/// Extra derives can be attached through ordinary attributes.
///
/// # Example
///
/// ```
/// use readiness::core::State;
/// use readiness::state_enum;
///
/// state_enum! {
///     #[derive(Copy, Eq, Hash)]
///     pub enum Gate {
///         Closed,
///         Opening,
///         Open,
///         Stuck,
///     }
///     final: [Open]
///     error: [Stuck]
/// }
///
/// assert_eq!(Gate::variants().len(), 4);
/// assert_eq!(Gate::Stuck.to_string(), "Stuck");
/// assert!(Gate::Stuck.is_error());
/// assert!(Gate::Open.is_final());
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

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub fn variants() -> &'static [$name] {
                &[$($name::$variant),*]
            }
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum Valve {
            Shut,
            Flowing,
            Sealed,
            Leaking,
        }
        final: [Sealed, Leaking]
        error: [Leaking]
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(Valve::Shut.name(), "Shut");
        assert!(!Valve::Flowing.is_final());
        assert!(Valve::Sealed.is_final());
        assert!(!Valve::Sealed.is_error());
        assert!(Valve::Leaking.is_error());
    }

    #[test]
    fn variants_are_listed_in_declaration_order() {
        assert_eq!(
            Valve::variants(),
            &[Valve::Shut, Valve::Flowing, Valve::Sealed, Valve::Leaking]
        );
    }

    #[test]
    fn display_uses_variant_name() {
        assert_eq!(Valve::Flowing.to_string(), "Flowing");
    }

    #[test]
    fn state_enum_accepts_extra_derives() {
        state_enum! {
            #[derive(Copy, Eq, Hash)]
            pub enum Switch {
                Up,
                Down,
            }
        }

        let mut seen = std::collections::HashSet::new();
        seen.insert(Switch::Up);
        seen.insert(Switch::Up);
        assert_eq!(seen.len(), 1);
        assert!(!Switch::Down.is_final());
        assert!(!Switch::Down.is_error());
    }
}
