//! Macros for declaring state enums.

/// Declare a fieldless enum and implement [`State`](crate::core::State) for it.
///
/// Each variant is given a display label. Variants listed under `final:`
/// report `is_final() == true`. The macro also generates a `Display` impl
/// that prints the label.
///
/// # Example
///
/// ```
/// use cluster_feedback::core::State;
/// use cluster_feedback::state_enum;
///
/// state_enum! {
///     pub enum Ticket {
///         Open => "open",
///         Closed => "closed",
///     }
///     final: [Closed]
/// }
///
/// assert_eq!(Ticket::Open.name(), "open");
/// assert!(Ticket::Closed.is_final());
/// assert_eq!(Ticket::Closed.to_string(), "closed");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
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
                    $(Self::$variant => $label),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
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
