//! Helper macro for declaring port error enums with ergonomic constructors.
//!
//! Each variant gets a snake-case constructor whose parameters accept
//! `impl Into<T>`, so adapters can write `ScoringServiceError::timeout(msg)`
//! without spelling out the struct variant.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum LookupPortError {
            Offline => "lookup offline",
            Missing { message: String } => "missing: {message}",
            Status { code: u16, detail: String } => "status {code}: {detail}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(LookupPortError::offline().to_string(), "lookup offline");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = LookupPortError::missing("loon");
        assert_eq!(err.to_string(), "missing: loon");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = LookupPortError::status(422_u16, "days must be positive");
        assert_eq!(err.to_string(), "status 422: days must be positive");
    }
}
