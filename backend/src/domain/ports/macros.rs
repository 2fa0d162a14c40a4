//! `port_error!`: declares a port error enum with snake-case constructors.
//!
//! Every variant carries named fields and a `thiserror` message. Each variant
//! `Foo { a: A, b: B }` gains `fn foo(a: impl Into<A>, b: impl Into<B>)`, so
//! adapters can write `UserPersistenceError::not_found(id.as_ref())`.

macro_rules! port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),+ },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    /// Build this variant from values convertible into its fields.
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                }
            )+
        }
    };
}

pub(crate) use port_error;

#[cfg(test)]
mod tests {
    port_error! {
        pub enum StoreError {
            Missing { key: String } => "missing {key}",
            Full { capacity: u32 } => "store full at {capacity}",
            Rejected { key: String, attempts: u8 } => "{key} rejected after {attempts}",
        }
    }

    #[test]
    fn string_fields_take_borrowed_text() {
        assert_eq!(StoreError::missing("k1").to_string(), "missing k1");
        assert_eq!(
            StoreError::missing("k1"),
            StoreError::Missing { key: "k1".to_owned() }
        );
    }

    #[test]
    fn numeric_fields_widen_through_into() {
        assert_eq!(StoreError::full(8_u16).to_string(), "store full at 8");
    }

    #[test]
    fn constructor_arguments_follow_field_order() {
        assert_eq!(StoreError::rejected("k2", 3_u8).to_string(), "k2 rejected after 3");
    }
}
