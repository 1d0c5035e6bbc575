//! Helper macro for generating domain port error enums.

/// Generate a `thiserror` enum whose variants each carry a `message` field,
/// together with snake_case constructor helpers accepting `impl Into<String>`.
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $format:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($format)]
                $variant { message: String },
            )*
        }

        impl $name {
            ::paste::paste! {
                $(
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    define_port_error! {
        pub enum SamplePortError {
            Connection => "sample connection failed: {message}",
            NotFound => "sample missing: {message}",
        }
    }

    #[test]
    fn constructors_build_the_matching_variant() {
        let err = SamplePortError::connection("refused");
        assert_eq!(err.to_string(), "sample connection failed: refused");
        assert!(matches!(err, SamplePortError::Connection { .. }));
    }

    #[test]
    fn not_found_formats_its_message() {
        let err = SamplePortError::not_found("goal 42");
        assert_eq!(err.to_string(), "sample missing: goal 42");
    }
}
