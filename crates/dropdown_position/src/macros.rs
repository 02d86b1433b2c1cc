//! Macros for reducing boilerplate in option builders.

/// Generates a builder-style setter method for a field.
///
/// # Usage
///
/// ```ignore
/// // When method name matches field name:
/// builder_field!(horizontal, HorizontalPosition);
/// // Generates: pub fn horizontal(mut self, value: HorizontalPosition) -> Self { self.horizontal = value; self }
///
/// // When method name differs from field name:
/// builder_field!(with_throttle, throttle_ms, u64);
/// ```
#[macro_export]
macro_rules! builder_field {
    // Method name matches field name
    ($name:ident, $type:ty) => {
        #[must_use]
        pub fn $name(mut self, value: $type) -> Self {
            self.$name = value;
            self
        }
    };
    // Method name differs from field name
    ($method:ident, $field:ident, $type:ty) => {
        #[must_use]
        pub fn $method(mut self, value: $type) -> Self {
            self.$field = value;
            self
        }
    };
}

/// Generates a builder-style setter method for an Option field.
///
/// # Usage
///
/// ```ignore
/// builder_option!(trigger_id, String);
/// // Generates: pub fn trigger_id(mut self, value: String) -> Self { self.trigger_id = Some(value); self }
/// ```
#[macro_export]
macro_rules! builder_option {
    ($name:ident, $type:ty) => {
        #[must_use]
        pub fn $name(mut self, value: $type) -> Self {
            self.$name = Some(value);
            self
        }
    };
}
